//! Incremental search-index builder.
//!
//! Derives one flat record per confirmed, rendered question from the crop
//! state, OCR/extracted text, and classification tags. A content hash of the
//! rendered image decides whether a record needs reprocessing; unchanged
//! records are reused verbatim from the previous run, and a tag-only change
//! is patched in place without touching the text. The output set is rebuilt
//! from the current confirmed universe each run, so regions or images that
//! disappeared simply drop out.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use examslice_core::{CropRegion, DocumentKey};

use crate::error::{PipelineError, Result};
use crate::paths::ProjectLayout;
use crate::store::{CropState, write_atomic};
use crate::tags::{TagStore, TagValue};
use crate::taxonomy::TopicsView;
use crate::text::{TextSource, normalize_ws};

/// One searchable unit: image, text, and classification for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Deterministic id: `{document_key}_Q{nn}`.
    pub id: String,
    pub document_key: String,
    pub year: u16,
    pub session: String,
    pub variant: String,
    pub question_num: u32,
    /// Image location relative to the cropped-images root.
    pub image_path: String,
    pub text: String,
    pub tag: TagValue,
    /// SHA-256 of the rendered image bytes; internal to the build state.
    pub content_hash: String,
}

/// Persisted build state: the processed-id memo plus the full record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexState {
    #[serde(default)]
    pub processed: BTreeMap<String, String>,
    #[serde(default)]
    pub index: Vec<IndexRecord>,
}

impl IndexState {
    /// Read the state file; missing or corrupt files yield an empty state
    /// so a damaged memo only costs a full rebuild, never a dead pipeline.
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => return IndexState::default(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt index state, rebuilding from scratch");
                IndexState::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(self).map_err(|e| PipelineError::State(e.to_string()))?;
        write_atomic(path, &bytes)
    }
}

/// Per-run outcome counts, reported to the user at the end of each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Records in the final index.
    pub indexed: usize,
    /// Records reused verbatim from the previous run.
    pub skipped: usize,
    /// Records rebuilt (new, changed image, or missing text).
    pub reprocessed: usize,
    /// Records whose tag was patched without reprocessing.
    pub tag_refreshed: usize,
    /// Records indexed with empty text after a failed fallback extraction.
    pub failed: usize,
}

/// Builds the index from the confirmed-crop universe.
pub struct IndexBuilder<'a> {
    paths: &'a ProjectLayout,
    force: bool,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(paths: &'a ProjectLayout) -> Self {
        Self {
            paths,
            force: false,
        }
    }

    /// Reprocess every record even when its hash is unchanged.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Run one incremental build.
    ///
    /// `texts` maps record ids to text the upstream extraction pipeline
    /// already produced; records needing text that is not there fall back
    /// to `fallback`, the only step that runs on parallel workers. The
    /// previous state is a memo only; nothing survives into the output
    /// unless the region is still confirmed and its image still exists.
    pub fn build(
        &self,
        crop_state: &CropState,
        texts: &BTreeMap<String, String>,
        prior: &IndexState,
        fallback: &dyn TextSource,
    ) -> (IndexState, RunReport) {
        let prior_by_id: BTreeMap<&str, &IndexRecord> =
            prior.index.iter().map(|r| (r.id.as_str(), r)).collect();

        let mut report = RunReport::default();
        let mut records: Vec<IndexRecord> = Vec::new();
        let mut needs_text: Vec<(usize, DocumentKey, CropRegion)> = Vec::new();

        for (doc_key, regions) in crop_state {
            let key: DocumentKey = match doc_key.parse() {
                Ok(key) => key,
                Err(e) => {
                    warn!(%doc_key, error = %e, "skipping document with unparsable key");
                    continue;
                }
            };
            let tag_store = TagStore::load(self.paths.metadata_file(doc_key));

            for region in regions.iter().filter(|r| r.confirmed) {
                let image_file = self.paths.question_image(doc_key, region.question_num);
                let bytes = match std::fs::read(&image_file) {
                    Ok(bytes) => bytes,
                    Err(_) => {
                        debug!(%doc_key, question_num = region.question_num, "no rendered image, excluded");
                        continue;
                    }
                };
                let content_hash = hex::encode(Sha256::digest(&bytes));
                let id = format!("{doc_key}_Q{:02}", region.question_num);
                let tag = tag_store
                    .get(region.question_num)
                    .cloned()
                    .unwrap_or_else(|| TagValue::label("Uncategorized"));

                let reusable = (!self.force)
                    .then(|| prior_by_id.get(id.as_str()))
                    .flatten()
                    .filter(|p| p.content_hash == content_hash && !p.text.is_empty());

                if let Some(prev) = reusable {
                    let mut record = (*prev).clone();
                    if record.tag != tag {
                        // Cheap metadata refresh: same image, new tag.
                        record.tag = tag;
                        report.tag_refreshed += 1;
                    } else {
                        debug!(%id, "hash unchanged, reusing prior record");
                        report.skipped += 1;
                    }
                    records.push(record);
                    continue;
                }

                report.reprocessed += 1;
                let record = IndexRecord {
                    id: id.clone(),
                    document_key: doc_key.clone(),
                    year: key.year,
                    session: key.session.term().to_string(),
                    variant: key.variant.name().to_string(),
                    question_num: region.question_num,
                    image_path: ProjectLayout::question_image_rel(doc_key, region.question_num),
                    text: String::new(),
                    tag,
                    content_hash,
                };
                match texts.get(&id).map(|t| normalize_ws(t)).filter(|t| !t.is_empty()) {
                    Some(text) => records.push(IndexRecord { text, ..record }),
                    None => {
                        needs_text.push((records.len(), key, region.clone()));
                        records.push(record);
                    }
                }
            }
        }

        // Fallback extraction is the one parallel unit of work: each worker
        // reads one immutable layout and produces one record's text. The
        // merge back into `records` stays single-threaded.
        #[cfg(feature = "parallel")]
        let extracted: Vec<Option<String>> = {
            use rayon::prelude::*;
            needs_text
                .par_iter()
                .map(|(_, key, region)| fallback.extract(key, region))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let extracted: Vec<Option<String>> = needs_text
            .iter()
            .map(|(_, key, region)| fallback.extract(key, region))
            .collect();

        for ((i, _, _), text) in needs_text.iter().zip(extracted) {
            match text {
                Some(text) => records[*i].text = normalize_ws(&text),
                None => {
                    warn!(id = %records[*i].id, "text fallback failed, indexing with empty text");
                    report.failed += 1;
                }
            }
        }

        // Newest exam first, questions in order within it. The sort is
        // stable over a sorted-key traversal, so same-year records keep a
        // deterministic relative order.
        records.sort_by(|a, b| b.year.cmp(&a.year).then(a.question_num.cmp(&b.question_num)));

        report.indexed = records.len();
        info!(
            indexed = report.indexed,
            skipped = report.skipped,
            reprocessed = report.reprocessed,
            tag_refreshed = report.tag_refreshed,
            failed = report.failed,
            "index build finished"
        );

        let processed = records
            .iter()
            .map(|r| (r.id.clone(), r.content_hash.clone()))
            .collect();
        (
            IndexState {
                processed,
                index: records,
            },
            report,
        )
    }
}

/// Persist the build state and its two derived artifacts: the search index
/// (records minus the internal hash) and the hierarchical topics view. Both
/// are pure projections of the record set. Written only after a build has
/// fully computed, each through a temp-and-rename, so a failed run never
/// corrupts the previous state.
pub fn write_artifacts(paths: &ProjectLayout, state: &IndexState) -> Result<()> {
    state.save(&paths.index_state_file())?;

    let mut public = Vec::with_capacity(state.index.len());
    for record in &state.index {
        let mut value =
            serde_json::to_value(record).map_err(|e| PipelineError::State(e.to_string()))?;
        if let Some(object) = value.as_object_mut() {
            object.remove("content_hash");
        }
        public.push(value);
    }
    let bytes =
        serde_json::to_vec_pretty(&public).map_err(|e| PipelineError::State(e.to_string()))?;
    write_atomic(&paths.search_index_file(), &bytes)?;

    let view = TopicsView::from_tagged(state.index.iter().map(|r| (r.id.as_str(), &r.tag)));
    let bytes =
        serde_json::to_vec_pretty(&view).map_err(|e| PipelineError::State(e.to_string()))?;
    write_atomic(&paths.topics_view_file(), &bytes)?;

    Ok(())
}
