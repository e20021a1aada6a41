//! Question text: whitespace normalization and the fallback that
//! re-extracts a region's text straight from the document layout words.
//!
//! The index builder prefers text the upstream extraction pipeline already
//! produced; this module is the recovery path for records whose cached text
//! was lost.

use examslice_core::{CropRegion, DocumentKey, DocumentLayout, LayoutConfig, PageSpan};

use crate::paths::ProjectLayout;

/// Collapse all whitespace runs to single spaces.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Source of question text for the index builder's reprocessing step.
///
/// Implementations must be shareable across the builder's extraction
/// workers; each call reads immutable inputs only.
pub trait TextSource: Sync {
    /// Text for one region, or `None` when extraction is impossible
    /// (missing layout, region outside the document).
    fn extract(&self, key: &DocumentKey, region: &CropRegion) -> Option<String>;
}

/// A source with no recovery path; every lookup misses.
pub struct NoTextSource;

impl TextSource for NoTextSource {
    fn extract(&self, _key: &DocumentKey, _region: &CropRegion) -> Option<String> {
        None
    }
}

/// Re-extracts text from `documents/{key}/layout.json` by windowing words
/// into the region's spans.
pub struct LayoutTextSource {
    paths: ProjectLayout,
    config: LayoutConfig,
}

impl LayoutTextSource {
    pub fn new(paths: ProjectLayout, config: LayoutConfig) -> Self {
        Self { paths, config }
    }
}

impl TextSource for LayoutTextSource {
    fn extract(&self, key: &DocumentKey, region: &CropRegion) -> Option<String> {
        let bytes = std::fs::read(self.paths.layout_file(&key.to_string())).ok()?;
        let layout: DocumentLayout = serde_json::from_slice(&bytes).ok()?;
        extract_region_text(&layout, region, &self.config)
    }
}

/// Collect the words whose scaled position falls inside the region's spans,
/// primary first, in the layout's reading order.
pub fn extract_region_text(
    layout: &DocumentLayout,
    region: &CropRegion,
    config: &LayoutConfig,
) -> Option<String> {
    let scale = config.scale();
    let mut words = Vec::new();

    let mut spans = vec![region.primary_span()];
    spans.extend(region.extra_pages.iter().copied());
    for PageSpan { page_num, y1, y2 } in spans {
        let page = layout.pages.get(page_num)?;
        for word in &page.words {
            let top = (word.top * scale) as i32;
            if top >= y1 && top < y2 {
                words.push(word.text.as_str());
            }
        }
    }

    Some(normalize_ws(&words.join(" ")))
}
