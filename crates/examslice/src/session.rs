//! Per-document editing session: the state machine over one document's crop
//! regions.
//!
//! A session owns the document's page rasters and its slice of the crop
//! state for as long as it is open; callers keep one session per document at
//! a time (single-writer discipline, no locking). Regions move through
//! `Detected -> Adjusted -> Confirmed`, with reset returning any region to
//! its freshly detected geometry.

use std::path::PathBuf;

use tracing::{info, warn};

use examslice_core::{
    CropGeometry, CropRegion, LayoutConfig, PageGeometry, QuestionMarker, compute_region,
    compute_regions, detect_footers, detect_markers,
};

use crate::bundle::RenderedDocument;
use crate::compose::{TrimConfig, compose};
use crate::error::{PipelineError, Result};
use crate::paths::ProjectLayout;
use crate::store::{CropStateStore, merge_saved};

/// One open document and its crop regions.
pub struct DocumentSession {
    doc: RenderedDocument,
    markers: Vec<QuestionMarker>,
    footers: Vec<Option<f64>>,
    geometries: Vec<PageGeometry>,
    config: LayoutConfig,
    trim: TrimConfig,
    paths: ProjectLayout,
    store: CropStateStore,
    regions: Vec<CropRegion>,
}

impl DocumentSession {
    /// Detect markers and footers, compute fresh geometry, and overlay any
    /// previously saved regions for this document.
    ///
    /// A document with no detectable markers opens with zero regions; that
    /// is reported by [`DocumentSession::regions`] being empty, not an
    /// error, and the caller may still work manually.
    pub fn open(
        paths: ProjectLayout,
        doc: RenderedDocument,
        config: LayoutConfig,
        trim: TrimConfig,
    ) -> Self {
        let markers = detect_markers(&doc.layout);
        let footers = detect_footers(&doc.layout, config.footer_band);
        let geometries = doc.page_geometries();

        let fresh = compute_regions(&markers, &geometries, &footers, &config);
        if fresh.is_empty() {
            warn!(doc_key = %doc.key, "no question markers detected");
        }

        let store = CropStateStore::new(paths.crop_state_file());
        let state = store.load();
        let regions = match state.get(&doc.key.to_string()) {
            Some(saved) => merge_saved(fresh, saved),
            None => fresh,
        };

        Self {
            doc,
            markers,
            footers,
            geometries,
            config,
            trim,
            paths,
            store,
            regions,
        }
    }

    pub fn doc_key(&self) -> String {
        self.doc.key.to_string()
    }

    pub fn regions(&self) -> &[CropRegion] {
        &self.regions
    }

    pub fn markers(&self) -> &[QuestionMarker] {
        &self.markers
    }

    /// Confirmed count and total, for progress reporting.
    pub fn progress(&self) -> (usize, usize) {
        let confirmed = self.regions.iter().filter(|r| r.confirmed).count();
        (confirmed, self.regions.len())
    }

    fn region_mut(&mut self, question_num: u32) -> Result<&mut CropRegion> {
        self.regions
            .iter_mut()
            .find(|r| r.question_num == question_num)
            .ok_or(PipelineError::UnknownQuestion(question_num))
    }

    /// Apply manual geometry. Any edit demotes a confirmed region back to
    /// unconfirmed; the image on disk is only refreshed on re-confirm.
    pub fn adjust(&mut self, question_num: u32, geometry: CropGeometry) -> Result<()> {
        let region = self.region_mut(question_num)?;
        region.set_geometry(geometry);
        region.confirmed = false;
        Ok(())
    }

    /// Stretch the primary span to near the physical page bottom, past any
    /// detected footer cut. Demotes like any other adjustment.
    pub fn extend_to_bottom(&mut self, question_num: u32) -> Result<()> {
        let margin = self.config.extend_margin;
        let geometries = &self.geometries;
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.question_num == question_num)
            .ok_or(PipelineError::UnknownQuestion(question_num))?;
        let page = geometries
            .get(region.page_num)
            .ok_or(PipelineError::MissingPage {
                page_num: region.page_num,
                page_count: geometries.len(),
            })?;
        region.y2 = page.height as i32 - margin;
        region.confirmed = false;
        Ok(())
    }

    /// Discard manual edits and confirmation, restoring the auto-detected
    /// geometry. Recomputes from the session's own marker snapshot, so the
    /// result is bit-identical to the original detection pass.
    pub fn reset(&mut self, question_num: u32) -> Result<()> {
        let i = self
            .markers
            .iter()
            .position(|m| m.question_num == question_num)
            .ok_or(PipelineError::UnknownQuestion(question_num))?;
        let fresh = compute_region(i, &self.markers, &self.geometries, &self.footers, &self.config)
            .ok_or(PipelineError::UnknownQuestion(question_num))?;

        let region = self.region_mut(question_num)?;
        *region = fresh;
        Ok(())
    }

    /// Render the region to `cropped/{doc_key}/Q{nn}.png`, mark it
    /// confirmed, and persist the whole document's list. This is the only
    /// path that both renders and confirms.
    pub fn confirm(&mut self, question_num: u32) -> Result<PathBuf> {
        let region = self
            .regions
            .iter()
            .find(|r| r.question_num == question_num)
            .ok_or(PipelineError::UnknownQuestion(question_num))?;

        let image = compose(&self.doc.pages, region, &self.trim)?;
        let doc_key = self.doc_key();
        std::fs::create_dir_all(self.paths.cropped_dir(&doc_key))?;
        let out = self.paths.question_image(&doc_key, question_num);
        image.save(&out)?;

        self.region_mut(question_num)?.confirmed = true;
        self.save()?;
        info!(%doc_key, question_num, path = %out.display(), "confirmed question");
        Ok(out)
    }

    /// Confirm every unconfirmed region in one pass with a single persist.
    ///
    /// A region that fails to render is logged and left unconfirmed; one bad
    /// region never blocks the batch. Returns the number confirmed.
    pub fn confirm_all(&mut self) -> Result<usize> {
        let doc_key = self.doc_key();
        std::fs::create_dir_all(self.paths.cropped_dir(&doc_key))?;

        let mut confirmed = 0;
        for i in 0..self.regions.len() {
            if self.regions[i].confirmed {
                continue;
            }
            let question_num = self.regions[i].question_num;
            match compose(&self.doc.pages, &self.regions[i], &self.trim) {
                Ok(image) => {
                    image.save(self.paths.question_image(&doc_key, question_num))?;
                    self.regions[i].confirmed = true;
                    confirmed += 1;
                }
                Err(e) => {
                    warn!(%doc_key, question_num, error = %e, "skipping unrenderable region");
                }
            }
        }

        self.save()?;
        info!(%doc_key, confirmed, "batch confirm finished");
        Ok(confirmed)
    }

    /// Persist this document's region list wholesale into the shared state
    /// file, leaving other documents' entries untouched.
    pub fn save(&self) -> Result<()> {
        let mut state = self.store.load();
        state.insert(self.doc_key(), self.regions.clone());
        self.store.save(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examslice_core::{DocumentLayout, LayoutWord, PageLayout};
    use image::{Rgb, RgbImage};

    fn page_image(width: u32, height: u32, marks: &[u32]) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        for &y in marks {
            for x in 0..width {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        img
    }

    /// One page, 1000x1500 at scale 1.0, with Q1/Q2 markers and some ink.
    fn test_doc() -> RenderedDocument {
        RenderedDocument {
            key: "2024S_A".parse().unwrap(),
            layout: DocumentLayout {
                pages: vec![PageLayout {
                    height: 1500.0,
                    words: vec![
                        LayoutWord::new("Q1.", 100.0),
                        LayoutWord::new("Q2.", 600.0),
                    ],
                }],
            },
            pages: vec![page_image(1000, 1500, &[120, 620, 700])],
        }
    }

    fn config() -> LayoutConfig {
        LayoutConfig {
            dpi: 72.0,
            ..LayoutConfig::default()
        }
    }

    fn open_session(root: &std::path::Path) -> DocumentSession {
        DocumentSession::open(
            ProjectLayout::new(root),
            test_doc(),
            config(),
            TrimConfig::default(),
        )
    }

    #[test]
    fn open_detects_regions() {
        let dir = tempfile::tempdir().unwrap();
        let session = open_session(dir.path());
        assert_eq!(session.regions().len(), 2);
        assert_eq!(session.regions()[0].question_num, 1);
        assert_eq!(session.regions()[0].y1, 90);
        assert_eq!(session.regions()[0].y2, 585);
        assert_eq!(session.progress(), (0, 2));
    }

    #[test]
    fn adjust_demotes_confirmed() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(dir.path());
        session.confirm(1).unwrap();
        assert!(session.regions()[0].confirmed);

        let mut geometry = session.regions()[0].geometry();
        geometry.y2 += 40;
        session.adjust(1, geometry).unwrap();
        assert!(!session.regions()[0].confirmed);
        assert_eq!(session.regions()[0].y2, 625);
    }

    #[test]
    fn confirm_writes_image_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(dir.path());
        let out = session.confirm(1).unwrap();
        assert!(out.ends_with("cropped/2024S_A/Q01.png"));
        assert!(out.exists());

        let state = CropStateStore::new(dir.path().join("crop_state.json")).load();
        assert!(state["2024S_A"][0].confirmed);
        assert!(!state["2024S_A"][1].confirmed);
    }

    #[test]
    fn reopen_overlays_saved_work() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(dir.path());
        let mut geometry = session.regions()[0].geometry();
        geometry.x1 = 5;
        session.adjust(1, geometry).unwrap();
        session.confirm(1).unwrap();
        drop(session);

        let session = open_session(dir.path());
        assert_eq!(session.regions()[0].x1, 5);
        assert!(session.regions()[0].confirmed);
        assert!(!session.regions()[1].confirmed);
    }

    #[test]
    fn reset_restores_auto_geometry_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(dir.path());
        let original = session.regions()[0].clone();

        let mut geometry = original.geometry();
        geometry.y1 = 3;
        geometry.y2 = 400;
        session.adjust(1, geometry).unwrap();
        session.confirm(1).unwrap();

        session.reset(1).unwrap();
        assert_eq!(session.regions()[0], original);
        assert!(!session.regions()[0].confirmed);
    }

    #[test]
    fn extend_to_bottom_reaches_physical_page_edge() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(dir.path());
        session.confirm(2).unwrap();

        session.extend_to_bottom(2).unwrap();
        assert_eq!(session.regions()[1].y2, 1500 - 30);
        assert!(!session.regions()[1].confirmed);
    }

    #[test]
    fn confirm_all_confirms_remaining() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(dir.path());
        session.confirm(1).unwrap();

        let count = session.confirm_all().unwrap();
        assert_eq!(count, 1);
        assert_eq!(session.progress(), (2, 2));
        assert!(dir.path().join("cropped/2024S_A/Q02.png").exists());
    }

    #[test]
    fn unknown_question_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(dir.path());
        assert!(matches!(
            session.reset(99),
            Err(PipelineError::UnknownQuestion(99))
        ));
        assert!(matches!(
            session.confirm(99),
            Err(PipelineError::UnknownQuestion(99))
        ));
    }
}
