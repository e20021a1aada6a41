//! Loading a rendered document from the external rendering/extraction
//! collaborator: ordered page rasters plus the word-position layout.

use image::RgbImage;
use tracing::debug;

use examslice_core::{DocumentKey, DocumentLayout, PageGeometry};

use crate::error::{PipelineError, Result};
use crate::paths::ProjectLayout;

/// One document held in memory: its identity, page rasters, and word layout.
///
/// Pages are held only while the document is active; the session that owns a
/// `RenderedDocument` has exclusive use of them.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub key: DocumentKey,
    pub layout: DocumentLayout,
    pub pages: Vec<RgbImage>,
}

impl RenderedDocument {
    /// Load `documents/{key}/layout.json` and the page rasters under
    /// `documents/{key}/pages/`, in filename order.
    ///
    /// A page count disagreement between the two is a structural error: the
    /// geometry would be meaningless, so the document is rejected as a whole.
    pub fn load(paths: &ProjectLayout, key: DocumentKey) -> Result<Self> {
        let doc_key = key.to_string();

        let layout_bytes = std::fs::read(paths.layout_file(&doc_key))?;
        let layout: DocumentLayout = serde_json::from_slice(&layout_bytes)
            .map_err(|e| PipelineError::State(format!("{doc_key}/layout.json: {e}")))?;

        let mut page_files: Vec<_> = std::fs::read_dir(paths.pages_dir(&doc_key))?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        page_files.sort();

        if page_files.len() != layout.page_count() {
            return Err(PipelineError::State(format!(
                "{doc_key}: {} page images but layout describes {} pages",
                page_files.len(),
                layout.page_count()
            )));
        }

        let mut pages = Vec::with_capacity(page_files.len());
        for path in &page_files {
            pages.push(image::open(path)?.to_rgb8());
        }
        debug!(%doc_key, pages = pages.len(), "loaded rendered document");

        Ok(Self { key, layout, pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Raster dimensions of every page, for the region calculator.
    pub fn page_geometries(&self) -> Vec<PageGeometry> {
        self.pages
            .iter()
            .map(|img| PageGeometry::new(img.width(), img.height()))
            .collect()
    }
}
