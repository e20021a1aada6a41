//! Input layout primitives supplied by the external rendering/extraction
//! collaborator: per-page word positions in the document's geometric units.
//!
//! These are the only facts the detector needs about a document's text. The
//! collaborator also supplies rendered page rasters, which stay outside the
//! core crate.

/// One extractable word with its page-relative vertical position.
///
/// `top` is the distance from the top of the page in geometric units (PDF
/// points for the usual renderer); the region calculator converts to raster
/// pixels via the configured scale factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutWord {
    pub text: String,
    pub top: f64,
}

impl LayoutWord {
    pub fn new(text: impl Into<String>, top: f64) -> Self {
        Self {
            text: text.into(),
            top,
        }
    }
}

/// Word layout of one page, with the page height in the same geometric units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageLayout {
    pub height: f64,
    pub words: Vec<LayoutWord>,
}

/// Word layout of a whole document, one entry per rendered page.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
