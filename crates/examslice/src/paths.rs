//! Path conventions for every persisted artifact, gathered in one structure
//! instead of scattered module constants.

use std::path::{Path, PathBuf};

/// Root-relative locations of all files the pipeline reads and writes.
///
/// - `documents/{doc_key}/layout.json` + `documents/{doc_key}/pages/*.png`:
///   collaborator input (rendered pages and word positions).
/// - `crop_state.json`: per-document crop regions and confirmation state.
/// - `cropped/{doc_key}/Q{nn}.png`: rendered question images.
/// - `cropped/{doc_key}/metadata.json`: classification tags.
/// - `index_state.json`, `search_index.json`, `topics_view.json`: index
///   build state and its derived artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one document's collaborator-supplied bundle.
    pub fn document_dir(&self, doc_key: &str) -> PathBuf {
        self.root.join("documents").join(doc_key)
    }

    /// Word-position layout for one document.
    pub fn layout_file(&self, doc_key: &str) -> PathBuf {
        self.document_dir(doc_key).join("layout.json")
    }

    /// Directory of one document's rendered page rasters.
    pub fn pages_dir(&self, doc_key: &str) -> PathBuf {
        self.document_dir(doc_key).join("pages")
    }

    /// The single crop-state file covering all documents.
    pub fn crop_state_file(&self) -> PathBuf {
        self.root.join("crop_state.json")
    }

    /// Directory of one document's rendered question images.
    pub fn cropped_dir(&self, doc_key: &str) -> PathBuf {
        self.root.join("cropped").join(doc_key)
    }

    /// Rendered image for one question: `cropped/{doc_key}/Q{nn}.png`.
    pub fn question_image(&self, doc_key: &str, question_num: u32) -> PathBuf {
        self.cropped_dir(doc_key)
            .join(format!("Q{question_num:02}.png"))
    }

    /// The image path as recorded in index records, relative to `cropped/`.
    pub fn question_image_rel(doc_key: &str, question_num: u32) -> String {
        format!("{doc_key}/Q{question_num:02}.png")
    }

    /// Per-document classification tags.
    pub fn metadata_file(&self, doc_key: &str) -> PathBuf {
        self.cropped_dir(doc_key).join("metadata.json")
    }

    pub fn index_state_file(&self) -> PathBuf {
        self.root.join("index_state.json")
    }

    pub fn search_index_file(&self) -> PathBuf {
        self.root.join("search_index.json")
    }

    pub fn topics_view_file(&self) -> PathBuf {
        self.root.join("topics_view.json")
    }
}
