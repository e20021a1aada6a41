//! Helpers shared across subcommands.

use std::path::Path;

use examslice::examslice_core::{DocumentKey, LayoutConfig};
use examslice::{DocumentSession, ProjectLayout, RenderedDocument, TrimConfig};

pub fn layout_config(dpi: f64) -> LayoutConfig {
    LayoutConfig {
        dpi,
        ..LayoutConfig::default()
    }
}

pub fn parse_key(doc_key: &str) -> Result<DocumentKey, i32> {
    doc_key.parse().map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

pub fn load_document(root: &Path, doc_key: &str) -> Result<(ProjectLayout, RenderedDocument), i32> {
    let key = parse_key(doc_key)?;
    let paths = ProjectLayout::new(root);
    let doc = RenderedDocument::load(&paths, key).map_err(|e| {
        eprintln!("Error loading {doc_key}: {e}");
        1
    })?;
    Ok((paths, doc))
}

pub fn open_session(root: &Path, doc_key: &str, dpi: f64) -> Result<DocumentSession, i32> {
    let (paths, doc) = load_document(root, doc_key)?;
    Ok(DocumentSession::open(
        paths,
        doc,
        layout_config(dpi),
        TrimConfig::default(),
    ))
}
