//! examslice: exam-document segmentation and incremental search indexing.
//!
//! This crate is the stateful pipeline over [`examslice_core`]'s pure
//! algorithms. It loads rendered documents from the external collaborator,
//! runs a per-document editing session over detected crop regions, renders
//! confirmed questions to images, and derives a flat search index from the
//! confirmed universe with content-hash change detection.
//!
//! # Architecture
//!
//! - **examslice-core**: document keys, layout detection, region geometry
//! - **examslice** (this crate): sessions, compositing, persistence, the
//!   incremental index builder
//! - **examslice-cli**: command-line surface over both

pub use examslice_core;

pub mod bundle;
pub mod compose;
pub mod error;
pub mod index;
pub mod paths;
pub mod session;
pub mod store;
pub mod tags;
pub mod taxonomy;
pub mod text;

pub use bundle::RenderedDocument;
pub use compose::{TrimConfig, compose};
pub use error::{PipelineError, Result};
pub use index::{IndexBuilder, IndexRecord, IndexState, RunReport, write_artifacts};
pub use paths::ProjectLayout;
pub use session::DocumentSession;
pub use store::{CropState, CropStateStore, merge_saved};
pub use tags::{TagStore, TagValue};
pub use taxonomy::{Taxonomy, TopicsView};
pub use text::{LayoutTextSource, NoTextSource, TextSource};
