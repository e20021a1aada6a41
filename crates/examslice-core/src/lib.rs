//! examslice-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (document keys, layout words,
//! question markers, crop geometry) and the pure algorithms over them
//! (marker/footer detection, region calculation) used by examslice.
//!
//! Nothing here touches the filesystem or returns `Result`: detection misses
//! yield empty collections and degenerate geometry clamps to a minimum valid
//! region, so the stateful pipeline crate can treat every outcome as data.

pub mod document;
pub mod geometry;
pub mod layout;
pub mod markers;
pub mod regions;

pub use document::{DocumentKey, KeyParseError, Session, Variant};
pub use geometry::{CropGeometry, CropRegion, PageGeometry, PageSpan};
pub use layout::{DocumentLayout, LayoutWord, PageLayout};
pub use markers::{QuestionMarker, detect_footers, detect_markers};
pub use regions::{LayoutConfig, compute_region, compute_regions};
