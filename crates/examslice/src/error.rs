//! Error types for the stateful pipeline layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Per-item problems
//! (a missing rendered image, a failed text fallback) are handled inline and
//! never surface here; [`PipelineError`] covers the structural failures that
//! abort work on one document.

use thiserror::Error;

/// Error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error decoding or encoding a raster image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A persisted or collaborator-supplied file has the wrong shape.
    #[error("malformed document state: {0}")]
    State(String),

    /// A crop region references a page the document does not have.
    #[error("page {page_num} out of range for document with {page_count} pages")]
    MissingPage { page_num: usize, page_count: usize },

    /// A crop region is empty after clamping to its page.
    #[error("invalid crop region: {0}")]
    InvalidRegion(String),

    /// An operation named a question the session does not know.
    #[error("unknown question Q{0}")]
    UnknownQuestion(u32),
}

/// Convenience alias used throughout the pipeline crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PipelineError = io_err.into();
        assert!(matches!(err, PipelineError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn missing_page_message_names_both_counts() {
        let err = PipelineError::MissingPage {
            page_num: 7,
            page_count: 4,
        };
        assert_eq!(
            err.to_string(),
            "page 7 out of range for document with 4 pages"
        );
    }

    #[test]
    fn unknown_question_message() {
        assert_eq!(
            PipelineError::UnknownQuestion(12).to_string(),
            "unknown question Q12"
        );
    }
}
