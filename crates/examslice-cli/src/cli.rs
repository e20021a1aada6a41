use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Segment exam documents into per-question images and build the search index.
#[derive(Debug, Parser)]
#[command(name = "examslice", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect question markers and page footers in a rendered document
    Detect {
        /// Document key, e.g. 2024S_A
        #[arg(value_name = "DOC_KEY")]
        doc_key: String,

        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Render resolution of the page rasters
        #[arg(long, default_value_t = 150.0)]
        dpi: f64,
    },

    /// Compute crop regions, overlaying any saved manual work
    Autocrop {
        /// Document key, e.g. 2024S_A
        #[arg(value_name = "DOC_KEY")]
        doc_key: String,

        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Render resolution of the page rasters
        #[arg(long, default_value_t = 150.0)]
        dpi: f64,

        /// Persist the computed regions to the crop state file
        #[arg(long)]
        save: bool,

        /// Discard saved edits for one question and recompute it
        #[arg(long, value_name = "QUESTION")]
        reset: Option<u32>,
    },

    /// Render and confirm question images
    Render {
        /// Document key, e.g. 2024S_A
        #[arg(value_name = "DOC_KEY")]
        doc_key: String,

        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Render resolution of the page rasters
        #[arg(long, default_value_t = 150.0)]
        dpi: f64,

        /// Confirm a single question
        #[arg(long, value_name = "QUESTION", conflicts_with = "all")]
        question: Option<u32>,

        /// Confirm every unconfirmed question
        #[arg(long)]
        all: bool,
    },

    /// Incrementally rebuild the search index from confirmed questions
    Index {
        /// Project root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Reprocess every record even when unchanged
        #[arg(long)]
        force: bool,

        /// JSON file mapping record ids to upstream-extracted text
        #[arg(long, value_name = "FILE")]
        texts: Option<PathBuf>,

        /// Render resolution, for the fallback text extraction
        #[arg(long, default_value_t = 150.0)]
        dpi: f64,
    },
}

/// Output format for detect/autocrop subcommands.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}
