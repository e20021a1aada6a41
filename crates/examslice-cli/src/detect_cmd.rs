use std::path::Path;

use examslice::examslice_core::{detect_footers, detect_markers};

use crate::cli::OutputFormat;
use crate::shared;

pub fn run(doc_key: &str, root: &Path, format: &OutputFormat, dpi: f64) -> Result<(), i32> {
    let (_, doc) = shared::load_document(root, doc_key)?;
    let config = shared::layout_config(dpi);

    let markers = detect_markers(&doc.layout);
    let footers = detect_footers(&doc.layout, config.footer_band);

    match format {
        OutputFormat::Text => {
            if markers.is_empty() {
                println!("no question markers detected");
            }
            for marker in &markers {
                println!(
                    "Q{}\tpage {}\ttop {:.1}",
                    marker.question_num, marker.page_num, marker.top
                );
            }
            let found = footers.iter().flatten().count();
            println!(
                "{} questions, footers on {}/{} pages",
                markers.len(),
                found,
                footers.len()
            );
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "doc_key": doc_key,
                "markers": markers
                    .iter()
                    .map(|m| {
                        serde_json::json!({
                            "question_num": m.question_num,
                            "page_num": m.page_num,
                            "top": m.top,
                        })
                    })
                    .collect::<Vec<_>>(),
                "footers": footers,
            });
            println!("{value}");
        }
    }

    Ok(())
}
