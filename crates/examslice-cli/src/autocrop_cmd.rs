use std::path::Path;

use crate::cli::OutputFormat;
use crate::shared;

pub fn run(
    doc_key: &str,
    root: &Path,
    format: &OutputFormat,
    dpi: f64,
    save: bool,
    reset: Option<u32>,
) -> Result<(), i32> {
    let mut session = shared::open_session(root, doc_key, dpi)?;

    if let Some(question_num) = reset {
        session.reset(question_num).map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;
    }
    if save || reset.is_some() {
        session.save().map_err(|e| {
            eprintln!("Error saving crop state: {e}");
            1
        })?;
    }

    match format {
        OutputFormat::Text => {
            for region in session.regions() {
                let status = if region.confirmed { "✓" } else { "○" };
                let continuation = if region.extra_pages.is_empty() {
                    String::new()
                } else {
                    format!("\t+{} page(s)", region.extra_pages.len())
                };
                println!(
                    "{} Q{:02}\tpage {}\t({}, {})..({}, {}){}",
                    status,
                    region.question_num,
                    region.page_num,
                    region.x1,
                    region.y1,
                    region.x2,
                    region.y2,
                    continuation
                );
            }
            let (confirmed, total) = session.progress();
            println!("{confirmed}/{total} confirmed");
        }
        OutputFormat::Json => {
            let json_str = serde_json::to_string(session.regions()).map_err(|e| {
                eprintln!("Error serializing regions: {e}");
                1
            })?;
            println!("{json_str}");
        }
    }

    Ok(())
}
