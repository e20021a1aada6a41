use std::path::Path;

use crate::shared;

pub fn run(
    doc_key: &str,
    root: &Path,
    dpi: f64,
    question: Option<u32>,
    all: bool,
) -> Result<(), i32> {
    if question.is_none() && !all {
        eprintln!("specify --question N or --all");
        return Err(1);
    }

    let mut session = shared::open_session(root, doc_key, dpi)?;

    if let Some(question_num) = question {
        let path = session.confirm(question_num).map_err(|e| {
            eprintln!("Error confirming Q{question_num}: {e}");
            1
        })?;
        println!("confirmed Q{question_num:02} -> {}", path.display());
    } else {
        let count = session.confirm_all().map_err(|e| {
            eprintln!("Error confirming {doc_key}: {e}");
            1
        })?;
        let (confirmed, total) = session.progress();
        println!("confirmed {count} question(s), {confirmed}/{total} total");
    }

    Ok(())
}
