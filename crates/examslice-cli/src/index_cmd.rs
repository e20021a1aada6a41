use std::collections::BTreeMap;
use std::path::Path;

use examslice::{CropStateStore, IndexBuilder, IndexState, LayoutTextSource, ProjectLayout};

use crate::shared;

pub fn run(root: &Path, force: bool, texts_file: Option<&Path>, dpi: f64) -> Result<(), i32> {
    let paths = ProjectLayout::new(root);
    let crop_state = CropStateStore::new(paths.crop_state_file()).load();

    let texts: BTreeMap<String, String> = match texts_file {
        Some(file) => {
            let bytes = std::fs::read(file).map_err(|e| {
                eprintln!("Error reading {}: {e}", file.display());
                1
            })?;
            serde_json::from_slice(&bytes).map_err(|e| {
                eprintln!("Error parsing {}: {e}", file.display());
                1
            })?
        }
        None => BTreeMap::new(),
    };

    let prior = IndexState::load(&paths.index_state_file());
    let fallback = LayoutTextSource::new(paths.clone(), shared::layout_config(dpi));

    let (state, report) = IndexBuilder::new(&paths)
        .force(force)
        .build(&crop_state, &texts, &prior, &fallback);

    examslice::write_artifacts(&paths, &state).map_err(|e| {
        eprintln!("Error writing index artifacts: {e}");
        1
    })?;

    println!(
        "indexed {} record(s): {} skipped, {} reprocessed, {} tag-refreshed, {} failed",
        report.indexed, report.skipped, report.reprocessed, report.tag_refreshed, report.failed
    );

    Ok(())
}
