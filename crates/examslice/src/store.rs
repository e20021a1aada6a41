//! Durable crop state: one JSON file mapping document keys to their ordered
//! crop-region lists.
//!
//! The file is the single source of truth for what has been confirmed. Loads
//! tolerate a corrupt or missing file (the pipeline must stay resumable);
//! saves replace the whole file atomically via a temp-and-rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use examslice_core::CropRegion;

use crate::error::Result;

/// All documents' crop regions, keyed by document-key string.
pub type CropState = BTreeMap<String, Vec<CropRegion>>;

/// Write `bytes` to `path` through a sibling temp file and a rename, so a
/// failed write never leaves a truncated state file behind.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Handle on the persisted crop-state file.
#[derive(Debug, Clone)]
pub struct CropStateStore {
    path: PathBuf,
}

impl CropStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole state file. A missing or unparsable file yields an
    /// empty state: losing saved confirmations is recoverable (re-confirm),
    /// refusing to start is not.
    pub fn load(&self) -> CropState {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return CropState::new(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt crop state, starting empty");
                CropState::new()
            }
        }
    }

    /// Replace the whole state file atomically.
    pub fn save(&self, state: &CropState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| crate::error::PipelineError::State(e.to_string()))?;
        write_atomic(&self.path, &bytes)
    }
}

/// Overlay previously saved regions onto freshly auto-detected ones.
///
/// For each detected region with a saved counterpart (same question number),
/// the saved geometry (including extra spans) and confirmation flag win;
/// re-running detection never silently discards manual work. Questions with
/// no saved counterpart keep their fresh auto-geometry.
pub fn merge_saved(mut fresh: Vec<CropRegion>, saved: &[CropRegion]) -> Vec<CropRegion> {
    for region in &mut fresh {
        if let Some(prev) = saved.iter().find(|s| s.question_num == region.question_num) {
            region.set_geometry(prev.geometry());
            region.confirmed = prev.confirmed;
        }
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use examslice_core::PageSpan;

    fn region(question_num: u32, y1: i32, y2: i32) -> CropRegion {
        CropRegion {
            question_num,
            page_num: 0,
            x1: 30,
            y1,
            x2: 1245,
            y2,
            confirmed: false,
            extra_pages: vec![],
        }
    }

    #[test]
    fn load_missing_file_yields_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = CropStateStore::new(dir.path().join("crop_state.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_corrupt_file_yields_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop_state.json");
        std::fs::write(&path, b"{ definitely not json").unwrap();
        assert!(CropStateStore::new(&path).load().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CropStateStore::new(dir.path().join("crop_state.json"));

        let mut state = CropState::new();
        let mut r = region(1, 140, 885);
        r.confirmed = true;
        r.extra_pages = vec![PageSpan::new(1, 50, 185)];
        state.insert("2024S_A".to_string(), vec![r.clone(), region(2, 900, 1400)]);

        store.save(&state).unwrap();
        let loaded = store.load();
        assert_eq!(loaded, state);
        assert_eq!(loaded["2024S_A"][0], r);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CropStateStore::new(dir.path().join("crop_state.json"));
        store.save(&CropState::new()).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["crop_state.json".to_string()]);
    }

    #[test]
    fn merge_copies_saved_geometry_and_confirmation() {
        let fresh = vec![region(1, 140, 885), region(2, 900, 1400)];
        let mut saved = region(1, 100, 800);
        saved.x1 = 10;
        saved.confirmed = true;
        saved.extra_pages = vec![PageSpan::new(1, 50, 200)];

        let merged = merge_saved(fresh, &[saved]);
        assert_eq!(merged[0].x1, 10);
        assert_eq!(merged[0].y1, 100);
        assert_eq!(merged[0].y2, 800);
        assert_eq!(merged[0].extra_pages, vec![PageSpan::new(1, 50, 200)]);
        assert!(merged[0].confirmed);
        // Newly detected question untouched.
        assert_eq!(merged[1], region(2, 900, 1400));
    }

    #[test]
    fn merge_ignores_saved_regions_without_fresh_marker() {
        let fresh = vec![region(1, 140, 885)];
        let saved = vec![region(9, 0, 100)];
        let merged = merge_saved(fresh.clone(), &saved);
        assert_eq!(merged, fresh);
    }
}
