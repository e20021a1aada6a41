//! Per-document classification tags, persisted as `metadata.json` next to
//! the rendered question images.
//!
//! A tag is either a flat label chosen by hand ("Security > Cryptography >
//! Hash Functions") or the structured triple an external classifier emits.
//! The index builder consumes these read-only; the tagging surface writes
//! them through this module.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::store::write_atomic;

/// One question's classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// Structured classifier output.
    Classification {
        category: String,
        subcategory: String,
        topic: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    /// Flat label, levels separated by `" > "`.
    Label(String),
}

impl TagValue {
    pub fn label(text: impl Into<String>) -> Self {
        TagValue::Label(text.into())
    }

    /// The category/subcategory/topic triple, however the tag is shaped.
    ///
    /// Flat labels split on `" > "`; missing levels fall back to
    /// `Uncategorized`/`General`/`General`, and anything past the third
    /// level stays attached to the topic.
    pub fn levels(&self) -> (String, String, String) {
        match self {
            TagValue::Classification {
                category,
                subcategory,
                topic,
                ..
            } => (category.clone(), subcategory.clone(), topic.clone()),
            TagValue::Label(label) => {
                let parts: Vec<&str> = label.split(" > ").filter(|p| !p.is_empty()).collect();
                let category = parts.first().unwrap_or(&"Uncategorized").to_string();
                let subcategory = parts.get(1).unwrap_or(&"General").to_string();
                let topic = if parts.len() > 2 {
                    parts[2..].join(" > ")
                } else {
                    "General".to_string()
                };
                (category, subcategory, topic)
            }
        }
    }
}

/// One document's question-number-to-tag mapping.
#[derive(Debug, Clone)]
pub struct TagStore {
    path: PathBuf,
    tags: BTreeMap<String, TagValue>,
}

impl TagStore {
    /// Read `metadata.json`; missing or corrupt files yield an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tags = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(tags) => tags,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt tag file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, question_num: u32) -> Option<&TagValue> {
        self.tags.get(&question_num.to_string())
    }

    pub fn set(&mut self, question_num: u32, value: TagValue) {
        self.tags.insert(question_num.to_string(), value);
    }

    pub fn remove(&mut self, question_num: u32) -> Option<TagValue> {
        self.tags.remove(&question_num.to_string())
    }

    /// Replace `metadata.json` atomically.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.tags)
            .map_err(|e| PipelineError::State(e.to_string()))?;
        write_atomic(&self.path, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_levels_split_on_separator() {
        let tag = TagValue::label("Security > Cryptography > Hash Functions");
        assert_eq!(
            tag.levels(),
            (
                "Security".to_string(),
                "Cryptography".to_string(),
                "Hash Functions".to_string()
            )
        );
    }

    #[test]
    fn short_label_falls_back_to_defaults() {
        assert_eq!(
            TagValue::label("Security").levels(),
            (
                "Security".to_string(),
                "General".to_string(),
                "General".to_string()
            )
        );
        assert_eq!(
            TagValue::label("").levels(),
            (
                "Uncategorized".to_string(),
                "General".to_string(),
                "General".to_string()
            )
        );
    }

    #[test]
    fn deep_label_keeps_extra_levels_in_topic() {
        let tag = TagValue::label("A > B > C > D");
        assert_eq!(tag.levels().2, "C > D");
    }

    #[test]
    fn classification_levels_pass_through() {
        let tag = TagValue::Classification {
            category: "Computer Systems".to_string(),
            subcategory: "Memory".to_string(),
            topic: "Cache".to_string(),
            explanation: Some("cache hit ratio arithmetic".to_string()),
        };
        assert_eq!(tag.levels().0, "Computer Systems");
        assert_eq!(tag.levels().2, "Cache");
    }

    #[test]
    fn tag_json_round_trips_both_shapes() {
        let label: TagValue = serde_json::from_str(r#""Security > Web""#).unwrap();
        assert_eq!(label, TagValue::label("Security > Web"));

        let class: TagValue = serde_json::from_str(
            r#"{"category": "Networking", "subcategory": "Protocols", "topic": "TCP"}"#,
        )
        .unwrap();
        assert!(matches!(class, TagValue::Classification { .. }));
    }

    #[test]
    fn store_round_trips_with_string_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cropped/2024S_A/metadata.json");

        let mut store = TagStore::load(&path);
        assert!(store.is_empty());
        store.set(7, TagValue::label("Basic Theory > Logic > Boolean Algebra"));
        store.save().unwrap();

        // Keys are question numbers as strings, matching the on-disk shape.
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(raw.get("7").is_some());

        let reloaded = TagStore::load(&path);
        assert_eq!(
            reloaded.get(7),
            Some(&TagValue::label("Basic Theory > Logic > Boolean Algebra"))
        );
    }

    #[test]
    fn remove_deletes_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TagStore::load(dir.path().join("metadata.json"));
        store.set(1, TagValue::label("X"));
        assert!(store.remove(1).is_some());
        assert!(store.get(1).is_none());
        assert!(store.remove(1).is_none());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, b"[oops").unwrap();
        assert!(TagStore::load(&path).is_empty());
    }
}
