//! The three-level topic taxonomy (category > subcategory > topic) and the
//! derived browse view over tagged index records.
//!
//! Both structures are explicit ordered mappings with an insert-if-absent
//! merge rule; nothing here mutates nested maps ad hoc.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::store::write_atomic;
use crate::tags::TagValue;

type Level3<T> = BTreeMap<String, BTreeMap<String, BTreeMap<String, T>>>;

/// Keyword taxonomy: category > subcategory > topic > keywords.
///
/// Compatible with the `topics.json` the taxonomy-building collaborator
/// produces; consumed when rendering human-readable topic lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy(pub Level3<Vec<String>>);

impl Taxonomy {
    /// Ensure a path exists. Returns true when the topic was newly added;
    /// existing levels (and their keyword lists) are left untouched.
    pub fn insert_path(&mut self, category: &str, subcategory: &str, topic: &str) -> bool {
        let topics = self
            .0
            .entry(category.to_string())
            .or_default()
            .entry(subcategory.to_string())
            .or_default();
        if topics.contains_key(topic) {
            return false;
        }
        topics.insert(topic.to_string(), Vec::new());
        true
    }

    /// Attach a keyword to a topic, creating the path if needed. Duplicate
    /// keywords are ignored.
    pub fn insert_keyword(&mut self, category: &str, subcategory: &str, topic: &str, keyword: &str) {
        self.insert_path(category, subcategory, topic);
        if let Some(keywords) = self
            .0
            .get_mut(category)
            .and_then(|subs| subs.get_mut(subcategory))
            .and_then(|topics| topics.get_mut(topic))
        {
            if !keywords.iter().any(|k| k == keyword) {
                keywords.push(keyword.to_string());
            }
        }
    }

    /// Merge another taxonomy in, insert-if-absent at every level.
    pub fn merge(&mut self, other: &Taxonomy) {
        for (category, subs) in &other.0 {
            for (subcategory, topics) in subs {
                for (topic, keywords) in topics {
                    for keyword in keywords {
                        self.insert_keyword(category, subcategory, topic, keyword);
                    }
                    self.insert_path(category, subcategory, topic);
                }
            }
        }
    }

    /// Sorted `"category > subcategory > topic"` strings for display.
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (category, subs) in &self.0 {
            for (subcategory, topics) in subs {
                for topic in topics.keys() {
                    out.push(format!("{category} > {subcategory} > {topic}"));
                }
            }
        }
        out
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| PipelineError::State(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(self).map_err(|e| PipelineError::State(e.to_string()))?;
        write_atomic(path, &bytes)
    }
}

/// Browse hierarchy derived from tagged records: category > subcategory >
/// topic > record ids, newest exam first.
///
/// A pure projection of the index records; regenerable from them alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicsView(pub Level3<Vec<String>>);

impl TopicsView {
    /// Group `(record id, tag)` pairs into the hierarchy. Ids within one
    /// topic are sorted descending; ids start with the exam year, so that
    /// is newest-first.
    pub fn from_tagged<'a>(tagged: impl IntoIterator<Item = (&'a str, &'a TagValue)>) -> Self {
        let mut view = TopicsView::default();
        for (id, tag) in tagged {
            let (category, subcategory, topic) = tag.levels();
            view.0
                .entry(category)
                .or_default()
                .entry(subcategory)
                .or_default()
                .entry(topic)
                .or_default()
                .push(id.to_string());
        }
        for subs in view.0.values_mut() {
            for topics in subs.values_mut() {
                for ids in topics.values_mut() {
                    ids.sort_by(|a, b| b.cmp(a));
                }
            }
        }
        view
    }
}
