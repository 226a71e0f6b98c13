use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Entry;
use crate::walker::TagIndex;

/// One-level mapping from tag label to the entries carrying it.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FlatTagIndex<'a> {
    tags: BTreeMap<String, Vec<Entry<'a>>>,
}

impl<'a> FlatTagIndex<'a> {
    /// Lists every entry once under each of its tags.
    pub fn build(index: &TagIndex<'a>) -> Self {
        let mut tags: BTreeMap<String, Vec<Entry<'a>>> = BTreeMap::new();
        for (entry, tag_set) in index {
            for label in tag_set.labels() {
                tags.entry(label.to_string())
                    .or_default()
                    .push(entry.clone());
            }
        }
        Self { tags }
    }

    pub fn get(&self, label: &str) -> Option<&[Entry<'a>]> {
        self.tags.get(label).map(Vec::as_slice)
    }

    /// Iterates tags in label order with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry<'a>])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn remove_tag(&mut self, label: &str) -> Option<Vec<Entry<'a>>> {
        self.tags.remove(label)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Total number of (tag, entry) associations.
    pub fn associations(&self) -> usize {
        self.tags.values().map(Vec::len).sum()
    }
}
