//! Permutation-keyed tag tree.
//!
//! Every entry is filed under every ordering of its tags, so a note tagged
//! `@a @b` is found both at `a → b` and at `b → a`. Browsing a conjunction of
//! tags therefore works whichever tag is picked first.
//!
//! # Scaling
//!
//! An entry with `k` tags is placed `k!` times: 720 placements at six tags,
//! 40 320 at eight. Entries above the configured threshold are reported with
//! a warning but still expanded in full.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::models::Entry;
use crate::walker::TagIndex;

/// Tag count above which building the tree warns about an entry.
pub const DEFAULT_TAG_WARN_THRESHOLD: usize = 6;

/// One node of the tag tree: entries filed here plus child nodes by tag label.
#[derive(Debug, Default, Serialize)]
pub struct TagTree<'a> {
    entries: Vec<Entry<'a>>,
    tags: BTreeMap<String, TagTree<'a>>,
}

impl<'a> TagTree<'a> {
    /// Builds the tree with the default warning threshold.
    pub fn build(index: &TagIndex<'a>) -> Self {
        Self::build_with_threshold(index, DEFAULT_TAG_WARN_THRESHOLD)
    }

    /// Builds the tree, warning for entries with more than `threshold` tags.
    ///
    /// An entry with no tags at all lands in the root's own entries.
    pub fn build_with_threshold(index: &TagIndex<'a>, threshold: usize) -> Self {
        let mut root = Self::default();
        for (entry, tags) in index {
            if tags.len() > threshold {
                warn!(
                    entry = entry.rel_path(),
                    tags = tags.len(),
                    placements = factorial(tags.len()),
                    threshold,
                    "Entry exceeds tag-count threshold; every ordering is still indexed"
                );
            }
            let labels: Vec<&str> = tags.labels().collect();
            root.place(entry, &labels);
        }
        root
    }

    /// Files `entry` under every ordering of `remaining` below this node.
    fn place(&mut self, entry: &Entry<'a>, remaining: &[&str]) {
        if remaining.is_empty() {
            self.entries.push(entry.clone());
            return;
        }
        for (i, label) in remaining.iter().enumerate() {
            let mut rest = remaining.to_vec();
            rest.remove(i);
            self.tags
                .entry((*label).to_string())
                .or_default()
                .place(entry, &rest);
        }
    }

    /// Entries filed directly at this node.
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// Child nodes keyed by tag label, in label order.
    pub fn tags(&self) -> &BTreeMap<String, TagTree<'a>> {
        &self.tags
    }

    pub fn child(&self, label: &str) -> Option<&TagTree<'a>> {
        self.tags.get(label)
    }

    /// Follows a sequence of tag labels from this node.
    pub fn descend(&self, labels: &[&str]) -> Option<&TagTree<'a>> {
        labels
            .iter()
            .try_fold(self, |node, label| node.child(label))
    }

    /// Detaches the subtree for `label`, e.g. to hide `_untagged` entries.
    pub fn remove_tag(&mut self, label: &str) -> Option<TagTree<'a>> {
        self.tags.remove(label)
    }

    /// Total number of entry placements in this subtree.
    pub fn placements(&self) -> usize {
        self.entries.len() + self.tags.values().map(TagTree::placements).sum::<usize>()
    }
}

fn factorial(n: usize) -> usize {
    (1..=n).fold(1usize, |acc, k| acc.saturating_mul(k))
}
