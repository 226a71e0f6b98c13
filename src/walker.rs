use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::Result;
use crate::extractor::extract_tags;
use crate::models::{Entry, Notebook, TagSet};

/// Tag sets of every entry reachable from a notebook root, keyed by entry.
pub type TagIndex<'a> = BTreeMap<Entry<'a>, TagSet>;

/// Walks the whole notebook and extracts the tags of every entry.
///
/// The root and grouping directories are included; they carry the sentinel
/// (or no tags) since they have no content. Directory symlink cycles are not
/// detected.
///
/// # Errors
///
/// Returns the first I/O or decoding error hit while walking.
pub fn build_tag_index(notebook: &Notebook) -> Result<TagIndex<'_>> {
    let mut index = TagIndex::new();
    visit(notebook.root(), &mut index)?;
    info!(
        entries = index.len(),
        root = %notebook.path().display(),
        "Indexed notebook"
    );
    Ok(index)
}

fn visit<'a>(entry: Entry<'a>, index: &mut TagIndex<'a>) -> Result<()> {
    let tags = extract_tags(&entry)?;
    let children = entry.children()?;
    debug!(entry = entry.rel_path(), tags = tags.len(), "Indexed entry");
    index.insert(entry, tags);

    for child in children {
        visit(child, index)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn indexes_every_reachable_entry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "@x @y\n").unwrap();
        fs::create_dir_all(dir.path().join("deep/er")).unwrap();
        fs::write(dir.path().join("deep/er/b.txt"), "@x\n").unwrap();
        fs::write(dir.path().join("00-Tags.md"), "@ignored\n").unwrap();

        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();
        let index = build_tag_index(&notebook).unwrap();

        let keys: Vec<&str> = index.keys().map(Entry::rel_path).collect();
        assert_eq!(keys, vec!["", "a", "deep", "deep/er", "deep/er/b"]);

        let b = &index[&notebook.root().child("deep").child("er").child("b")];
        assert_eq!(b.labels().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn grouping_entries_get_sentinel() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("group")).unwrap();

        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();
        let index = build_tag_index(&notebook).unwrap();

        assert!(index[&notebook.root()].contains("_untagged"));
        assert!(index[&notebook.root().child("group")].contains("_untagged"));
    }

    #[test]
    fn disabled_sentinel_leaves_grouping_entries_empty() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("group")).unwrap();

        let notebook = Notebook::open(dir.path(), ".txt", "utf-8")
            .unwrap()
            .with_untagged_sentinel(false);
        let index = build_tag_index(&notebook).unwrap();

        assert!(index.values().all(TagSet::is_empty));
    }

    #[test]
    fn undecodable_note_fails_the_walk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), [b'@', 0xc3, 0x28]).unwrap();

        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();

        assert!(build_tag_index(&notebook).is_err());
    }
}
