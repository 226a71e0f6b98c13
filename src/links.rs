//! Symbolic-link views of the tag indexes.
//!
//! The output directory is wiped and rebuilt on every run. Links point at the
//! absolute path of each note and are named after its relative path with `/`
//! replaced by `.`. Grouping entries without a note file get no link.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{Result, TaggerError};
use crate::flatten::FlatTagIndex;
use crate::models::Entry;
use crate::tree::TagTree;

static UNSAFE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\[\] _-]").expect("valid filename regex"));

/// Outcome of materializing a link directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkReport {
    pub created: usize,
    /// Links not created because the destination already existed.
    pub skipped: usize,
}

/// Makes a tag label safe to use as a directory name.
///
/// # Examples
///
/// ```
/// use tagger::links::sanitize_tag;
///
/// assert_eq!(sanitize_tag("todo_open"), "todo_open");
/// assert_eq!(sanitize_tag("a/b.c"), "a_b_c");
/// ```
pub fn sanitize_tag(label: &str) -> Cow<'_, str> {
    UNSAFE_FILENAME_RE.replace_all(label, "_")
}

/// Deletes `dir` with everything under it, then recreates it empty.
///
/// Not atomic: a crash in between leaves the directory missing or partial.
pub fn replace_dir(dir: &Path) -> Result<()> {
    if dir.symlink_metadata().is_ok() {
        std::fs::remove_dir_all(dir).map_err(|e| TaggerError::io(dir, e))?;
        info!(dir = %dir.display(), "Removed previous link directory");
    }
    std::fs::create_dir_all(dir).map_err(|e| TaggerError::io(dir, e))
}

/// Rebuilds `out_dir` as a directory tree mirroring the tag tree.
///
/// A note is linked in every tag-path directory it is reachable from.
pub fn materialize_tree(out_dir: &Path, tree: &TagTree<'_>) -> Result<LinkReport> {
    replace_dir(out_dir)?;
    let mut report = LinkReport::default();
    link_tree(out_dir, tree, &mut report)?;
    info!(
        dir = %out_dir.display(),
        created = report.created,
        skipped = report.skipped,
        "Materialized tag tree links"
    );
    Ok(report)
}

/// Rebuilds `out_dir` with one directory per tag linking each tagged note once.
///
/// A tag directory is only created once a note is linked into it.
pub fn materialize_flat(out_dir: &Path, flat: &FlatTagIndex<'_>) -> Result<LinkReport> {
    replace_dir(out_dir)?;
    let mut report = LinkReport::default();
    for (label, entries) in flat.iter() {
        let tag_dir = out_dir.join(&*sanitize_tag(label));
        for entry in entries {
            link_entry(&tag_dir, entry, &mut report)?;
        }
    }
    info!(
        dir = %out_dir.display(),
        created = report.created,
        skipped = report.skipped,
        "Materialized flat tag links"
    );
    Ok(report)
}

fn link_tree(dir: &Path, tree: &TagTree<'_>, report: &mut LinkReport) -> Result<()> {
    for entry in tree.entries() {
        link_entry(dir, entry, report)?;
    }
    for (label, child) in tree.tags() {
        link_tree(&dir.join(&*sanitize_tag(label)), child, report)?;
    }
    Ok(())
}

/// Links one note into `dir`, creating the directory on first use.
fn link_entry(dir: &Path, entry: &Entry<'_>, report: &mut LinkReport) -> Result<()> {
    let Some(target) = entry.content_path().filter(|p| p.is_file()) else {
        return Ok(());
    };

    let link: PathBuf = dir.join(entry.link_name());
    if link.symlink_metadata().is_ok() {
        debug!(link = %link.display(), "Link exists, skipping");
        report.skipped += 1;
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|e| TaggerError::io(dir, e))?;
    symlink(&target, &link).map_err(|e| TaggerError::io(&link, e))?;
    report.created += 1;
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
