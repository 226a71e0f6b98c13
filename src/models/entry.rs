use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use serde::{Serialize, Serializer};
use tracing::warn;

use super::Notebook;
use crate::error::{Result, TaggerError};

/// Name prefixes skipped while listing children. `00-` keeps generated
/// indexes such as `00-Tags` out of the notebook.
const EXCLUDED_PREFIXES: [&str; 3] = [".", "_", "00-"];

/// A logical node of the notebook: a note, a grouping directory, or both.
///
/// Identified by its relative path, `/`-joined with no file extension. The
/// root entry has an empty relative path. Equality, ordering and hashing use
/// the relative path only.
#[derive(Clone)]
pub struct Entry<'a> {
    notebook: &'a Notebook,
    rel_path: String,
}

impl<'a> Entry<'a> {
    pub(crate) fn new(notebook: &'a Notebook, rel_path: String) -> Self {
        Self { notebook, rel_path }
    }

    pub fn notebook(&self) -> &'a Notebook {
        self.notebook
    }

    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// Returns the child entry called `name`.
    pub fn child(&self, name: &str) -> Entry<'a> {
        let rel_path = if self.rel_path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.rel_path, name)
        };
        Entry::new(self.notebook, rel_path)
    }

    /// Directory that holds this entry's children, if it exists.
    pub fn dir_path(&self) -> PathBuf {
        let mut path = self.notebook.path().to_path_buf();
        for component in self.rel_path.split('/').filter(|c| !c.is_empty()) {
            path.push(component);
        }
        path
    }

    /// Location of the note file backing this entry.
    ///
    /// The root entry has no note file.
    pub fn content_path(&self) -> Option<PathBuf> {
        if self.rel_path.is_empty() {
            return None;
        }
        let mut path: OsString = self.dir_path().into_os_string();
        path.push(self.notebook.file_extension());
        Some(PathBuf::from(path))
    }

    /// Returns true if a note file exists for this entry.
    pub fn is_note(&self) -> bool {
        self.content_path().is_some_and(|p| p.is_file())
    }

    /// Wiki namespace form of the relative path: `a_b/c` becomes `a b:c`.
    pub fn namespace(&self) -> String {
        self.rel_path.replace('_', " ").replace('/', ":")
    }

    /// File name for a link to this note: `a/b` becomes `a.b.txt`.
    pub fn link_name(&self) -> String {
        format!(
            "{}{}",
            self.rel_path.replace('/', "."),
            self.notebook.file_extension()
        )
    }

    /// Lists the direct children of this entry, sorted by relative path.
    ///
    /// Notes are files ending in the notebook extension, listed without it;
    /// directories are grouping entries. A note and a directory with the same
    /// name yield a single entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn children(&self) -> Result<Vec<Entry<'a>>> {
        let dir = self.dir_path();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let extension = self.notebook.file_extension();
        let mut children = BTreeMap::new();

        let listing = std::fs::read_dir(&dir).map_err(|e| TaggerError::io(&dir, e))?;
        for item in listing {
            let item = item.map_err(|e| TaggerError::io(&dir, e))?;
            let path = item.path();
            let Some(name) = item.file_name().to_str().map(str::to_owned) else {
                warn!(path = %path.display(), "Skipping entry with non UTF-8 name");
                continue;
            };
            if EXCLUDED_PREFIXES.iter().any(|p| name.starts_with(p)) {
                continue;
            }

            let child_name = if path.is_file() {
                match name.strip_suffix(extension) {
                    Some(stem) if !stem.is_empty() => stem.to_string(),
                    _ => continue,
                }
            } else if path.is_dir() {
                name
            } else {
                continue;
            };

            let child = self.child(&child_name);
            children.entry(child.rel_path.clone()).or_insert(child);
        }

        Ok(children.into_values().collect())
    }
}

impl PartialEq for Entry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.rel_path == other.rel_path
    }
}

impl Eq for Entry<'_> {}

impl Hash for Entry<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rel_path.hash(state);
    }
}

impl PartialOrd for Entry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rel_path.cmp(&other.rel_path)
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entry").field(&self.rel_path).finish()
    }
}

impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.rel_path)
    }
}
