use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use super::Entry;
use crate::error::{Result, TaggerError};

pub const DEFAULT_FILE_EXTENSION: &str = ".txt";
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Looks up an encoding by its WHATWG label (e.g. `utf-8`, `latin1`).
///
/// # Errors
///
/// Returns `TaggerError::UnknownEncoding` if the label is not recognised.
pub fn lookup_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| TaggerError::UnknownEncoding(label.to_string()))
}

/// A directory tree of plain-text notes.
///
/// Holds the settings every entry of the tree shares. Entries borrow the
/// notebook, so it must outlive any index built from it.
#[derive(Debug)]
pub struct Notebook {
    root: PathBuf,
    file_extension: String,
    encoding: &'static Encoding,
    untagged_sentinel: bool,
}

impl Notebook {
    /// Opens the notebook rooted at `root`.
    ///
    /// The root is canonicalized so symbolic links created later point at
    /// absolute note paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved or the encoding label
    /// is unknown.
    pub fn open(
        root: impl AsRef<Path>,
        file_extension: impl Into<String>,
        encoding: &str,
    ) -> Result<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|e| TaggerError::io(root, e))?;

        Ok(Self {
            root,
            file_extension: file_extension.into(),
            encoding: lookup_encoding(encoding)?,
            untagged_sentinel: true,
        })
    }

    /// Enables or disables the `_untagged` sentinel for notes with no tags.
    pub fn with_untagged_sentinel(mut self, enabled: bool) -> Self {
        self.untagged_sentinel = enabled;
        self
    }

    /// Returns the entry for the notebook root.
    pub fn root(&self) -> Entry<'_> {
        Entry::new(self, String::new())
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn untagged_sentinel(&self) -> bool {
        self.untagged_sentinel
    }

    /// Reads and decodes a text file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or contains bytes that are invalid in
    /// the notebook encoding.
    pub fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| TaggerError::io(path, e))?;
        let (text, actual, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            return Err(TaggerError::Decode {
                path: path.to_path_buf(),
                encoding: actual.name(),
            });
        }
        Ok(text.into_owned())
    }

    /// Encodes `text` and writes it to `path`, replacing existing content.
    pub fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        let (bytes, actual, unmappable) = self.encoding.encode(text);
        if unmappable {
            return Err(TaggerError::Encode {
                path: path.to_path_buf(),
                encoding: actual.name(),
            });
        }
        std::fs::write(path, bytes).map_err(|e| TaggerError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_canonicalizes_root() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a");
        std::fs::create_dir(&nested).unwrap();

        let notebook = Notebook::open(nested.join(".."), ".txt", "utf-8").unwrap();

        assert_eq!(notebook.path(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn open_fails_for_missing_root() {
        let dir = tempdir().unwrap();
        let result = Notebook::open(dir.path().join("missing"), ".txt", "utf-8");

        assert!(matches!(result, Err(TaggerError::Io { .. })));
    }

    #[test]
    fn open_rejects_unknown_encoding() {
        let dir = tempdir().unwrap();
        let result = Notebook::open(dir.path(), ".txt", "klingon");

        assert!(matches!(result, Err(TaggerError::UnknownEncoding(label)) if label == "klingon"));
    }

    #[test]
    fn read_text_decodes_latin1() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, [b'@', b'c', 0xe9, b'\n']).unwrap();

        let notebook = Notebook::open(dir.path(), ".txt", "latin1").unwrap();

        assert_eq!(notebook.read_text(&path).unwrap(), "@c\u{e9}\n");
    }

    #[test]
    fn read_text_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, [b'a', 0xc3, 0x28]).unwrap();

        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();

        assert!(matches!(
            notebook.read_text(&path),
            Err(TaggerError::Decode { .. })
        ));
    }

    #[test]
    fn sentinel_is_enabled_by_default() {
        let dir = tempdir().unwrap();
        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();
        assert!(notebook.untagged_sentinel());

        let notebook = notebook.with_untagged_sentinel(false);
        assert!(!notebook.untagged_sentinel());
    }
}
