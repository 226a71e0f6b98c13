//! Run configuration.
//!
//! A [`Config`] is assembled with [`ConfigBuilder`], whose `build()` rejects
//! bad settings before anything touches the notebook.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, TaggerError};
use crate::models::{DEFAULT_ENCODING, DEFAULT_FILE_EXTENSION, lookup_encoding};
use crate::remover::RemovalPattern;
use crate::render::Format;
use crate::tree::DEFAULT_TAG_WARN_THRESHOLD;

pub const DEFAULT_TAGS_DIR: &str = "00-Tags";
pub const DEFAULT_TAGS_FILE: &str = "00-Tags.md";

/// What a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Tag tree document.
    TagsFile,
    /// Flat per-tag document.
    FlatTagsFile,
    /// Tag tree of symbolic links.
    Symlink,
    /// One directory of symbolic links per tag.
    FlatSymlink,
    /// Remove tags matching a pattern from the notes.
    Remove,
}

impl FromStr for Mode {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tagsfile" => Ok(Self::TagsFile),
            "flattagsfile" => Ok(Self::FlatTagsFile),
            "symlink" => Ok(Self::Symlink),
            "flatsymlink" => Ok(Self::FlatSymlink),
            "remove" => Ok(Self::Remove),
            other => Err(TaggerError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TagsFile => "tagsfile",
            Self::FlatTagsFile => "flattagsfile",
            Self::Symlink => "symlink",
            Self::FlatSymlink => "flatsymlink",
            Self::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub notebook_path: PathBuf,
    pub file_extension: String,
    pub encoding: String,
    pub untagged_sentinel: bool,
    pub mode: Mode,
    pub format: Format,
    pub include_untagged: bool,
    /// Compiled removal pattern; always present in remove mode.
    pub remove_pattern: Option<RemovalPattern>,
    /// Link directory, relative to the notebook root.
    pub rel_tags_dir: PathBuf,
    /// Document path, relative to the notebook root.
    pub rel_tags_file: PathBuf,
    pub tag_warn_threshold: usize,
}

impl Config {
    /// Absolute location of the link directory.
    pub fn tags_dir(&self) -> PathBuf {
        self.notebook_path.join(&self.rel_tags_dir)
    }

    /// Absolute location of the rendered document.
    pub fn tags_file(&self) -> PathBuf {
        self.notebook_path.join(&self.rel_tags_file)
    }
}

/// Builder for [`Config`].
///
/// # Examples
///
/// ```
/// use tagger::{ConfigBuilder, Mode};
///
/// let config = ConfigBuilder::new("/notes", Mode::TagsFile)
///     .file_extension(".md")
///     .include_untagged(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.tags_file(), std::path::Path::new("/notes/00-Tags.md"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    notebook_path: PathBuf,
    mode: Mode,
    file_extension: Option<String>,
    encoding: Option<String>,
    untagged_sentinel: bool,
    format: Format,
    include_untagged: bool,
    remove_pattern: Option<String>,
    rel_tags_dir: Option<PathBuf>,
    rel_tags_file: Option<PathBuf>,
    tag_warn_threshold: Option<usize>,
}

impl ConfigBuilder {
    pub fn new(notebook_path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            notebook_path: notebook_path.into(),
            mode,
            file_extension: None,
            encoding: None,
            untagged_sentinel: true,
            format: Format::default(),
            include_untagged: false,
            remove_pattern: None,
            rel_tags_dir: None,
            rel_tags_file: None,
            tag_warn_threshold: None,
        }
    }

    /// Sets the note file extension, including the dot (default `.txt`).
    pub fn file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = Some(extension.into());
        self
    }

    /// Sets the note encoding label (default `utf-8`).
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    pub fn untagged_sentinel(mut self, enabled: bool) -> Self {
        self.untagged_sentinel = enabled;
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Keeps `_untagged` entries in rendered documents.
    pub fn include_untagged(mut self, include: bool) -> Self {
        self.include_untagged = include;
        self
    }

    pub fn remove_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.remove_pattern = Some(pattern.into());
        self
    }

    pub fn rel_tags_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.rel_tags_dir = Some(dir.into());
        self
    }

    pub fn rel_tags_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.rel_tags_file = Some(file.into());
        self
    }

    pub fn tag_warn_threshold(mut self, threshold: usize) -> Self {
        self.tag_warn_threshold = Some(threshold);
        self
    }

    /// Validates the settings and builds the config.
    ///
    /// # Errors
    ///
    /// - `MissingPattern` in remove mode without a non-empty pattern.
    /// - `InvalidPattern` if the pattern does not compile.
    /// - `UnknownEncoding` for an unrecognised encoding label.
    pub fn build(self) -> Result<Config> {
        let encoding = self.encoding.unwrap_or_else(|| DEFAULT_ENCODING.to_string());
        lookup_encoding(&encoding)?;

        let remove_pattern = match (self.mode, self.remove_pattern.as_deref()) {
            (Mode::Remove, None) => return Err(TaggerError::MissingPattern),
            (Mode::Remove, Some(pattern)) => Some(RemovalPattern::new(pattern)?),
            _ => None,
        };

        Ok(Config {
            notebook_path: self.notebook_path,
            file_extension: self
                .file_extension
                .unwrap_or_else(|| DEFAULT_FILE_EXTENSION.to_string()),
            encoding,
            untagged_sentinel: self.untagged_sentinel,
            mode: self.mode,
            format: self.format,
            include_untagged: self.include_untagged,
            remove_pattern,
            rel_tags_dir: self
                .rel_tags_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TAGS_DIR)),
            rel_tags_file: self
                .rel_tags_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TAGS_FILE)),
            tag_warn_threshold: self
                .tag_warn_threshold
                .unwrap_or(DEFAULT_TAG_WARN_THRESHOLD),
        })
    }
}
