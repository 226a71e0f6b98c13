use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while indexing a notebook or materializing its tag views.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// The requested mode is not one of the supported modes.
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// The requested document format is not supported.
    #[error("Unknown file format: {0}")]
    UnknownFormat(String),

    /// Tag removal was requested without a tag-name pattern.
    #[error("No tag name pattern provided for removal")]
    MissingPattern,

    /// The tag-name pattern failed to compile.
    #[error("Invalid tag name pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The encoding label is not known.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Filesystem failure on a specific path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Note content could not be decoded with the notebook encoding.
    #[error("Failed to decode {} as {encoding}", path.display())]
    Decode { path: PathBuf, encoding: &'static str },

    /// Text could not be represented in the notebook encoding.
    #[error("Failed to encode {} as {encoding}", path.display())]
    Encode { path: PathBuf, encoding: &'static str },

    /// Serializing a JSON document failed.
    #[error("JSON render error: {0}")]
    Json(#[from] serde_json::Error),

    /// Formatting a document timestamp failed.
    #[error("Timestamp format error: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl TaggerError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true for errors caused by bad configuration rather than the filesystem.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownMode(_)
                | Self::UnknownFormat(_)
                | Self::MissingPattern
                | Self::InvalidPattern { .. }
                | Self::UnknownEncoding(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TaggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_classified() {
        assert!(TaggerError::UnknownMode("bogus".into()).is_config());
        assert!(TaggerError::UnknownFormat("docx".into()).is_config());
        assert!(TaggerError::MissingPattern.is_config());
        assert!(TaggerError::UnknownEncoding("klingon".into()).is_config());
    }

    #[test]
    fn io_errors_are_not_config_errors() {
        let err = TaggerError::io(
            "/nowhere/note.txt",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(!err.is_config());
        assert!(err.to_string().contains("/nowhere/note.txt"));
    }

    #[test]
    fn unknown_values_are_named_in_message() {
        let err = TaggerError::UnknownMode("tagfile".into());
        assert_eq!(err.to_string(), "Unknown mode: tagfile");
    }
}
