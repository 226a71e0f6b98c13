//! Rendering of tag indexes into text documents.
//!
//! Each [`Format`] selects one [`Renderer`] implementation. Entries are sorted
//! by relative path and tags by label at every level, so output is stable
//! across runs.

mod json;
mod markdown;
mod zim;

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TaggerError};
use crate::flatten::FlatTagIndex;
use crate::models::Entry;
use crate::tree::TagTree;

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;
pub use zim::ZimRenderer;

/// Title written at the top of every rendered document.
pub const DOCUMENT_TITLE: &str = "Tags";

/// Turns a tag tree or a flat tag index into a document.
pub trait Renderer {
    fn render_tree(&self, tree: &TagTree<'_>) -> Result<String>;

    fn render_flat(&self, flat: &FlatTagIndex<'_>) -> Result<String>;
}

/// Document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Nested markdown bullet list.
    #[default]
    Markdown,
    /// Zim desktop wiki page.
    Zim,
    /// Pretty-printed JSON.
    Json,
}

impl Format {
    /// Returns the renderer for this format.
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Self::Markdown => Box::new(MarkdownRenderer),
            Self::Zim => Box::new(ZimRenderer::now()),
            Self::Json => Box::new(JsonRenderer),
        }
    }
}

impl FromStr for Format {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md" | "markdown" => Ok(Self::Markdown),
            "zim" => Ok(Self::Zim),
            "json" => Ok(Self::Json),
            other => Err(TaggerError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "md"),
            Self::Zim => write!(f, "zim"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Returns the entries sorted by relative path.
fn sorted<'e, 'a>(entries: &'e [Entry<'a>]) -> Vec<&'e Entry<'a>> {
    let mut sorted: Vec<&Entry<'a>> = entries.iter().collect();
    sorted.sort();
    sorted
}
