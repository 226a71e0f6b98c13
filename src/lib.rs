pub mod config;
pub mod error;
pub mod extractor;
pub mod flatten;
pub mod links;
pub mod logging;
pub mod models;
pub mod remover;
pub mod render;
pub mod runner;
pub mod tree;
pub mod walker;

pub use config::{Config, ConfigBuilder, Mode};
pub use error::{Result, TaggerError};
pub use flatten::FlatTagIndex;
pub use models::{Entry, Notebook, Status, Tag, TagSet, UNTAGGED};
pub use remover::RemovalPattern;
pub use render::{Format, Renderer};
pub use runner::{Outcome, run};
pub use tree::TagTree;
pub use walker::{TagIndex, build_tag_index};
