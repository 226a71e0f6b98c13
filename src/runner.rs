use std::path::PathBuf;

use tracing::info;

use crate::config::{Config, Mode};
use crate::error::{Result, TaggerError};
use crate::flatten::FlatTagIndex;
use crate::links::{self, LinkReport};
use crate::models::{Notebook, UNTAGGED};
use crate::remover::{self, RemovalReport};
use crate::tree::TagTree;
use crate::walker::build_tag_index;

/// Result of one run, for reporting by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A document was written to `path`.
    Document { path: PathBuf },
    /// A link directory was rebuilt at `dir`.
    Links { dir: PathBuf, report: LinkReport },
    /// Tags were removed from notes.
    Removed(RemovalReport),
}

/// Indexes the notebook and produces the output selected by `config.mode`.
///
/// # Errors
///
/// Returns an error if the notebook cannot be opened or walked, or if
/// writing the output fails. Configuration problems surface from
/// `ConfigBuilder::build` before this is called.
pub fn run(config: &Config) -> Result<Outcome> {
    let notebook = Notebook::open(
        &config.notebook_path,
        config.file_extension.clone(),
        &config.encoding,
    )?
    .with_untagged_sentinel(config.untagged_sentinel);
    let index = build_tag_index(&notebook)?;

    let tags_file = notebook.path().join(&config.rel_tags_file);
    let tags_dir = notebook.path().join(&config.rel_tags_dir);

    match config.mode {
        Mode::TagsFile => {
            let mut tree = TagTree::build_with_threshold(&index, config.tag_warn_threshold);
            if !config.include_untagged {
                tree.remove_tag(UNTAGGED);
            }
            let document = config.format.renderer().render_tree(&tree)?;
            notebook.write_text(&tags_file, &document)?;
            info!(path = %tags_file.display(), format = %config.format, "Wrote tag tree document");
            Ok(Outcome::Document { path: tags_file })
        }
        Mode::FlatTagsFile => {
            let mut flat = FlatTagIndex::build(&index);
            if !config.include_untagged {
                flat.remove_tag(UNTAGGED);
            }
            let document = config.format.renderer().render_flat(&flat)?;
            notebook.write_text(&tags_file, &document)?;
            info!(path = %tags_file.display(), format = %config.format, "Wrote flat tag document");
            Ok(Outcome::Document { path: tags_file })
        }
        Mode::Symlink => {
            let tree = TagTree::build_with_threshold(&index, config.tag_warn_threshold);
            let report = links::materialize_tree(&tags_dir, &tree)?;
            Ok(Outcome::Links { dir: tags_dir, report })
        }
        Mode::FlatSymlink => {
            let flat = FlatTagIndex::build(&index);
            let report = links::materialize_flat(&tags_dir, &flat)?;
            Ok(Outcome::Links { dir: tags_dir, report })
        }
        Mode::Remove => {
            let Some(pattern) = config.remove_pattern.as_ref() else {
                return Err(TaggerError::MissingPattern);
            };
            Ok(Outcome::Removed(remover::remove_tags(&index, pattern)?))
        }
    }
}
