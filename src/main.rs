use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tagger::config::{DEFAULT_TAGS_DIR, DEFAULT_TAGS_FILE};
use tagger::logging::init_logging;
use tagger::models::{DEFAULT_ENCODING, DEFAULT_FILE_EXTENSION};
use tagger::tree::DEFAULT_TAG_WARN_THRESHOLD;
use tagger::{Config, ConfigBuilder, Format, Mode, Outcome, TaggerError};

/// tagger - tag indexes for a directory tree of plain-text notes
#[derive(Parser, Debug)]
#[command(name = "tagger")]
#[command(about = "Builds tag indexes and tag link trees for a plain-text notebook")]
#[command(version)]
struct Cli {
    /// Root directory of the notebook
    #[arg(long, visible_alias = "notebookpath", env = "TAGGER_NOTEBOOK", value_name = "PATH")]
    notebook: PathBuf,

    /// tagsfile, flattagsfile, symlink, flatsymlink or remove
    #[arg(long, env = "TAGGER_MODE", value_name = "MODE")]
    mode: Mode,

    /// Tag name pattern to remove (remove mode)
    #[arg(long, env = "TAGGER_REMOVE_TAG_REGEX", value_name = "PATTERN")]
    remove_tag_regex: Option<String>,

    /// Extension of note files, including the dot
    #[arg(long, env = "TAGGER_FILE_EXTENSION", default_value = DEFAULT_FILE_EXTENSION)]
    file_extension: String,

    /// Encoding of note files
    #[arg(long, env = "TAGGER_ENCODING", default_value = DEFAULT_ENCODING)]
    encoding: String,

    /// Link directory, relative to the notebook root
    #[arg(long, env = "TAGGER_REL_TAGS_DIR", default_value = DEFAULT_TAGS_DIR)]
    rel_tags_dir: PathBuf,

    /// Document path, relative to the notebook root
    #[arg(long, env = "TAGGER_REL_TAGS_FILE", default_value = DEFAULT_TAGS_FILE)]
    rel_tags_file: PathBuf,

    /// Document format: md, zim or json
    #[arg(long, env = "TAGGER_FORMAT", default_value_t = Format::Markdown)]
    format: Format,

    /// Keep notes without tags in tag documents
    #[arg(long, env = "TAGGER_INCLUDE_UNTAGGED")]
    include_untagged: bool,

    /// Do not tag notes without tags as _untagged
    #[arg(long, env = "TAGGER_NO_UNTAGGED_SENTINEL")]
    no_untagged_sentinel: bool,

    /// Warn about notes with more tags than this
    #[arg(long, env = "TAGGER_TAG_WARN_THRESHOLD", default_value_t = DEFAULT_TAG_WARN_THRESHOLD)]
    tag_warn_threshold: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = execute(&cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a configuration error (vs filesystem error).
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|e| e.downcast_ref::<TaggerError>())
        .any(TaggerError::is_config)
}

fn execute(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let outcome = tagger::run(&config).with_context(|| {
        format!(
            "Failed to run {} on {}",
            config.mode,
            config.notebook_path.display()
        )
    })?;
    print_outcome(&outcome);
    Ok(())
}

/// Turns command-line arguments into a validated config.
fn build_config(cli: &Cli) -> Result<Config> {
    let mut builder = ConfigBuilder::new(expand_home(&cli.notebook), cli.mode)
        .file_extension(&cli.file_extension)
        .encoding(&cli.encoding)
        .untagged_sentinel(!cli.no_untagged_sentinel)
        .format(cli.format)
        .include_untagged(cli.include_untagged)
        .rel_tags_dir(&cli.rel_tags_dir)
        .rel_tags_file(&cli.rel_tags_file)
        .tag_warn_threshold(cli.tag_warn_threshold);
    if let Some(pattern) = &cli.remove_tag_regex {
        builder = builder.remove_pattern(pattern);
    }
    builder.build().context("Invalid configuration")
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Document { path } => println!("Wrote {}", path.display()),
        Outcome::Links { dir, report } => println!(
            "Linked {} notes into {} ({} existing links skipped)",
            report.created,
            dir.display(),
            report.skipped
        ),
        Outcome::Removed(report) => {
            println!(
                "Removed tags from {} of {} matching notes",
                report.rewritten.len(),
                report.matched
            );
            for rel_path in &report.rewritten {
                println!("  {rel_path}");
            }
        }
    }
}
