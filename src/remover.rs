//! Bulk removal of `@tag` tokens from notes.
//!
//! A [`RemovalPattern`] does two checks with the same regex fragment: whether a
//! tag label matches (anchored at the start, ending on a word boundary), and
//! which `@`-tokens to delete from a line. Both use the word-boundary rule of
//! tag extraction, so a note is rewritten exactly when one of its explicit
//! tags would be removed.

use std::borrow::Cow;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{Result, TaggerError};
use crate::extractor::preceded_by_word_char;
use crate::models::Entry;
use crate::walker::TagIndex;

/// A compiled tag-name pattern for removal.
#[derive(Debug, Clone)]
pub struct RemovalPattern {
    source: String,
    matcher: Regex,
    remover: Regex,
}

impl RemovalPattern {
    /// Compiles a tag-name pattern, e.g. `proj\d+`.
    ///
    /// # Errors
    ///
    /// Returns `MissingPattern` for an empty pattern and `InvalidPattern` if
    /// it does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(TaggerError::MissingPattern);
        }
        let compile = |regex: String| {
            Regex::new(&regex).map_err(|source| TaggerError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        };

        Ok(Self {
            source: pattern.to_string(),
            matcher: compile(format!(r"^(?:{pattern})\b"))?,
            remover: compile(format!(r"@(?:{pattern})\b"))?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if a tag label matches the pattern.
    pub fn matches_tag(&self, label: &str) -> bool {
        self.matcher.is_match(label)
    }

    /// Deletes every matching `@`-token from one line.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagger::RemovalPattern;
    ///
    /// let pattern = RemovalPattern::new("proj1").unwrap();
    /// assert_eq!(pattern.strip_line("@proj1 text @proj2\n"), " text @proj2\n");
    /// assert_eq!(pattern.strip_line("me@proj1 stays"), "me@proj1 stays");
    /// ```
    pub fn strip_line<'t>(&self, line: &'t str) -> Cow<'t, str> {
        let mut out = String::new();
        let mut copied_to = 0;
        let mut search_from = 0;
        let mut changed = false;
        while let Some(token) = self.remover.find_at(line, search_from) {
            if preceded_by_word_char(line, token.start()) {
                // Only this start position is rejected; a later `@` inside
                // the match may still begin a removable token.
                search_from = token.start() + '@'.len_utf8();
                continue;
            }
            out.push_str(&line[copied_to..token.start()]);
            copied_to = token.end();
            search_from = token.end();
            changed = true;
        }

        if !changed {
            return Cow::Borrowed(line);
        }
        out.push_str(&line[copied_to..]);
        Cow::Owned(out)
    }
}

/// Lines after tag removal, and whether any line changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub lines: Vec<String>,
    pub changed: bool,
}

/// Applies the pattern to every line; lines keep their terminators.
pub fn strip_lines<'t>(
    lines: impl IntoIterator<Item = &'t str>,
    pattern: &RemovalPattern,
) -> Rewrite {
    let mut changed = false;
    let lines = lines
        .into_iter()
        .map(|line| {
            let stripped = pattern.strip_line(line);
            changed |= matches!(stripped, Cow::Owned(_));
            stripped.into_owned()
        })
        .collect();
    Rewrite { lines, changed }
}

/// Outcome of a removal run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    /// Entries with at least one matching tag.
    pub matched: usize,
    /// Relative paths of the notes that were rewritten.
    pub rewritten: Vec<String>,
}

/// Removes matching tags from every note whose tag set contains one.
///
/// Files are only written when a line actually changed. Rewrites are not
/// transactional: on error, notes handled earlier stay rewritten.
///
/// # Errors
///
/// Returns the first read, decode or write error.
pub fn remove_tags(index: &TagIndex<'_>, pattern: &RemovalPattern) -> Result<RemovalReport> {
    let mut report = RemovalReport::default();
    for (entry, tags) in index {
        if !tags.labels().any(|label| pattern.matches_tag(label)) {
            continue;
        }
        report.matched += 1;
        if rewrite_entry(entry, pattern)? {
            report.rewritten.push(entry.rel_path().to_string());
        }
    }
    info!(
        pattern = pattern.as_str(),
        matched = report.matched,
        rewritten = report.rewritten.len(),
        "Tag removal finished"
    );
    Ok(report)
}

fn rewrite_entry(entry: &Entry<'_>, pattern: &RemovalPattern) -> Result<bool> {
    let Some(path) = entry.content_path().filter(|p| p.is_file()) else {
        return Ok(false);
    };
    let notebook = entry.notebook();
    let text = notebook.read_text(&path)?;

    let rewrite = strip_lines(text.split_inclusive('\n'), pattern);
    if !rewrite.changed {
        debug!(entry = entry.rel_path(), "No matching tokens, leaving file untouched");
        return Ok(false);
    }

    notebook.write_text(&path, &rewrite.lines.concat())?;
    info!(entry = entry.rel_path(), path = %path.display(), "Rewrote note");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notebook;
    use crate::walker::build_tag_index;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_pattern_is_missing() {
        assert!(matches!(
            RemovalPattern::new(""),
            Err(TaggerError::MissingPattern)
        ));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = RemovalPattern::new("proj(").unwrap_err();
        assert!(matches!(err, TaggerError::InvalidPattern { ref pattern, .. } if pattern == "proj("));
    }

    #[test]
    fn matcher_and_remover_agree_on_word_boundary() {
        let pattern = RemovalPattern::new("proj").unwrap();

        assert!(pattern.matches_tag("proj"));
        assert!(!pattern.matches_tag("proj1"));
        assert!(!pattern.matches_tag("myproj"));
        assert_eq!(pattern.strip_line("@proj1 @proj"), "@proj1 ");
    }

    #[test]
    fn alternation_is_grouped() {
        let pattern = RemovalPattern::new("a|b").unwrap();

        assert!(pattern.matches_tag("b"));
        assert_eq!(pattern.strip_line("x @a y @b z bb"), "x  y  z bb");
    }

    #[test]
    fn removes_every_occurrence_on_every_line() {
        let pattern = RemovalPattern::new(r"proj\d").unwrap();
        let rewrite = strip_lines(["@proj1 a @proj2\n", "b @proj3\n", "c\n"], &pattern);

        assert!(rewrite.changed);
        assert_eq!(rewrite.lines, vec![" a \n", "b \n", "c\n"]);
    }

    #[test]
    fn rejected_match_does_not_hide_later_tokens() {
        let pattern = RemovalPattern::new("proj.*").unwrap();

        assert_eq!(
            pattern.strip_line("mail bob@proj1.org about @proj2\n"),
            "mail bob@proj1.org about \n"
        );
    }

    #[test]
    fn remove_tags_rewrites_note_with_address_before_tag() {
        let dir = tempdir().unwrap();
        let note = dir.path().join("a.txt");
        fs::write(&note, "mail bob@proj1.org about @proj2\n").unwrap();
        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();

        let index = build_tag_index(&notebook).unwrap();
        let report = remove_tags(&index, &RemovalPattern::new("proj.*").unwrap()).unwrap();

        assert_eq!(report.rewritten, vec!["a"]);
        assert_eq!(
            fs::read_to_string(&note).unwrap(),
            "mail bob@proj1.org about \n"
        );
    }

    #[test]
    fn unchanged_lines_report_no_change() {
        let pattern = RemovalPattern::new("gone").unwrap();
        let rewrite = strip_lines(["keep @this\n", "mail@gone.org\n"], &pattern);

        assert!(!rewrite.changed);
        assert_eq!(rewrite.lines, vec!["keep @this\n", "mail@gone.org\n"]);
    }

    #[test]
    fn remove_tags_rewrites_only_matching_notes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "@proj1 some text @proj2\n").unwrap();
        fs::write(dir.path().join("b.txt"), "@other\n").unwrap();
        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();

        let index = build_tag_index(&notebook).unwrap();
        let pattern = RemovalPattern::new("proj1").unwrap();
        let report = remove_tags(&index, &pattern).unwrap();

        assert_eq!(report.rewritten, vec!["a"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            " some text @proj2\n"
        );
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "@other\n");
    }

    #[test]
    fn status_tag_match_without_token_leaves_file_alone() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "[ ] task\n").unwrap();
        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();

        let index = build_tag_index(&notebook).unwrap();
        let report = remove_tags(&index, &RemovalPattern::new("todo_open").unwrap()).unwrap();

        assert_eq!(report.matched, 1);
        assert!(report.rewritten.is_empty());
    }
}
