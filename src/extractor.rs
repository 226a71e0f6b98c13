//! Tag and task-status extraction from note content.
//!
//! A note's tags are the `@word` tokens that start at a word boundary plus a
//! status pseudo-tag for every single-character `[?]` marker. Notes without
//! either get the `_untagged` sentinel when the notebook enables it.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::models::{Entry, Status, Tag, TagSet};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("valid tag regex"));
static STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.)\]").expect("valid status regex"));

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns true if the character right before byte offset `at` is a word character.
pub(crate) fn preceded_by_word_char(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().is_some_and(is_word_char)
}

/// Returns the explicit tag names on one line, in order of appearance.
///
/// `foo@bar` is an address, not a tag, so matches preceded by a word
/// character are ignored.
///
/// # Examples
///
/// ```
/// use tagger::extractor::explicit_tags;
///
/// let tags: Vec<_> = explicit_tags("mail me@home about @garden").collect();
/// assert_eq!(tags, vec!["garden"]);
/// ```
pub fn explicit_tags(line: &str) -> impl Iterator<Item = &str> {
    TAG_RE.captures_iter(line).filter_map(move |caps| {
        let token = caps.get(0)?;
        if preceded_by_word_char(line, token.start()) {
            return None;
        }
        caps.get(1).map(|m| m.as_str())
    })
}

/// Returns the status of every single-character bracket marker on one line.
pub fn status_markers(line: &str) -> impl Iterator<Item = Status> + '_ {
    STATUS_RE.captures_iter(line).filter_map(|caps| {
        caps.get(1)
            .and_then(|m| m.as_str().chars().next())
            .map(Status::from_marker)
    })
}

/// Extracts the tag set of a note's text.
pub fn extract_from_text(text: &str, untagged_sentinel: bool) -> TagSet {
    let mut tags = TagSet::new();
    for line in text.lines() {
        for name in explicit_tags(line) {
            tags.insert(Tag::Explicit(name.to_string()));
        }
        for status in status_markers(line) {
            tags.insert(Tag::Status(status));
        }
    }

    if tags.is_empty() && untagged_sentinel {
        tags.insert(Tag::Untagged);
    }
    tags
}

/// Extracts the tag set of an entry.
///
/// Entries without a note file (grouping directories, the root) have no
/// content and get the sentinel, or nothing when it is disabled.
///
/// # Errors
///
/// Returns an error if the note exists but cannot be read or decoded.
pub fn extract_tags(entry: &Entry<'_>) -> Result<TagSet> {
    let notebook = entry.notebook();
    let text = match entry.content_path() {
        Some(path) if path.is_file() => notebook.read_text(&path)?,
        _ => String::new(),
    };
    Ok(extract_from_text(&text, notebook.untagged_sentinel()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notebook;
    use tempfile::tempdir;

    fn labels(tags: &TagSet) -> Vec<&str> {
        tags.labels().collect()
    }

    #[test]
    fn finds_tags_and_status_on_same_line() {
        let tags = extract_from_text("Hello @work [ ] do thing\n", true);
        assert_eq!(labels(&tags), vec!["work", "todo_open"]);
    }

    #[test]
    fn ignores_tags_preceded_by_word_character() {
        let tags = extract_from_text("write to foo@bar.com\n", false);
        assert!(tags.is_empty());
    }

    #[test]
    fn tag_after_punctuation_counts() {
        let tags = extract_from_text("(@home) @@double", false);
        assert_eq!(labels(&tags), vec!["home", "double"]);
    }

    #[test]
    fn adjacent_tags_only_first_counts() {
        let tags = extract_from_text("@a@b", false);
        assert_eq!(labels(&tags), vec!["a"]);
    }

    #[test]
    fn maps_every_status_marker() {
        let tags = extract_from_text("[*] one\n[x] two\n[>] three\n[?] four\n", false);
        assert_eq!(
            labels(&tags),
            vec!["todo_done", "todo_wontdo", "todo_waiting", "todo_open"]
        );
    }

    #[test]
    fn multi_character_brackets_are_not_status() {
        let tags = extract_from_text("see [ab] and [] here", false);
        assert!(tags.is_empty());
    }

    #[test]
    fn nested_brackets_yield_inner_marker() {
        let tags = extract_from_text("[[x]]", false);
        assert_eq!(labels(&tags), vec!["todo_wontdo"]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let tags = extract_from_text("@a @b\n@a [ ] [ ]\n", false);
        assert_eq!(labels(&tags), vec!["a", "b", "todo_open"]);
    }

    #[test]
    fn untagged_text_gets_sentinel_only_when_enabled() {
        let text = "just some words\n";
        assert_eq!(labels(&extract_from_text(text, true)), vec!["_untagged"]);
        assert!(extract_from_text(text, false).is_empty());
        assert_eq!(labels(&extract_from_text("", true)), vec!["_untagged"]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "@z [>] @y\n@x\n";
        assert_eq!(extract_from_text(text, true), extract_from_text(text, true));
    }

    #[test]
    fn unicode_word_characters_form_tags() {
        let tags = extract_from_text("@café ☕", false);
        assert_eq!(labels(&tags), vec!["café"]);
    }

    #[test]
    fn extract_tags_reads_note_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("foo.txt"), "@one\n[*] @two\n").unwrap();
        std::fs::create_dir(dir.path().join("group")).unwrap();

        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();
        let root = notebook.root();

        let tags = extract_tags(&root.child("foo")).unwrap();
        assert_eq!(labels(&tags), vec!["one", "todo_done", "two"]);

        let group = extract_tags(&root.child("group")).unwrap();
        assert_eq!(labels(&group), vec!["_untagged"]);
    }
}
