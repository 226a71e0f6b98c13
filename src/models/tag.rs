use std::fmt;

/// Label given to notes with no explicit or status tags.
pub const UNTAGGED: &str = "_untagged";

/// Task status derived from a single-character `[?]` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Open,
    Done,
    WontDo,
    Waiting,
}

impl Status {
    /// Maps the character between the brackets to a status.
    ///
    /// Any character other than `*`, `x` or `>` means the task is open.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagger::Status;
    ///
    /// assert_eq!(Status::from_marker('*'), Status::Done);
    /// assert_eq!(Status::from_marker(' '), Status::Open);
    /// ```
    pub fn from_marker(marker: char) -> Self {
        match marker {
            '*' => Self::Done,
            'x' => Self::WontDo,
            '>' => Self::Waiting,
            _ => Self::Open,
        }
    }

    /// Returns the pseudo-tag label for this status.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "todo_open",
            Self::Done => "todo_done",
            Self::WontDo => "todo_wontdo",
            Self::Waiting => "todo_waiting",
        }
    }
}

/// A single tag attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// An `@word` token from the note body, without the `@`.
    Explicit(String),
    /// A task status marker.
    Status(Status),
    /// The sentinel for notes carrying no other tag.
    Untagged,
}

impl Tag {
    /// Returns the label used to key this tag in indexes.
    pub fn label(&self) -> &str {
        match self {
            Self::Explicit(name) => name,
            Self::Status(status) => status.label(),
            Self::Untagged => UNTAGGED,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distinct tags of one entry, in first-seen order.
///
/// Tags are compared by label, so an explicit `@todo_open` and an open
/// status marker collapse into one tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag unless one with the same label is present.
    ///
    /// Returns `true` if the tag was added.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.contains(tag.label()) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.tags.iter().any(|t| t.label() == label)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Returns the labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(Tag::label)
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}
