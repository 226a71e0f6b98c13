mod entry;
mod notebook;
mod tag;

pub use entry::Entry;
pub use notebook::{DEFAULT_ENCODING, DEFAULT_FILE_EXTENSION, Notebook, lookup_encoding};
pub use tag::{Status, Tag, TagSet, UNTAGGED};
