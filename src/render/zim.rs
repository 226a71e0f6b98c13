use time::OffsetDateTime;
use time::macros::format_description;

use super::{DOCUMENT_TITLE, Renderer, sorted};
use crate::error::Result;
use crate::flatten::FlatTagIndex;
use crate::tree::TagTree;

/// Zim wiki pages linking notes by namespace.
#[derive(Debug, Clone, Copy)]
pub struct ZimRenderer {
    created: OffsetDateTime,
}

impl ZimRenderer {
    /// Creates a renderer stamping pages with `created`.
    pub fn new(created: OffsetDateTime) -> Self {
        Self { created }
    }

    /// Creates a renderer stamping pages with the current UTC time.
    pub fn now() -> Self {
        Self::new(OffsetDateTime::now_utc())
    }

    fn header(&self) -> Result<String> {
        let creation_date = self.created.format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ))?;
        let stamp = self
            .created
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))?;

        Ok(format!(
            "Content-Type: text/x-zim-wiki\n\
             Wiki-Format: zim 0.6\n\
             Creation-Date: {creation_date}\n\
             \n\
             ====== {DOCUMENT_TITLE} ======\n\
             **{stamp}**\n\n"
        ))
    }

    fn write_tree(out: &mut String, tree: &TagTree<'_>, depth: usize) {
        let indent = "\t".repeat(depth);
        for entry in sorted(tree.entries()) {
            out.push_str(&format!("{indent}* [[:{}]]\n", entry.namespace()));
        }
        for (label, child) in tree.tags() {
            out.push_str(&format!("\n{indent}* **{label}**\n"));
            Self::write_tree(out, child, depth + 1);
        }
    }
}

impl Renderer for ZimRenderer {
    fn render_tree(&self, tree: &TagTree<'_>) -> Result<String> {
        let mut out = self.header()?;
        Self::write_tree(&mut out, tree, 0);
        Ok(out)
    }

    fn render_flat(&self, flat: &FlatTagIndex<'_>) -> Result<String> {
        let mut out = self.header()?;
        for (label, entries) in flat.iter() {
            out.push_str(&format!("\n===== {label} =====\n"));
            for entry in sorted(entries) {
                out.push_str(&format!("* [[:{}]]\n", entry.namespace()));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Notebook, Tag, TagSet};
    use crate::walker::TagIndex;
    use tempfile::tempdir;
    use time::macros::datetime;

    const HEADER: &str = "Content-Type: text/x-zim-wiki\n\
                          Wiki-Format: zim 0.6\n\
                          Creation-Date: 2024-03-05T14:07:09+02:00\n\
                          \n\
                          ====== Tags ======\n\
                          **2024-03-05 14:07:09**\n\n";

    fn renderer() -> ZimRenderer {
        ZimRenderer::new(datetime!(2024-03-05 14:07:09 +2))
    }

    fn tags(labels: &[&str]) -> TagSet {
        labels
            .iter()
            .map(|l| Tag::Explicit((*l).to_string()))
            .collect()
    }

    #[test]
    fn header_carries_timestamps() {
        assert_eq!(renderer().header().unwrap(), HEADER);
    }

    #[test]
    fn tree_uses_tabs_and_namespaces() {
        let dir = tempdir().unwrap();
        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();
        let mut index = TagIndex::new();
        index.insert(notebook.root().child("Home_Stuff").child("list"), tags(&["x"]));

        let doc = renderer().render_tree(&TagTree::build(&index)).unwrap();

        assert_eq!(doc, format!("{HEADER}\n* **x**\n\t* [[:Home Stuff:list]]\n"));
    }

    #[test]
    fn flat_uses_section_headings() {
        let dir = tempdir().unwrap();
        let notebook = Notebook::open(dir.path(), ".txt", "utf-8").unwrap();
        let mut index = TagIndex::new();
        index.insert(notebook.root().child("b"), tags(&["x"]));
        index.insert(notebook.root().child("a"), tags(&["x"]));

        let doc = renderer().render_flat(&FlatTagIndex::build(&index)).unwrap();

        assert_eq!(doc, format!("{HEADER}\n===== x =====\n* [[:a]]\n* [[:b]]\n"));
    }
}
