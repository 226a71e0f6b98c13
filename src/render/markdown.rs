use super::{DOCUMENT_TITLE, Renderer, sorted};
use crate::error::Result;
use crate::flatten::FlatTagIndex;
use crate::tree::TagTree;

const INDENT: &str = "    ";

/// Markdown bullet lists with bold tag headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    fn write_tree(out: &mut String, tree: &TagTree<'_>, depth: usize) {
        let indent = INDENT.repeat(depth);
        for entry in sorted(tree.entries()) {
            out.push_str(&format!("{indent}- [](./{})\n", entry.rel_path()));
        }
        for (label, child) in tree.tags() {
            out.push_str(&format!("\n{indent}- **{label}**\n"));
            Self::write_tree(out, child, depth + 1);
        }
    }
}

impl Renderer for MarkdownRenderer {
    fn render_tree(&self, tree: &TagTree<'_>) -> Result<String> {
        let mut out = format!("# {DOCUMENT_TITLE}\n\n");
        Self::write_tree(&mut out, tree, 0);
        Ok(out)
    }

    fn render_flat(&self, flat: &FlatTagIndex<'_>) -> Result<String> {
        let mut out = format!("# {DOCUMENT_TITLE}\n");
        for (label, entries) in flat.iter() {
            out.push_str(&format!("\n## {label}\n"));
            for entry in sorted(entries) {
                out.push_str(&format!("- []({})\n", entry.rel_path()));
            }
        }
        Ok(out)
    }
}
