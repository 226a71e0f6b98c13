use super::Renderer;
use crate::error::Result;
use crate::flatten::FlatTagIndex;
use crate::tree::TagTree;

/// Pretty-printed JSON; entries are written as relative paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render_tree(&self, tree: &TagTree<'_>) -> Result<String> {
        let mut out = serde_json::to_string_pretty(tree)?;
        out.push('\n');
        Ok(out)
    }

    fn render_flat(&self, flat: &FlatTagIndex<'_>) -> Result<String> {
        let mut out = serde_json::to_string_pretty(flat)?;
        out.push('\n');
        Ok(out)
    }
}
