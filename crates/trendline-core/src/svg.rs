// File: crates/trendline-core/src/svg.rs
// Summary: Serialise a retained Document to SVG/HTML markup.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::scene::{Document, NodeId};

/// Tags written as `<tag/>` when they have no content.
const SELF_CLOSING: &[&str] = &["line", "rect", "path", "circle"];

fn escape(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.node(id) else { return };
    out.push('<');
    out.push_str(node.tag);
    for (k, v) in node.attrs() {
        let _ = write!(out, " {k}=\"");
        escape(v, out);
        out.push('"');
    }
    let empty = node.text().is_none() && node.children().is_empty();
    if empty && SELF_CLOSING.contains(&node.tag) {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(t) = node.text() {
        escape(t, out);
    }
    for &c in node.children() {
        write_node(doc, c, out);
    }
    let _ = write!(out, "</{}>", node.tag);
}

impl Document {
    /// Markup for the subtree rooted at `id` (the node itself included).
    pub fn markup_of(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_node(self, id, &mut out);
        out
    }

    /// Markup of the container content (all children of the root).
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for &c in self.children(self.root()) {
            write_node(self, c, &mut out);
        }
        out
    }

    /// Write the first `<svg>` element found under the root to `path`.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        let svg = self
            .select_tag(self.root(), "svg")
            .first()
            .map(|&id| self.markup_of(id))
            .unwrap_or_default();
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, svg)?;
        Ok(())
    }
}
