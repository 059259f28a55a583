//! Text content of text-bearing nodes.

use crate::text::ansi::normalize_line_styles;
use crate::text::{apply_text_style, visible_width, wrap_text};

use super::node::{Node, NodeKind, NodeRegistry};

/// Concatenate the text under `node`.
///
/// Leaves contribute their raw string. Nested virtual-text runs are squashed
/// recursively, wrapped in their own text style, then passed through their
/// own transform. Hidden runs and non-text children contribute nothing.
pub fn squash_text_nodes(registry: &NodeRegistry, node: &Node) -> String {
    if node.kind == NodeKind::TextLeaf {
        return node.text.clone().unwrap_or_default();
    }

    let mut out = String::new();
    for (index, child) in registry.children_of(node.id).enumerate() {
        match child.kind {
            NodeKind::TextLeaf => out.push_str(child.text.as_deref().unwrap_or_default()),
            NodeKind::Text | NodeKind::VirtualText if !child.style.is_hidden() => {
                let mut nested = squash_text_nodes(registry, child);
                if nested.is_empty() {
                    continue;
                }
                nested = apply_text_style(&nested, &child.style.text);
                if let Some(transform) = &child.style.transform {
                    nested = transform.apply(&nested, index);
                }
                out.push_str(&nested);
            }
            _ => {}
        }
    }
    out
}

/// The text a node displays when given `width` columns.
///
/// Text wider than `width` is wrapped or truncated per the node's wrap
/// mode. Every resulting line is made self-contained with respect to SGR
/// state, so lines can be clipped and written independently.
pub fn text_content(registry: &NodeRegistry, node: &Node, width: Option<usize>) -> String {
    let text = squash_text_nodes(registry, node);
    let fitted = match width {
        Some(width) if text.split('\n').any(|line| visible_width(line) > width) => {
            wrap_text(&text, width, node.style.text_wrap)
        }
        _ => text,
    };
    normalize_line_styles(&fitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Style;
    use crate::text::{Modifiers, TextStyle, TextWrap};

    fn bold() -> Style {
        Style::default().text(TextStyle::default().with_modifiers(Modifiers::BOLD))
    }

    #[test]
    fn test_squash_nested_runs() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let text = registry.add_text(root, Style::default(), "a ");
        registry.add_virtual_text(text, bold(), "b");
        registry.add_leaf(text, " c");

        let node = registry.get(text).unwrap();
        assert_eq!(squash_text_nodes(&registry, node), "a \x1b[1mb\x1b[22m c");
    }

    #[test]
    fn test_squash_applies_run_transform() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let text = registry.add_text(root, Style::default(), "x");
        registry.add_virtual_text(
            text,
            Style::default().transform(|line, _| line.to_uppercase()),
            "yz",
        );
        let node = registry.get(text).unwrap();
        assert_eq!(squash_text_nodes(&registry, node), "xYZ");
    }

    #[test]
    fn test_hidden_run_is_skipped() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let text = registry.add_text(root, Style::default(), "shown");
        let mut hidden = Style::default();
        hidden.display = crate::render::Display::None;
        registry.add_virtual_text(text, hidden, "hidden");
        let node = registry.get(text).unwrap();
        assert_eq!(squash_text_nodes(&registry, node), "shown");
    }

    #[test]
    fn test_text_content_wraps_and_keeps_style_per_line() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let text = registry.add_text(root, Style::default(), "");
        registry.add_virtual_text(text, bold(), "aaa bbb");
        let node = registry.get(text).unwrap();

        let content = text_content(&registry, node, Some(3));
        let lines: Vec<&str> = content.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\x1b[1m"));
        assert!(lines[1].starts_with("\x1b[1m"));
        assert_eq!(visible_width(lines[1]), 3);
    }

    #[test]
    fn test_text_content_truncates() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let mut style = Style::default();
        style.text_wrap = TextWrap::TruncateEnd;
        let text = registry.add_text(root, style, "abcdef");
        let node = registry.get(text).unwrap();
        assert_eq!(text_content(&registry, node, Some(4)), "abc…");
        assert_eq!(text_content(&registry, node, None), "abcdef");
    }
}
