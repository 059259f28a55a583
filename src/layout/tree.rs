//! Tree layout pass: styles in, one [`Rect`] per visible node out.
//!
//! Two passes over the registry:
//! - **measure** (bottom-up): intrinsic border-box size of a node at an
//!   available width. Text measures its fitted content; boxes sum children
//!   along the main axis and take the maximum across it, plus padding and
//!   border. Explicit dimensions win.
//! - **place** (top-down): each box turns its children into flex items and
//!   hands them to [`compute_flex_layout`]. Rects are stored relative to the
//!   parent's border box.
//!
//! On a single line, children that stretch take the container's full cross
//! size as their base cross size, so a column child spans the whole width.
//!
//! Text items the flex engine shrinks below their intrinsic width are
//! re-measured at the width they got and the line is laid out once more, so
//! wrapped text gets the height it needs.

use crate::error::{Error, Result};
use crate::render::{text_content, Node, NodeId, NodeRegistry, Position};
use crate::text::{TextSize, WidthCache};

use super::flex::{
    compute_flex_layout, to_cells, AlignItems, AlignSelf, FlexContainer, FlexItem, FlexWrap, LayoutMap,
};
use super::rect::{Edges, Rect};

/// Lay out the tree under `root` for a terminal `width` columns wide.
///
/// The root is placed at the origin. Nodes with `display: none`, their
/// descendants, and children of text nodes get no entry.
///
/// # Errors
/// [`Error::MissingRoot`] if `root` is not registered, and any invalid
/// size or flex weight found in a style.
pub fn compute_tree_layout(
    registry: &NodeRegistry,
    root: NodeId,
    width: u16,
    cache: &mut WidthCache,
) -> Result<LayoutMap> {
    let node = registry.get(root).ok_or(Error::MissingRoot(root))?;
    let mut pass = TreeLayout {
        registry,
        cache,
        layout: LayoutMap::new(),
    };
    if node.style.is_hidden() {
        return Ok(pass.layout);
    }

    let available = f32::from(width);
    let root_width = node.style.width.resolve(Some(available))?.unwrap_or(available);
    let explicit_height = node.style.height.resolve(None)?;
    let height = match explicit_height {
        Some(height) => height,
        None => pass.measure(node, Some(root_width))?.1,
    };

    let mut rect = Rect::new(0, 0, to_cells(root_width), to_cells(height));
    if node.kind.is_container() {
        let used = pass.place_children(node, rect.width, rect.height)?;
        if explicit_height.is_none() {
            rect.height = rect.height.max(used);
        }
    }
    pass.layout.insert(root, rect);

    tracing::trace!(root = %root, nodes = pass.layout.len(), "tree layout computed");
    Ok(pass.layout)
}

struct TreeLayout<'a> {
    registry: &'a NodeRegistry,
    cache: &'a mut WidthCache,
    layout: LayoutMap,
}

impl TreeLayout<'_> {
    /// Padding plus border.
    fn frame(node: &Node) -> Edges {
        node.style.padding + node.style.border.edges()
    }

    /// Size of a text-bearing node's content at an available width.
    fn measure_text(&mut self, node: &Node, available: Option<f32>) -> TextSize {
        let text = text_content(self.registry, node, None);
        let size = self.cache.measure(&text);
        match available {
            Some(width) if size.width as f32 > width => {
                let fitted = text_content(self.registry, node, Some(width.max(0.0).floor() as usize));
                self.cache.measure(&fitted)
            }
            _ => size,
        }
    }

    /// Intrinsic border-box size as `(width, height)`.
    fn measure(&mut self, node: &Node, available: Option<f32>) -> Result<(f32, f32)> {
        if node.style.is_hidden() {
            return Ok((0.0, 0.0));
        }
        let explicit_width = node.style.width.resolve(available)?;
        let explicit_height = node.style.height.resolve(None)?;

        if !node.kind.is_container() {
            let size = self.measure_text(node, explicit_width.or(available));
            return Ok((
                explicit_width.unwrap_or(size.width as f32),
                explicit_height.unwrap_or(size.height as f32),
            ));
        }

        let style = &node.style;
        let frame = Self::frame(node);
        let inner_available =
            explicit_width.or(available).map(|width| (width - f32::from(frame.horizontal())).max(0.0));
        let row = style.flex_direction.is_row();
        let gap = f32::from(if row { style.column_gap } else { style.row_gap });

        let mut main = 0.0_f32;
        let mut cross = 0.0_f32;
        let mut count = 0_usize;
        let registry = self.registry;
        for child in registry.children_of(node.id) {
            if child.style.is_hidden() || child.style.position == Position::Absolute {
                continue;
            }
            let (width, height) = self.measure(child, inner_available)?;
            let (child_main, child_cross) = if row { (width, height) } else { (height, width) };
            main += child_main;
            cross = cross.max(child_cross);
            count += 1;
        }
        main += gap * count.saturating_sub(1) as f32;

        let (width, height) = if row { (main, cross) } else { (cross, main) };
        Ok((
            explicit_width.unwrap_or(width + f32::from(frame.horizontal())),
            explicit_height.unwrap_or(height + f32::from(frame.vertical())),
        ))
    }

    /// Place the children of a container whose border box is
    /// `width`×`height`. Returns the height its in-flow content needs.
    fn place_children(&mut self, node: &Node, width: u16, height: u16) -> Result<u16> {
        let style = &node.style;
        let frame = Self::frame(node);
        let content_width = f32::from(width.saturating_sub(frame.horizontal()));
        let content_height = f32::from(height.saturating_sub(frame.vertical()));
        let row = style.flex_direction.is_row();

        let (main_size, cross_size, main_gap, cross_gap) = if row {
            (content_width, content_height, style.column_gap, style.row_gap)
        } else {
            (content_height, content_width, style.row_gap, style.column_gap)
        };
        let container = FlexContainer {
            main_size,
            cross_size,
            direction: style.flex_direction,
            wrap: style.flex_wrap,
            justify_content: style.justify_content,
            align_items: style.align_items,
            main_gap: f32::from(main_gap),
            cross_gap: f32::from(cross_gap),
        };

        let registry = self.registry;
        let children: Vec<&Node> = registry.children_of(node.id).collect();
        let mut items = Vec::with_capacity(children.len());
        let mut stretched = Vec::with_capacity(children.len());
        for child in &children {
            let child_style = &child.style;
            let hidden = child_style.is_hidden();
            let (mut child_width, mut child_height) = if hidden {
                (0.0, 0.0)
            } else {
                self.measure(child, Some(content_width))?
            };
            if let Some(height) = child_style.height.resolve(Some(content_height))? {
                child_height = height;
            }
            if let Some(width) = child_style.width.resolve(Some(content_width))? {
                child_width = width;
            }

            let (base_main_size, mut base_cross_size) =
                if row { (child_width, child_height) } else { (child_height, child_width) };
            let explicit_cross =
                if row { child_style.height.is_definite() } else { child_style.width.is_definite() };
            let mut align_self = child_style.align_self;
            let stretches = align_self.resolve(style.align_items) == AlignItems::Stretch;
            if explicit_cross && stretches {
                align_self = AlignSelf::FlexStart;
            }
            let absolute = child_style.position == Position::Absolute;
            let fills_line = stretches
                && !explicit_cross
                && !hidden
                && !absolute
                && style.flex_wrap == FlexWrap::NoWrap;
            if fills_line {
                base_cross_size = base_cross_size.max(cross_size);
            }
            stretched.push(fills_line);

            items.push(FlexItem {
                id: child.id,
                base_main_size,
                base_cross_size,
                flex_grow: child_style.flex_grow,
                flex_shrink: child_style.flex_shrink,
                hidden,
                absolute,
                align_self,
            });
        }

        let mut placed = compute_flex_layout(&container, &items)?;

        if row {
            let mut remeasured = false;
            for ((child, item), &fills_line) in children.iter().zip(items.iter_mut()).zip(&stretched) {
                if child.kind.is_container() || child.style.height.is_definite() {
                    continue;
                }
                let Some(rect) = placed.get(&item.id) else {
                    continue;
                };
                let given = f32::from(rect.width);
                if given < item.base_main_size {
                    let mut height = self.measure_text(child, Some(given)).height as f32;
                    if fills_line {
                        height = height.max(cross_size);
                    }
                    if height != item.base_cross_size {
                        item.base_cross_size = height;
                        remeasured = true;
                    }
                }
            }
            if remeasured {
                placed = compute_flex_layout(&container, &items)?;
            }
        }

        let mut used = 0_u16;
        for (child, item) in children.iter().zip(&items) {
            let Some(rect) = placed.get(&child.id).copied() else {
                continue;
            };
            let rect = Rect::new(
                rect.x.saturating_add(frame.left),
                rect.y.saturating_add(frame.top),
                rect.width,
                rect.height,
            );
            if !item.absolute {
                used = used.max(rect.bottom());
            }
            self.layout.insert(child.id, rect);
            if child.kind.is_container() {
                self.place_children(child, rect.width, rect.height)?;
            }
        }

        Ok(used.saturating_add(frame.bottom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::JustifyContent;
    use crate::render::{Border, BorderStyle, Dimension, Display, Style};

    fn layout(registry: &NodeRegistry, root: NodeId, width: u16) -> LayoutMap {
        compute_tree_layout(registry, root, width, &mut WidthCache::default()).unwrap()
    }

    #[test]
    fn test_root_takes_terminal_width_and_content_height() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default().column());
        let a = registry.add_text(root, Style::default(), "one");
        let b = registry.add_text(root, Style::default(), "two\nlines");

        let map = layout(&registry, root, 20);
        assert_eq!(map[&root], Rect::new(0, 0, 20, 3));
        assert_eq!(map[&a], Rect::new(0, 0, 20, 1));
        assert_eq!(map[&b], Rect::new(0, 1, 20, 2));
    }

    #[test]
    fn test_column_children_fill_width_unless_aligned() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default().column());
        let full = registry.add_text(root, Style::default(), "wide");
        let mut centered = Style::default();
        centered.align_self = AlignSelf::Center;
        let narrow = registry.add_text(root, centered, "mid");

        let map = layout(&registry, root, 12);
        assert_eq!(map[&full], Rect::new(0, 0, 12, 1));
        assert_eq!(map[&narrow], Rect::new(4, 1, 3, 1));
    }

    #[test]
    fn test_row_children_side_by_side() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let a = registry.add_text(root, Style::default(), "abc");
        let b = registry.add_text(root, Style::default(), "de");

        let map = layout(&registry, root, 10);
        assert_eq!(map[&a], Rect::new(0, 0, 3, 1));
        assert_eq!(map[&b], Rect::new(3, 0, 2, 1));
    }

    #[test]
    fn test_padding_and_border_offset_children() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let boxed = registry.add_box(
            root,
            Style::default()
                .border(Border::new(BorderStyle::Single))
                .padding(Edges::new(0, 1, 0, 1)),
        );
        let text = registry.add_text(boxed, Style::default(), "hi");

        let map = layout(&registry, root, 20);
        assert_eq!(map[&boxed], Rect::new(0, 0, 6, 3));
        assert_eq!(map[&text], Rect::new(2, 1, 2, 1));
        assert_eq!(map[&root].height, 3);
    }

    #[test]
    fn test_grow_fills_row() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let a = registry.add_box(root, Style::default().grow(1.0));
        let b = registry.add_box(root, Style::default().grow(1.0));

        let map = layout(&registry, root, 30);
        assert_eq!(map[&a].width, 15);
        assert_eq!(map[&b].x, 15);
    }

    #[test]
    fn test_explicit_size_and_percent() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default().column());
        let fixed = registry.add_box(root, Style::default().size(8, 2));
        let mut half = Style::default();
        half.width = Dimension::Percent(50.0);
        half.height = Dimension::Cells(1);
        let half = registry.add_box(root, half);

        let map = layout(&registry, root, 40);
        // Explicit cross size is not stretched.
        assert_eq!(map[&fixed], Rect::new(0, 0, 8, 2));
        assert_eq!(map[&half], Rect::new(0, 2, 20, 1));
    }

    #[test]
    fn test_shrunk_text_wraps_and_grows_line() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let mut rigid = Style::default().size(6, 1);
        rigid.flex_shrink = 0.0;
        registry.add_box(root, rigid);
        let text = registry.add_text(root, Style::default(), "aaaa bbbb");

        let map = layout(&registry, root, 10);
        assert_eq!(map[&text].x, 6);
        assert_eq!(map[&text].width, 4);
        assert_eq!(map[&text].height, 2);
        assert_eq!(map[&root].height, 2);
    }

    #[test]
    fn test_hidden_nodes_have_no_layout() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        let mut style = Style::default();
        style.display = Display::None;
        let hidden = registry.add_box(root, style);
        let inner = registry.add_text(hidden, Style::default(), "x");
        let shown = registry.add_text(root, Style::default(), "y");

        let map = layout(&registry, root, 10);
        assert!(!map.contains_key(&hidden));
        assert!(!map.contains_key(&inner));
        assert_eq!(map[&shown].x, 0);
    }

    #[test]
    fn test_justify_from_style() {
        let mut registry = NodeRegistry::new();
        let mut style = Style::default();
        style.justify_content = JustifyContent::FlexEnd;
        let root = registry.add_root(style);
        let text = registry.add_text(root, Style::default(), "end");

        let map = layout(&registry, root, 10);
        assert_eq!(map[&text].x, 7);
    }

    #[test]
    fn test_missing_root_and_invalid_style() {
        let registry = NodeRegistry::new();
        assert!(matches!(
            compute_tree_layout(&registry, NodeId(3), 10, &mut WidthCache::default()),
            Err(Error::MissingRoot(NodeId(3)))
        ));

        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        registry.add_box(root, Style::default().grow(-1.0));
        assert!(matches!(
            compute_tree_layout(&registry, root, 10, &mut WidthCache::default()),
            Err(Error::InvalidSize { what: "flex grow", .. })
        ));
    }

    #[test]
    fn test_missing_child_is_skipped() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        registry.append_child(root, NodeId(42));
        let text = registry.add_text(root, Style::default(), "ok");
        let map = layout(&registry, root, 10);
        assert_eq!(map[&text].x, 0);
    }
}
