//! Depth-first paint pass over a laid-out tree.
//!
//! Per node: skip if hidden or not laid out; boxes paint background then
//! border, then recurse into children in document order (later siblings
//! paint over earlier ones); text-bearing nodes write their styled content.
//! A box that hides overflow pushes its clip region, intersected with every
//! clipping ancestor's, for the duration of its subtree.

use crate::buffer::{Clip, OutputBuffer, WriteOptions};
use crate::layout::{compute_clip_region, resolve_overflow, ClipRegion, LayoutMap, Rect};
use crate::text::apply_text_style_with_reset;

use super::background::render_background;
use super::border::render_border;
use super::node::{Node, NodeId, NodeRegistry};
use super::style::OutputTransform;
use super::text::text_content;

/// Paint the subtree under `root` into `buffer`.
///
/// Child ids missing from the registry and nodes without a layout are
/// skipped. The buffer's clip stack is left as it was found.
pub fn render_tree(registry: &NodeRegistry, layout: &LayoutMap, root: NodeId, buffer: &mut OutputBuffer) {
    let walker = Walker { registry, layout };
    walker.render_node(buffer, root, (0, 0), ClipRegion::UNCONSTRAINED, &[]);
}

struct Walker<'a> {
    registry: &'a NodeRegistry,
    layout: &'a LayoutMap,
}

impl<'a> Walker<'a> {
    fn render_node(
        &self,
        buffer: &mut OutputBuffer,
        id: NodeId,
        offset: (i32, i32),
        region: ClipRegion,
        transforms: &[&'a OutputTransform],
    ) {
        let Some(node) = self.registry.get(id) else {
            tracing::trace!(node = %id, "skipping unregistered child");
            return;
        };
        if node.style.is_hidden() {
            return;
        }
        let Some(rect) = self.layout.get(&id).copied() else {
            tracing::trace!(node = %id, "skipping node without layout");
            return;
        };

        let x = offset.0 + i32::from(rect.x);
        let y = offset.1 + i32::from(rect.y);

        let mut chain = Vec::with_capacity(transforms.len() + 1);
        if let Some(transform) = &node.style.transform {
            chain.push(transform);
        }
        chain.extend_from_slice(transforms);

        if !node.kind.is_container() {
            self.render_text(buffer, node, x, y, rect, &chain);
            return;
        }

        let style = &node.style;
        render_background(buffer, x, y, rect.width, rect.height, &style.border, style.background_color);
        render_border(buffer, x, y, rect.width, rect.height, &style.border);

        let resolved = resolve_overflow(&style.overflow);
        if resolved.clips() {
            let bounds = Rect::new(to_coord(x), to_coord(y), rect.width, rect.height);
            let own = compute_clip_region(bounds, style.padding, style.border.edges(), resolved);
            let region = region.intersect(&own);
            let mut clipped = buffer.clipped(Clip::from(region));
            self.render_children(&mut clipped, node, (x, y), region, &chain);
        } else {
            self.render_children(buffer, node, (x, y), region, &chain);
        }
    }

    fn render_children(
        &self,
        buffer: &mut OutputBuffer,
        node: &Node,
        offset: (i32, i32),
        region: ClipRegion,
        transforms: &[&'a OutputTransform],
    ) {
        for child in &node.children {
            self.render_node(buffer, *child, offset, region, transforms);
        }
    }

    fn render_text(
        &self,
        buffer: &mut OutputBuffer,
        node: &Node,
        x: i32,
        y: i32,
        rect: Rect,
        transforms: &[&OutputTransform],
    ) {
        let text = text_content(self.registry, node, Some(usize::from(rect.width)));
        if text.is_empty() {
            return;
        }
        let styled = apply_text_style_with_reset(&text, &node.style.text);
        let options = WriteOptions {
            transformers: transforms
                .iter()
                .map(|transform| transform.as_line_transformer())
                .collect(),
        };
        buffer.write(x, y, &styled, &options);
    }
}

#[inline]
fn to_coord(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}
