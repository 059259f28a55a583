//! Flex layout engine.
//!
//! A pure function from one container and its ordered items to a position
//! and size per item. It knows nothing about the node tree; the tree pass in
//! [`super::tree`] builds containers and items from styles and calls it once
//! per box.
//!
//! # Algorithm
//!
//! 1. **Filter**: hidden items leave the flow entirely; absolute items leave
//!    the flow and are placed at the origin with their base size
//! 2. **Lines**: items are packed greedily into lines (one line for `nowrap`)
//! 3. **Main sizes**: free space grows items by `flex_grow`, overflow shrinks
//!    them by `flex_shrink × base`, never below zero
//! 4. **Main positions**: per `justify-content`, plus the main-axis gap
//! 5. **Cross**: each line is as tall as its tallest item; items align per
//!    `align-self`/`align-items`; lines stack with the cross-axis gap
//! 6. **Reverse**: reversed directions mirror main positions
//! 7. **Round**: everything is floored to integer cells

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{check_size, Error, Result};
use crate::render::NodeId;

use super::rect::Rect;

/// Resolved layout of every item, keyed by node id.
pub type LayoutMap = HashMap<NodeId, Rect>;

/// Slack used when comparing float extents.
const EPSILON: f32 = 1e-4;

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident, $property:literal, { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(Error::UnknownValue {
                        property: $property,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

keyword_enum!(
    /// Main axis and its direction.
    FlexDirection, "flexDirection", {
        /// Left to right.
        #[default]
        Row => "row",
        /// Right to left.
        RowReverse => "row-reverse",
        /// Top to bottom.
        Column => "column",
        /// Bottom to top.
        ColumnReverse => "column-reverse",
    }
);

keyword_enum!(
    /// Whether items may break onto multiple lines.
    FlexWrap, "flexWrap", {
        /// Single line, items shrink to fit.
        #[default]
        NoWrap => "nowrap",
        /// New lines stack along the cross axis.
        Wrap => "wrap",
        /// New lines stack in reverse order.
        WrapReverse => "wrap-reverse",
    }
);

keyword_enum!(
    /// Distribution of free main-axis space.
    JustifyContent, "justifyContent", {
        /// Pack at the start.
        #[default]
        FlexStart => "flex-start",
        /// Pack at the end.
        FlexEnd => "flex-end",
        /// Center the packed items.
        Center => "center",
        /// No edge space; free space split between items.
        SpaceBetween => "space-between",
        /// Half a share at each edge, a full share between items.
        SpaceAround => "space-around",
        /// Equal shares everywhere, edges included.
        SpaceEvenly => "space-evenly",
    }
);

keyword_enum!(
    /// Cross-axis alignment of items within their line.
    AlignItems, "alignItems", {
        /// Line start.
        FlexStart => "flex-start",
        /// Line end.
        FlexEnd => "flex-end",
        /// Line center.
        Center => "center",
        /// Fill the line's cross size.
        #[default]
        Stretch => "stretch",
    }
);

keyword_enum!(
    /// Per-item override of [`AlignItems`].
    AlignSelf, "alignSelf", {
        /// Use the container's `align-items`.
        #[default]
        Auto => "auto",
        /// Line start.
        FlexStart => "flex-start",
        /// Line end.
        FlexEnd => "flex-end",
        /// Line center.
        Center => "center",
        /// Fill the line's cross size.
        Stretch => "stretch",
    }
);

impl FlexDirection {
    /// Whether the main axis is horizontal.
    #[inline]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Whether main positions are mirrored.
    #[inline]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

impl AlignSelf {
    /// The effective alignment given the container's `align-items`.
    pub(crate) const fn resolve(self, parent: AlignItems) -> AlignItems {
        match self {
            Self::Auto => parent,
            Self::FlexStart => AlignItems::FlexStart,
            Self::FlexEnd => AlignItems::FlexEnd,
            Self::Center => AlignItems::Center,
            Self::Stretch => AlignItems::Stretch,
        }
    }
}

/// A flex container's inner box and flow settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexContainer {
    /// Extent along the main axis.
    pub main_size: f32,
    /// Extent along the cross axis.
    pub cross_size: f32,
    /// Main axis.
    pub direction: FlexDirection,
    /// Line breaking.
    pub wrap: FlexWrap,
    /// Main-axis distribution.
    pub justify_content: JustifyContent,
    /// Default cross-axis alignment.
    pub align_items: AlignItems,
    /// Gap between items on a line.
    pub main_gap: f32,
    /// Gap between lines.
    pub cross_gap: f32,
}

impl FlexContainer {
    /// Create a container with default flow settings.
    pub fn new(main_size: f32, cross_size: f32) -> Self {
        Self {
            main_size,
            cross_size,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        check_size("container main size", self.main_size)?;
        check_size("container cross size", self.cross_size)?;
        check_size("main gap", self.main_gap)?;
        check_size("cross gap", self.cross_gap)?;
        Ok(())
    }
}

/// One child as seen by the flex algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    /// Node this item lays out.
    pub id: NodeId,
    /// Hypothetical size along the main axis.
    pub base_main_size: f32,
    /// Hypothetical size along the cross axis.
    pub base_cross_size: f32,
    /// Share of free space taken when growing.
    pub flex_grow: f32,
    /// Shrink factor, weighted by base size.
    pub flex_shrink: f32,
    /// Excluded from layout; no space is reserved.
    pub hidden: bool,
    /// Out of flow; placed at the origin with its base size.
    pub absolute: bool,
    /// Cross alignment override.
    pub align_self: AlignSelf,
}

impl FlexItem {
    /// An in-flow item that does not grow and shrinks with weight 1.
    pub const fn new(id: NodeId, base_main_size: f32, base_cross_size: f32) -> Self {
        Self {
            id,
            base_main_size,
            base_cross_size,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            hidden: false,
            absolute: false,
            align_self: AlignSelf::Auto,
        }
    }

    /// Builder: set the grow factor.
    #[must_use]
    pub const fn grow(mut self, flex_grow: f32) -> Self {
        self.flex_grow = flex_grow;
        self
    }

    /// Builder: set the shrink factor.
    #[must_use]
    pub const fn shrink(mut self, flex_shrink: f32) -> Self {
        self.flex_shrink = flex_shrink;
        self
    }

    /// Builder: override cross alignment.
    #[must_use]
    pub const fn align(mut self, align_self: AlignSelf) -> Self {
        self.align_self = align_self;
        self
    }

    fn validate(&self) -> Result<()> {
        check_size("base main size", self.base_main_size)?;
        check_size("base cross size", self.base_cross_size)?;
        check_size("flex grow", self.flex_grow)?;
        check_size("flex shrink", self.flex_shrink)?;
        Ok(())
    }
}

/// A line of in-flow items and its resolved geometry.
struct FlexLine<'a> {
    items: Vec<&'a FlexItem>,
    sizes: Vec<f32>,
    positions: Vec<f32>,
    cross_size: f32,
}

/// Lay out `items` inside `container`.
///
/// Hidden items are absent from the result. Positions are relative to the
/// container's content box.
pub fn compute_flex_layout(container: &FlexContainer, items: &[FlexItem]) -> Result<LayoutMap> {
    container.validate()?;
    for item in items {
        item.validate()?;
    }

    let horizontal = container.direction.is_row();
    let mut layout = LayoutMap::with_capacity(items.len());
    let mut flow = Vec::with_capacity(items.len());

    for item in items {
        if item.hidden {
            continue;
        }
        if item.absolute {
            layout.insert(
                item.id,
                place(horizontal, 0.0, 0.0, item.base_main_size, item.base_cross_size),
            );
            continue;
        }
        flow.push(item);
    }

    let mut lines = pack_lines(container, flow);

    for line in &mut lines {
        line.sizes = resolve_main_sizes(container, &line.items);
        line.positions = justify(container, &line.sizes);
        line.cross_size = line
            .items
            .iter()
            .map(|item| item.base_cross_size)
            .fold(0.0, f32::max);
    }

    let offsets = stack_lines(container, &lines);

    for (line, line_offset) in lines.iter().zip(offsets) {
        for (index, item) in line.items.iter().enumerate() {
            let main_size = line.sizes[index];
            let mut main_pos = line.positions[index];
            if container.direction.is_reverse() {
                main_pos = (container.main_size - main_pos - main_size).max(0.0);
            }

            let (cross_pos, cross_size) = align_cross(
                item.align_self.resolve(container.align_items),
                line.cross_size,
                item.base_cross_size,
            );

            layout.insert(
                item.id,
                place(horizontal, main_pos, line_offset + cross_pos, main_size, cross_size),
            );
        }
    }

    Ok(layout)
}

/// Greedy line packing; `nowrap` keeps everything on one line.
fn pack_lines<'a>(container: &FlexContainer, flow: Vec<&'a FlexItem>) -> Vec<FlexLine<'a>> {
    let new_line = |items: Vec<&'a FlexItem>| FlexLine {
        items,
        sizes: Vec::new(),
        positions: Vec::new(),
        cross_size: 0.0,
    };

    if flow.is_empty() {
        return Vec::new();
    }
    if container.wrap == FlexWrap::NoWrap {
        return vec![new_line(flow)];
    }

    let mut lines = Vec::new();
    let mut current: Vec<&FlexItem> = Vec::new();
    let mut used = 0.0;

    for item in flow {
        if current.is_empty() {
            current.push(item);
            used = item.base_main_size;
            continue;
        }
        let needed = used + container.main_gap + item.base_main_size;
        if needed > container.main_size + EPSILON {
            lines.push(new_line(std::mem::take(&mut current)));
            current.push(item);
            used = item.base_main_size;
        } else {
            current.push(item);
            used = needed;
        }
    }
    lines.push(new_line(current));
    lines
}

/// Grow or shrink base sizes to fill the line's available main space.
fn resolve_main_sizes(container: &FlexContainer, items: &[&FlexItem]) -> Vec<f32> {
    let mut sizes: Vec<f32> = items.iter().map(|item| item.base_main_size).collect();
    let gaps = container.main_gap * items.len().saturating_sub(1) as f32;
    let available = (container.main_size - gaps).max(0.0);
    let total: f32 = sizes.iter().sum();

    if total < available {
        let grow_sum: f32 = items.iter().map(|item| item.flex_grow).sum();
        if grow_sum > 0.0 {
            let free = available - total;
            for (size, item) in sizes.iter_mut().zip(items) {
                *size += free * item.flex_grow / grow_sum;
            }
        }
    } else if total > available {
        // Items clamped at zero stop absorbing overflow; the rest re-share it.
        let mut frozen: Vec<bool> = items
            .iter()
            .map(|item| item.flex_shrink * item.base_main_size <= 0.0)
            .collect();

        loop {
            let overflow = sizes.iter().sum::<f32>() - available;
            if overflow <= EPSILON {
                break;
            }
            let weight_sum: f32 = items
                .iter()
                .zip(&frozen)
                .filter(|(_, frozen)| !**frozen)
                .map(|(item, _)| item.flex_shrink * item.base_main_size)
                .sum();
            if weight_sum <= 0.0 {
                break;
            }

            let mut clamped = false;
            for ((size, item), frozen) in sizes.iter_mut().zip(items).zip(frozen.iter_mut()) {
                if *frozen {
                    continue;
                }
                *size -= overflow * item.flex_shrink * item.base_main_size / weight_sum;
                if *size <= 0.0 {
                    *size = 0.0;
                    *frozen = true;
                    clamped = true;
                }
            }
            if !clamped {
                break;
            }
        }
    }

    sizes
}

/// Main-axis start positions per `justify-content`.
fn justify(container: &FlexContainer, sizes: &[f32]) -> Vec<f32> {
    let count = sizes.len();
    if count == 0 {
        return Vec::new();
    }
    let gaps = container.main_gap * (count - 1) as f32;
    let used: f32 = sizes.iter().sum::<f32>() + gaps;
    let free = (container.main_size - used).max(0.0);
    let n = count as f32;

    let (lead, between) = match container.justify_content {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (free, 0.0),
        JustifyContent::Center => (free / 2.0, 0.0),
        JustifyContent::SpaceBetween if count > 1 => (0.0, free / (n - 1.0)),
        JustifyContent::SpaceBetween => (0.0, 0.0),
        JustifyContent::SpaceAround => (free / n / 2.0, free / n),
        JustifyContent::SpaceEvenly => (free / (n + 1.0), free / (n + 1.0)),
    };

    let mut positions = Vec::with_capacity(count);
    let mut cursor = lead;
    for size in sizes {
        positions.push(cursor);
        cursor += size + container.main_gap + between;
    }
    positions
}

/// Cross offset of every line; `wrap-reverse` stacks the last line first.
fn stack_lines(container: &FlexContainer, lines: &[FlexLine<'_>]) -> Vec<f32> {
    let mut offsets = vec![0.0; lines.len()];
    let mut cursor = 0.0;

    let mut assign = |index: usize| {
        offsets[index] = cursor;
        cursor += lines[index].cross_size + container.cross_gap;
    };
    if container.wrap == FlexWrap::WrapReverse {
        (0..lines.len()).rev().for_each(&mut assign);
    } else {
        (0..lines.len()).for_each(&mut assign);
    }

    offsets
}

/// Cross position and size of an item inside a line.
fn align_cross(align: AlignItems, line_cross: f32, item_cross: f32) -> (f32, f32) {
    match align {
        AlignItems::FlexStart => (0.0, item_cross),
        AlignItems::FlexEnd => ((line_cross - item_cross).max(0.0), item_cross),
        AlignItems::Center => (((line_cross - item_cross) / 2.0).max(0.0), item_cross),
        AlignItems::Stretch => (0.0, line_cross),
    }
}

/// Map main/cross coordinates onto x/y and floor to cells.
fn place(horizontal: bool, main_pos: f32, cross_pos: f32, main_size: f32, cross_size: f32) -> Rect {
    let (x, y, width, height) = if horizontal {
        (main_pos, cross_pos, main_size, cross_size)
    } else {
        (cross_pos, main_pos, cross_size, main_size)
    };
    Rect::new(to_cells(x), to_cells(y), to_cells(width), to_cells(height))
}

#[inline]
pub(crate) fn to_cells(value: f32) -> u16 {
    value.max(0.0).floor().min(f32::from(u16::MAX)) as u16
}
