//! Layout module: flexbox placement and clip geometry.
//!
//! Layouts are recomputed from scratch every frame. The flex engine is a
//! pure function over one container; [`compute_tree_layout`] drives it over
//! a whole node tree.

mod flex;
mod overflow;
mod rect;
mod tree;

pub use flex::{
    compute_flex_layout, AlignItems, AlignSelf, FlexContainer, FlexDirection, FlexItem, FlexWrap,
    JustifyContent, LayoutMap,
};
pub use overflow::{
    compute_clip_region, intersect_clip_regions, resolve_overflow, ClipRegion, Overflow,
    OverflowConfig, ResolvedOverflow,
};
pub use rect::{Edges, Rect};
pub use tree::compute_tree_layout;
