//! Overflow resolution and clip-region geometry.
//!
//! A node with `overflow: hidden` on an axis clips its descendants to its
//! content box on that axis. Regions are intersected on the way down the
//! tree, so a region never grows with depth.

use std::str::FromStr;

use crate::error::{Error, Result};

use super::rect::{Edges, Rect};

/// Overflow behavior on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Overflow {
    /// Descendants may paint outside the content box.
    #[default]
    Visible,
    /// Descendants are clipped to the content box.
    Hidden,
}

impl FromStr for Overflow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "visible" => Ok(Self::Visible),
            "hidden" => Ok(Self::Hidden),
            other => Err(Error::UnknownValue {
                property: "overflow",
                value: other.to_string(),
            }),
        }
    }
}

/// The overflow properties as authored on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverflowConfig {
    /// Seeds both axes.
    pub overflow: Option<Overflow>,
    /// Overrides the horizontal axis.
    pub overflow_x: Option<Overflow>,
    /// Overrides the vertical axis.
    pub overflow_y: Option<Overflow>,
}

/// Per-axis overflow after overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedOverflow {
    /// Horizontal axis.
    pub overflow_x: Overflow,
    /// Vertical axis.
    pub overflow_y: Overflow,
}

impl ResolvedOverflow {
    /// Whether either axis clips.
    #[inline]
    pub fn clips(&self) -> bool {
        self.overflow_x == Overflow::Hidden || self.overflow_y == Overflow::Hidden
    }
}

/// Resolve `overflow` / `overflowX` / `overflowY` into one value per axis.
pub fn resolve_overflow(config: &OverflowConfig) -> ResolvedOverflow {
    let seed = config.overflow.unwrap_or_default();
    ResolvedOverflow {
        overflow_x: config.overflow_x.unwrap_or(seed),
        overflow_y: config.overflow_y.unwrap_or(seed),
    }
}

/// Origin used for an unconstrained axis.
const UNBOUNDED_ORIGIN: i32 = -(1 << 28);
/// Extent used for an unconstrained axis.
const UNBOUNDED_SIZE: i32 = 1 << 29;

/// A rectangle outside which painting is suppressed.
///
/// An axis can be unconstrained; it is stored as a huge span around the
/// origin so intersection needs no special cases.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipRegion {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in columns, never negative.
    pub width: i32,
    /// Height in rows, never negative.
    pub height: i32,
}

impl ClipRegion {
    /// A region that constrains neither axis.
    pub const UNCONSTRAINED: Self = Self {
        x: UNBOUNDED_ORIGIN,
        y: UNBOUNDED_ORIGIN,
        width: UNBOUNDED_SIZE,
        height: UNBOUNDED_SIZE,
    };

    /// Create a region; negative sizes are clamped to zero.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Whether the region covers no cell.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the horizontal axis is unconstrained.
    #[inline]
    pub const fn is_unbounded_x(&self) -> bool {
        self.x <= UNBOUNDED_ORIGIN && self.right() >= UNBOUNDED_ORIGIN + UNBOUNDED_SIZE
    }

    /// Whether the vertical axis is unconstrained.
    #[inline]
    pub const fn is_unbounded_y(&self) -> bool {
        self.y <= UNBOUNDED_ORIGIN && self.bottom() >= UNBOUNDED_ORIGIN + UNBOUNDED_SIZE
    }

    /// Standard rectangle intersection. Disjoint regions give zero area.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    /// Point containment, left/top inclusive and right/bottom exclusive.
    #[inline]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `rect` lies entirely inside this region.
    ///
    /// A zero-area rectangle is never contained.
    pub fn contains_rect(&self, rect: &Self) -> bool {
        !rect.is_empty()
            && !self.is_empty()
            && rect.x >= self.x
            && rect.y >= self.y
            && rect.right() <= self.right()
            && rect.bottom() <= self.bottom()
    }
}

impl From<Rect> for ClipRegion {
    fn from(rect: Rect) -> Self {
        Self::new(
            i32::from(rect.x),
            i32::from(rect.y),
            i32::from(rect.width),
            i32::from(rect.height),
        )
    }
}

impl std::fmt::Debug for ClipRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let axis = |unbounded: bool, start: i32, len: i32| {
            if unbounded {
                "*".to_string()
            } else {
                format!("{start}+{len}")
            }
        };
        write!(
            f,
            "ClipRegion(x {}, y {})",
            axis(self.is_unbounded_x(), self.x, self.width),
            axis(self.is_unbounded_y(), self.y, self.height)
        )
    }
}

/// Public entry point mirroring [`ClipRegion::intersect`].
pub fn intersect_clip_regions(a: &ClipRegion, b: &ClipRegion) -> ClipRegion {
    a.intersect(b)
}

/// Clip region produced by a node with absolute `bounds`.
///
/// The content area is the bounds shrunk by padding plus border on each
/// side (clamped to zero). A hidden axis clips to the content extent on that
/// axis; a visible axis stays unconstrained.
pub fn compute_clip_region(
    bounds: Rect,
    padding: Edges,
    border: Edges,
    resolved: ResolvedOverflow,
) -> ClipRegion {
    let content = bounds.inset(padding + border);
    let mut region = ClipRegion::UNCONSTRAINED;

    if resolved.overflow_x == Overflow::Hidden {
        region.x = i32::from(content.x);
        region.width = i32::from(content.width);
    }
    if resolved.overflow_y == Overflow::Hidden {
        region.y = i32::from(content.y);
        region.height = i32::from(content.height);
    }

    region
}
