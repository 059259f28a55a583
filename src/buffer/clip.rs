//! Clip rectangles and the scoped guard that keeps the clip stack balanced.

use std::ops::{Deref, DerefMut};

use crate::layout::ClipRegion;

use super::buffer::OutputBuffer;

/// A clip rectangle in buffer coordinates.
///
/// Each bound is optional; a missing bound leaves that side open. `x1`/`y1`
/// are inclusive, `x2`/`y2` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Clip {
    /// Left edge.
    pub x1: Option<i32>,
    /// Right edge.
    pub x2: Option<i32>,
    /// Top edge.
    pub y1: Option<i32>,
    /// Bottom edge.
    pub y2: Option<i32>,
}

impl Clip {
    /// A clip with all four bounds set.
    pub const fn new(x1: i32, x2: i32, y1: i32, y2: i32) -> Self {
        Self {
            x1: Some(x1),
            x2: Some(x2),
            y1: Some(y1),
            y2: Some(y2),
        }
    }

    /// Whether the clip constrains the horizontal axis.
    #[inline]
    pub const fn clips_horizontally(&self) -> bool {
        self.x1.is_some() || self.x2.is_some()
    }

    /// Whether the clip constrains the vertical axis.
    #[inline]
    pub const fn clips_vertically(&self) -> bool {
        self.y1.is_some() || self.y2.is_some()
    }

    /// Whether row `y` lies inside the vertical bounds.
    #[inline]
    pub fn contains_row(&self, y: i32) -> bool {
        self.y1.map_or(true, |y1| y >= y1) && self.y2.map_or(true, |y2| y < y2)
    }

    /// Columns `[start, end)` of a span starting at `x` with `width` columns
    /// that survive the horizontal bounds, or `None` if nothing survives.
    pub fn visible_span(&self, x: i32, width: i32) -> Option<(i32, i32)> {
        let start = self.x1.map_or(x, |x1| x.max(x1));
        let end = self.x2.map_or(x + width, |x2| (x + width).min(x2));
        (end > start).then_some((start, end))
    }
}

impl From<ClipRegion> for Clip {
    /// Unbounded axes of the region become open bounds.
    fn from(region: ClipRegion) -> Self {
        let (x1, x2) = if region.is_unbounded_x() {
            (None, None)
        } else {
            (Some(region.x), Some(region.right()))
        };
        let (y1, y2) = if region.is_unbounded_y() {
            (None, None)
        } else {
            (Some(region.y), Some(region.bottom()))
        };
        Self { x1, x2, y1, y2 }
    }
}

/// A pushed clip that is popped when the guard goes out of scope.
///
/// The guard dereferences to the buffer, so painting inside the clipped
/// scope goes through it. Early returns and `?` still pop the clip.
pub struct ClipGuard<'a> {
    buffer: &'a mut OutputBuffer,
}

impl<'a> ClipGuard<'a> {
    pub(super) fn new(buffer: &'a mut OutputBuffer, clip: Clip) -> Self {
        buffer.push_clip(clip);
        Self { buffer }
    }
}

impl Deref for ClipGuard<'_> {
    type Target = OutputBuffer;

    fn deref(&self) -> &OutputBuffer {
        &*self.buffer
    }
}

impl DerefMut for ClipGuard<'_> {
    fn deref_mut(&mut self) -> &mut OutputBuffer {
        &mut *self.buffer
    }
}

impl Drop for ClipGuard<'_> {
    fn drop(&mut self) {
        self.buffer.pop_clip();
    }
}
