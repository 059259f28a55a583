//! Cell: one column of one row of the output grid.
//!
//! A cell is self-contained: it carries its grapheme, the SGR state that was
//! active when it was written, and any non-SGR escapes (hyperlinks, titles)
//! that preceded it. Serialization therefore never depends on what was
//! written before or after a cell, which is what makes "last write wins"
//! compositing safe.
//!
//! ```text
//! ┌───────────────┬──────────────────────┬──────────────┬───────┬───────┐
//! │   grapheme    │        style         │   escapes    │ width │ flags │
//! │ Cow<'static>  │ Option<Arc<str>>     │ Option<Box>  │  u8   │  u8   │
//! └───────────────┴──────────────────────┴──────────────┴───────┴───────┘
//! ```
//!
//! Styles are shared: every cell written under the same SGR state holds a
//! clone of one `Arc<str>`.

use std::borrow::Cow;
use std::sync::Arc;

use bitflags::bitflags;

bitflags! {
    /// Cell-level flags for special states.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// This cell is the right half of a wide glyph.
        const WIDE_CONTINUATION = 0b0000_0001;
    }
}

impl std::fmt::Debug for CellFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single grid cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Grapheme cluster shown in this cell (empty for continuations).
    grapheme: Cow<'static, str>,
    /// SGR sequences re-creating the style active at write time.
    style: Option<Arc<str>>,
    /// Non-SGR escapes emitted just before the grapheme.
    escapes: Option<Box<str>>,
    /// Display width: 0 for continuations, 1 or 2 otherwise.
    width: u8,
    flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// A blank, unstyled cell.
    pub const EMPTY: Self = Self {
        grapheme: Cow::Borrowed(" "),
        style: None,
        escapes: None,
        width: 1,
        flags: CellFlags::empty(),
    };

    /// Create an unstyled cell from a grapheme and its display width.
    #[inline]
    pub fn new(grapheme: &str, width: u8) -> Self {
        Self {
            grapheme: Cow::Owned(grapheme.to_string()),
            style: None,
            escapes: None,
            width,
            flags: CellFlags::empty(),
        }
    }

    /// The placeholder occupying the right half of a wide glyph.
    #[inline]
    pub fn wide_continuation(style: Option<Arc<str>>) -> Self {
        Self {
            grapheme: Cow::Borrowed(""),
            style,
            escapes: None,
            width: 0,
            flags: CellFlags::WIDE_CONTINUATION,
        }
    }

    /// Builder: attach the SGR state the cell is drawn with.
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: Option<Arc<str>>) -> Self {
        self.style = style;
        self
    }

    /// Builder: attach escapes emitted before the grapheme.
    #[inline]
    #[must_use]
    pub fn with_escapes(mut self, escapes: &str) -> Self {
        self.escapes = if escapes.is_empty() {
            None
        } else {
            Some(escapes.into())
        };
        self
    }

    /// The grapheme cluster.
    #[inline]
    pub fn grapheme(&self) -> &str {
        &self.grapheme
    }

    /// The style prefix, if the cell is styled.
    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Shared handle to the style prefix.
    #[inline]
    pub(crate) const fn style_handle(&self) -> Option<&Arc<str>> {
        self.style.as_ref()
    }

    /// Non-SGR escapes preceding the grapheme.
    #[inline]
    pub fn escapes(&self) -> Option<&str> {
        self.escapes.as_deref()
    }

    /// Display width (0, 1, or 2).
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.width
    }

    /// Get the flags.
    #[inline]
    pub const fn flags(&self) -> CellFlags {
        self.flags
    }

    /// Check if this is a wide-character continuation.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }

    /// Whether this cell is the left half of a wide glyph.
    #[inline]
    pub const fn is_wide(&self) -> bool {
        self.width == 2
    }

    /// Whether the cell would serialize to anything but a plain space.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.style.is_none() && self.escapes.is_none() && self.grapheme == " "
    }

    /// Append a zero-width grapheme (combining mark, joiner) to this cell.
    pub(crate) fn push_zero_width(&mut self, grapheme: &str) {
        self.grapheme.to_mut().push_str(grapheme);
    }

    /// Reset the cell to a blank space.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("grapheme", &self.grapheme)
            .field("width", &self.width)
            .field("style", &self.style)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
