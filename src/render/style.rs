//! Resolved node styles.
//!
//! The tree owner hands every node a [`Style`]. Keyword properties parse from
//! their stable wire names through `FromStr`, so string-typed style sources
//! can be converted at the boundary.

use std::str::FromStr;
use std::sync::Arc;

use crate::buffer::LineTransformer;
use crate::error::{check_size, Error, Result};
use crate::layout::{
    AlignItems, AlignSelf, Edges, FlexDirection, FlexWrap, JustifyContent, OverflowConfig,
};
use crate::text::{Color, TextStyle, TextWrap};

use super::border::Border;

/// Whether a node takes part in layout and painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Display {
    /// Laid out as a flex box.
    #[default]
    Flex,
    /// Neither laid out nor painted.
    None,
}

impl FromStr for Display {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flex" => Ok(Self::Flex),
            "none" => Ok(Self::None),
            other => Err(Error::UnknownValue {
                property: "display",
                value: other.to_string(),
            }),
        }
    }
}

/// In-flow or out-of-flow placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Position {
    /// Takes part in flex flow.
    #[default]
    Relative,
    /// Removed from flow, placed at the parent's content origin.
    Absolute,
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relative" => Ok(Self::Relative),
            "absolute" => Ok(Self::Absolute),
            other => Err(Error::UnknownValue {
                property: "position",
                value: other.to_string(),
            }),
        }
    }
}

/// A width or height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Sized by content and flex.
    #[default]
    Auto,
    /// A fixed number of cells.
    Cells(u16),
    /// A percentage of the parent's content box.
    Percent(f32),
}

impl Dimension {
    /// Resolve against the parent's content extent, when that is known.
    ///
    /// # Errors
    /// [`Error::InvalidSize`] for a negative or non-finite percentage.
    pub fn resolve(self, parent: Option<f32>) -> Result<Option<f32>> {
        match self {
            Self::Auto => Ok(None),
            Self::Cells(cells) => Ok(Some(f32::from(cells))),
            Self::Percent(percent) => {
                let percent = check_size("percentage", percent)?;
                Ok(parent.map(|extent| extent * percent / 100.0))
            }
        }
    }

    /// Whether the dimension is anything but `Auto`.
    #[inline]
    pub const fn is_definite(self) -> bool {
        !matches!(self, Self::Auto)
    }
}

impl FromStr for Dimension {
    type Err = Error;

    /// Parse `auto`, `12` or `50%`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::UnknownValue {
            property: "dimension",
            value: s.to_string(),
        };
        if s == "auto" {
            return Ok(Self::Auto);
        }
        if let Some(percent) = s.strip_suffix('%') {
            return percent.trim().parse().map(Self::Percent).map_err(|_| invalid());
        }
        s.trim().parse().map(Self::Cells).map_err(|_| invalid())
    }
}

/// A line transform applied when a node's text is written.
///
/// Receives one output line and its index, returns the replacement.
#[derive(Clone)]
pub struct OutputTransform(Arc<dyn Fn(&str, usize) -> String + Send + Sync>);

impl OutputTransform {
    /// Wrap a transform function.
    pub fn new(transform: impl Fn(&str, usize) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(transform))
    }

    /// Apply the transform to one line.
    #[inline]
    pub fn apply(&self, line: &str, index: usize) -> String {
        (self.0)(line, index)
    }

    pub(crate) fn as_line_transformer(&self) -> LineTransformer<'_> {
        &*self.0
    }
}

impl std::fmt::Debug for OutputTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OutputTransform(..)")
    }
}

/// Every style property the core consumes.
#[derive(Debug, Clone)]
pub struct Style {
    /// Participation in layout and painting.
    pub display: Display,
    /// Flow placement.
    pub position: Position,
    /// Border-box width.
    pub width: Dimension,
    /// Border-box height.
    pub height: Dimension,
    /// Space between the border and the content.
    pub padding: Edges,
    /// Gap between columns (horizontal).
    pub column_gap: u16,
    /// Gap between rows (vertical).
    pub row_gap: u16,
    /// Main axis.
    pub flex_direction: FlexDirection,
    /// Line breaking.
    pub flex_wrap: FlexWrap,
    /// Share of free space taken.
    pub flex_grow: f32,
    /// Shrink factor.
    pub flex_shrink: f32,
    /// Main-axis distribution of children.
    pub justify_content: JustifyContent,
    /// Cross-axis alignment of children.
    pub align_items: AlignItems,
    /// Cross-axis alignment of this node in its parent.
    pub align_self: AlignSelf,
    /// Clipping of descendants.
    pub overflow: OverflowConfig,
    /// Border glyphs, per-side visibility, colors and dim.
    pub border: Border,
    /// Fill color behind the content.
    pub background_color: Option<Color>,
    /// Text color and decorations.
    pub text: TextStyle,
    /// How text wider than its box is fitted.
    pub text_wrap: TextWrap,
    /// Line transform applied to this node's text output.
    pub transform: Option<OutputTransform>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Flex,
            position: Position::Relative,
            width: Dimension::Auto,
            height: Dimension::Auto,
            padding: Edges::ZERO,
            column_gap: 0,
            row_gap: 0,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::NoWrap,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            justify_content: JustifyContent::FlexStart,
            align_items: AlignItems::Stretch,
            align_self: AlignSelf::Auto,
            overflow: OverflowConfig::default(),
            border: Border::default(),
            background_color: None,
            text: TextStyle::default(),
            text_wrap: TextWrap::Wrap,
            transform: None,
        }
    }
}

impl Style {
    /// Builder: column direction.
    #[must_use]
    pub const fn column(mut self) -> Self {
        self.flex_direction = FlexDirection::Column;
        self
    }

    /// Builder: fixed border-box size.
    #[must_use]
    pub const fn size(mut self, width: u16, height: u16) -> Self {
        self.width = Dimension::Cells(width);
        self.height = Dimension::Cells(height);
        self
    }

    /// Builder: border.
    #[must_use]
    pub const fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Builder: padding.
    #[must_use]
    pub const fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    /// Builder: grow factor.
    #[must_use]
    pub const fn grow(mut self, flex_grow: f32) -> Self {
        self.flex_grow = flex_grow;
        self
    }

    /// Builder: text decoration.
    #[must_use]
    pub const fn text(mut self, text: TextStyle) -> Self {
        self.text = text;
        self
    }

    /// Builder: output transform.
    #[must_use]
    pub fn transform(mut self, transform: impl Fn(&str, usize) -> String + Send + Sync + 'static) -> Self {
        self.transform = Some(OutputTransform::new(transform));
        self
    }

    /// Whether the node is excluded from layout and painting.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.display == Display::None
    }
}
