//! Border glyph charsets and the border painter.

use std::str::FromStr;

use crate::buffer::{OutputBuffer, WriteOptions};
use crate::error::{Error, Result};
use crate::layout::Edges;
use crate::text::{colorize, Color, ColorLayer, DIM_OFF, DIM_ON};

/// The eight glyphs of a box border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderCharset {
    /// Top-left corner.
    pub top_left: char,
    /// Top edge, repeated.
    pub top: char,
    /// Top-right corner.
    pub top_right: char,
    /// Right edge, repeated.
    pub right: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Bottom edge, repeated.
    pub bottom: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Left edge, repeated.
    pub left: char,
}

impl BorderCharset {
    /// Glyphs in clockwise order starting at the top-left corner.
    pub const fn new(glyphs: [char; 8]) -> Self {
        let [top_left, top, top_right, right, bottom_right, bottom, bottom_left, left] = glyphs;
        Self {
            top_left,
            top,
            top_right,
            right,
            bottom_right,
            bottom,
            bottom_left,
            left,
        }
    }
}

/// A named border style or a literal charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    /// ┌─┐
    Single,
    /// ╔═╗
    Double,
    /// ╭─╮
    Round,
    /// ┏━┓
    Bold,
    /// ╓─╖ (single horizontal, double vertical)
    SingleDouble,
    /// ╒═╕ (double horizontal, single vertical)
    DoubleSingle,
    /// +-+
    Classic,
    /// ↘↓↙
    Arrow,
    /// ┏╍┓
    Heavy,
    /// ▛▀▜
    HeavyWide,
    /// .-.
    Ascii,
    /// Caller-supplied glyphs.
    Custom(BorderCharset),
}

impl BorderStyle {
    /// Every named style, in table order.
    pub const NAMED: [Self; 11] = [
        Self::Single,
        Self::Double,
        Self::Round,
        Self::Bold,
        Self::SingleDouble,
        Self::DoubleSingle,
        Self::Classic,
        Self::Arrow,
        Self::Heavy,
        Self::HeavyWide,
        Self::Ascii,
    ];

    /// The glyphs this style paints with.
    pub const fn charset(self) -> BorderCharset {
        match self {
            Self::Single => BorderCharset::new(['┌', '─', '┐', '│', '┘', '─', '└', '│']),
            Self::Double => BorderCharset::new(['╔', '═', '╗', '║', '╝', '═', '╚', '║']),
            Self::Round => BorderCharset::new(['╭', '─', '╮', '│', '╯', '─', '╰', '│']),
            Self::Bold => BorderCharset::new(['┏', '━', '┓', '┃', '┛', '━', '┗', '┃']),
            Self::SingleDouble => BorderCharset::new(['╓', '─', '╖', '║', '╜', '─', '╙', '║']),
            Self::DoubleSingle => BorderCharset::new(['╒', '═', '╕', '│', '╛', '═', '╘', '│']),
            Self::Classic => BorderCharset::new(['+', '-', '+', '|', '+', '-', '+', '|']),
            Self::Arrow => BorderCharset::new(['↘', '↓', '↙', '←', '↖', '↑', '↗', '→']),
            Self::Heavy => BorderCharset::new(['┏', '╍', '┓', '╏', '┛', '╍', '┗', '╏']),
            Self::HeavyWide => BorderCharset::new(['▛', '▀', '▜', '▐', '▟', '▄', '▙', '▌']),
            Self::Ascii => BorderCharset::new(['.', '-', '.', '|', '\'', '-', '\'', '|']),
            Self::Custom(charset) => charset,
        }
    }

    /// Stable wire name; `None` for custom charsets.
    pub const fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Round => "round",
            Self::Bold => "bold",
            Self::SingleDouble => "singleDouble",
            Self::DoubleSingle => "doubleSingle",
            Self::Classic => "classic",
            Self::Arrow => "arrow",
            Self::Heavy => "heavy",
            Self::HeavyWide => "heavyWide",
            Self::Ascii => "ascii",
            Self::Custom(_) => return None,
        })
    }
}

impl FromStr for BorderStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::NAMED
            .into_iter()
            .find(|style| style.name() == Some(s))
            .ok_or_else(|| Error::UnknownBorderStyle(s.to_string()))
    }
}

impl From<BorderCharset> for BorderStyle {
    fn from(charset: BorderCharset) -> Self {
        Self::Custom(charset)
    }
}

/// Per-side border settings. Unset color/dim fall back to the border's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSide {
    /// Whether this side is drawn.
    pub visible: bool,
    /// Side color override.
    pub color: Option<Color>,
    /// Side dim override.
    pub dim: Option<bool>,
}

impl Default for BorderSide {
    fn default() -> Self {
        Self {
            visible: true,
            color: None,
            dim: None,
        }
    }
}

/// Everything needed to paint a node's border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Border {
    /// Glyph style; `None` means no border at all.
    pub style: Option<BorderStyle>,
    /// Aggregate color.
    pub color: Option<Color>,
    /// Aggregate dim.
    pub dim: bool,
    /// Top side.
    pub top: BorderSide,
    /// Right side.
    pub right: BorderSide,
    /// Bottom side.
    pub bottom: BorderSide,
    /// Left side.
    pub left: BorderSide,
}

impl Border {
    /// A border of the given style on all four sides.
    pub fn new(style: BorderStyle) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// Builder: aggregate color.
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Builder: aggregate dim.
    #[must_use]
    pub const fn dimmed(mut self) -> Self {
        self.dim = true;
        self
    }

    /// Cells taken by each side (1 for a drawn side, 0 otherwise).
    pub const fn edges(&self) -> Edges {
        if self.style.is_none() {
            return Edges::ZERO;
        }
        Edges::new(
            self.top.visible as u16,
            self.right.visible as u16,
            self.bottom.visible as u16,
            self.left.visible as u16,
        )
    }

    /// Paint one side's text with its resolved color and dim.
    fn paint(&self, side: &BorderSide, text: &str) -> String {
        let colored = colorize(text, side.color.or(self.color), ColorLayer::Foreground);
        if side.dim.unwrap_or(self.dim) {
            format!("{DIM_ON}{colored}{DIM_OFF}")
        } else {
            colored
        }
    }

    fn paint_column(&self, side: &BorderSide, glyph: char, rows: usize) -> String {
        let line = self.paint(side, glyph.encode_utf8(&mut [0; 4]));
        vec![line; rows].join("\n")
    }
}

/// Paint `border` around the box at `(x, y)` with the given size.
///
/// Top and bottom rows span the full width (corners only where the adjacent
/// side is drawn); left and right columns fill the rows between them.
pub fn render_border(buffer: &mut OutputBuffer, x: i32, y: i32, width: u16, height: u16, border: &Border) {
    let Some(style) = border.style else {
        return;
    };
    if width == 0 || height == 0 {
        return;
    }
    let chars = style.charset();
    let options = WriteOptions::default();
    let edges = border.edges();
    let content_width = usize::from(width.saturating_sub(edges.horizontal()));
    // A one-column box has room for the left side only.
    let right_visible = border.right.visible && width > u16::from(border.left.visible);

    let horizontal = |left: char, fill: char, right: char| {
        let mut row = String::with_capacity((content_width + 2) * 3);
        if border.left.visible {
            row.push(left);
        }
        row.extend(std::iter::repeat(fill).take(content_width));
        if right_visible {
            row.push(right);
        }
        row
    };

    if border.top.visible {
        let row = horizontal(chars.top_left, chars.top, chars.top_right);
        buffer.write(x, y, &border.paint(&border.top, &row), &options);
    }

    let rows = usize::from(height.saturating_sub(edges.vertical()));
    let first_row = y + i32::from(edges.top);
    if rows > 0 {
        if border.left.visible {
            let column = border.paint_column(&border.left, chars.left, rows);
            buffer.write(x, first_row, &column, &options);
        }
        if right_visible {
            let column = border.paint_column(&border.right, chars.right, rows);
            buffer.write(x + i32::from(width) - 1, first_row, &column, &options);
        }
    }

    if border.bottom.visible {
        let row = horizontal(chars.bottom_left, chars.bottom, chars.bottom_right);
        let bottom = y + i32::from(height) - 1;
        buffer.write(x, bottom, &border.paint(&border.bottom, &row), &options);
    }
}
