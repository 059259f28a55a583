//! SGR text decoration: bold, italic, underline and friends.
//!
//! Each decoration is realized as a matching on/off pair wrapped around the
//! text, so decorations compose by nesting: an ancestor's pair sits outside
//! a descendant's pair.

use bitflags::bitflags;

use super::color::{colorize, Color, ColorLayer};

/// Full SGR reset.
pub const RESET: &str = "\x1b[0m";

/// Dim on.
pub const DIM_ON: &str = "\x1b[2m";
/// Dim off (shared with bold off).
pub const DIM_OFF: &str = "\x1b[22m";

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use trellis::text::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const INVERSE = 0b0010_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b1000_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// On/off pairs in the order they are nested, outermost first.
const MODIFIER_CODES: [(Modifiers, &str, &str); 6] = [
    (Modifiers::BOLD, "\x1b[1m", "\x1b[22m"),
    (Modifiers::ITALIC, "\x1b[3m", "\x1b[23m"),
    (Modifiers::UNDERLINE, "\x1b[4m", "\x1b[24m"),
    (Modifiers::STRIKETHROUGH, "\x1b[9m", "\x1b[29m"),
    (Modifiers::DIM, DIM_ON, DIM_OFF),
    (Modifiers::INVERSE, "\x1b[7m", "\x1b[27m"),
];

/// Visual decoration of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    /// Foreground color.
    pub color: Option<Color>,
    /// Background color behind the glyphs.
    pub background: Option<Color>,
    /// Bold, italic, underline, strikethrough, dim, inverse.
    pub modifiers: Modifiers,
}

impl TextStyle {
    /// Whether applying this style would change the text at all.
    pub fn is_plain(&self) -> bool {
        self.color.is_none() && self.background.is_none() && self.modifiers.is_empty()
    }

    /// Builder: set the foreground color.
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Builder: set the background color.
    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Builder: add modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

/// Wrap every line of `text` in the style's on/off pairs.
///
/// Lines are wrapped independently so a multi-line run never relies on SGR
/// state crossing a newline. Empty lines are left untouched.
pub fn apply_text_style(text: &str, style: &TextStyle) -> String {
    if style.is_plain() {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| style_line(line, style))
        .collect::<Vec<_>>()
        .join("\n")
}

fn style_line(line: &str, style: &TextStyle) -> String {
    if line.is_empty() {
        return String::new();
    }

    let mut out = line.to_string();
    for (flag, on, off) in MODIFIER_CODES.iter().rev() {
        if style.modifiers.contains(*flag) {
            out = format!("{on}{out}{off}");
        }
    }
    out = colorize(&out, style.background, ColorLayer::Background);
    colorize(&out, style.color, ColorLayer::Foreground)
}

/// Apply a style and terminate the result with a full reset.
///
/// Used for the final text of a node: whatever nested styles the squashed
/// text carried, nothing leaks past its end.
pub fn apply_text_style_with_reset(text: &str, style: &TextStyle) -> String {
    let styled = apply_text_style(text, style);
    if styled.as_bytes().contains(&0x1B) {
        let mut out = styled;
        out.push_str(RESET);
        out
    } else {
        styled
    }
}

/// Wrap text in a dim on/off pair, line by line.
pub fn dim(text: &str) -> String {
    apply_text_style(text, &TextStyle::default().with_modifiers(Modifiers::DIM))
}
