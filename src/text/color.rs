//! Terminal colors and their SGR encodings.
//!
//! Three color spaces are supported, matching what terminals accept:
//! - the basic and bright 8/16-color palette (`30-37`, `90-97`, ...)
//! - the 256-color palette (`38;5;N` / `48;5;N`)
//! - 24-bit true color (`38;2;r;g;b` / `48;2;r;g;b`)

use std::str::FromStr;

use crate::error::{Error, Result};

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// The 16 named palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// Bright black; also spelled `grey` / `blackBright`.
    Gray,
    RedBright,
    GreenBright,
    YellowBright,
    BlueBright,
    MagentaBright,
    CyanBright,
    WhiteBright,
}

impl NamedColor {
    /// Foreground SGR parameter. Background is this plus 10.
    const fn fg_code(self) -> u8 {
        match self {
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::Gray => 90,
            Self::RedBright => 91,
            Self::GreenBright => 92,
            Self::YellowBright => 93,
            Self::BlueBright => 94,
            Self::MagentaBright => 95,
            Self::CyanBright => 96,
            Self::WhiteBright => 97,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "gray" | "grey" | "blackBright" => Self::Gray,
            "redBright" => Self::RedBright,
            "greenBright" => Self::GreenBright,
            "yellowBright" => Self::YellowBright,
            "blueBright" => Self::BlueBright,
            "magentaBright" => Self::MagentaBright,
            "cyanBright" => Self::CyanBright,
            "whiteBright" => Self::WhiteBright,
            _ => return None,
        };
        Some(color)
    }
}

/// Which SGR layer a color is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLayer {
    /// Text color (`38`, closed by `39`).
    Foreground,
    /// Cell background (`48`, closed by `49`).
    Background,
}

/// A terminal color in any of the supported color spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Basic or bright palette color.
    Named(NamedColor),
    /// Index into the 256-color palette.
    Ansi256(u8),
    /// 24-bit color.
    Rgb(Rgb),
}

impl Color {
    /// The opening SGR sequence for this color on the given layer.
    pub fn open_sequence(self, layer: ColorLayer) -> String {
        let base = match layer {
            ColorLayer::Foreground => 38,
            ColorLayer::Background => 48,
        };
        match self {
            Self::Named(named) => {
                let code = match layer {
                    ColorLayer::Foreground => named.fg_code(),
                    ColorLayer::Background => named.fg_code() + 10,
                };
                format!("\x1b[{code}m")
            }
            Self::Ansi256(index) => format!("\x1b[{base};5;{index}m"),
            Self::Rgb(rgb) => format!("\x1b[{base};2;{};{};{}m", rgb.r, rgb.g, rgb.b),
        }
    }
}

/// The closing SGR sequence for a layer.
pub const fn close_sequence(layer: ColorLayer) -> &'static str {
    match layer {
        ColorLayer::Foreground => "\x1b[39m",
        ColorLayer::Background => "\x1b[49m",
    }
}

/// Wrap text in a color's open/close pair. `None` returns the text as-is.
pub fn colorize(text: &str, color: Option<Color>, layer: ColorLayer) -> String {
    match color {
        Some(color) if !text.is_empty() => {
            let open = color.open_sequence(layer);
            let close = close_sequence(layer);
            let mut out = String::with_capacity(open.len() + text.len() + close.len());
            out.push_str(&open);
            out.push_str(text);
            out.push_str(close);
            out
        }
        _ => text.to_string(),
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        Self::Named(named)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parse `red`, `redBright`, `#ff8800`, `#f80`, `rgb(1, 2, 3)` or `ansi256(196)`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let trimmed = s.trim();

        if let Some(named) = NamedColor::from_name(trimmed) {
            return Ok(Self::Named(named));
        }

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return match hex.len() {
                6 => Ok(Self::Rgb(Rgb::from_u32(value))),
                3 => {
                    let expand = |nibble: u32| ((nibble & 0xF) * 0x11) as u8;
                    Ok(Self::Rgb(Rgb::new(
                        expand(value >> 8),
                        expand(value >> 4),
                        expand(value),
                    )))
                }
                _ => Err(invalid()),
            };
        }

        if let Some(args) = function_args(trimmed, "rgb") {
            let channels: Vec<u8> = args
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| invalid())?;
            return match channels.as_slice() {
                [r, g, b] => Ok(Self::Rgb(Rgb::new(*r, *g, *b))),
                _ => Err(invalid()),
            };
        }

        if let Some(args) = function_args(trimmed, "ansi256") {
            let index = args.trim().parse::<u8>().map_err(|_| invalid())?;
            return Ok(Self::Ansi256(index));
        }

        Err(invalid())
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}
