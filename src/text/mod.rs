//! Text module: everything that treats strings as terminal geometry.
//!
//! This module contains:
//! - [`ansi`]: escape-aware tokenizing, measuring and column slicing
//! - [`Color`]/[`Rgb`]: terminal colors and their SGR encodings
//! - [`TextStyle`]/[`Modifiers`]: SGR decoration pairs
//! - [`WidthCache`]: caller-owned LRU of text measurements
//! - [`wrap_text`]: word wrap and truncation

pub mod ansi;
mod color;
mod measure;
mod style;
mod wrap;

pub use ansi::{clip_text_content, clip_text_line, strip_ansi, visible_width, ClippedLine};
pub use color::{close_sequence, colorize, Color, ColorLayer, NamedColor, Rgb};
pub use measure::{measure_text, TextSize, WidthCache, DEFAULT_CACHE_CAPACITY};
pub use style::{
    apply_text_style, apply_text_style_with_reset, dim, Modifiers, TextStyle, DIM_OFF, DIM_ON,
    RESET,
};
pub use wrap::{wrap_text, TextWrap, ELLIPSIS};
