//! Fitting text into a column budget: word wrap or truncation.

use std::str::FromStr;

use crate::error::{Error, Result};

use super::ansi::{clip_text_line, visible_width};

/// Truncation marker.
pub const ELLIPSIS: &str = "…";

/// How text that is wider than its box is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextWrap {
    /// Break lines at word boundaries (long words are split).
    #[default]
    Wrap,
    /// Cut the end of each line and mark it with an ellipsis.
    TruncateEnd,
    /// Cut the start of each line.
    TruncateStart,
    /// Cut the middle of each line.
    TruncateMiddle,
}

impl FromStr for TextWrap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wrap" => Ok(Self::Wrap),
            "truncate" | "truncate-end" => Ok(Self::TruncateEnd),
            "truncate-start" => Ok(Self::TruncateStart),
            "truncate-middle" => Ok(Self::TruncateMiddle),
            other => Err(Error::UnknownValue {
                property: "textWrap",
                value: other.to_string(),
            }),
        }
    }
}

/// Fit every line of `text` into `width` columns.
///
/// Lines that already fit are untouched. A zero width yields an empty string.
pub fn wrap_text(text: &str, width: usize, mode: TextWrap) -> String {
    if width == 0 {
        return String::new();
    }

    match mode {
        TextWrap::Wrap => {
            let options = textwrap::Options::new(width).break_words(true);
            text.split('\n')
                .flat_map(|line| {
                    if visible_width(line) <= width {
                        vec![line.to_string()]
                    } else {
                        textwrap::wrap(line, &options)
                            .into_iter()
                            .map(std::borrow::Cow::into_owned)
                            .collect()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        _ => text
            .split('\n')
            .map(|line| truncate_line(line, width, mode))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn truncate_line(line: &str, width: usize, mode: TextWrap) -> String {
    let line_width = visible_width(line);
    if line_width <= width {
        return line.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }

    let keep = (width - 1) as i32;
    let total = line_width as i32;
    match mode {
        TextWrap::TruncateStart => {
            format!("{ELLIPSIS}{}", clip_text_line(line, 0, total - keep, keep))
        }
        TextWrap::TruncateMiddle => {
            let head = keep / 2 + keep % 2;
            let tail = keep / 2;
            format!(
                "{}{ELLIPSIS}{}",
                clip_text_line(line, 0, 0, head),
                clip_text_line(line, 0, total - tail, tail)
            )
        }
        _ => format!("{}{ELLIPSIS}", clip_text_line(line, 0, 0, keep)),
    }
}
