//! ANSI-aware string geometry.
//!
//! Strings reaching the compositor carry SGR escape sequences inline. This
//! module splits them into escapes and visible grapheme clusters, measures
//! their display width, and slices them by visible column while keeping the
//! SGR state at the cut intact.
//!
//! Recognised escape forms:
//! - CSI sequences: `ESC [` ... final byte (0x40-0x7E)
//! - OSC sequences: `ESC ]` ... BEL or ST (`ESC \`)
//! - DCS/PM/APC sequences: `ESC P`/`ESC ^`/`ESC _` ... ST
//! - Two-character sequences: `ESC` + single byte

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::layout::ClipRegion;
use crate::text::style::RESET;

/// One lexical unit of an ANSI-decorated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A complete escape sequence, including the leading `ESC`.
    Escape(&'a str),
    /// A grapheme cluster and its display width in columns (0, 1 or 2).
    Text {
        /// The grapheme cluster.
        grapheme: &'a str,
        /// Columns occupied on screen.
        width: usize,
    },
}

/// Split a string into escape sequences and grapheme clusters.
pub fn tokenize(s: &str) -> Vec<Token<'_>> {
    let bytes = s.as_bytes();
    let mut tokens = Vec::with_capacity(s.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == 0x1B {
            let end = escape_end(bytes, i);
            tokens.push(Token::Escape(&s[i..end]));
            i = end;
        } else {
            // ESC is single-byte ASCII, so splitting at ESC never breaks UTF-8.
            let start = i;
            while i < bytes.len() && bytes[i] != 0x1B {
                i += 1;
            }
            for grapheme in s[start..i].graphemes(true) {
                tokens.push(Token::Text {
                    grapheme,
                    width: grapheme_width(grapheme),
                });
            }
        }
    }

    tokens
}

/// Display width of a single grapheme cluster, capped at two columns.
#[inline]
pub fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme).min(2)
}

/// Byte index just past the escape sequence starting at `pos`.
fn escape_end(bytes: &[u8], pos: usize) -> usize {
    let next = pos + 1;
    if next >= bytes.len() {
        return bytes.len();
    }

    match bytes[next] {
        b'[' => csi_end(bytes, next + 1),
        b']' | b'P' | b'^' | b'_' => string_terminated_end(bytes, next + 1),
        _ => next + 1,
    }
}

/// CSI: parameter bytes, intermediate bytes, then one final byte.
fn csi_end(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if (0x40..=0x7E).contains(&b) {
            return i + 1;
        }
        if !(0x20..=0x7E).contains(&b) {
            return i;
        }
        i += 1;
    }
    bytes.len()
}

/// OSC/DCS/PM/APC: terminated by BEL or ST.
fn string_terminated_end(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            0x07 => return i + 1,
            0x1B if i + 1 < bytes.len() && bytes[i + 1] == b'\\' => return i + 2,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Strip every escape sequence from a string.
///
/// Borrows when the input has no `ESC` byte at all.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.as_bytes().contains(&0x1B) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    for token in tokenize(s) {
        if let Token::Text { grapheme, .. } = token {
            out.push_str(grapheme);
        }
    }
    Cow::Owned(out)
}

/// Visible width of a single line in terminal columns.
pub fn visible_width(s: &str) -> usize {
    if !s.as_bytes().contains(&0x1B) {
        return s.graphemes(true).map(grapheme_width).sum();
    }
    tokenize(s)
        .iter()
        .map(|token| match token {
            Token::Text { width, .. } => *width,
            Token::Escape(_) => 0,
        })
        .sum()
}

/// Whether an escape sequence is an SGR (`CSI ... m`) sequence.
#[inline]
pub fn is_sgr(seq: &str) -> bool {
    seq.starts_with("\x1b[") && seq.ends_with('m')
}

/// One independently tracked SGR attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Foreground,
    Background,
    UnderlineColor,
    /// A modifier keyed by the parameter that opens it (1 = bold, 3 = italic, ...).
    Modifier(u16),
}

/// Tracks which SGR attributes are open while scanning a string.
///
/// Every parameter of a sequence is applied in turn, so `ESC[1;31m` opens
/// bold and red separately and a later `ESC[39m` retires only the red.
/// Extended colors (`38;5;n`, `38;2;r;g;b` and the `48`/`58` forms) count as
/// one unit. Each open attribute keeps the sequence that re-opens it, in the
/// order attributes were first opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SgrState {
    open: Vec<(Attribute, String)>,
}

impl SgrState {
    /// Create an empty state (nothing open).
    pub const fn new() -> Self {
        Self { open: Vec::new() }
    }

    /// Feed one escape sequence. Non-SGR sequences are ignored.
    pub fn apply(&mut self, seq: &str) {
        if !is_sgr(seq) {
            return;
        }
        let params = &seq[2..seq.len() - 1];
        if params.is_empty() {
            self.open.clear();
            return;
        }

        let mut parts = params.split(';');
        while let Some(part) = parts.next() {
            let code = if part.is_empty() {
                0
            } else {
                match part.split(':').next().and_then(|p| p.parse::<u16>().ok()) {
                    Some(code) => code,
                    None => continue,
                }
            };

            match code {
                0 => self.open.clear(),
                38 | 48 | 58 => {
                    let mut unit = part.to_string();
                    // Colon forms carry their arguments inside the part.
                    if !part.contains(':') {
                        let arguments = match parts.next() {
                            Some(mode) => {
                                unit.push(';');
                                unit.push_str(mode);
                                match mode {
                                    "5" => 1,
                                    "2" => 3,
                                    _ => 0,
                                }
                            }
                            None => 0,
                        };
                        for argument in parts.by_ref().take(arguments) {
                            unit.push(';');
                            unit.push_str(argument);
                        }
                    }
                    let attribute = match code {
                        38 => Attribute::Foreground,
                        48 => Attribute::Background,
                        _ => Attribute::UnderlineColor,
                    };
                    self.set(attribute, &unit);
                }
                30..=37 | 90..=97 => self.set(Attribute::Foreground, part),
                40..=47 | 100..=107 => self.set(Attribute::Background, part),
                39 => self.unset(|attribute| attribute == Attribute::Foreground),
                49 => self.unset(|attribute| attribute == Attribute::Background),
                59 => self.unset(|attribute| attribute == Attribute::UnderlineColor),
                22 | 23 | 24 | 25 | 27 | 28 | 29 | 55 => self.unset(|attribute| {
                    matches!(attribute, Attribute::Modifier(open) if closing_param(open) == code)
                }),
                other => self.set(Attribute::Modifier(other), part),
            }
        }
    }

    fn set(&mut self, attribute: Attribute, params: &str) {
        let sequence = format!("\x1b[{params}m");
        match self.open.iter_mut().find(|(open, _)| *open == attribute) {
            Some(entry) => entry.1 = sequence,
            None => self.open.push((attribute, sequence)),
        }
    }

    fn unset(&mut self, closes: impl Fn(Attribute) -> bool) {
        self.open.retain(|(attribute, _)| !closes(*attribute));
    }

    /// Whether any attribute is currently open.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.open.is_empty()
    }

    /// The sequences needed to re-open the current state, in order.
    pub fn prefix(&self) -> String {
        self.open.iter().map(|(_, seq)| seq.as_str()).collect()
    }
}

/// The SGR parameter that turns a modifier off (0 = only a full reset).
const fn closing_param(open: u16) -> u16 {
    match open {
        1 | 2 => 22,
        3 => 23,
        4 | 21 => 24,
        5 | 6 => 25,
        7 => 27,
        8 => 28,
        9 => 29,
        53 => 55,
        _ => 0,
    }
}

/// Slice a line by visible column.
///
/// The line starts at screen column `line_offset`; the result keeps the
/// visible columns `[start, start + len)`. SGR state active at the left cut is
/// re-opened at the start of the slice, escapes inside the range are copied
/// through, and a reset is appended when a sequence is still open at the
/// right cut. A wide glyph straddling either cut is replaced by spaces for its
/// visible half so column alignment is preserved.
pub fn clip_text_line(text: &str, line_offset: i32, start: i32, len: i32) -> String {
    if len <= 0 {
        return String::new();
    }
    let from = i64::from(start) - i64::from(line_offset);
    let to = from + i64::from(len);

    let mut out = String::with_capacity(text.len());
    let mut state = SgrState::new();
    let mut col: i64 = 0;
    let mut started = false;

    for token in tokenize(text) {
        match token {
            Token::Escape(seq) => {
                if col >= to {
                    break;
                }
                if started {
                    out.push_str(seq);
                }
                state.apply(seq);
            }
            Token::Text { grapheme, width } => {
                let end = col + width as i64;
                let reaches_range = if width == 0 { col >= from } else { end > from };
                if !reaches_range {
                    col = end;
                    continue;
                }
                if col >= to {
                    break;
                }
                if !started {
                    out.push_str(&state.prefix());
                    started = true;
                }
                if col < from || end > to {
                    let visible = end.min(to) - col.max(from);
                    out.push_str(&" ".repeat(visible.max(0) as usize));
                } else {
                    out.push_str(grapheme);
                }
                col = end;
            }
        }
    }

    if started && state.is_active() {
        out.push_str(RESET);
    }
    out
}

/// A line that survived clipping, positioned on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClippedLine {
    /// Screen column where the clipped text begins.
    pub x: i32,
    /// Screen row of the line.
    pub y: i32,
    /// The clipped text, with SGR state re-opened and closed as needed.
    pub text: String,
}

/// Clip a block of lines whose first line starts at `(origin_x, origin_y)`.
///
/// Lines outside the region's vertical extent are dropped; the rest are
/// sliced horizontally with [`clip_text_line`]. Lines that end up with no
/// visible column are dropped too.
pub fn clip_text_content<S: AsRef<str>>(
    lines: &[S],
    origin_x: i32,
    origin_y: i32,
    region: &ClipRegion,
) -> Vec<ClippedLine> {
    let mut clipped = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let y = origin_y + index as i32;
        if y < region.y || y >= region.bottom() {
            continue;
        }

        let width = visible_width(line) as i32;
        let start = origin_x.max(region.x);
        let end = (origin_x + width).min(region.right());
        if end <= start {
            continue;
        }

        let text = if start == origin_x && end == origin_x + width {
            line.to_string()
        } else {
            clip_text_line(line, origin_x, start, end - start)
        };
        clipped.push(ClippedLine { x: start, y, text });
    }

    clipped
}

/// Make every line of a multi-line string self-contained.
///
/// SGR state open at the end of a line is closed there with a reset and
/// re-opened at the start of the next line, so lines can be clipped or
/// written independently without leaking or losing styling.
pub fn normalize_line_styles(text: &str) -> String {
    if !text.contains('\n') || !text.as_bytes().contains(&0x1B) {
        return text.to_string();
    }

    let mut state = SgrState::new();
    let mut out = String::with_capacity(text.len() + 16);

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&state.prefix());
        out.push_str(line);
        for token in tokenize(line) {
            if let Token::Escape(seq) = token {
                state.apply(seq);
            }
        }
        if state.is_active() {
            out.push_str(RESET);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain() {
        let tokens = tokenize("ab");
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            tokens[0],
            Token::Text {
                grapheme: "a",
                width: 1
            }
        );
    }

    #[test]
    fn test_tokenize_escape_and_wide() {
        let tokens = tokenize("\x1b[31m日\x1b[39m");
        assert_eq!(tokens[0], Token::Escape("\x1b[31m"));
        assert_eq!(
            tokens[1],
            Token::Text {
                grapheme: "日",
                width: 2
            }
        );
        assert_eq!(tokens[2], Token::Escape("\x1b[39m"));
    }

    #[test]
    fn test_strip_ansi_borrows_plain_text() {
        assert!(matches!(strip_ansi("hello"), Cow::Borrowed(_)));
        assert_eq!(strip_ansi("\x1b[1m\x1b[31mBold Red\x1b[0m normal"), "Bold Red normal");
    }

    #[test]
    fn test_strip_ansi_osc_hyperlink() {
        assert_eq!(
            strip_ansi("\x1b]8;;https://example.com\x07click\x1b]8;;\x07"),
            "click"
        );
    }

    #[test]
    fn test_visible_width() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width("\x1b[31mred\x1b[0m"), 3);
        assert_eq!(visible_width("你好"), 4);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn test_sgr_state_tracks_closes() {
        let mut state = SgrState::new();
        state.apply("\x1b[1m");
        state.apply("\x1b[31m");
        assert_eq!(state.prefix(), "\x1b[1m\x1b[31m");
        state.apply("\x1b[39m");
        assert_eq!(state.prefix(), "\x1b[1m");
        state.apply("\x1b[0m");
        assert!(!state.is_active());
    }

    #[test]
    fn test_sgr_state_splits_combined_parameters() {
        let mut state = SgrState::new();
        state.apply("\x1b[1;31m");
        assert_eq!(state.prefix(), "\x1b[1m\x1b[31m");
        state.apply("\x1b[39m");
        assert_eq!(state.prefix(), "\x1b[1m");
        state.apply("\x1b[22m");
        assert!(!state.is_active());
    }

    #[test]
    fn test_sgr_state_reset_then_open() {
        let mut state = SgrState::new();
        state.apply("\x1b[3m");
        state.apply("\x1b[0;1m");
        assert_eq!(state.prefix(), "\x1b[1m");
        state.apply("\x1b[;4m");
        assert_eq!(state.prefix(), "\x1b[4m");
    }

    #[test]
    fn test_sgr_state_extended_colors_are_one_unit() {
        let mut state = SgrState::new();
        state.apply("\x1b[38;5;208;1m");
        assert_eq!(state.prefix(), "\x1b[38;5;208m\x1b[1m");
        state.apply("\x1b[48;2;10;20;30m");
        state.apply("\x1b[32m");
        assert_eq!(state.prefix(), "\x1b[32m\x1b[1m\x1b[48;2;10;20;30m");
        state.apply("\x1b[49;22m");
        assert_eq!(state.prefix(), "\x1b[32m");
    }

    #[test]
    fn test_sgr_state_bold_and_dim_share_a_close() {
        let mut state = SgrState::new();
        state.apply("\x1b[1m");
        state.apply("\x1b[2m");
        state.apply("\x1b[4:3m");
        assert_eq!(state.prefix(), "\x1b[1m\x1b[2m\x1b[4:3m");
        state.apply("\x1b[22m");
        assert_eq!(state.prefix(), "\x1b[4:3m");
    }

    #[test]
    fn test_clip_text_line_plain() {
        assert_eq!(clip_text_line("Hello World", 0, 6, 5), "World");
        assert_eq!(clip_text_line("Hello", 0, 0, 3), "Hel");
        assert_eq!(clip_text_line("Hello", 10, 12, 2), "ll");
    }

    #[test]
    fn test_clip_text_line_empty_range() {
        assert_eq!(clip_text_line("Hello", 0, 0, 0), "");
        assert_eq!(clip_text_line("Hello", 0, 9, 3), "");
    }

    #[test]
    fn test_clip_text_line_reopens_style_at_cut() {
        let line = "\x1b[31mabcdef\x1b[39m";
        assert_eq!(clip_text_line(line, 0, 2, 2), "\x1b[31mcd\x1b[0m");
    }

    #[test]
    fn test_clip_text_line_reopens_only_open_attributes() {
        let line = "\x1b[1;31mab\x1b[39mcdef";
        assert_eq!(clip_text_line(line, 0, 3, 3), "\x1b[1mdef\x1b[0m");
        assert_eq!(clip_text_line(line, 0, 1, 1), "\x1b[1m\x1b[31mb\x1b[0m");
    }

    #[test]
    fn test_clip_text_line_closed_style_needs_no_reset() {
        let line = "\x1b[1mab\x1b[22mcd";
        assert_eq!(clip_text_line(line, 0, 2, 2), "cd");
    }

    #[test]
    fn test_clip_text_line_wide_glyph_straddling_cut() {
        // 日 spans columns 0-1; cutting at column 1 keeps one padding column.
        assert_eq!(clip_text_line("日本", 0, 1, 3), " 本");
        assert_eq!(clip_text_line("日本", 0, 0, 3), "日 ");
    }

    #[test]
    fn test_clip_text_content_drops_rows_outside() {
        let region = ClipRegion::new(0, 1, 3, 1);
        let lines = ["first", "second", "third"];
        let clipped = clip_text_content(&lines, 0, 0, &region);
        assert_eq!(
            clipped,
            vec![ClippedLine {
                x: 0,
                y: 1,
                text: "sec".to_string()
            }]
        );
    }

    #[test]
    fn test_clip_text_content_unconstrained_is_identity() {
        let lines = ["a", "bb"];
        let clipped = clip_text_content(&lines, 4, 2, &ClipRegion::UNCONSTRAINED);
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[1].text, "bb");
        assert_eq!(clipped[1].x, 4);
        assert_eq!(clipped[1].y, 3);
    }

    #[test]
    fn test_normalize_line_styles() {
        let text = "\x1b[32mone\ntwo\x1b[39m";
        assert_eq!(
            normalize_line_styles(text),
            "\x1b[32mone\x1b[0m\n\x1b[32mtwo\x1b[39m"
        );
    }
}
