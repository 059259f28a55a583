//! OutputBuffer: the grid every paint operation funnels through.
//!
//! Cells are stored in a contiguous `Vec` in row-major order. Writes are
//! clipped against the innermost entry of the clip stack, then laid down
//! cell by cell; later writes overwrite earlier ones.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::text::ansi::{clip_text_line, is_sgr, tokenize, visible_width, SgrState, Token};
use crate::text::RESET;

use super::cell::Cell;
use super::clip::{Clip, ClipGuard};

/// A line transformer: receives a clipped line and its index within the
/// written text, returns the replacement.
pub type LineTransformer<'a> = &'a dyn Fn(&str, usize) -> String;

/// Options for [`OutputBuffer::write`].
#[derive(Default)]
pub struct WriteOptions<'a> {
    /// Applied in order to each line after clipping.
    pub transformers: Vec<LineTransformer<'a>>,
}

impl std::fmt::Debug for WriteOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteOptions")
            .field("transformers", &self.transformers.len())
            .finish()
    }
}

/// A width×height grid of cells with a LIFO clip stack.
///
/// Built fresh for every frame and discarded after serialization.
#[derive(Clone)]
pub struct OutputBuffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    clips: Vec<Clip>,
}

impl OutputBuffer {
    /// Create a buffer of blank cells.
    ///
    /// # Errors
    /// [`Error::InvalidDimensions`] if either side exceeds the `i32` range or
    /// the cell count overflows.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let invalid = || Error::InvalidDimensions { width, height };
        i32::try_from(width).map_err(|_| invalid())?;
        i32::try_from(height).map_err(|_| invalid())?;
        let size = width.checked_mul(height).ok_or_else(invalid)?;

        Ok(Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
            clips: Vec::new(),
        })
    }

    /// Buffer width in columns.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Convert (x, y) coordinates to a linear index.
    #[inline]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Get the cell at (x, y).
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Push a clip; writes consult only the innermost one.
    pub fn push_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// Pop the innermost clip.
    pub fn pop_clip(&mut self) -> Option<Clip> {
        self.clips.pop()
    }

    /// Push a clip and return a guard that pops it on drop.
    pub fn clipped(&mut self, clip: Clip) -> ClipGuard<'_> {
        ClipGuard::new(self, clip)
    }

    /// The innermost active clip.
    #[inline]
    pub fn clip(&self) -> Option<&Clip> {
        self.clips.last()
    }

    /// Number of clips currently pushed.
    #[inline]
    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    /// Write `text` with its first line starting at `(x, y)`.
    ///
    /// Each line is skipped if it falls wholly outside the active clip and
    /// sliced to the clip otherwise; transformers then run in order and the
    /// result is laid down cell by cell.
    pub fn write(&mut self, x: i32, y: i32, text: &str, options: &WriteOptions<'_>) {
        if text.is_empty() {
            return;
        }
        let clip = self.clip().copied();

        for (index, line) in text.split('\n').enumerate() {
            let row = y + index as i32;
            let mut line_x = x;
            let mut line = Cow::Borrowed(line);

            if let Some(clip) = clip {
                if !clip.contains_row(row) {
                    continue;
                }
                if clip.clips_horizontally() {
                    let width = visible_width(&line) as i32;
                    let Some((start, end)) = clip.visible_span(x, width) else {
                        continue;
                    };
                    if start != x || end != x + width {
                        line = Cow::Owned(clip_text_line(&line, x, start, end - start));
                        line_x = start;
                    }
                }
            }

            for transformer in &options.transformers {
                line = Cow::Owned(transformer(&line, index));
            }

            self.write_line(line_x, row, &line);
        }
    }

    /// Lay one line down cell by cell.
    fn write_line(&mut self, x: i32, y: i32, line: &str) {
        if y < 0 || y as usize >= self.height {
            return;
        }

        let mut state = SgrState::new();
        let mut style: Option<Arc<str>> = None;
        let mut escapes = String::new();
        let mut col = x;
        let mut last_written: Option<usize> = None;

        for token in tokenize(line) {
            match token {
                Token::Escape(seq) if is_sgr(seq) => {
                    state.apply(seq);
                    style = state.is_active().then(|| Arc::from(state.prefix()));
                }
                Token::Escape(seq) => escapes.push_str(seq),
                Token::Text { grapheme, width: 0 } => {
                    if let Some(index) = last_written {
                        self.cells[index].push_zero_width(grapheme);
                    }
                }
                Token::Text { grapheme, width } => {
                    let end = col + width as i32;
                    if col >= 0 && end as usize > self.width {
                        break;
                    }
                    if col >= 0 {
                        let cell = Cell::new(grapheme, width as u8)
                            .with_style(style.clone())
                            .with_escapes(&escapes);
                        escapes.clear();
                        last_written = self.put(col, y, cell);
                    }
                    col = end;
                }
            }
        }
    }

    /// Store a cell, keeping wide glyphs whole.
    ///
    /// Overwriting either half of a wide glyph blanks the other half.
    fn put(&mut self, x: i32, y: i32, cell: Cell) -> Option<usize> {
        let index = self.index_of(x, y)?;
        let width = usize::from(cell.display_width());

        for offset in 0..width.max(1) {
            let Some(target) = self.index_of(x + offset as i32, y) else {
                break;
            };
            if self.cells[target].is_wide_continuation() && offset == 0 {
                if let Some(primary) = self.index_of(x - 1, y) {
                    self.cells[primary].reset();
                }
            }
            if self.cells[target].is_wide() && (offset > 0 || width < 2) {
                if let Some(continuation) = self.index_of(x + offset as i32 + 1, y) {
                    self.cells[continuation].reset();
                }
            }
        }

        let style = cell.style_handle().cloned();
        self.cells[index] = cell;
        if width == 2 {
            if let Some(continuation) = self.index_of(x + 1, y) {
                self.cells[continuation] = Cell::wide_continuation(style);
            }
        }
        Some(index)
    }

    /// Serialize one row, right-trimmed, or `None` if out of range.
    pub fn row(&self, y: usize) -> Option<String> {
        if y >= self.height {
            return None;
        }
        let cells = &self.cells[y * self.width..(y + 1) * self.width];
        let used = cells
            .iter()
            .rposition(|cell| !cell.is_blank())
            .map_or(0, |last| last + 1);

        let mut out = String::with_capacity(used);
        let mut active: Option<&str> = None;
        for cell in &cells[..used] {
            if cell.is_wide_continuation() {
                continue;
            }
            if cell.style() != active {
                if active.is_some() {
                    out.push_str(RESET);
                }
                if let Some(style) = cell.style() {
                    out.push_str(style);
                }
                active = cell.style();
            }
            if let Some(escapes) = cell.escapes() {
                out.push_str(escapes);
            }
            out.push_str(cell.grapheme());
        }
        if active.is_some() {
            out.push_str(RESET);
        }
        Some(out)
    }

    /// Every row serialized, right-trimmed, joined by newlines.
    pub fn content(&self) -> String {
        (0..self.height)
            .filter_map(|y| self.row(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Rows up to and including the last one that holds anything but
    /// plain spaces.
    pub fn content_height(&self) -> usize {
        if self.width == 0 {
            return 0;
        }
        self.cells
            .chunks(self.width)
            .rposition(|row| row.iter().any(|cell| !cell.is_blank()))
            .map_or(0, |last| last + 1)
    }
}

impl std::fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("clips", &self.clips)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(buffer: &mut OutputBuffer, x: i32, y: i32, text: &str) {
        buffer.write(x, y, text, &WriteOptions::default());
    }

    #[test]
    fn test_buffer_creation() {
        let buffer = OutputBuffer::new(80, 24).unwrap();
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.get(0, 0), Some(&Cell::EMPTY));
        assert_eq!(buffer.get(80, 0), None);
        assert_eq!(buffer.get(-1, 0), None);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            OutputBuffer::new(usize::MAX, 2),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_zero_sized_buffer() {
        let buffer = OutputBuffer::new(0, 0).unwrap();
        assert_eq!(buffer.content(), "");
        assert_eq!(buffer.content_height(), 0);
    }

    #[test]
    fn test_write_hello() {
        let mut buffer = OutputBuffer::new(10, 3).unwrap();
        write(&mut buffer, 0, 0, "Hello");
        assert_eq!(buffer.row(0).unwrap(), "Hello");
        assert_eq!(buffer.content(), "Hello\n\n");
        assert_eq!(buffer.content_height(), 1);
    }

    #[test]
    fn test_write_multiline() {
        let mut buffer = OutputBuffer::new(5, 3).unwrap();
        write(&mut buffer, 1, 1, "ab\ncd");
        assert_eq!(buffer.content(), "\n ab\n cd");
        assert_eq!(buffer.content_height(), 3);
    }

    #[test]
    fn test_later_write_wins() {
        let mut buffer = OutputBuffer::new(6, 1).unwrap();
        write(&mut buffer, 0, 0, "aaaaaa");
        write(&mut buffer, 2, 0, "bb");
        assert_eq!(buffer.content(), "aabbaa");
    }

    #[test]
    fn test_write_is_idempotent() {
        let mut buffer = OutputBuffer::new(8, 1).unwrap();
        write(&mut buffer, 1, 0, "\x1b[31mred\x1b[39m");
        let once = buffer.content();
        write(&mut buffer, 1, 0, "\x1b[31mred\x1b[39m");
        assert_eq!(buffer.content(), once);
    }

    #[test]
    fn test_styled_run_gets_trailing_reset() {
        let mut buffer = OutputBuffer::new(10, 1).unwrap();
        write(&mut buffer, 0, 0, "\x1b[1mhi\x1b[22m there");
        assert_eq!(buffer.content(), "\x1b[1mhi\x1b[0m there");
    }

    #[test]
    fn test_combined_parameters_close_independently() {
        let mut buffer = OutputBuffer::new(10, 1).unwrap();
        write(&mut buffer, 0, 0, "\x1b[1;31mab\x1b[39mcd\x1b[22m");
        assert_eq!(buffer.get(2, 0).unwrap().style(), Some("\x1b[1m"));
        assert_eq!(
            buffer.content(),
            "\x1b[1m\x1b[31mab\x1b[0m\x1b[1mcd\x1b[0m"
        );

        let mut buffer = OutputBuffer::new(10, 1).unwrap();
        write(&mut buffer, 0, 0, "\x1b[0;1mab");
        assert_eq!(buffer.get(0, 0).unwrap().style(), Some("\x1b[1m"));
    }

    #[test]
    fn test_style_survives_overwrite_neighbour() {
        let mut buffer = OutputBuffer::new(6, 1).unwrap();
        write(&mut buffer, 0, 0, "\x1b[32mgreen\x1b[39m");
        write(&mut buffer, 2, 0, "X");
        assert_eq!(
            buffer.content(),
            "\x1b[32mgr\x1b[0mX\x1b[32men\x1b[0m"
        );
    }

    #[test]
    fn test_styled_spaces_are_not_trimmed() {
        let mut buffer = OutputBuffer::new(4, 2).unwrap();
        write(&mut buffer, 0, 1, "\x1b[41m  \x1b[49m");
        assert_eq!(buffer.row(1).unwrap(), "\x1b[41m  \x1b[0m");
        assert_eq!(buffer.content_height(), 2);
    }

    #[test]
    fn test_wide_glyph_occupies_two_columns() {
        let mut buffer = OutputBuffer::new(6, 1).unwrap();
        write(&mut buffer, 0, 0, "日本x");
        assert!(buffer.get(1, 0).unwrap().is_wide_continuation());
        assert_eq!(buffer.get(4, 0).unwrap().grapheme(), "x");
        assert_eq!(buffer.content(), "日本x");
    }

    #[test]
    fn test_overwriting_half_a_wide_glyph_blanks_the_other_half() {
        let mut buffer = OutputBuffer::new(4, 1).unwrap();
        write(&mut buffer, 0, 0, "日");
        write(&mut buffer, 1, 0, "x");
        assert_eq!(buffer.content(), " x");

        write(&mut buffer, 0, 0, "本");
        write(&mut buffer, 0, 0, "y");
        assert_eq!(buffer.content(), "y");
    }

    #[test]
    fn test_wide_glyph_at_right_edge_is_dropped() {
        let mut buffer = OutputBuffer::new(3, 1).unwrap();
        write(&mut buffer, 0, 0, "ab日");
        assert_eq!(buffer.content(), "ab");
    }

    #[test]
    fn test_negative_origin_without_clip() {
        let mut buffer = OutputBuffer::new(4, 2).unwrap();
        write(&mut buffer, -2, -1, "zz\nabcd");
        assert_eq!(buffer.content(), "cd\n");
    }

    #[test]
    fn test_clip_slices_horizontally() {
        let mut buffer = OutputBuffer::new(10, 1).unwrap();
        buffer.push_clip(Clip::new(2, 5, 0, 1));
        write(&mut buffer, 0, 0, "abcdefgh");
        buffer.pop_clip();
        assert_eq!(buffer.content(), "  cde");
    }

    #[test]
    fn test_clip_skips_rows() {
        let mut buffer = OutputBuffer::new(5, 3).unwrap();
        {
            let mut clipped = buffer.clipped(Clip {
                y1: Some(1),
                y2: Some(2),
                ..Clip::default()
            });
            clipped.write(0, 0, "a\nb\nc", &WriteOptions::default());
        }
        assert_eq!(buffer.content(), "\nb\n");
        assert_eq!(buffer.clip_depth(), 0);
    }

    #[test]
    fn test_only_innermost_clip_applies() {
        let mut buffer = OutputBuffer::new(10, 1).unwrap();
        buffer.push_clip(Clip::new(0, 2, 0, 1));
        buffer.push_clip(Clip::new(4, 8, 0, 1));
        write(&mut buffer, 0, 0, "0123456789");
        assert_eq!(buffer.content(), "    4567");
    }

    #[test]
    fn test_clip_reopens_style() {
        let mut buffer = OutputBuffer::new(10, 1).unwrap();
        buffer.push_clip(Clip::new(2, 10, 0, 1));
        write(&mut buffer, 0, 0, "\x1b[31mabcd\x1b[39m");
        assert_eq!(buffer.content(), "  \x1b[31mcd\x1b[0m");
    }

    #[test]
    fn test_transformers_run_in_order() {
        let mut buffer = OutputBuffer::new(12, 2).unwrap();
        let upper: LineTransformer<'_> = &|line: &str, _: usize| line.to_uppercase();
        let number: LineTransformer<'_> = &|line: &str, index: usize| format!("{index}:{line}");
        let options = WriteOptions {
            transformers: vec![upper, number],
        };
        buffer.write(0, 0, "ab\ncd", &options);
        assert_eq!(buffer.content(), "0:AB\n1:CD");
    }

    #[test]
    fn test_combining_mark_joins_previous_cell() {
        let mut buffer = OutputBuffer::new(4, 1).unwrap();
        write(&mut buffer, 0, 0, "e\u{301}x");
        assert_eq!(buffer.get(0, 0).unwrap().grapheme(), "e\u{301}");
        assert_eq!(buffer.get(1, 0).unwrap().grapheme(), "x");
    }

    #[test]
    fn test_non_sgr_escapes_attach_to_next_cell() {
        let mut buffer = OutputBuffer::new(4, 1).unwrap();
        write(&mut buffer, 0, 0, "\x1b]8;;http://a\x07ab");
        assert_eq!(buffer.get(0, 0).unwrap().escapes(), Some("\x1b]8;;http://a\x07"));
        assert_eq!(buffer.content(), "\x1b]8;;http://a\x07ab");
    }
}
