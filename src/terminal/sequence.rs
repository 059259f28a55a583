//! `SequenceBuffer`: cursor-control and frame bytes accumulated for one write.
//!
//! Everything a writer emits for a frame goes through one of these and is
//! handed to the terminal with a single `write_all`, so a partially drawn
//! frame is never visible.

use std::fmt;
use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveToColumn, MoveToNextLine, MoveToPreviousLine, MoveUp, Show};
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;

/// Pre-allocated byte buffer for terminal control sequences.
#[derive(Debug, Clone, Default)]
pub struct SequenceBuffer {
    data: Vec<u8>,
}

impl SequenceBuffer {
    /// Create a buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Accumulated bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the accumulated bytes, leaving the buffer empty.
    #[inline]
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Number of accumulated bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append frame text. Line feeds become CR LF so rows start at column 0
    /// whether or not the terminal translates output newlines.
    pub fn write_text(&mut self, text: &str) {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.data.extend_from_slice(first.as_bytes());
        }
        for line in lines {
            self.newline();
            self.data.extend_from_slice(line.as_bytes());
        }
    }

    /// CR LF: next row, column 0, scrolling at the bottom of the screen.
    #[inline]
    pub fn newline(&mut self) {
        self.data.extend_from_slice(b"\r\n");
    }

    /// Hide the cursor (`?25l`).
    #[inline]
    pub fn hide_cursor(&mut self) {
        self.queue(Hide);
    }

    /// Show the cursor (`?25h`).
    #[inline]
    pub fn show_cursor(&mut self) {
        self.queue(Show);
    }

    /// Erase the cursor's row (`2K`).
    #[inline]
    pub fn erase_line(&mut self) {
        self.queue(Clear(ClearType::CurrentLine));
    }

    /// Move up `lines` rows, keeping the column. Zero is a no-op.
    pub fn cursor_up(&mut self, lines: usize) {
        if lines > 0 {
            self.queue(MoveUp(clamp_u16(lines)));
        }
    }

    /// Move to a 0-based column of the cursor's row.
    #[inline]
    pub fn cursor_to_column(&mut self, column: u16) {
        self.queue(MoveToColumn(column));
    }

    /// Move `delta` rows down (positive) or up (negative), landing on column 0.
    ///
    /// Only moves through rows that already exist on screen; use
    /// [`newline`](Self::newline) to grow past the bottom.
    pub fn cursor_to_line_offset(&mut self, delta: isize) {
        match delta {
            0 => self.cursor_to_column(0),
            d if d > 0 => {
                self.queue(MoveToNextLine(clamp_u16(d.unsigned_abs())));
            }
            d => {
                self.queue(MoveToPreviousLine(clamp_u16(d.unsigned_abs())));
            }
        }
    }

    /// Erase `count` rows ending at the cursor's row, leaving the cursor at
    /// column 0 of the topmost erased row.
    pub fn erase_lines(&mut self, count: usize) {
        for index in 0..count {
            self.erase_line();
            if index + 1 < count {
                self.cursor_up(1);
            }
        }
        if count > 0 {
            self.cursor_to_column(0);
        }
    }

    /// Append a crossterm command's ANSI encoding.
    fn queue(&mut self, command: impl Command) {
        command.write_ansi(self).ok();
    }

    /// Write everything to `writer` in one call and flush it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if !self.data.is_empty() {
            writer.write_all(&self.data)?;
        }
        writer.flush()
    }
}

/// Appending to the byte buffer never fails.
impl fmt::Write for SequenceBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.data.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[inline]
fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
