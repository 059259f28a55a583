//! `TerminalWriter`: puts frames on an inline terminal region.
//!
//! The writer remembers the last frame it drew and where the cursor was
//! left (column 0 of the row below the frame). Each new frame replaces the
//! old one in place, either by erasing and rewriting it all
//! ([`WriteMode::Standard`]) or by patching only the rows that changed
//! ([`WriteMode::Incremental`]).

use std::io::Write;
use std::str::FromStr;

use crate::error::{Error, Result};

use super::diff::{diff_output, generate_incremental_update, DiffConfig};
use super::sequence::SequenceBuffer;

/// How a new frame replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum WriteMode {
    /// Erase every previous row and write the frame again.
    #[default]
    Standard,
    /// Rewrite only rows that differ, falling back to a full rewrite when
    /// most rows changed.
    Incremental,
}

impl FromStr for WriteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(Self::Standard),
            "incremental" => Ok(Self::Incremental),
            other => Err(Error::UnknownValue {
                property: "write mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for a [`TerminalWriter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriterConfig {
    /// Replacement policy.
    pub mode: WriteMode,
    /// Hide the cursor on the first write and show it again on `done()`.
    pub hide_cursor: bool,
    /// Threshold for falling back to a full rewrite in incremental mode.
    pub diff: DiffConfig,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            mode: WriteMode::Standard,
            hide_cursor: true,
            diff: DiffConfig::default(),
        }
    }
}

/// Writes successive frames over each other.
///
/// Every call emits at most one `write_all` followed by one flush.
pub struct TerminalWriter<W: Write> {
    out: W,
    config: WriterConfig,
    sequence: SequenceBuffer,
    previous: String,
    /// Rows of the previous frame; zero when nothing is on screen.
    previous_height: usize,
    cursor_hidden: bool,
}

impl<W: Write> TerminalWriter<W> {
    /// Create a writer with default configuration.
    pub fn new(out: W) -> Self {
        Self::with_config(out, WriterConfig::default())
    }

    /// Create a writer with custom configuration.
    pub fn with_config(out: W, config: WriterConfig) -> Self {
        Self {
            out,
            config,
            sequence: SequenceBuffer::with_capacity(4096),
            previous: String::new(),
            previous_height: 0,
            cursor_hidden: false,
        }
    }

    /// Replace the previous frame with `frame`.
    ///
    /// A frame identical to the previous one writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write_frame(&mut self, frame: &str) -> Result<()> {
        if self.previous_height > 0 && frame == self.previous {
            tracing::trace!("frame unchanged, skipping write");
            return Ok(());
        }

        self.sequence.clear();
        if self.config.hide_cursor && !self.cursor_hidden {
            self.sequence.hide_cursor();
            self.cursor_hidden = true;
        }

        match self.config.mode {
            WriteMode::Standard => self.rewrite(frame),
            WriteMode::Incremental => self.patch(frame),
        }

        self.previous.clear();
        self.previous.push_str(frame);
        self.previous_height = frame.split('\n').count();
        self.flush()
    }

    /// Erase the previous frame from the screen and forget it.
    ///
    /// Calling it again, or before any frame was written, does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn clear(&mut self) -> Result<()> {
        if self.previous_height == 0 {
            return Ok(());
        }
        self.sequence.clear();
        self.sequence.erase_lines(self.previous_height + 1);
        self.forget();
        self.flush()
    }

    /// Finish the current region: the last frame stays on screen, the cursor
    /// is shown again, and the next frame starts below.
    ///
    /// Calling it again does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn done(&mut self) -> Result<()> {
        self.forget();
        if !self.cursor_hidden {
            return Ok(());
        }
        self.sequence.clear();
        self.sequence.show_cursor();
        self.cursor_hidden = false;
        self.flush()
    }

    /// The last frame written, empty after `clear()` or `done()`.
    pub fn previous_output(&self) -> &str {
        &self.previous
    }

    /// Configuration in use.
    pub const fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// The underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn rewrite(&mut self, frame: &str) {
        if self.previous_height > 0 {
            self.sequence.erase_lines(self.previous_height + 1);
        }
        self.sequence.write_text(frame);
        self.sequence.newline();
    }

    fn patch(&mut self, frame: &str) {
        if self.previous_height == 0 {
            self.rewrite(frame);
            return;
        }

        let diff = diff_output(&self.previous, frame, &self.config.diff);
        let update = generate_incremental_update(self.previous_height, &diff);
        tracing::debug!(
            changed = diff.changes.len(),
            added = diff.added_lines.len(),
            removed = diff.removed_count,
            full_rewrite = update.is_empty(),
            "incremental frame diff"
        );

        if update.is_empty() {
            self.rewrite(frame);
        } else {
            self.sequence.write_raw(&update);
        }
    }

    fn forget(&mut self) {
        self.previous.clear();
        self.previous_height = 0;
    }

    fn flush(&mut self) -> Result<()> {
        self.sequence.flush_to(&mut self.out)?;
        self.sequence.clear();
        Ok(())
    }
}
