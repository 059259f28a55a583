//! Line diff between consecutive frames.
//!
//! Frames are compared row by row. When most rows changed, the caller is
//! told to rewrite the whole frame instead; otherwise
//! [`generate_incremental_update`] produces the bytes that repaint only the
//! rows that differ.

use super::sequence::SequenceBuffer;

/// Configuration for [`diff_output`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffConfig {
    /// Fraction of changed rows above which a full rewrite is cheaper.
    pub full_rewrite_threshold: f64,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            full_rewrite_threshold: 0.5,
        }
    }
}

/// Row-level difference between two frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffOutput<'a> {
    /// Rows of the common prefix whose content changed, with their index.
    pub changes: Vec<(usize, &'a str)>,
    /// Rows the current frame has beyond the previous one.
    pub added_lines: Vec<&'a str>,
    /// Rows the previous frame had beyond the current one.
    pub removed_count: usize,
    /// Row count of the taller frame.
    pub total_lines: usize,
    /// Whether repainting everything beats patching rows.
    pub should_full_rewrite: bool,
}

impl DiffOutput<'_> {
    /// Whether the frames are identical.
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty() && self.added_lines.is_empty() && self.removed_count == 0
    }
}

/// Compare two frames row by row.
///
/// An empty previous frame always asks for a full rewrite, with every
/// current row reported as a change.
#[allow(clippy::cast_precision_loss)]
pub fn diff_output<'a>(previous: &str, current: &'a str, config: &DiffConfig) -> DiffOutput<'a> {
    let current_lines: Vec<&'a str> = current.split('\n').collect();

    if previous.is_empty() {
        return DiffOutput {
            total_lines: current_lines.len(),
            changes: current_lines.into_iter().enumerate().collect(),
            added_lines: Vec::new(),
            removed_count: 0,
            should_full_rewrite: true,
        };
    }

    let previous_lines: Vec<&str> = previous.split('\n').collect();
    let common = previous_lines.len().min(current_lines.len());

    let changes: Vec<(usize, &'a str)> = current_lines[..common]
        .iter()
        .zip(&previous_lines[..common])
        .enumerate()
        .filter(|(_, (current, previous))| current != previous)
        .map(|(index, (current, _))| (index, *current))
        .collect();
    let added_lines = current_lines[common..].to_vec();
    let removed_count = previous_lines.len().saturating_sub(current_lines.len());
    let total_lines = previous_lines.len().max(current_lines.len());

    let touched = changes.len() + added_lines.len() + removed_count;
    let should_full_rewrite = touched as f64 / total_lines as f64 > config.full_rewrite_threshold;

    DiffOutput {
        changes,
        added_lines,
        removed_count,
        total_lines,
        should_full_rewrite,
    }
}

/// Bytes that turn the previous frame into the current one in place.
///
/// The cursor is expected at column 0 of the row just below the previous
/// frame (`previous_height` rows tall) and is left at column 0 of the row
/// just below the current frame. Changed rows are erased and rewritten,
/// rows the frame lost are erased, and new rows are appended below.
///
/// Returns an empty vector when the diff asks for a full rewrite or there
/// is no previous frame; the caller must then repaint everything.
pub fn generate_incremental_update(previous_height: usize, diff: &DiffOutput<'_>) -> Vec<u8> {
    if diff.should_full_rewrite || previous_height == 0 {
        return Vec::new();
    }

    let mut out = SequenceBuffer::default();
    let mut cursor = RowCursor::default();

    out.cursor_up(previous_height);
    out.cursor_to_column(0);

    for &(row, line) in &diff.changes {
        cursor.move_to(&mut out, row);
        out.erase_line();
        out.write_raw(line.as_bytes());
        out.cursor_to_column(0);
    }

    let current_height = (previous_height + diff.added_lines.len()).saturating_sub(diff.removed_count);
    for row in current_height..previous_height {
        cursor.move_to(&mut out, row);
        out.erase_line();
    }

    if diff.added_lines.is_empty() {
        cursor.move_to(&mut out, current_height);
    } else {
        cursor.move_to(&mut out, previous_height - 1);
        for line in &diff.added_lines {
            out.newline();
            out.erase_line();
            out.write_raw(line.as_bytes());
        }
        out.newline();
    }

    out.take()
}

/// Tracks the row the cursor sits on, relative to the top of the frame.
#[derive(Debug, Default)]
struct RowCursor {
    row: usize,
}

impl RowCursor {
    #[allow(clippy::cast_possible_wrap)]
    fn move_to(&mut self, out: &mut SequenceBuffer, row: usize) {
        let delta = row as isize - self.row as isize;
        out.cursor_to_line_offset(delta);
        self.row = row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(previous: &str, current: &str) -> String {
        let diff = diff_output(previous, current, &DiffConfig::default());
        let bytes = generate_incremental_update(previous.split('\n').count(), &diff);
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_identical_frames() {
        let diff = diff_output("a\nb", "a\nb", &DiffConfig::default());
        assert!(diff.is_unchanged());
        assert!(!diff.should_full_rewrite);
        assert_eq!(diff.total_lines, 2);
    }

    #[test]
    fn test_empty_previous_is_full_rewrite() {
        let diff = diff_output("", "x\ny", &DiffConfig::default());
        assert!(diff.should_full_rewrite);
        assert_eq!(diff.changes, vec![(0, "x"), (1, "y")]);
        assert!(generate_incremental_update(0, &diff).is_empty());
    }

    #[test]
    fn test_everything_changed() {
        let diff = diff_output("A\nB\nC\nD", "1\n2\n3\n4", &DiffConfig::default());
        assert_eq!(diff.changes.len(), 4);
        assert!(diff.should_full_rewrite);
        assert!(generate_incremental_update(4, &diff).is_empty());
    }

    #[test]
    fn test_growth_and_shrink_counts() {
        let grown = diff_output("a\nb", "a\nb\nc\nd", &DiffConfig::default());
        assert_eq!(grown.added_lines, vec!["c", "d"]);
        assert_eq!(grown.removed_count, 0);
        assert_eq!(grown.total_lines, 4);
        assert!(!grown.should_full_rewrite);

        let shrunk = diff_output("a\nb\nc\nd", "a\nb\nc", &DiffConfig::default());
        assert!(shrunk.added_lines.is_empty());
        assert_eq!(shrunk.removed_count, 1);
        assert!(!shrunk.should_full_rewrite);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let strict = DiffConfig {
            full_rewrite_threshold: 0.1,
        };
        let diff = diff_output("a\nb\nc\nd", "a\nb\nc\nX", &strict);
        assert!(diff.should_full_rewrite);
        assert!(!diff_output("a\nb\nc\nd", "a\nb\nc\nX", &DiffConfig::default()).should_full_rewrite);
    }

    #[test]
    fn test_update_rewrites_changed_row() {
        assert_eq!(
            update("a\nb\nc\nd", "a\nB\nc\nd"),
            "\x1b[4A\x1b[1G\x1b[1E\x1b[2KB\x1b[1G\x1b[3E"
        );
    }

    #[test]
    fn test_update_erases_removed_rows() {
        assert_eq!(
            update("a\nb\nc", "a\nb"),
            "\x1b[3A\x1b[1G\x1b[2E\x1b[2K\x1b[1G"
        );
    }

    #[test]
    fn test_update_appends_rows() {
        assert_eq!(
            update("a\nb", "a\nb\nc"),
            "\x1b[2A\x1b[1G\x1b[1E\r\n\x1b[2Kc\r\n"
        );
    }
}
