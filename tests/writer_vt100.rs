//! End-to-end checks of the terminal writer against an emulated screen.

use trellis::render::{NodeRegistry, Renderer, Style};
use trellis::terminal::{TerminalWriter, WriteMode, WriterConfig};
use trellis::text::{Modifiers, TextStyle};

const ROWS: u16 = 12;
const COLS: u16 = 30;

struct Screen {
    parser: vt100::Parser,
    consumed: usize,
}

impl Screen {
    fn new() -> Self {
        Self {
            parser: vt100::Parser::new(ROWS, COLS, 0),
            consumed: 0,
        }
    }

    /// Feed whatever the writer produced since the last sync.
    fn sync(&mut self, writer: &TerminalWriter<Vec<u8>>) {
        let bytes = writer.get_ref();
        self.parser.process(&bytes[self.consumed..]);
        self.consumed = bytes.len();
    }

    fn rows(&self) -> Vec<String> {
        self.parser
            .screen()
            .rows(0, COLS)
            .map(|row| row.trim_end().to_string())
            .collect()
    }

    fn top(&self, count: usize) -> Vec<String> {
        self.rows().into_iter().take(count).collect()
    }

    fn cursor(&self) -> (u16, u16) {
        self.parser.screen().cursor_position()
    }
}

fn writer(mode: WriteMode) -> TerminalWriter<Vec<u8>> {
    TerminalWriter::with_config(
        Vec::new(),
        WriterConfig {
            mode,
            ..WriterConfig::default()
        },
    )
}

#[test]
fn test_standard_replaces_frame_in_place() {
    let mut screen = Screen::new();
    let mut writer = writer(WriteMode::Standard);

    writer.write_frame("hello\nworld").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(3), ["hello", "world", ""]);
    assert_eq!(screen.cursor(), (2, 0));
    assert!(screen.parser.screen().hide_cursor());

    writer.write_frame("hi").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(3), ["hi", "", ""]);
    assert_eq!(screen.cursor(), (1, 0));

    writer.done().unwrap();
    screen.sync(&writer);
    assert!(!screen.parser.screen().hide_cursor());
}

#[test]
fn test_incremental_tracks_growth_and_shrink() {
    let mut screen = Screen::new();
    let mut writer = writer(WriteMode::Incremental);

    writer.write_frame("a\nb\nc\nd").unwrap();
    writer.write_frame("a\nB\nc\nd").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(5), ["a", "B", "c", "d", ""]);
    assert_eq!(screen.cursor(), (4, 0));

    writer.write_frame("a\nB\nc\nd\ne").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(6), ["a", "B", "c", "d", "e", ""]);
    assert_eq!(screen.cursor(), (5, 0));

    writer.write_frame("a\nB").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(6), ["a", "B", "", "", "", ""]);
    assert_eq!(screen.cursor(), (2, 0));

    writer.write_frame("a").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(3), ["a", "", ""]);
    assert_eq!(screen.cursor(), (1, 0));
}

#[test]
fn test_trailing_newline_transitions() {
    let mut screen = Screen::new();
    let mut writer = writer(WriteMode::Incremental);

    writer.write_frame("x\ny\nz").unwrap();
    writer.write_frame("x\ny\nz\n").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(4), ["x", "y", "z", ""]);
    assert_eq!(screen.cursor(), (4, 0));

    writer.write_frame("x\ny\nz").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(4), ["x", "y", "z", ""]);
    assert_eq!(screen.cursor(), (3, 0));
}

#[test]
fn test_clear_erases_and_done_keeps_frame() {
    let mut screen = Screen::new();
    let mut writer = writer(WriteMode::Standard);

    writer.write_frame("gone").unwrap();
    writer.clear().unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(1), [""]);
    assert_eq!(screen.cursor(), (0, 0));

    writer.write_frame("one").unwrap();
    writer.done().unwrap();
    writer.write_frame("two").unwrap();
    screen.sync(&writer);
    assert_eq!(screen.top(3), ["one", "two", ""]);
}

#[test]
fn test_rendered_frame_keeps_styles() {
    let mut registry = NodeRegistry::new();
    let root = registry.add_root(Style::default().column());
    let bold = Style::default().text(TextStyle::default().with_modifiers(Modifiers::BOLD));
    registry.add_text(root, bold, "loud");
    registry.add_text(root, Style::default(), "quiet");

    let frame = Renderer::default().render(&registry, root, COLS).unwrap();
    let mut screen = Screen::new();
    let mut writer = writer(WriteMode::Incremental);
    writer.write_frame(&frame.output).unwrap();
    screen.sync(&writer);

    assert_eq!(screen.top(2), ["loud", "quiet"]);
    let vt = screen.parser.screen();
    assert!(vt.cell(0, 0).unwrap().bold());
    assert!(!vt.cell(1, 0).unwrap().bold());
}
