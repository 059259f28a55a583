//! Render Demo: streams text into a bordered panel below the prompt.
//!
//! Each token triggers a full layout and paint; the incremental writer only
//! rewrites the rows that changed. Run with `RUST_LOG=trellis=debug` to see
//! the per-frame diff decisions on stderr.

use std::io;
use std::time::Duration;

use trellis::layout::Edges;
use trellis::render::{Border, BorderStyle, NodeId, NodeRegistry, Renderer, Style};
use trellis::terminal::{TerminalWriter, WriteMode, WriterConfig};
use trellis::text::{Color, Modifiers, NamedColor, TextStyle};
use tracing_subscriber::{fmt, EnvFilter};

/// Sample text to stream, one word per frame.
const SAMPLE_TEXT: &str = "Layout is recomputed from scratch every frame, painted into a \
fresh cell buffer in document order, and only the rows that differ from the last frame \
are sent to the terminal. Wide glyphs like 漢字 keep their two columns, and styled runs \
never leak their colors past the edge of the panel.";

fn build_tree(streamed: &str, tokens: usize) -> (NodeRegistry, NodeId) {
    let mut registry = NodeRegistry::new();
    let root = registry.add_root(Style::default().column());

    let title = Style::default().text(
        TextStyle::default()
            .with_color(Color::Named(NamedColor::Cyan))
            .with_modifiers(Modifiers::BOLD),
    );
    registry.add_text(root, title, "trellis render demo");

    let panel = Style::default()
        .border(Border::new(BorderStyle::Round).with_color(Color::Named(NamedColor::Gray)))
        .padding(Edges::new(0, 1, 0, 1));
    let panel = registry.add_box(root, panel);
    registry.add_text(panel, Style::default().grow(1.0), streamed);

    let footer = Style::default().text(TextStyle::default().with_modifiers(Modifiers::DIM));
    registry.add_text(root, footer, format!("{tokens} tokens"));

    (registry, root)
}

fn main() -> trellis::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let width = crossterm::terminal::size().map_or(80, |(columns, _)| columns.min(72));
    let mut renderer = Renderer::default();
    let mut writer = TerminalWriter::with_config(
        io::stdout(),
        WriterConfig {
            mode: WriteMode::Incremental,
            ..WriterConfig::default()
        },
    );

    let mut streamed = String::new();
    for (index, word) in SAMPLE_TEXT.split(' ').enumerate() {
        if !streamed.is_empty() {
            streamed.push(' ');
        }
        streamed.push_str(word);

        let (registry, root) = build_tree(&streamed, index + 1);
        let frame = renderer.render(&registry, root, width)?;
        writer.write_frame(&frame.output)?;
        std::thread::sleep(Duration::from_millis(60));
    }

    writer.done()?;
    Ok(())
}
