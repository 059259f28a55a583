//! # Trellis
//!
//! The rendering core of an inline terminal UI: flexbox layout, clipped
//! cell compositing and flicker-free incremental output.
//!
//! A frame goes through four stages:
//!
//! - **Layout**: a [`NodeRegistry`] tree is measured bottom-up and placed
//!   top-down with a flexbox engine ([`compute_tree_layout`])
//! - **Paint**: backgrounds, borders and styled text are written into an
//!   [`OutputBuffer`] in document order, last write wins, clipped by
//!   `overflow: hidden` ancestors ([`render_tree`])
//! - **Serialize**: the buffer becomes one string, rows joined by `\n`
//! - **Write**: a [`TerminalWriter`] replaces the previous frame on screen,
//!   optionally patching only the rows that changed
//!
//! Nothing but the text measurement cache and the writer's last frame
//! outlives a render pass.
//!
//! ## Example
//!
//! ```rust
//! use trellis::{Border, BorderStyle, NodeRegistry, Renderer, Style, TerminalWriter};
//!
//! let mut registry = NodeRegistry::new();
//! let root = registry.add_root(Style::default().column());
//! let panel = registry.add_box(root, Style::default().border(Border::new(BorderStyle::Round)));
//! registry.add_text(panel, Style::default(), "hello");
//!
//! let mut renderer = Renderer::default();
//! let frame = renderer.render(&registry, root, 20).unwrap();
//! assert_eq!(frame.height, 3);
//!
//! let mut writer = TerminalWriter::new(Vec::new());
//! writer.write_frame(&frame.output).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod error;
pub mod layout;
pub mod render;
pub mod terminal;
pub mod text;

// Re-exports for convenience
pub use buffer::{Cell, CellFlags, Clip, ClipGuard, OutputBuffer, WriteOptions};
pub use error::{Error, Result};
pub use layout::{
    compute_clip_region, compute_flex_layout, compute_tree_layout, intersect_clip_regions,
    ClipRegion, Edges, FlexContainer, FlexItem, LayoutMap, Rect,
};
pub use render::{
    render_background, render_border, render_tree, Border, BorderStyle, Frame, Node, NodeId,
    NodeKind, NodeRegistry, Renderer, RendererConfig, Style,
};
pub use terminal::{diff_output, generate_incremental_update, DiffConfig, TerminalWriter, WriteMode, WriterConfig};
pub use text::{Color, TextStyle, WidthCache};
