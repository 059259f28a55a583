//! Render module: node tree, painters and the frame renderer.
//!
//! The tree lives in a flat [`NodeRegistry`] keyed by [`NodeId`]; children
//! are resolved by id, so the owner can mutate the tree freely between
//! frames. Painting is last-write-wins in document order.

mod background;
mod border;
mod node;
mod renderer;
mod style;
mod text;
mod walker;

pub use background::render_background;
pub use border::{render_border, Border, BorderCharset, BorderSide, BorderStyle};
pub use node::{Node, NodeId, NodeKind, NodeRegistry};
pub use renderer::{Frame, Renderer, RendererConfig};
pub use style::{Dimension, Display, OutputTransform, Position, Style};
pub use text::{squash_text_nodes, text_content};
pub use walker::render_tree;
