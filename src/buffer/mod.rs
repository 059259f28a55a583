//! Buffer module: the per-frame cell grid.
//!
//! This module contains:
//! - [`Cell`]: one grid position with its grapheme and style
//! - [`OutputBuffer`]: a grid of cells with a clip stack
//! - [`Clip`]/[`ClipGuard`]: clip rectangles and their scoped push/pop

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
mod clip;

pub use buffer::{LineTransformer, OutputBuffer, WriteOptions};
pub use cell::{Cell, CellFlags};
pub use clip::{Clip, ClipGuard};
