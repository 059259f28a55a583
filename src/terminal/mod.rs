//! Terminal module: frame diffing and in-place terminal output.

mod diff;
mod sequence;
mod writer;

pub use diff::{diff_output, generate_incremental_update, DiffConfig, DiffOutput};
pub use sequence::SequenceBuffer;
pub use writer::{TerminalWriter, WriteMode, WriterConfig};
