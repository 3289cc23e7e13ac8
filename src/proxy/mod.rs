//! Byte pumps between the invoking terminal and the PTY master.

mod input;
mod output;

pub use input::{InputProxy, CHUNK_SIZE};
pub use output::forward_output;
