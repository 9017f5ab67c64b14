//! Binary emission for the audio topology compiler.
//!
//! A built session is written as a flat sequence of blocks. Each block is a
//! 36-byte [`BlockHeader`] (magic, ABI version, element version, block type,
//! header size, vendor type, payload size, index, count) followed by the
//! element's payload: its fixed header and then its tail. All integers are
//! little-endian.
//!
//! Output goes through an [`OutputSink`], so a failed run never leaves a
//! partial file at the destination.

pub mod error;
pub mod header;
pub mod reader;
pub mod sink;
pub mod writer;

pub use error::{PackError, PackResult};
pub use header::BlockHeader;
pub use reader::{split_blocks, RawBlock};
pub use sink::OutputSink;
pub use writer::{Block, TopologyWriter};
