//! Block framing only. Payloads are returned as raw bytes and never
//! decoded back into elements.

use tplg_types::limits::MAGIC;
use tplg_types::WireFormat;

use crate::error::{PackError, PackResult};
use crate::header::BlockHeader;

/// A block as found in an encoded topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawBlock {
    pub offset: usize,
    pub header: BlockHeader,
    pub payload: Vec<u8>,
}

/// Split an encoded topology into its blocks.
pub fn split_blocks(data: &[u8]) -> PackResult<Vec<RawBlock>> {
    let mut blocks = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let corrupt = |reason: String| PackError::CorruptBlock { offset, reason };
        let header = BlockHeader::decode(&data[offset..])
            .ok_or_else(|| corrupt("truncated header".into()))?;
        if header.magic != MAGIC {
            return Err(corrupt(format!("bad magic {:#010x}", header.magic)));
        }
        if header.size as usize != BlockHeader::WIRE_SIZE {
            return Err(corrupt(format!("unexpected header size {}", header.size)));
        }
        let start = offset + BlockHeader::WIRE_SIZE;
        let end = start
            .checked_add(header.payload_size as usize)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| corrupt("payload runs past end of data".into()))?;

        blocks.push(RawBlock {
            offset,
            header,
            payload: data[start..end].to_vec(),
        });
        offset = end;
    }
    Ok(blocks)
}
