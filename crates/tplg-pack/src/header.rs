use bytes::{Buf, BufMut};
use tplg_types::limits::{ABI_VERSION, MAGIC};
use tplg_types::WireFormat;

/// The fixed header in front of every block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub magic: u32,
    pub abi: u32,
    pub version: u32,
    pub block_type: u32,
    pub size: u32,
    pub vendor_type: u32,
    pub payload_size: u32,
    pub index: u32,
    pub count: u32,
}

impl BlockHeader {
    /// A header for a single-element block.
    pub fn new(block_type: u32, version: u32, payload_size: u32) -> Self {
        Self {
            magic: MAGIC,
            abi: ABI_VERSION,
            version,
            block_type,
            size: Self::WIRE_SIZE as u32,
            vendor_type: 0,
            payload_size,
            index: 0,
            count: 1,
        }
    }

    /// Read a header from the front of `buf`. `None` when too short.
    pub fn decode(mut buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::WIRE_SIZE {
            return None;
        }
        Some(Self {
            magic: buf.get_u32_le(),
            abi: buf.get_u32_le(),
            version: buf.get_u32_le(),
            block_type: buf.get_u32_le(),
            size: buf.get_u32_le(),
            vendor_type: buf.get_u32_le(),
            payload_size: buf.get_u32_le(),
            index: buf.get_u32_le(),
            count: buf.get_u32_le(),
        })
    }
}

impl WireFormat for BlockHeader {
    const WIRE_SIZE: usize = 9 * 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        for word in [
            self.magic,
            self.abi,
            self.version,
            self.block_type,
            self.size,
            self.vendor_type,
            self.payload_size,
            self.index,
            self.count,
        ] {
            buf.put_u32_le(word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tplg_types::limits::tag;

    #[test]
    fn header_layout() {
        let mut hdr = BlockHeader::new(tag::DAPM_WIDGET, 3, 132);
        hdr.index = 7;
        let bytes = hdr.to_bytes();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[0..4], &MAGIC.to_le_bytes());
        assert_eq!(&bytes[12..16], &tag::DAPM_WIDGET.to_le_bytes());
        assert_eq!(&bytes[16..20], &36u32.to_le_bytes());
        assert_eq!(&bytes[24..28], &132u32.to_le_bytes());
        assert_eq!(&bytes[32..36], &1u32.to_le_bytes());
        assert_eq!(BlockHeader::decode(&bytes), Some(hdr));
    }

    #[test]
    fn short_input_does_not_decode() {
        assert!(BlockHeader::decode(&[0u8; 35]).is_none());
    }
}
