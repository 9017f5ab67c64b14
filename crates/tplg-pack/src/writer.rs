use std::path::{Path, PathBuf};

use tplg_store::{CompilerSession, Element};
use tplg_types::{Category, WireFormat};
use tracing::{debug, info};

use crate::error::{PackError, PackResult};
use crate::header::BlockHeader;
use crate::sink::OutputSink;

/// One queued output block.
#[derive(Clone, Debug)]
pub struct Block {
    pub category: Category,
    pub name: String,
    pub header: BlockHeader,
    pub payload: Vec<u8>,
}

impl Block {
    /// Encoded length including the header.
    pub fn encoded_len(&self) -> usize {
        BlockHeader::WIRE_SIZE + self.payload.len()
    }
}

/// Serializes a built session into the binary topology format.
///
/// The manifest block comes first, then every emitted category in
/// [`Category::EMISSION_ORDER`], each in insertion order. Elements that were
/// embedded into a parent are skipped; their bytes already live in the
/// parent's payload.
#[derive(Debug, Default)]
pub struct TopologyWriter {
    blocks: Vec<Block>,
}

impl TopologyWriter {
    pub fn from_session(session: &CompilerSession) -> PackResult<Self> {
        if !session.is_built() {
            return Err(PackError::NotBuilt);
        }
        let manifest = session.existing_manifest().ok_or(PackError::NotBuilt)?;

        let mut writer = Self::default();
        writer.push(session, session.store.get(manifest)?)?;
        for category in Category::EMISSION_ORDER {
            for elem in session.store.iter(category).filter(|e| !e.consumed) {
                writer.push(session, elem)?;
            }
        }
        Ok(writer)
    }

    fn push(&mut self, session: &CompilerSession, elem: &Element) -> PackResult<()> {
        let block_type = elem
            .category
            .wire_tag()
            .ok_or(PackError::UnsupportedCategory(elem.category))?;
        let payload = elem.payload_bytes();
        let payload_size =
            u32::try_from(payload.len()).map_err(|_| PackError::PayloadTooLarge {
                name: elem.name.clone(),
                category: elem.category,
                size: payload.len(),
            })?;
        let version = match elem.vendor_version {
            0 => session.version(),
            v => v,
        };

        let mut header = BlockHeader::new(block_type, version, payload_size);
        header.vendor_type = elem.vendor_type;
        header.index = elem.index;
        debug!(category = %elem.category, name = %elem.name, payload_size, "queued block");

        self.blocks.push(Block {
            category: elem.category,
            name: elem.name.clone(),
            header,
            payload,
        });
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.blocks.iter().map(Block::encoded_len).sum()
    }

    /// Encode every block into one buffer.
    pub fn finish_to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for block in &self.blocks {
            block.header.encode_into(&mut out);
            out.extend_from_slice(&block.payload);
        }
        out
    }

    /// Write through `sink` and commit it.
    pub fn write_to(&self, mut sink: OutputSink) -> PackResult<PathBuf> {
        let bytes = self.finish_to_bytes();
        sink.write(&bytes)?;
        let path = sink.commit()?;
        info!(path = %path.display(), blocks = self.len(), bytes = bytes.len(), "wrote topology");
        Ok(path)
    }

    /// Atomically write the encoded topology to `path`.
    pub fn finish(&self, path: &Path) -> PackResult<PathBuf> {
        self.write_to(OutputSink::create(path)?)
    }
}
