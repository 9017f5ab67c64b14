use bytes::BufMut;

use crate::wire::{wire_len, WireFormat};

/// Per-category element counts written at the head of every topology.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub control_elems: u32,
    pub widget_elems: u32,
    pub graph_elems: u32,
    pub pcm_elems: u32,
    pub dai_link_elems: u32,
    pub dai_elems: u32,
    /// Controls embedded into widgets rather than emitted standalone.
    pub kcontrol_elems: u32,
    pub priv_size: u32,
}

impl WireFormat for Manifest {
    const WIRE_SIZE: usize = 4 + 7 * 4 + 19 * 4 + 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(self.control_elems);
        buf.put_u32_le(self.widget_elems);
        buf.put_u32_le(self.graph_elems);
        buf.put_u32_le(self.pcm_elems);
        buf.put_u32_le(self.dai_link_elems);
        buf.put_u32_le(self.dai_elems);
        buf.put_u32_le(self.kcontrol_elems);
        buf.put_bytes(0, 19 * 4);
        buf.put_u32_le(self.priv_size);
    }
}
