//! Kcontrol structures: mixers, enums, byte controls and their helpers.

use bytes::BufMut;

use crate::error::TypeResult;
use crate::limits::{access, tag, tlv, MAX_CHANNELS, NAME_LEN, NUM_TEXTS, TLV_WORDS};
use crate::wire::{push_bounded, put_name, put_padded, put_u32_array, wire_len, WireFormat};

/// Handler ids for the get/put/info callbacks of a control.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlOps {
    pub get: u32,
    pub put: u32,
    pub info: u32,
}

impl WireFormat for ControlOps {
    const WIRE_SIZE: usize = 12;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(self.get);
        buf.put_u32_le(self.put);
        buf.put_u32_le(self.info);
    }
}

/// Header shared by every control kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlHeader {
    /// One of the `tag::MIXER`, `tag::ENUM`, `tag::BYTES` values.
    pub kind: u32,
    pub name: String,
    pub access: u32,
    pub ops: ControlOps,
    /// Byte length of the TLV data region, zero when no TLV is attached.
    pub tlv_size: u32,
}

impl ControlHeader {
    pub fn new(kind: u32, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            access: access::READWRITE,
            ops: ControlOps::default(),
            tlv_size: 0,
        }
    }

    fn attach_tlv(&mut self, tlv: &Tlv) {
        self.tlv_size = tlv.byte_len();
        self.access |= access::TLV_READ | access::READWRITE;
    }
}

impl WireFormat for ControlHeader {
    const WIRE_SIZE: usize = 4 + 4 + NAME_LEN + 4 + ControlOps::WIRE_SIZE + 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(self.kind);
        put_name(buf, &self.name);
        buf.put_u32_le(self.access);
        self.ops.encode_into(buf);
        buf.put_u32_le(self.tlv_size);
    }
}

/// Register mapping for one control channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelMap {
    pub reg: i32,
    pub shift: u32,
    /// Channel position id, see [`crate::names::channel_id`].
    pub id: u32,
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            reg: -1,
            shift: 0,
            id: 0,
        }
    }
}

impl WireFormat for ChannelMap {
    const WIRE_SIZE: usize = 16;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_i32_le(self.reg);
        buf.put_u32_le(self.shift);
        buf.put_u32_le(self.id);
    }
}

/// Type-length-value metadata, in practice a dB scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tlv {
    pub numid: u32,
    pub count: u32,
    pub data: [i32; TLV_WORDS],
}

impl Tlv {
    /// A dB-scale record: `data[0..3]` hold min, step and mute.
    pub fn db_scale(min: i32, step: i32, mute: i32) -> Self {
        let mut data = [0; TLV_WORDS];
        data[0] = min;
        data[1] = step;
        data[2] = mute;
        Self {
            numid: tlv::DB_SCALE,
            count: wire_len(TLV_WORDS),
            data,
        }
    }

    /// Length in bytes of the meaningful data words.
    pub fn byte_len(&self) -> u32 {
        self.count.saturating_mul(4)
    }
}

impl WireFormat for Tlv {
    const WIRE_SIZE: usize = 12 + TLV_WORDS * 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(self.numid);
        buf.put_u32_le(self.count);
        for word in self.data {
            buf.put_i32_le(word);
        }
    }
}

/// A volume/switch style control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixerControl {
    pub hdr: ControlHeader,
    pub min: i32,
    pub max: i32,
    pub platform_max: i32,
    pub invert: u32,
    pub channels: Vec<ChannelMap>,
    pub tlv: Tlv,
    pub priv_size: u32,
}

impl MixerControl {
    /// Offset of the TLV record inside the encoded structure.
    pub const TLV_OFFSET: usize =
        ControlHeader::WIRE_SIZE + 4 + 16 + 4 + MAX_CHANNELS * ChannelMap::WIRE_SIZE;

    pub fn new(name: &str) -> Self {
        Self {
            hdr: ControlHeader::new(tag::MIXER, name),
            min: 0,
            max: 0,
            platform_max: 0,
            invert: 0,
            channels: Vec::new(),
            tlv: Tlv::default(),
            priv_size: 0,
        }
    }

    pub fn push_channel(&mut self, channel: ChannelMap) -> TypeResult<()> {
        push_bounded(&mut self.channels, channel, MAX_CHANNELS, "mixer channels")
    }

    /// Overwrite the TLV region and flag the control as TLV-readable.
    pub fn set_tlv(&mut self, tlv: Tlv) {
        self.hdr.attach_tlv(&tlv);
        self.tlv = tlv;
    }
}

impl WireFormat for MixerControl {
    const WIRE_SIZE: usize = Self::TLV_OFFSET + Tlv::WIRE_SIZE + 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.hdr.encode_into(buf);
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_i32_le(self.min);
        buf.put_i32_le(self.max);
        buf.put_i32_le(self.platform_max);
        buf.put_u32_le(self.invert);
        buf.put_u32_le(wire_len(self.channels.len()));
        put_padded(buf, &self.channels, MAX_CHANNELS, &ChannelMap::default());
        self.tlv.encode_into(buf);
        buf.put_u32_le(self.priv_size);
    }
}

/// A control selecting one of a fixed list of labelled items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumControl {
    pub hdr: ControlHeader,
    pub channels: Vec<ChannelMap>,
    pub items: u32,
    pub mask: u32,
    pub texts: Vec<String>,
    pub values: Vec<u32>,
    pub priv_size: u32,
}

impl EnumControl {
    pub fn new(name: &str) -> Self {
        Self {
            hdr: ControlHeader::new(tag::ENUM, name),
            channels: Vec::new(),
            items: 0,
            mask: 0,
            texts: Vec::new(),
            values: Vec::new(),
            priv_size: 0,
        }
    }

    pub fn push_channel(&mut self, channel: ChannelMap) -> TypeResult<()> {
        push_bounded(&mut self.channels, channel, MAX_CHANNELS, "enum channels")
    }

    /// Replace the label array with `texts` and update the item count.
    pub fn set_texts(&mut self, texts: &[String]) -> TypeResult<()> {
        if texts.len() > NUM_TEXTS {
            return Err(crate::TypeError::Capacity {
                what: "enum texts",
                max: NUM_TEXTS,
            });
        }
        self.texts = texts.to_vec();
        self.items = wire_len(texts.len());
        Ok(())
    }
}

impl WireFormat for EnumControl {
    const WIRE_SIZE: usize = ControlHeader::WIRE_SIZE
        + 4
        + 4
        + MAX_CHANNELS * ChannelMap::WIRE_SIZE
        + 12
        + NUM_TEXTS * NAME_LEN
        + NUM_TEXTS * 4
        + 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.hdr.encode_into(buf);
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(wire_len(self.channels.len()));
        put_padded(buf, &self.channels, MAX_CHANNELS, &ChannelMap::default());
        buf.put_u32_le(self.items);
        buf.put_u32_le(self.mask);
        buf.put_u32_le(wire_len(self.texts.len()));
        for text in self.texts.iter().take(NUM_TEXTS) {
            put_name(buf, text);
        }
        buf.put_bytes(0, NUM_TEXTS.saturating_sub(self.texts.len()) * NAME_LEN);
        put_u32_array(buf, &self.values, NUM_TEXTS);
        buf.put_u32_le(self.priv_size);
    }
}

/// A control exposing an opaque byte buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BytesControl {
    pub hdr: ControlHeader,
    pub max: u32,
    pub mask: u32,
    pub base: u32,
    pub num_regs: u32,
    pub ext_ops: ControlOps,
    pub tlv: Tlv,
    pub priv_size: u32,
}

impl BytesControl {
    pub fn new(name: &str) -> Self {
        Self {
            hdr: ControlHeader::new(tag::BYTES, name),
            max: 0,
            mask: 0,
            base: 0,
            num_regs: 0,
            ext_ops: ControlOps::default(),
            tlv: Tlv::default(),
            priv_size: 0,
        }
    }

    pub fn set_tlv(&mut self, tlv: Tlv) {
        self.hdr.attach_tlv(&tlv);
        self.tlv = tlv;
    }
}

impl WireFormat for BytesControl {
    const WIRE_SIZE: usize =
        ControlHeader::WIRE_SIZE + 4 + 16 + ControlOps::WIRE_SIZE + Tlv::WIRE_SIZE + 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        self.hdr.encode_into(buf);
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(self.max);
        buf.put_u32_le(self.mask);
        buf.put_u32_le(self.base);
        buf.put_u32_le(self.num_regs);
        self.ext_ops.encode_into(buf);
        self.tlv.encode_into(buf);
        buf.put_u32_le(self.priv_size);
    }
}

/// A named list of enum labels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextList {
    pub texts: Vec<String>,
}

impl TextList {
    pub fn push(&mut self, text: &str) -> TypeResult<()> {
        push_bounded(&mut self.texts, text.to_string(), NUM_TEXTS, "texts")
    }
}

impl WireFormat for TextList {
    const WIRE_SIZE: usize = 4 + NUM_TEXTS * NAME_LEN;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(self.texts.len()));
        for text in self.texts.iter().take(NUM_TEXTS) {
            put_name(buf, text);
        }
        buf.put_bytes(0, NUM_TEXTS.saturating_sub(self.texts.len()) * NAME_LEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le_i32(bytes: &[u8], at: usize) -> i32 {
        i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn encoded_sizes_match_declared_sizes() {
        assert_eq!(ControlHeader::new(tag::MIXER, "x").to_bytes().len(), 72);
        assert_eq!(MixerControl::new("m").to_bytes().len(), MixerControl::WIRE_SIZE);
        assert_eq!(EnumControl::new("e").to_bytes().len(), EnumControl::WIRE_SIZE);
        assert_eq!(BytesControl::new("b").to_bytes().len(), BytesControl::WIRE_SIZE);
        assert_eq!(TextList::default().to_bytes().len(), TextList::WIRE_SIZE);
    }

    #[test]
    fn mixer_tlv_lands_at_fixed_offset() {
        let mut mixer = MixerControl::new("Master");
        mixer.set_tlv(Tlv::db_scale(-9000, 300, 1));
        let bytes = mixer.to_bytes();
        let data = MixerControl::TLV_OFFSET + 12;
        assert_eq!(le_i32(&bytes, data), -9000);
        assert_eq!(le_i32(&bytes, data + 4), 300);
        assert_eq!(le_i32(&bytes, data + 8), 1);
    }

    #[test]
    fn tlv_sets_access_bits_and_size() {
        let mut bytes = BytesControl::new("coeffs");
        assert_eq!(bytes.hdr.access & access::TLV_READ, 0);
        bytes.set_tlv(Tlv::db_scale(0, 1, 0));
        assert_ne!(bytes.hdr.access & access::TLV_READ, 0);
        assert_eq!(bytes.hdr.access & access::READWRITE, access::READWRITE);
        assert_eq!(bytes.hdr.tlv_size, (TLV_WORDS * 4) as u32);
    }

    #[test]
    fn unused_channels_default_to_no_register() {
        let mixer = MixerControl::new("m");
        let bytes = mixer.to_bytes();
        let first_channel = ControlHeader::WIRE_SIZE + 4 + 16 + 4;
        assert_eq!(le_i32(&bytes, first_channel + 4), -1);
    }

    #[test]
    fn channel_bound_is_enforced() {
        let mut mixer = MixerControl::new("m");
        for _ in 0..MAX_CHANNELS {
            mixer.push_channel(ChannelMap::default()).unwrap();
        }
        assert!(mixer.push_channel(ChannelMap::default()).is_err());
    }

    #[test]
    fn enum_texts_update_items() {
        let mut ctl = EnumControl::new("Mux");
        ctl.set_texts(&["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(ctl.items, 2);
        let too_many: Vec<String> = (0..=NUM_TEXTS).map(|i| i.to_string()).collect();
        assert!(ctl.set_texts(&too_many).is_err());
    }
}
