//! PCM devices, back-end DAIs, DAI links and their sub-records.

use bytes::BufMut;

use crate::error::TypeResult;
use crate::limits::{
    HW_CONFIG_MAX, LINK_CODECS_MAX, MAX_CHANNELS, NAME_LEN, STREAM_CONFIG_MAX, STREAM_DIRECTIONS,
};
use crate::wire::{push_bounded, put_name, put_padded, put_u32_array, wire_len, WireFormat};

/// Capabilities of one PCM stream direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamCaps {
    pub name: String,
    /// Bitmask of sample format indices.
    pub formats: u64,
    pub rates: u32,
    pub rate_min: u32,
    pub rate_max: u32,
    pub channels_min: u32,
    pub channels_max: u32,
    pub periods_min: u32,
    pub periods_max: u32,
    pub period_size_min: u32,
    pub period_size_max: u32,
    pub buffer_size_min: u32,
    pub buffer_size_max: u32,
    pub sig_bits: u32,
}

impl StreamCaps {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl WireFormat for StreamCaps {
    const WIRE_SIZE: usize = 4 + NAME_LEN + 8 + 13 * 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        put_name(buf, &self.name);
        buf.put_u64_le(self.formats);
        for v in [
            self.rates,
            self.rate_min,
            self.rate_max,
            self.channels_min,
            self.channels_max,
            self.periods_min,
            self.periods_max,
            self.period_size_min,
            self.period_size_max,
            self.buffer_size_min,
            self.buffer_size_max,
            self.sig_bits,
        ] {
            buf.put_u32_le(v);
        }
        // Reserved.
        buf.put_u32_le(0);
    }
}

/// A concrete stream configuration (one format, one rate).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamConfig {
    pub name: String,
    pub format: u64,
    pub rate: u32,
    pub period_bytes: u32,
    pub buffer_bytes: u32,
    pub channels: u32,
}

impl StreamConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl WireFormat for StreamConfig {
    const WIRE_SIZE: usize = 4 + NAME_LEN + 8 + 4 * 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        put_name(buf, &self.name);
        buf.put_u64_le(self.format);
        buf.put_u32_le(self.rate);
        buf.put_u32_le(self.period_bytes);
        buf.put_u32_le(self.buffer_bytes);
        buf.put_u32_le(self.channels);
    }
}

/// Push a stream slot named `name`, respecting the slot bound.
pub fn push_stream(streams: &mut Vec<StreamConfig>, stream: StreamConfig) -> TypeResult<()> {
    push_bounded(streams, stream, STREAM_CONFIG_MAX, "stream configs")
}

/// A front-end PCM device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pcm {
    pub pcm_name: String,
    pub dai_name: String,
    pub pcm_id: u32,
    pub dai_id: u32,
    pub playback: u32,
    pub capture: u32,
    pub compress: u32,
    pub streams: Vec<StreamConfig>,
    pub caps: [StreamCaps; STREAM_DIRECTIONS],
    /// Trigger ordering per direction: pre, post or bespoke.
    pub trigger: [u32; STREAM_DIRECTIONS],
    pub flag_mask: u32,
    pub flags: u32,
    pub priv_size: u32,
}

impl Pcm {
    pub fn new(name: &str) -> Self {
        Self {
            pcm_name: name.to_string(),
            ..Self::default()
        }
    }
}

impl WireFormat for Pcm {
    const WIRE_SIZE: usize = 4
        + 2 * NAME_LEN
        + 5 * 4
        + STREAM_CONFIG_MAX * StreamConfig::WIRE_SIZE
        + 4
        + STREAM_DIRECTIONS * StreamCaps::WIRE_SIZE
        + STREAM_DIRECTIONS * 4
        + 3 * 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        put_name(buf, &self.pcm_name);
        put_name(buf, &self.dai_name);
        buf.put_u32_le(self.pcm_id);
        buf.put_u32_le(self.dai_id);
        buf.put_u32_le(self.playback);
        buf.put_u32_le(self.capture);
        buf.put_u32_le(self.compress);
        put_padded(buf, &self.streams, STREAM_CONFIG_MAX, &StreamConfig::default());
        buf.put_u32_le(wire_len(self.streams.len()));
        for caps in &self.caps {
            caps.encode_into(buf);
        }
        put_u32_array(buf, &self.trigger, STREAM_DIRECTIONS);
        buf.put_u32_le(self.flag_mask);
        buf.put_u32_le(self.flags);
        buf.put_u32_le(self.priv_size);
    }
}

/// A back-end DAI exposed by a platform driver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeDai {
    pub dai_name: String,
    pub dai_id: u32,
    pub playback: u32,
    pub capture: u32,
    pub caps: [StreamCaps; STREAM_DIRECTIONS],
    pub flag_mask: u32,
    pub flags: u32,
    pub priv_size: u32,
}

impl BeDai {
    pub fn new(name: &str) -> Self {
        Self {
            dai_name: name.to_string(),
            ..Self::default()
        }
    }
}

impl WireFormat for BeDai {
    const WIRE_SIZE: usize =
        4 + NAME_LEN + 3 * 4 + STREAM_DIRECTIONS * StreamCaps::WIRE_SIZE + 3 * 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        put_name(buf, &self.dai_name);
        buf.put_u32_le(self.dai_id);
        buf.put_u32_le(self.playback);
        buf.put_u32_le(self.capture);
        for caps in &self.caps {
            caps.encode_into(buf);
        }
        buf.put_u32_le(self.flag_mask);
        buf.put_u32_le(self.flags);
        buf.put_u32_le(self.priv_size);
    }
}

/// A CPU or codec endpoint of a DAI link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkComponent {
    pub name: String,
    pub dai_name: String,
}

impl WireFormat for LinkComponent {
    const WIRE_SIZE: usize = 4 + 2 * NAME_LEN;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        put_name(buf, &self.name);
        put_name(buf, &self.dai_name);
    }
}

/// Physical interface settings for one link configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HwConfig {
    pub id: u32,
    pub fmt: u32,
    pub clock_gated: bool,
    pub invert_bclk: bool,
    pub invert_fsync: bool,
    pub bclk_master: bool,
    pub fsync_master: bool,
    /// `true` when the codec drives MCLK out.
    pub mclk_out: bool,
    pub mclk_rate: u32,
    pub bclk_rate: u32,
    pub fsync_rate: u32,
    pub tdm_slots: u32,
    pub tdm_slot_width: u32,
    pub tx_slots: u32,
    pub rx_slots: u32,
    pub tx_chanmap: Vec<u32>,
    pub rx_chanmap: Vec<u32>,
}

impl HwConfig {
    pub fn push_tx_channel(&mut self, slot: u32) -> TypeResult<()> {
        push_bounded(&mut self.tx_chanmap, slot, MAX_CHANNELS, "tx channels")
    }

    pub fn push_rx_channel(&mut self, slot: u32) -> TypeResult<()> {
        push_bounded(&mut self.rx_chanmap, slot, MAX_CHANNELS, "rx channels")
    }
}

impl WireFormat for HwConfig {
    const WIRE_SIZE: usize = 3 * 4 + 8 + 3 * 4 + 4 * 4 + 2 * (4 + MAX_CHANNELS * 4);

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(self.id);
        buf.put_u32_le(self.fmt);
        for flag in [
            self.clock_gated,
            self.invert_bclk,
            self.invert_fsync,
            self.bclk_master,
            self.fsync_master,
            self.mclk_out,
        ] {
            buf.put_u8(u8::from(flag));
        }
        buf.put_u16_le(0);
        buf.put_u32_le(self.mclk_rate);
        buf.put_u32_le(self.bclk_rate);
        buf.put_u32_le(self.fsync_rate);
        buf.put_u32_le(self.tdm_slots);
        buf.put_u32_le(self.tdm_slot_width);
        buf.put_u32_le(self.tx_slots);
        buf.put_u32_le(self.rx_slots);
        buf.put_u32_le(wire_len(self.tx_chanmap.len()));
        put_u32_array(buf, &self.tx_chanmap, MAX_CHANNELS);
        buf.put_u32_le(wire_len(self.rx_chanmap.len()));
        put_u32_array(buf, &self.rx_chanmap, MAX_CHANNELS);
    }
}

/// A back-end or codec-codec DAI link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
    pub id: u32,
    pub name: String,
    pub stream_name: String,
    pub streams: Vec<StreamConfig>,
    pub cpu: LinkComponent,
    pub codecs: Vec<LinkComponent>,
    pub hw_configs: Vec<HwConfig>,
    pub default_hw_config_id: u32,
    pub flag_mask: u32,
    pub flags: u32,
    pub priv_size: u32,
}

impl Link {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn push_codec(&mut self, codec: LinkComponent) -> TypeResult<()> {
        push_bounded(&mut self.codecs, codec, LINK_CODECS_MAX, "link codecs")
    }

    pub fn push_hw_config(&mut self, config: HwConfig) -> TypeResult<()> {
        push_bounded(&mut self.hw_configs, config, HW_CONFIG_MAX, "hw configs")
    }
}

impl WireFormat for Link {
    const WIRE_SIZE: usize = 4
        + 4
        + 2 * NAME_LEN
        + STREAM_CONFIG_MAX * StreamConfig::WIRE_SIZE
        + 4
        + LinkComponent::WIRE_SIZE
        + 4
        + LINK_CODECS_MAX * LinkComponent::WIRE_SIZE
        + 4
        + HW_CONFIG_MAX * HwConfig::WIRE_SIZE
        + 4 * 4;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(wire_len(Self::WIRE_SIZE));
        buf.put_u32_le(self.id);
        put_name(buf, &self.name);
        put_name(buf, &self.stream_name);
        put_padded(buf, &self.streams, STREAM_CONFIG_MAX, &StreamConfig::default());
        buf.put_u32_le(wire_len(self.streams.len()));
        self.cpu.encode_into(buf);
        buf.put_u32_le(wire_len(self.codecs.len()));
        put_padded(buf, &self.codecs, LINK_CODECS_MAX, &LinkComponent::default());
        buf.put_u32_le(wire_len(self.hw_configs.len()));
        put_padded(buf, &self.hw_configs, HW_CONFIG_MAX, &HwConfig::default());
        buf.put_u32_le(self.default_hw_config_id);
        buf.put_u32_le(self.flag_mask);
        buf.put_u32_le(self.flags);
        buf.put_u32_le(self.priv_size);
    }
}
