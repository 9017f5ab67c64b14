//! Fixed sizes, bounds and flag values shared by the wire structures.

/// Magic number at the start of every block header (`"CoSA"` little-endian).
pub const MAGIC: u32 = 0x4153_6F43;

/// ABI revision of the block layout produced by this crate.
pub const ABI_VERSION: u32 = 5;

/// Byte length of every fixed-size name field, including the trailing NUL.
pub const NAME_LEN: usize = 44;

/// Maximum number of channels on a mixer or enum control.
pub const MAX_CHANNELS: usize = 8;

/// Maximum number of sample formats a capabilities record may list.
pub const MAX_FORMATS: usize = 16;

/// Number of label slots in an enum control or text list.
pub const NUM_TEXTS: usize = 16;

/// Number of 32-bit data words in a TLV record.
pub const TLV_WORDS: usize = 8;

/// Maximum number of stream configurations on a PCM or link.
pub const STREAM_CONFIG_MAX: usize = 8;

/// Maximum number of hardware configurations on a link.
pub const HW_CONFIG_MAX: usize = 8;

/// Maximum number of codec components on a link.
pub const LINK_CODECS_MAX: usize = 8;

/// Number of PCM stream directions (playback, capture).
pub const STREAM_DIRECTIONS: usize = 2;

/// Index of the playback direction.
pub const PLAYBACK: usize = 0;
/// Index of the capture direction.
pub const CAPTURE: usize = 1;

/// Block type tags.
pub mod tag {
    pub const MIXER: u32 = 1;
    pub const BYTES: u32 = 2;
    pub const ENUM: u32 = 3;
    pub const DAPM_GRAPH: u32 = 4;
    pub const DAPM_WIDGET: u32 = 5;
    pub const DAI_LINK: u32 = 6;
    pub const PCM: u32 = 7;
    pub const MANIFEST: u32 = 8;
    pub const CODEC_LINK: u32 = 9;
    pub const BACKEND_LINK: u32 = 10;
    pub const PDATA: u32 = 11;
    pub const DAI: u32 = 12;
}

/// Control access bits.
pub mod access {
    pub const READ: u32 = 1 << 0;
    pub const WRITE: u32 = 1 << 1;
    pub const READWRITE: u32 = READ | WRITE;
    pub const VOLATILE: u32 = 1 << 2;
    pub const TLV_READ: u32 = 1 << 4;
    pub const TLV_WRITE: u32 = 1 << 5;
    pub const TLV_READWRITE: u32 = TLV_READ | TLV_WRITE;
}

/// TLV record type identifiers.
pub mod tlv {
    pub const DB_SCALE: u32 = 1;
}

/// DAI link flag bits.
pub mod link_flags {
    pub const SYMMETRIC_RATES: u32 = 1 << 0;
    pub const SYMMETRIC_CHANNELS: u32 = 1 << 1;
    pub const SYMMETRIC_SAMPLEBITS: u32 = 1 << 2;
    pub const VOICE_WAKEUP: u32 = 1 << 3;
    pub const IGNORE_SUSPEND: u32 = 1 << 4;
    pub const IGNORE_POWERDOWN_TIME: u32 = 1 << 5;
}

/// Vendor tuple array kinds.
pub mod tuple_type {
    pub const UUID: u32 = 0;
    pub const STRING: u32 = 1;
    pub const BOOL: u32 = 2;
    pub const BYTE: u32 = 3;
    pub const SHORT: u32 = 4;
    pub const WORD: u32 = 5;
}
