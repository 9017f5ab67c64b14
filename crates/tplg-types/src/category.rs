use std::fmt;

use serde::{Deserialize, Serialize};

use crate::limits::tag;

/// The closed set of element kinds the compiler knows about.
///
/// Every element in the store belongs to exactly one category, and every
/// reference names the category it expects to find its target in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Tlv,
    Mixer,
    Enum,
    Bytes,
    Widget,
    Route,
    StreamCaps,
    StreamConfig,
    Pcm,
    BeDai,
    BackendLink,
    CodecLink,
    HwConfig,
    Component,
    PrivateData,
    Text,
    VendorToken,
    VendorTuple,
    Manifest,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 19;

    /// Every category, in declaration order.
    pub const ALL: [Category; Self::COUNT] = [
        Self::Tlv,
        Self::Mixer,
        Self::Enum,
        Self::Bytes,
        Self::Widget,
        Self::Route,
        Self::StreamCaps,
        Self::StreamConfig,
        Self::Pcm,
        Self::BeDai,
        Self::BackendLink,
        Self::CodecLink,
        Self::HwConfig,
        Self::Component,
        Self::PrivateData,
        Self::Text,
        Self::VendorToken,
        Self::VendorTuple,
        Self::Manifest,
    ];

    /// Order in which standalone blocks follow the manifest in the output.
    pub const EMISSION_ORDER: [Category; 9] = [
        Self::Mixer,
        Self::Enum,
        Self::Bytes,
        Self::Widget,
        Self::Pcm,
        Self::BeDai,
        Self::BackendLink,
        Self::CodecLink,
        Self::Route,
    ];

    /// Dense index of this category, usable for array-backed storage.
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Block type tag written into the binary header, if the category is
    /// ever emitted.
    pub fn wire_tag(self) -> Option<u32> {
        match self {
            Self::Mixer => Some(tag::MIXER),
            Self::Bytes => Some(tag::BYTES),
            Self::Enum => Some(tag::ENUM),
            Self::Route => Some(tag::DAPM_GRAPH),
            Self::Widget => Some(tag::DAPM_WIDGET),
            Self::Pcm => Some(tag::PCM),
            Self::Manifest => Some(tag::MANIFEST),
            Self::CodecLink => Some(tag::CODEC_LINK),
            Self::BackendLink => Some(tag::BACKEND_LINK),
            Self::BeDai => Some(tag::DAI),
            _ => None,
        }
    }

    /// Whether elements of this category can carry a private-data tail.
    pub fn carries_private_data(self) -> bool {
        matches!(
            self,
            Self::Mixer
                | Self::Enum
                | Self::Bytes
                | Self::Widget
                | Self::Pcm
                | Self::BeDai
                | Self::BackendLink
                | Self::CodecLink
                | Self::Manifest
        )
    }

    /// Whether this is one of the kcontrol categories.
    pub fn is_control(self) -> bool {
        matches!(self, Self::Mixer | Self::Enum | Self::Bytes)
    }

    /// Whether this is one of the two DAI link kinds.
    pub fn is_link(self) -> bool {
        matches!(self, Self::BackendLink | Self::CodecLink)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tlv => "tlv",
            Self::Mixer => "mixer",
            Self::Enum => "enum",
            Self::Bytes => "bytes",
            Self::Widget => "widget",
            Self::Route => "route",
            Self::StreamCaps => "stream-caps",
            Self::StreamConfig => "stream-config",
            Self::Pcm => "pcm",
            Self::BeDai => "be-dai",
            Self::BackendLink => "be-link",
            Self::CodecLink => "cc-link",
            Self::HwConfig => "hw-config",
            Self::Component => "component",
            Self::PrivateData => "data",
            Self::Text => "text",
            Self::VendorToken => "vendor-tokens",
            Self::VendorTuple => "vendor-tuples",
            Self::Manifest => "manifest",
        };
        f.write_str(name)
    }
}
