//! The typed fixed header carried by every element.

use crate::category::Category;
use crate::control::{BytesControl, EnumControl, MixerControl, TextList, Tlv};
use crate::dapm::{RouteLine, Widget};
use crate::manifest::Manifest;
use crate::pcm::{BeDai, HwConfig, Link, LinkComponent, Pcm, StreamCaps, StreamConfig};
use crate::vendor::{VendorTokens, VendorTuples};
use crate::wire::WireFormat;

/// Category-specific header of an element.
///
/// The variable-length tail (private data, embedded controls) is kept by
/// the element next to this value; the encoded payload is always the header
/// followed by the tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Tlv(Tlv),
    Mixer(MixerControl),
    Enum(EnumControl),
    Bytes(BytesControl),
    Widget(Widget),
    Route(RouteLine),
    StreamCaps(StreamCaps),
    StreamConfig(StreamConfig),
    Pcm(Pcm),
    BeDai(BeDai),
    Link(Link),
    HwConfig(HwConfig),
    Component(LinkComponent),
    /// Raw private data: no header, the bytes live entirely in the tail.
    Data,
    Text(TextList),
    Tokens(VendorTokens),
    Tuples(VendorTuples),
    Manifest(Manifest),
}

impl Payload {
    /// A zeroed header for `category`, with name fields set to `name`.
    pub fn for_category(category: Category, name: &str) -> Self {
        match category {
            Category::Tlv => Self::Tlv(Tlv::default()),
            Category::Mixer => Self::Mixer(MixerControl::new(name)),
            Category::Enum => Self::Enum(EnumControl::new(name)),
            Category::Bytes => Self::Bytes(BytesControl::new(name)),
            Category::Widget => Self::Widget(Widget::new(name)),
            Category::Route => Self::Route(RouteLine::default()),
            Category::StreamCaps => Self::StreamCaps(StreamCaps::named(name)),
            Category::StreamConfig => Self::StreamConfig(StreamConfig::named(name)),
            Category::Pcm => Self::Pcm(Pcm::new(name)),
            Category::BeDai => Self::BeDai(BeDai::new(name)),
            Category::BackendLink | Category::CodecLink => Self::Link(Link::new(name)),
            Category::HwConfig => Self::HwConfig(HwConfig::default()),
            Category::Component => Self::Component(LinkComponent {
                name: name.to_string(),
                dai_name: String::new(),
            }),
            Category::PrivateData => Self::Data,
            Category::Text => Self::Text(TextList::default()),
            Category::VendorToken => Self::Tokens(VendorTokens::default()),
            Category::VendorTuple => Self::Tuples(VendorTuples::default()),
            Category::Manifest => Self::Manifest(Manifest::default()),
        }
    }

    /// Encoded size of the header alone.
    ///
    /// Token tables and tuple sets have no header of their own; tuples only
    /// reach the output through the private data they are folded into.
    pub fn wire_size(&self) -> usize {
        match self {
            Self::Tlv(_) => Tlv::WIRE_SIZE,
            Self::Mixer(_) => MixerControl::WIRE_SIZE,
            Self::Enum(_) => EnumControl::WIRE_SIZE,
            Self::Bytes(_) => BytesControl::WIRE_SIZE,
            Self::Widget(_) => Widget::WIRE_SIZE,
            Self::Route(_) => RouteLine::WIRE_SIZE,
            Self::StreamCaps(_) => StreamCaps::WIRE_SIZE,
            Self::StreamConfig(_) => StreamConfig::WIRE_SIZE,
            Self::Pcm(_) => Pcm::WIRE_SIZE,
            Self::BeDai(_) => BeDai::WIRE_SIZE,
            Self::Link(_) => Link::WIRE_SIZE,
            Self::HwConfig(_) => HwConfig::WIRE_SIZE,
            Self::Component(_) => LinkComponent::WIRE_SIZE,
            Self::Text(_) => TextList::WIRE_SIZE,
            Self::Manifest(_) => Manifest::WIRE_SIZE,
            Self::Data | Self::Tokens(_) | Self::Tuples(_) => 0,
        }
    }

    /// Append the encoded header to `buf`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Tlv(v) => v.encode_into(buf),
            Self::Mixer(v) => v.encode_into(buf),
            Self::Enum(v) => v.encode_into(buf),
            Self::Bytes(v) => v.encode_into(buf),
            Self::Widget(v) => v.encode_into(buf),
            Self::Route(v) => v.encode_into(buf),
            Self::StreamCaps(v) => v.encode_into(buf),
            Self::StreamConfig(v) => v.encode_into(buf),
            Self::Pcm(v) => v.encode_into(buf),
            Self::BeDai(v) => v.encode_into(buf),
            Self::Link(v) => v.encode_into(buf),
            Self::HwConfig(v) => v.encode_into(buf),
            Self::Component(v) => v.encode_into(buf),
            Self::Text(v) => v.encode_into(buf),
            Self::Manifest(v) => v.encode_into(buf),
            Self::Data | Self::Tokens(_) | Self::Tuples(_) => {}
        }
    }

    /// The `priv_size` counter of headers that carry private data.
    pub fn priv_size_mut(&mut self) -> Option<&mut u32> {
        match self {
            Self::Mixer(v) => Some(&mut v.priv_size),
            Self::Enum(v) => Some(&mut v.priv_size),
            Self::Bytes(v) => Some(&mut v.priv_size),
            Self::Widget(v) => Some(&mut v.priv_size),
            Self::Pcm(v) => Some(&mut v.priv_size),
            Self::BeDai(v) => Some(&mut v.priv_size),
            Self::Link(v) => Some(&mut v.priv_size),
            Self::Manifest(v) => Some(&mut v.priv_size),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size_matches_encoding_for_every_category() {
        for category in Category::ALL {
            let payload = Payload::for_category(category, "x");
            let mut buf = Vec::new();
            payload.encode_into(&mut buf);
            assert_eq!(buf.len(), payload.wire_size(), "{category}");
        }
    }

    #[test]
    fn priv_capable_headers_agree_with_category() {
        for category in Category::ALL {
            let mut payload = Payload::for_category(category, "x");
            assert_eq!(
                payload.priv_size_mut().is_some(),
                category.carries_private_data(),
                "{category}"
            );
        }
    }

    #[test]
    fn names_are_copied_into_headers() {
        match Payload::for_category(Category::Widget, "Speaker") {
            Payload::Widget(w) => assert_eq!(w.name, "Speaker"),
            other => panic!("unexpected payload {other:?}"),
        }
        match Payload::for_category(Category::Mixer, "Master") {
            Payload::Mixer(m) => assert_eq!(m.hdr.name, "Master"),
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
