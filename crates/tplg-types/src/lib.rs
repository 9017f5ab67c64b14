//! Wire-level vocabulary of the audio topology compiler.
//!
//! Every structure here has a fixed little-endian layout described by the
//! [`WireFormat`] trait. Higher layers never write raw integers themselves;
//! they fill these structures and let them encode.
//!
//! # Layout Rules
//!
//! 1. All integers are little-endian, regardless of host.
//! 2. Names occupy [`limits::NAME_LEN`] bytes, NUL-terminated and zero-padded.
//! 3. Fixed arrays are always written at full capacity; unused slots are
//!    zeroed (channel maps default to register `-1`).
//! 4. A header's declared `WIRE_SIZE` never depends on its contents.

pub mod category;
pub mod control;
pub mod dapm;
pub mod error;
pub mod limits;
pub mod manifest;
pub mod names;
pub mod payload;
pub mod pcm;
pub mod vendor;
pub mod wire;

pub use category::Category;
pub use control::{BytesControl, ChannelMap, ControlHeader, ControlOps, EnumControl, MixerControl, TextList, Tlv};
pub use dapm::{RouteLine, Widget, WidgetType};
pub use error::{TypeError, TypeResult};
pub use manifest::Manifest;
pub use payload::Payload;
pub use pcm::{BeDai, HwConfig, Link, LinkComponent, Pcm, StreamCaps, StreamConfig};
pub use vendor::{TupleEntry, TupleKind, TupleSet, TupleValue, VendorTokens, VendorTuples};
pub use wire::WireFormat;
