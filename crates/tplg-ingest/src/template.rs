//! Programmatic element creation.
//!
//! Templates are plain serde structs copied field by field into new
//! elements, exactly as if the same object had been parsed from a config
//! tree. Inline `private` bytes are appended to the element directly.

use serde::{Deserialize, Serialize};
use tplg_store::{CompilerSession, ElementId};
use tplg_types::limits::{tag, CAPTURE, PLAYBACK};
use tplg_types::pcm::push_stream;
use tplg_types::{
    BeDai, BytesControl, Category, ChannelMap, ControlHeader, ControlOps, EnumControl, HwConfig,
    Link, LinkComponent, MixerControl, Payload, Pcm, RouteLine, StreamCaps, StreamConfig, Tlv,
    TypeError, Widget, WidgetType,
};
use tracing::debug;

use crate::draft::{commit_all, Draft};
use crate::error::{IngestError, IngestResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsTemplate {
    pub get: u32,
    pub put: u32,
    pub info: u32,
}

impl From<OpsTemplate> for ControlOps {
    fn from(t: OpsTemplate) -> Self {
        ControlOps {
            get: t.get,
            put: t.put,
            info: t.info,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbScaleTemplate {
    pub min: i32,
    pub step: i32,
    pub mute: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelTemplate {
    pub id: u32,
    pub reg: i32,
    pub shift: u32,
}

/// Fields shared by every control template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlTemplate {
    pub name: String,
    pub index: u32,
    /// Access bits; read-write when absent.
    pub access: Option<u32>,
    pub ops: OpsTemplate,
    pub tlv: Option<DbScaleTemplate>,
    /// Block header version; the session version is used when 0.
    pub version: u32,
    pub vendor_type: u32,
}

impl ControlTemplate {
    fn header(&self, kind: u32) -> ControlHeader {
        let mut hdr = ControlHeader::new(kind, &self.name);
        if let Some(bits) = self.access {
            hdr.access = bits;
        }
        hdr.ops = self.ops.into();
        hdr
    }

    fn tlv(&self) -> Option<Tlv> {
        self.tlv.map(|t| Tlv::db_scale(t.min, t.step, t.mute))
    }

    fn draft(&self, category: Category) -> Draft {
        let mut draft = Draft::new(category, &self.name);
        draft.index = self.index;
        draft.vendor_version = self.version;
        draft.vendor_type = self.vendor_type;
        draft
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerTemplate {
    pub control: ControlTemplate,
    pub min: i32,
    pub max: i32,
    pub platform_max: i32,
    pub invert: bool,
    pub channels: Vec<ChannelTemplate>,
    pub private: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumTemplate {
    pub control: ControlTemplate,
    pub mask: u32,
    pub channels: Vec<ChannelTemplate>,
    pub texts: Vec<String>,
    pub values: Vec<u32>,
    pub private: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BytesTemplate {
    pub control: ControlTemplate,
    pub max: u32,
    pub mask: u32,
    pub base: u32,
    pub num_regs: u32,
    pub ext_ops: OpsTemplate,
    pub private: Vec<u8>,
}

/// A control created together with the widget that embeds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetControl {
    Mixer(MixerTemplate),
    Enum(EnumTemplate),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetTemplate {
    pub name: String,
    pub index: u32,
    /// Widget type name such as `pga` or `aif_in`.
    pub kind: String,
    pub stream_name: String,
    pub reg: i32,
    pub shift: u32,
    pub mask: u32,
    pub subseq: u32,
    pub invert: bool,
    pub ignore_suspend: bool,
    pub event_flags: u16,
    pub event_type: u16,
    pub controls: Vec<WidgetControl>,
    pub private: Vec<u8>,
    pub version: u32,
    pub vendor_type: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTemplate {
    pub source: String,
    pub control: String,
    pub sink: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphTemplate {
    pub name: String,
    pub index: u32,
    pub routes: Vec<RouteTemplate>,
    pub version: u32,
    pub vendor_type: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamCapsTemplate {
    pub name: String,
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

impl From<&StreamCapsTemplate> for StreamCaps {
    fn from(t: &StreamCapsTemplate) -> Self {
        StreamCaps {
            name: t.name.clone(),
            formats: t.formats,
            rates: t.rates,
            rate_min: t.rate_min,
            rate_max: t.rate_max,
            channels_min: t.channels_min,
            channels_max: t.channels_max,
            periods_min: t.periods_min,
            periods_max: t.periods_max,
            period_size_min: t.period_size_min,
            period_size_max: t.period_size_max,
            buffer_size_min: t.buffer_size_min,
            buffer_size_max: t.buffer_size_max,
            sig_bits: t.sig_bits,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamTemplate {
    pub name: String,
    pub format: u64,
    pub rate: u32,
    pub period_bytes: u32,
    pub buffer_bytes: u32,
    pub channels: u32,
}

impl From<&StreamTemplate> for StreamConfig {
    fn from(t: &StreamTemplate) -> Self {
        StreamConfig {
            name: t.name.clone(),
            format: t.format,
            rate: t.rate,
            period_bytes: t.period_bytes,
            buffer_bytes: t.buffer_bytes,
            channels: t.channels,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcmTemplate {
    pub pcm_name: String,
    pub dai_name: String,
    pub index: u32,
    pub pcm_id: u32,
    pub dai_id: u32,
    pub playback: Option<StreamCapsTemplate>,
    pub capture: Option<StreamCapsTemplate>,
    pub compress: bool,
    pub streams: Vec<StreamTemplate>,
    pub flag_mask: u32,
    pub flags: u32,
    pub private: Vec<u8>,
    pub version: u32,
    pub vendor_type: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeDaiTemplate {
    pub dai_name: String,
    pub index: u32,
    pub dai_id: u32,
    pub playback: Option<StreamCapsTemplate>,
    pub capture: Option<StreamCapsTemplate>,
    pub flag_mask: u32,
    pub flags: u32,
    pub private: Vec<u8>,
    pub version: u32,
    pub vendor_type: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentTemplate {
    pub name: String,
    pub dai_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HwConfigTemplate {
    pub id: u32,
    pub fmt: u32,
    pub clock_gated: bool,
    pub invert_bclk: bool,
    pub invert_fsync: bool,
    pub bclk_master: bool,
    pub fsync_master: bool,
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

impl HwConfigTemplate {
    fn to_config(&self) -> Result<HwConfig, TypeError> {
        let mut hw = HwConfig {
            id: self.id,
            fmt: self.fmt,
            clock_gated: self.clock_gated,
            invert_bclk: self.invert_bclk,
            invert_fsync: self.invert_fsync,
            bclk_master: self.bclk_master,
            fsync_master: self.fsync_master,
            mclk_out: self.mclk_out,
            mclk_rate: self.mclk_rate,
            bclk_rate: self.bclk_rate,
            fsync_rate: self.fsync_rate,
            tdm_slots: self.tdm_slots,
            tdm_slot_width: self.tdm_slot_width,
            tx_slots: self.tx_slots,
            rx_slots: self.rx_slots,
            ..HwConfig::default()
        };
        for slot in &self.tx_chanmap {
            hw.push_tx_channel(*slot)?;
        }
        for slot in &self.rx_chanmap {
            hw.push_rx_channel(*slot)?;
        }
        Ok(hw)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    #[default]
    Backend,
    Codec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplate {
    pub kind: LinkKind,
    pub name: String,
    pub index: u32,
    pub id: u32,
    pub stream_name: String,
    pub streams: Vec<StreamTemplate>,
    pub cpu: ComponentTemplate,
    pub codecs: Vec<ComponentTemplate>,
    pub hw_configs: Vec<HwConfigTemplate>,
    pub default_hw_config_id: u32,
    pub flag_mask: u32,
    pub flags: u32,
    pub private: Vec<u8>,
    pub version: u32,
    pub vendor_type: u32,
}

/// Any object that can be added through [`add_object`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectTemplate {
    Mixer(MixerTemplate),
    Enum(EnumTemplate),
    Bytes(BytesTemplate),
    Widget(WidgetTemplate),
    Graph(GraphTemplate),
    Pcm(PcmTemplate),
    BeDai(BeDaiTemplate),
    Link(LinkTemplate),
}

fn channel_maps(channels: &[ChannelTemplate]) -> Vec<ChannelMap> {
    channels
        .iter()
        .map(|c| ChannelMap {
            reg: c.reg,
            shift: c.shift,
            id: c.id,
        })
        .collect()
}

fn mixer_draft(t: MixerTemplate) -> IngestResult<Draft> {
    let mut draft = t.control.draft(Category::Mixer);
    let mut mixer = MixerControl::new(&t.control.name);
    mixer.hdr = t.control.header(tag::MIXER);
    mixer.min = t.min;
    mixer.max = t.max;
    mixer.platform_max = t.platform_max;
    mixer.invert = u32::from(t.invert);
    for map in channel_maps(&t.channels) {
        mixer.push_channel(map).map_err(|e| draft.type_error(e))?;
    }
    if let Some(tlv) = t.control.tlv() {
        mixer.set_tlv(tlv);
    }
    draft.payload = Payload::Mixer(mixer);
    draft.private = t.private;
    Ok(draft)
}

fn enum_draft(t: EnumTemplate) -> IngestResult<Draft> {
    let mut draft = t.control.draft(Category::Enum);
    let mut control = EnumControl::new(&t.control.name);
    control.hdr = t.control.header(tag::ENUM);
    control.mask = t.mask;
    for map in channel_maps(&t.channels) {
        control.push_channel(map).map_err(|e| draft.type_error(e))?;
    }
    control.set_texts(&t.texts).map_err(|e| draft.type_error(e))?;
    control.values = t.values;
    draft.payload = Payload::Enum(control);
    draft.private = t.private;
    Ok(draft)
}

fn bytes_draft(t: BytesTemplate) -> IngestResult<Draft> {
    let mut draft = t.control.draft(Category::Bytes);
    let mut control = BytesControl::new(&t.control.name);
    control.hdr = t.control.header(tag::BYTES);
    control.max = t.max;
    control.mask = t.mask;
    control.base = t.base;
    control.num_regs = t.num_regs;
    control.ext_ops = t.ext_ops.into();
    if let Some(tlv) = t.control.tlv() {
        control.set_tlv(tlv);
    }
    draft.payload = Payload::Bytes(control);
    draft.private = t.private;
    Ok(draft)
}

/// The widget's own controls are stored together with it, so a rejected
/// widget leaves no unreferenced controls behind.
fn add_widget(session: &mut CompilerSession, t: WidgetTemplate) -> IngestResult<ElementId> {
    let mut draft = Draft::new(Category::Widget, &t.name);
    draft.index = t.index;
    draft.vendor_version = t.version;
    draft.vendor_type = t.vendor_type;
    let mut widget = Widget::new(&t.name);
    if !t.kind.is_empty() {
        widget.kind = WidgetType::from_name(&t.kind).map_err(|e| draft.type_error(e))?;
    }
    widget.stream_name = t.stream_name;
    widget.reg = t.reg;
    widget.shift = t.shift;
    widget.mask = t.mask;
    widget.subseq = t.subseq;
    widget.invert = u32::from(t.invert);
    widget.ignore_suspend = u32::from(t.ignore_suspend);
    widget.event_flags = t.event_flags;
    widget.event_type = t.event_type;

    let mut drafts = Vec::with_capacity(t.controls.len() + 1);
    for control in t.controls {
        let control = match control {
            WidgetControl::Mixer(m) => mixer_draft(m)?,
            WidgetControl::Enum(e) => enum_draft(e)?,
        };
        draft.reference(control.category, control.name.clone());
        drafts.push(control);
    }

    draft.payload = Payload::Widget(widget);
    draft.private = t.private;
    drafts.push(draft);
    let ids = commit_all(session, drafts)?;
    ids.last()
        .copied()
        .ok_or_else(|| IngestError::invalid("name", &t.name, "widget was not stored"))
}

fn add_graph(session: &mut CompilerSession, t: GraphTemplate) -> IngestResult<ElementId> {
    let mut drafts = Vec::with_capacity(t.routes.len());
    for route in &t.routes {
        let mut draft = Draft::new(Category::Route, &t.name);
        draft.index = t.index;
        draft.vendor_version = t.version;
        draft.vendor_type = t.vendor_type;
        let line = format!("{}, {}, {}", route.source, route.control, route.sink);
        let route = RouteLine::parse(&line).map_err(|e| draft.type_error(e))?;
        draft.payload = Payload::Route(route);
        drafts.push(draft);
    }
    let ids = commit_all(session, drafts)?;
    ids.last()
        .copied()
        .ok_or_else(|| IngestError::invalid("routes", &t.name, "a graph needs at least one route"))
}

fn add_pcm(session: &mut CompilerSession, t: PcmTemplate) -> IngestResult<ElementId> {
    let mut draft = Draft::new(Category::Pcm, &t.pcm_name);
    draft.index = t.index;
    draft.vendor_version = t.version;
    draft.vendor_type = t.vendor_type;
    let mut pcm = Pcm::new(&t.pcm_name);
    pcm.dai_name = t.dai_name;
    pcm.pcm_id = t.pcm_id;
    pcm.dai_id = t.dai_id;
    pcm.compress = u32::from(t.compress);
    if let Some(caps) = &t.playback {
        pcm.playback = 1;
        pcm.caps[PLAYBACK] = caps.into();
    }
    if let Some(caps) = &t.capture {
        pcm.capture = 1;
        pcm.caps[CAPTURE] = caps.into();
    }
    for stream in &t.streams {
        push_stream(&mut pcm.streams, stream.into()).map_err(|e| draft.type_error(e))?;
    }
    pcm.flag_mask = t.flag_mask;
    pcm.flags = t.flags;
    draft.payload = Payload::Pcm(pcm);
    draft.private = t.private;
    draft.commit(session)
}

fn add_be_dai(session: &mut CompilerSession, t: BeDaiTemplate) -> IngestResult<ElementId> {
    let mut draft = Draft::new(Category::BeDai, &t.dai_name);
    draft.index = t.index;
    draft.vendor_version = t.version;
    draft.vendor_type = t.vendor_type;
    let mut dai = BeDai::new(&t.dai_name);
    dai.dai_id = t.dai_id;
    if let Some(caps) = &t.playback {
        dai.playback = 1;
        dai.caps[PLAYBACK] = caps.into();
    }
    if let Some(caps) = &t.capture {
        dai.capture = 1;
        dai.caps[CAPTURE] = caps.into();
    }
    dai.flag_mask = t.flag_mask;
    dai.flags = t.flags;
    draft.payload = Payload::BeDai(dai);
    draft.private = t.private;
    draft.commit(session)
}

fn add_link(session: &mut CompilerSession, t: LinkTemplate) -> IngestResult<ElementId> {
    let category = match t.kind {
        LinkKind::Backend => Category::BackendLink,
        LinkKind::Codec => Category::CodecLink,
    };
    let mut draft = Draft::new(category, &t.name);
    draft.index = t.index;
    draft.vendor_version = t.version;
    draft.vendor_type = t.vendor_type;
    let mut link = Link::new(&t.name);
    link.id = t.id;
    link.stream_name = t.stream_name;
    link.cpu = LinkComponent {
        name: t.cpu.name,
        dai_name: t.cpu.dai_name,
    };
    for stream in &t.streams {
        push_stream(&mut link.streams, stream.into()).map_err(|e| draft.type_error(e))?;
    }
    for codec in t.codecs {
        link.push_codec(LinkComponent {
            name: codec.name,
            dai_name: codec.dai_name,
        })
        .map_err(|e| draft.type_error(e))?;
    }
    for hw in &t.hw_configs {
        let config = hw.to_config().map_err(|e| draft.type_error(e))?;
        link.push_hw_config(config).map_err(|e| draft.type_error(e))?;
    }
    link.default_hw_config_id = t.default_hw_config_id;
    link.flag_mask = t.flag_mask;
    link.flags = t.flags;
    draft.payload = Payload::Link(link);
    draft.private = t.private;
    draft.commit(session)
}

/// Create the element described by `template`.
///
/// Widgets also create the controls they list, and reference them so the
/// build embeds them. Graphs create one route per entry and return the last.
pub fn add_object(
    session: &mut CompilerSession,
    template: ObjectTemplate,
) -> IngestResult<ElementId> {
    if session.is_built() {
        return Err(IngestError::AlreadyBuilt);
    }
    let id = match template {
        ObjectTemplate::Mixer(t) => mixer_draft(t)?.commit(session)?,
        ObjectTemplate::Enum(t) => enum_draft(t)?.commit(session)?,
        ObjectTemplate::Bytes(t) => bytes_draft(t)?.commit(session)?,
        ObjectTemplate::Widget(t) => add_widget(session, t)?,
        ObjectTemplate::Graph(t) => add_graph(session, t)?,
        ObjectTemplate::Pcm(t) => add_pcm(session, t)?,
        ObjectTemplate::BeDai(t) => add_be_dai(session, t)?,
        ObjectTemplate::Link(t) => add_link(session, t)?,
    };
    debug!(%id, "added object from template");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tplg_store::SessionConfig;
    use tplg_types::limits::access;

    fn session() -> CompilerSession {
        CompilerSession::new(SessionConfig::default()).unwrap()
    }

    fn control(name: &str) -> ControlTemplate {
        ControlTemplate {
            name: name.into(),
            ..ControlTemplate::default()
        }
    }

    #[test]
    fn mixer_with_inline_tlv_and_private() {
        let mut s = session();
        let id = add_object(
            &mut s,
            ObjectTemplate::Mixer(MixerTemplate {
                control: ControlTemplate {
                    tlv: Some(DbScaleTemplate {
                        min: -9000,
                        step: 300,
                        mute: 1,
                    }),
                    ..control("M1")
                },
                max: 31,
                private: vec![1, 2, 3],
                ..MixerTemplate::default()
            }),
        )
        .unwrap();

        let elem = s.store.get(id).unwrap();
        assert_eq!(elem.tail(), &[1, 2, 3]);
        match &elem.payload {
            Payload::Mixer(m) => {
                assert_eq!(m.tlv, Tlv::db_scale(-9000, 300, 1));
                assert_eq!(m.priv_size, 3);
                assert_eq!(m.hdr.access & access::TLV_READ, access::TLV_READ);
                assert_eq!(m.hdr.kind, tag::MIXER);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn widget_creates_and_references_its_controls() {
        let mut s = session();
        let id = add_object(
            &mut s,
            ObjectTemplate::Widget(WidgetTemplate {
                name: "W1".into(),
                kind: "mixer".into(),
                controls: vec![
                    WidgetControl::Mixer(MixerTemplate {
                        control: control("Gain"),
                        ..MixerTemplate::default()
                    }),
                    WidgetControl::Enum(EnumTemplate {
                        control: control("Mode"),
                        texts: vec!["a".into(), "b".into()],
                        ..EnumTemplate::default()
                    }),
                ],
                ..WidgetTemplate::default()
            }),
        )
        .unwrap();

        assert!(s.store.lookup(Category::Mixer, "Gain").is_some());
        assert!(s.store.lookup(Category::Enum, "Mode").is_some());
        let refs: Vec<_> = s
            .store
            .get(id)
            .unwrap()
            .references
            .iter()
            .map(|r| (r.category, r.target.clone()))
            .collect();
        assert_eq!(
            refs,
            [
                (Category::Mixer, "Gain".to_string()),
                (Category::Enum, "Mode".to_string())
            ]
        );
    }

    #[test]
    fn link_carries_inline_components_and_configs() {
        let mut s = session();
        let id = add_object(
            &mut s,
            ObjectTemplate::Link(LinkTemplate {
                kind: LinkKind::Codec,
                name: "cc0".into(),
                cpu: ComponentTemplate {
                    name: "cpu".into(),
                    dai_name: "cpu-dai".into(),
                },
                codecs: vec![ComponentTemplate {
                    name: "codec".into(),
                    dai_name: "codec-dai".into(),
                }],
                hw_configs: vec![HwConfigTemplate {
                    id: 4,
                    tx_chanmap: vec![0, 1],
                    ..HwConfigTemplate::default()
                }],
                ..LinkTemplate::default()
            }),
        )
        .unwrap();
        assert_eq!(id.category, Category::CodecLink);
        match &s.store.get(id).unwrap().payload {
            Payload::Link(l) => {
                assert_eq!(l.cpu.dai_name, "cpu-dai");
                assert_eq!(l.codecs[0].dai_name, "codec-dai");
                assert_eq!(l.hw_configs[0].id, 4);
                assert_eq!(l.hw_configs[0].tx_chanmap, [0, 1]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn too_many_hw_configs_in_template() {
        let mut s = session();
        let hw_configs = (0..9)
            .map(|id| HwConfigTemplate {
                id,
                ..HwConfigTemplate::default()
            })
            .collect();
        let err = add_object(
            &mut s,
            ObjectTemplate::Link(LinkTemplate {
                name: "be".into(),
                hw_configs,
                ..LinkTemplate::default()
            }),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Element { .. }));
    }

    #[test]
    fn pcm_caps_fill_directions() {
        let mut s = session();
        let id = add_object(
            &mut s,
            ObjectTemplate::Pcm(PcmTemplate {
                pcm_name: "System".into(),
                capture: Some(StreamCapsTemplate {
                    name: "cap".into(),
                    channels_max: 4,
                    ..StreamCapsTemplate::default()
                }),
                ..PcmTemplate::default()
            }),
        )
        .unwrap();
        match &s.store.get(id).unwrap().payload {
            Payload::Pcm(p) => {
                assert_eq!((p.playback, p.capture), (0, 1));
                assert_eq!(p.caps[CAPTURE].channels_max, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn graph_routes_share_the_graph_name() {
        let mut s = session();
        add_object(
            &mut s,
            ObjectTemplate::Graph(GraphTemplate {
                name: "main".into(),
                routes: vec![
                    RouteTemplate {
                        source: "A".into(),
                        control: String::new(),
                        sink: "B".into(),
                    },
                    RouteTemplate {
                        source: "B".into(),
                        control: "Gain".into(),
                        sink: "C".into(),
                    },
                ],
                ..GraphTemplate::default()
            }),
        )
        .unwrap();
        assert_eq!(s.store.len(Category::Route), 2);
        assert!(s.store.iter(Category::Route).all(|e| e.name == "main"));
    }

    #[test]
    fn templates_deserialize_from_toml() {
        let template: ObjectTemplate = toml::from_str(
            r#"
            type = "mixer"
            max = 10
            [control]
            name = "Vol"
            "#,
        )
        .unwrap();
        match template {
            ObjectTemplate::Mixer(m) => {
                assert_eq!(m.control.name, "Vol");
                assert_eq!(m.max, 10);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejected_widget_keeps_no_controls() {
        let mut s = session();
        add_object(
            &mut s,
            ObjectTemplate::Widget(WidgetTemplate {
                name: "W".into(),
                ..WidgetTemplate::default()
            }),
        )
        .unwrap();

        let err = add_object(
            &mut s,
            ObjectTemplate::Widget(WidgetTemplate {
                name: "W".into(),
                controls: vec![WidgetControl::Mixer(MixerTemplate {
                    control: control("Orphan"),
                    ..MixerTemplate::default()
                })],
                ..WidgetTemplate::default()
            }),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Duplicate { category: Category::Widget, .. }));
        assert!(s.store.lookup(Category::Mixer, "Orphan").is_none());
        assert_eq!(s.store.len(Category::Widget), 1);
    }

    #[test]
    fn widget_with_taken_control_name_is_rejected_whole() {
        let mut s = session();
        add_object(
            &mut s,
            ObjectTemplate::Mixer(MixerTemplate {
                control: control("Gain"),
                ..MixerTemplate::default()
            }),
        )
        .unwrap();

        let result = add_object(
            &mut s,
            ObjectTemplate::Widget(WidgetTemplate {
                name: "Amp".into(),
                controls: vec![WidgetControl::Mixer(MixerTemplate {
                    control: control("Gain"),
                    ..MixerTemplate::default()
                })],
                ..WidgetTemplate::default()
            }),
        );
        assert!(result.is_err());
        assert_eq!(s.store.len(Category::Widget), 0);
        assert_eq!(s.store.len(Category::Mixer), 1);
    }

    #[test]
    fn bad_route_stores_none_of_the_graph() {
        let mut s = session();
        let err = add_object(
            &mut s,
            ObjectTemplate::Graph(GraphTemplate {
                name: "main".into(),
                routes: vec![
                    RouteTemplate {
                        source: "A".into(),
                        control: String::new(),
                        sink: "B".into(),
                    },
                    RouteTemplate {
                        source: "B".into(),
                        control: String::new(),
                        sink: String::new(),
                    },
                ],
                ..GraphTemplate::default()
            }),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Element { .. }));
        assert_eq!(s.store.len(Category::Route), 0);
    }

    #[test]
    fn header_fields_reach_the_element() {
        let mut s = session();
        let id = add_object(
            &mut s,
            ObjectTemplate::Bytes(BytesTemplate {
                control: ControlTemplate {
                    version: 7,
                    vendor_type: 0x20,
                    ..control("Blob")
                },
                ..BytesTemplate::default()
            }),
        )
        .unwrap();
        let elem = s.store.get(id).unwrap();
        assert_eq!((elem.vendor_version, elem.vendor_type), (7, 0x20));

        let id = add_object(
            &mut s,
            ObjectTemplate::Pcm(PcmTemplate {
                pcm_name: "Deep Buffer".into(),
                version: 3,
                ..PcmTemplate::default()
            }),
        )
        .unwrap();
        assert_eq!(s.store.get(id).unwrap().vendor_version, 3);
    }
}
