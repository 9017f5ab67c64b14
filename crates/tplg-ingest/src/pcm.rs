//! PCM capabilities, stream configs, PCMs, back-end DAIs, link components,
//! hardware configs and DAI links.

use tplg_store::CompilerSession;
use tplg_types::limits::{link_flags, CAPTURE, MAX_FORMATS, PLAYBACK, STREAM_DIRECTIONS};
use tplg_types::names::{hw_format, pcm_format, pcm_rate_bit};
use tplg_types::pcm::push_stream;
use tplg_types::{
    BeDai, Category, HwConfig, Link, LinkComponent, Payload, Pcm, StreamCaps, StreamConfig,
    TypeError,
};

use crate::draft::Draft;
use crate::error::{IngestError, IngestResult};
use crate::node::ConfigNode;
use crate::value;

const FLAG_NAMES: &[(&str, u32)] = &[
    ("symmetric_rates", link_flags::SYMMETRIC_RATES),
    ("symmetric_channels", link_flags::SYMMETRIC_CHANNELS),
    ("symmetric_sample_bits", link_flags::SYMMETRIC_SAMPLEBITS),
    ("voice_wakeup", link_flags::VOICE_WAKEUP),
    ("ignore_suspend", link_flags::IGNORE_SUSPEND),
    ("ignore_powerdown_time", link_flags::IGNORE_POWERDOWN_TIME),
];

fn flag_bit(draft: &Draft, name: &str) -> IngestResult<u32> {
    FLAG_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, bit)| *bit)
        .ok_or_else(|| {
            draft.type_error(TypeError::UnknownName {
                what: "link flag",
                name: name.to_string(),
            })
        })
}

/// Set `bit` in the mask and, when `on`, in the value.
fn set_flag(flag_mask: &mut u32, flags: &mut u32, bit: u32, on: bool) {
    *flag_mask |= bit;
    if on {
        *flags |= bit;
    } else {
        *flags &= !bit;
    }
}

fn parse_flags<N: ConfigNode>(
    draft: &Draft,
    node: &N,
    flag_mask: &mut u32,
    flags: &mut u32,
) -> IngestResult<()> {
    for name in value::comma_list(node)? {
        let bit = flag_bit(draft, &name)?;
        set_flag(flag_mask, flags, bit, true);
    }
    Ok(())
}

fn parse_streams<N: ConfigNode>(
    draft: &mut Draft,
    node: &N,
    streams: &mut Vec<StreamConfig>,
) -> IngestResult<()> {
    for name in value::string_list(node)? {
        push_stream(streams, StreamConfig::named(&name)).map_err(|e| draft.type_error(e))?;
        draft.reference(Category::StreamConfig, name);
    }
    Ok(())
}

fn add_data_refs<N: ConfigNode>(draft: &mut Draft, node: &N) -> IngestResult<()> {
    for name in value::string_list(node)? {
        draft.reference(Category::PrivateData, name);
    }
    Ok(())
}

/// What a `pcm { playback { ... } capture { ... } }` block declares.
#[derive(Debug, Default)]
struct Directions {
    caps: [Option<String>; STREAM_DIRECTIONS],
    trigger: [u32; STREAM_DIRECTIONS],
}

fn trigger_value(draft: &Draft, text: &str) -> IngestResult<u32> {
    match text {
        "pre" => Ok(0),
        "post" => Ok(1),
        "bespoke" => Ok(2),
        other => value::parse_int("trigger", other)
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                draft.type_error(TypeError::UnknownName {
                    what: "trigger order",
                    name: other.to_string(),
                })
            }),
    }
}

fn parse_directions<N: ConfigNode>(
    session: &CompilerSession,
    draft: &Draft,
    node: &N,
) -> IngestResult<Directions> {
    let mut dirs = Directions::default();
    for child in value::children(node)? {
        let dir = match child.id() {
            "playback" => PLAYBACK,
            "capture" => CAPTURE,
            other => {
                draft.unknown_key(session, other)?;
                continue;
            }
        };
        for item in value::children(child)? {
            match item.id() {
                "capabilities" => dirs.caps[dir] = Some(value::string(item)?),
                "trigger" => dirs.trigger[dir] = trigger_value(draft, &value::string(item)?)?,
                other => draft.unknown_key(session, other)?,
            }
        }
    }
    Ok(dirs)
}

/// Name the caps slots and add the references that fill them at build time.
fn apply_caps(
    draft: &mut Draft,
    dirs: &Directions,
    caps: &mut [StreamCaps; STREAM_DIRECTIONS],
    enabled: [&mut u32; STREAM_DIRECTIONS],
) {
    for (dir, flag) in enabled.into_iter().enumerate() {
        if let Some(name) = &dirs.caps[dir] {
            caps[dir] = StreamCaps::named(name);
            *flag = 1;
            draft.reference(Category::StreamCaps, name.clone());
        }
    }
}

pub(crate) fn parse_stream_caps<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::StreamCaps, node.id());
    let mut caps = StreamCaps::named(node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "formats" => {
                let names = value::comma_list(child)?;
                if names.len() > MAX_FORMATS {
                    return Err(draft.type_error(TypeError::Capacity {
                        what: "sample formats",
                        max: MAX_FORMATS,
                    }));
                }
                for name in names {
                    let format = pcm_format(&name).map_err(|e| draft.type_error(e))?;
                    caps.formats |= 1u64 << format;
                }
            }
            "rates" => {
                for name in value::comma_list(child)? {
                    caps.rates |= pcm_rate_bit(&name).map_err(|e| draft.type_error(e))?;
                }
            }
            "rate_min" => caps.rate_min = value::unsigned(child)?,
            "rate_max" => caps.rate_max = value::unsigned(child)?,
            "channels_min" => caps.channels_min = value::unsigned(child)?,
            "channels_max" => caps.channels_max = value::unsigned(child)?,
            "periods_min" => caps.periods_min = value::unsigned(child)?,
            "periods_max" => caps.periods_max = value::unsigned(child)?,
            "period_size_min" => caps.period_size_min = value::unsigned(child)?,
            "period_size_max" => caps.period_size_max = value::unsigned(child)?,
            "buffer_size_min" => caps.buffer_size_min = value::unsigned(child)?,
            "buffer_size_max" => caps.buffer_size_max = value::unsigned(child)?,
            "sig_bits" => caps.sig_bits = value::unsigned(child)?,
            other => draft.unknown_key(session, other)?,
        }
    }

    draft.payload = Payload::StreamCaps(caps);
    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_stream_config<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::StreamConfig, node.id());
    let mut stream = StreamConfig::named(node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "format" => {
                let format = pcm_format(&value::string(child)?).map_err(|e| draft.type_error(e))?;
                stream.format = 1u64 << format;
            }
            "rate" => stream.rate = value::unsigned(child)?,
            "channels" => stream.channels = value::unsigned(child)?,
            "period_bytes" => stream.period_bytes = value::unsigned(child)?,
            "buffer_bytes" => stream.buffer_bytes = value::unsigned(child)?,
            other => draft.unknown_key(session, other)?,
        }
    }

    draft.payload = Payload::StreamConfig(stream);
    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_pcm<N: ConfigNode>(session: &mut CompilerSession, node: &N) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Pcm, node.id());
    let mut pcm = Pcm::new(node.id());
    let mut dirs = Directions::default();

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "id" => pcm.pcm_id = value::unsigned(child)?,
            "pcm" => dirs = parse_directions(session, &draft, child)?,
            "dai" => {
                for dai in value::children(child)? {
                    pcm.dai_name = dai.id().to_string();
                    for item in value::children(dai)? {
                        match item.id() {
                            "id" => pcm.dai_id = value::unsigned(item)?,
                            other => draft.unknown_key(session, other)?,
                        }
                    }
                }
            }
            "compress" => pcm.compress = u32::from(value::boolean(child)?),
            "streams" => parse_streams(&mut draft, child, &mut pcm.streams)?,
            "flags" => parse_flags(&draft, child, &mut pcm.flag_mask, &mut pcm.flags)?,
            "data" => add_data_refs(&mut draft, child)?,
            _ => draft.header_key(session, child)?,
        }
    }

    pcm.trigger = dirs.trigger;
    let Pcm {
        caps,
        playback,
        capture,
        ..
    } = &mut pcm;
    apply_caps(&mut draft, &dirs, caps, [playback, capture]);

    draft.payload = Payload::Pcm(pcm);
    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_be_dai<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::BeDai, node.id());
    let mut dai = BeDai::new(node.id());
    let mut dirs = Directions::default();

    for child in value::children(node)? {
        let symmetric = match child.id() {
            "symmetric_rates" => Some(link_flags::SYMMETRIC_RATES),
            "symmetric_channels" => Some(link_flags::SYMMETRIC_CHANNELS),
            "symmetric_sample_bits" => Some(link_flags::SYMMETRIC_SAMPLEBITS),
            _ => None,
        };
        if let Some(bit) = symmetric {
            let on = value::boolean(child)?;
            set_flag(&mut dai.flag_mask, &mut dai.flags, bit, on);
            continue;
        }
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "id" => dai.dai_id = value::unsigned(child)?,
            "pcm" => dirs = parse_directions(session, &draft, child)?,
            "data" => add_data_refs(&mut draft, child)?,
            _ => draft.header_key(session, child)?,
        }
    }

    let BeDai {
        caps,
        playback,
        capture,
        ..
    } = &mut dai;
    apply_caps(&mut draft, &dirs, caps, [playback, capture]);

    draft.payload = Payload::BeDai(dai);
    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_component<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Component, node.id());
    let mut component = LinkComponent {
        name: node.id().to_string(),
        dai_name: String::new(),
    };

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "name" => component.name = value::string(child)?,
            "dai" => component.dai_name = value::string(child)?,
            other => draft.unknown_key(session, other)?,
        }
    }

    if component.dai_name.is_empty() {
        let reason = format!("component {:?} needs a DAI name", node.id());
        return Err(IngestError::invalid("dai", "", reason));
    }

    draft.payload = Payload::Component(component);
    draft.commit(session)?;
    Ok(())
}

/// `master`/`slave` style clock roles, from the codec's point of view.
fn clock_master(key: &str, text: &str) -> IngestResult<bool> {
    match text {
        "master" | "codec_master" => Ok(true),
        "slave" | "codec_slave" => Ok(false),
        _ => Err(IngestError::invalid(key, text, "expected master or slave")),
    }
}

fn mclk_out(text: &str) -> IngestResult<bool> {
    match text {
        "codec_mclk_out" | "out" => Ok(true),
        "codec_mclk_in" | "in" => Ok(false),
        _ => Err(IngestError::invalid(
            "mclk",
            text,
            "expected codec_mclk_out or codec_mclk_in",
        )),
    }
}

fn chanmap<N: ConfigNode>(node: &N) -> IngestResult<Vec<u32>> {
    value::comma_list(node)?
        .iter()
        .map(|s| {
            let v = value::parse_int(node.id(), s)?;
            u32::try_from(v).map_err(|_| IngestError::invalid(node.id(), s, "negative slot"))
        })
        .collect()
}

pub(crate) fn parse_hw_config<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::HwConfig, node.id());
    let mut hw = HwConfig::default();

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "id" => hw.id = value::unsigned(child)?,
            "format" => {
                hw.fmt = hw_format(&value::string(child)?).map_err(|e| draft.type_error(e))?
            }
            "bclk" => hw.bclk_master = clock_master("bclk", &value::string(child)?)?,
            "fsync" => hw.fsync_master = clock_master("fsync", &value::string(child)?)?,
            "mclk" => hw.mclk_out = mclk_out(&value::string(child)?)?,
            "mclk_freq" => hw.mclk_rate = value::unsigned(child)?,
            "bclk_freq" => hw.bclk_rate = value::unsigned(child)?,
            "fsync_freq" => hw.fsync_rate = value::unsigned(child)?,
            "tdm_slots" => hw.tdm_slots = value::unsigned(child)?,
            "tdm_slot_width" => hw.tdm_slot_width = value::unsigned(child)?,
            "tx_slots" => hw.tx_slots = value::unsigned(child)?,
            "rx_slots" => hw.rx_slots = value::unsigned(child)?,
            "tx_chanmap" => {
                for slot in chanmap(child)? {
                    hw.push_tx_channel(slot).map_err(|e| draft.type_error(e))?;
                }
            }
            "rx_chanmap" => {
                for slot in chanmap(child)? {
                    hw.push_rx_channel(slot).map_err(|e| draft.type_error(e))?;
                }
            }
            "clock_gated" => hw.clock_gated = value::boolean(child)?,
            "bclk_invert" => hw.invert_bclk = value::boolean(child)?,
            "fsync_invert" => hw.invert_fsync = value::boolean(child)?,
            other => draft.unknown_key(session, other)?,
        }
    }

    draft.payload = Payload::HwConfig(hw);
    draft.commit(session)?;
    Ok(())
}

/// `SectionBE` and `SectionCC` share one layout.
pub(crate) fn parse_link<N: ConfigNode>(
    session: &mut CompilerSession,
    category: Category,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(category, node.id());
    let mut link = Link::new(node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "id" => link.id = value::unsigned(child)?,
            "stream_name" => link.stream_name = value::string(child)?,
            "cpu" => {
                let name = value::string(child)?;
                link.cpu = LinkComponent {
                    name: name.clone(),
                    dai_name: String::new(),
                };
                draft.reference(Category::Component, name);
            }
            "codecs" => {
                for name in value::string_list(child)? {
                    link.push_codec(LinkComponent {
                        name: name.clone(),
                        dai_name: String::new(),
                    })
                    .map_err(|e| draft.type_error(e))?;
                    draft.reference(Category::Component, name);
                }
            }
            "hw_configs" => {
                for name in value::string_list(child)? {
                    draft.reference(Category::HwConfig, name);
                }
            }
            "default_hw_conf_id" => link.default_hw_config_id = value::unsigned(child)?,
            "streams" => parse_streams(&mut draft, child, &mut link.streams)?,
            "flags" => parse_flags(&draft, child, &mut link.flag_mask, &mut link.flags)?,
            "data" => add_data_refs(&mut draft, child)?,
            _ => draft.header_key(session, child)?,
        }
    }

    draft.payload = Payload::Link(link);
    draft.commit(session)?;
    Ok(())
}
