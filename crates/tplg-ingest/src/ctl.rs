//! `SectionTLV` and the three control sections.

use tplg_store::CompilerSession;
use tplg_types::names::{channel_id, control_op};
use tplg_types::{
    BytesControl, Category, ChannelMap, ControlOps, EnumControl, MixerControl, Payload, Tlv,
};

use crate::draft::Draft;
use crate::error::{IngestError, IngestResult};
use crate::node::ConfigNode;
use crate::value;

pub(crate) fn parse_tlv<N: ConfigNode>(session: &mut CompilerSession, node: &N) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Tlv, node.id());
    let mut tlv = Tlv::default();

    for child in value::children(node)? {
        match child.id() {
            "scale" => {
                let (mut min, mut step, mut mute) = (0, 0, 0);
                for item in value::children(child)? {
                    match item.id() {
                        "min" => min = value::signed(item)?,
                        "step" => step = value::signed(item)?,
                        "mute" => mute = value::signed(item)?,
                        other => draft.unknown_key(session, other)?,
                    }
                }
                tlv = Tlv::db_scale(min, step, mute);
            }
            "index" => draft.index = value::unsigned(child)?,
            other => draft.unknown_key(session, other)?,
        }
    }

    draft.payload = Payload::Tlv(tlv);
    draft.commit(session)?;
    Ok(())
}

/// `channel.<name> { reg shift }` entries, one map per child.
fn parse_channels<N: ConfigNode>(
    session: &CompilerSession,
    draft: &Draft,
    node: &N,
) -> IngestResult<Vec<ChannelMap>> {
    let mut maps = Vec::new();
    for child in value::children(node)? {
        let id = channel_id(child.id()).map_err(|e| draft.type_error(e))?;
        let mut map = ChannelMap {
            id,
            ..ChannelMap::default()
        };
        for item in value::children(child)? {
            match item.id() {
                "reg" => map.reg = value::signed(item)?,
                "shift" => map.shift = value::unsigned(item)?,
                other => draft.unknown_key(session, other)?,
            }
        }
        maps.push(map);
    }
    Ok(maps)
}

/// `ops.<name> { info get put }`. Handlers are names or numbers.
fn parse_ops<N: ConfigNode>(
    session: &CompilerSession,
    draft: &Draft,
    node: &N,
) -> IngestResult<ControlOps> {
    let mut ops = ControlOps::default();
    // The ops block may be wrapped in a named child, as in `ops."ctl" { ... }`.
    let mut items = Vec::new();
    for child in value::children(node)? {
        match child.id() {
            "info" | "get" | "put" => items.push(child),
            _ => items.extend(value::children(child)?),
        }
    }
    for item in items {
        let handler = control_op(&value::string(item)?).map_err(|e| draft.type_error(e))?;
        match item.id() {
            "info" => ops.info = handler,
            "get" => ops.get = handler,
            "put" => ops.put = handler,
            other => draft.unknown_key(session, other)?,
        }
    }
    Ok(ops)
}

fn add_data_refs<N: ConfigNode>(draft: &mut Draft, node: &N) -> IngestResult<()> {
    for name in value::string_list(node)? {
        draft.reference(Category::PrivateData, name);
    }
    Ok(())
}

pub(crate) fn parse_mixer<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Mixer, node.id());
    let mut mixer = MixerControl::new(node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "channel" => {
                for map in parse_channels(session, &draft, child)? {
                    mixer.push_channel(map).map_err(|e| draft.type_error(e))?;
                }
            }
            "ops" => mixer.hdr.ops = parse_ops(session, &draft, child)?,
            "max" => mixer.max = value::signed(child)?,
            "invert" => mixer.invert = u32::from(value::boolean(child)?),
            "tlv" => draft.reference(Category::Tlv, value::string(child)?),
            "data" => add_data_refs(&mut draft, child)?,
            _ => draft.header_key(session, child)?,
        }
    }

    draft.payload = Payload::Mixer(mixer);
    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_enum<N: ConfigNode>(session: &mut CompilerSession, node: &N) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Enum, node.id());
    let mut control = EnumControl::new(node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "texts" => draft.reference(Category::Text, value::string(child)?),
            "channel" => {
                for map in parse_channels(session, &draft, child)? {
                    control.push_channel(map).map_err(|e| draft.type_error(e))?;
                }
            }
            "ops" => control.hdr.ops = parse_ops(session, &draft, child)?,
            "data" => add_data_refs(&mut draft, child)?,
            _ => draft.header_key(session, child)?,
        }
    }

    draft.payload = Payload::Enum(control);
    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_bytes<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Bytes, node.id());
    let mut control = BytesControl::new(node.id());
    let mut data_refs = 0usize;

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "base" => control.base = value::unsigned(child)?,
            "num_regs" => control.num_regs = value::unsigned(child)?,
            "max" => control.max = value::unsigned(child)?,
            "mask" => control.mask = value::unsigned(child)?,
            "tlv" => draft.reference(Category::Tlv, value::string(child)?),
            "ops" => control.hdr.ops = parse_ops(session, &draft, child)?,
            "extops" => control.ext_ops = parse_ops(session, &draft, child)?,
            "data" => {
                let names = value::string_list(child)?;
                data_refs += names.len();
                for name in names {
                    draft.reference(Category::PrivateData, name);
                }
            }
            _ => draft.header_key(session, child)?,
        }
    }

    if data_refs > 1 {
        return Err(IngestError::Element {
            category: Category::Bytes,
            name: draft.name,
            source: tplg_types::TypeError::Capacity {
                what: "data sections per bytes control",
                max: 1,
            },
        });
    }

    draft.payload = Payload::Bytes(control);
    draft.commit(session)?;
    Ok(())
}
