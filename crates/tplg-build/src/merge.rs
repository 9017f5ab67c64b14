//! Category-pair merge rules applied when a reference resolves.
//!
//! [`merge`] is the single dispatch point: it looks at the owner and target
//! categories and applies the matching copy rule. Pairings not listed are
//! type mismatches.

use tplg_store::{Element, StoreError};
use tplg_types::wire::wire_len;
use tplg_types::{Category, Payload, TypeError};
use tracing::debug;

use crate::error::{BuildError, BuildResult};

/// Merge `target` into `owner` according to their categories.
pub fn merge(owner: &mut Element, target: &mut Element) -> BuildResult<()> {
    match (owner.category, target.category) {
        (_, Category::PrivateData) => append_private_data(owner, target),
        (Category::Mixer | Category::Bytes, Category::Tlv) => copy_tlv(owner, target),
        (Category::Enum, Category::Text) => copy_texts(owner, target),
        (Category::Widget, Category::Mixer | Category::Enum) => embed_control(owner, target),
        (Category::Pcm | Category::BeDai, Category::StreamCaps) => copy_stream_caps(owner, target),
        (Category::Pcm | Category::BackendLink | Category::CodecLink, Category::StreamConfig) => {
            copy_stream_config(owner, target)
        }
        (Category::BackendLink | Category::CodecLink, Category::Component) => {
            copy_component(owner, target)
        }
        (Category::BackendLink | Category::CodecLink, Category::HwConfig) => {
            copy_hw_config(owner, target)
        }
        (Category::VendorTuple, Category::VendorToken) => bind_tokens(owner, target),
        (Category::PrivateData, Category::VendorTuple) => append_tuples(owner, target),
        _ => Err(mismatch(owner, target)),
    }
}

pub(crate) fn mismatch(owner: &Element, target: &Element) -> BuildError {
    BuildError::TypeMismatch {
        owner: owner.name.clone(),
        owner_category: owner.category,
        target: target.name.clone(),
        target_category: target.category,
    }
}

fn type_error(elem: &Element, source: TypeError) -> BuildError {
    BuildError::Type {
        element: elem.name.clone(),
        category: elem.category,
        source,
    }
}

/// Append the blob verbatim and account for it in `priv_size`.
fn append_private_data(owner: &mut Element, target: &Element) -> BuildResult<()> {
    if owner.payload.priv_size_mut().is_none() {
        return Err(mismatch(owner, target));
    }
    let blob = target.tail();
    owner.append(blob)?;
    if let Some(priv_size) = owner.payload.priv_size_mut() {
        *priv_size = priv_size.saturating_add(wire_len(blob.len()));
    }
    debug!(owner = %owner.name, data = %target.name, len = blob.len(), "appended private data");
    Ok(())
}

fn copy_tlv(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let tlv = match &target.payload {
        Payload::Tlv(tlv) => *tlv,
        _ => return Err(mismatch(owner, target)),
    };
    match &mut owner.payload {
        Payload::Mixer(mixer) => mixer.set_tlv(tlv),
        Payload::Bytes(bytes) => bytes.set_tlv(tlv),
        _ => return Err(mismatch(owner, target)),
    }
    Ok(())
}

fn copy_texts(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let texts = match &target.payload {
        Payload::Text(list) => &list.texts,
        _ => return Err(mismatch(owner, target)),
    };
    let result = match &mut owner.payload {
        Payload::Enum(ctl) => ctl.set_texts(texts),
        _ => return Err(mismatch(owner, target)),
    };
    result.map_err(|e| type_error(owner, e))
}

/// Append the control's complete current payload to the widget and claim
/// the control.
fn embed_control(owner: &mut Element, target: &mut Element) -> BuildResult<()> {
    if !matches!(owner.payload, Payload::Widget(_)) {
        return Err(mismatch(owner, target));
    }
    if target.consumed {
        return Err(BuildError::AlreadyConsumed {
            owner: owner.name.clone(),
            target: target.name.clone(),
            category: target.category,
        });
    }

    let bytes = target.payload_bytes();
    owner.append(&bytes)?;
    if let Payload::Widget(widget) = &mut owner.payload {
        widget.num_kcontrols += 1;
    }
    target.consumed = true;
    debug!(widget = %owner.name, control = %target.name, len = bytes.len(), "embedded control");
    Ok(())
}

fn copy_stream_caps(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let caps = match &target.payload {
        Payload::StreamCaps(caps) => caps,
        _ => return Err(mismatch(owner, target)),
    };
    let slots = match &mut owner.payload {
        Payload::Pcm(pcm) => &mut pcm.caps,
        Payload::BeDai(dai) => &mut dai.caps,
        _ => return Err(mismatch(owner, target)),
    };
    let mut copied = 0;
    for slot in slots.iter_mut().filter(|s| s.name == target.name) {
        *slot = caps.clone();
        copied += 1;
    }
    debug!(owner = %owner.name, caps = %target.name, copied, "copied stream caps");
    Ok(())
}

fn copy_stream_config(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let config = match &target.payload {
        Payload::StreamConfig(config) => config,
        _ => return Err(mismatch(owner, target)),
    };
    let streams = match &mut owner.payload {
        Payload::Pcm(pcm) => &mut pcm.streams,
        Payload::Link(link) => &mut link.streams,
        _ => return Err(mismatch(owner, target)),
    };
    for slot in streams.iter_mut().filter(|s| s.name == target.name) {
        *slot = config.clone();
    }
    Ok(())
}

/// Fill every CPU/codec slot naming this component. The display name is
/// only taken when the component has one; the DAI name always is.
fn copy_component(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let component = match &target.payload {
        Payload::Component(component) => component,
        _ => return Err(mismatch(owner, target)),
    };
    let link = match &mut owner.payload {
        Payload::Link(link) => link,
        _ => return Err(mismatch(owner, target)),
    };
    let slots = std::iter::once(&mut link.cpu).chain(link.codecs.iter_mut());
    for slot in slots.filter(|c| c.name == target.name) {
        if !component.name.is_empty() {
            slot.name = component.name.clone();
        }
        slot.dai_name = component.dai_name.clone();
    }
    Ok(())
}

fn copy_hw_config(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let config = match &target.payload {
        Payload::HwConfig(config) => config,
        _ => return Err(mismatch(owner, target)),
    };
    let result = match &mut owner.payload {
        Payload::Link(link) => link.push_hw_config(config.clone()),
        _ => return Err(mismatch(owner, target)),
    };
    result.map_err(|e| type_error(owner, e))
}

fn bind_tokens(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let tokens = match &target.payload {
        Payload::Tokens(tokens) => tokens,
        _ => return Err(mismatch(owner, target)),
    };
    let outcome = match &mut owner.payload {
        Payload::Tuples(tuples) => tuples.bind(tokens),
        _ => return Err(mismatch(owner, target)),
    };
    outcome.map_err(|token| {
        BuildError::Store(StoreError::UnresolvedReference {
            owner: owner.name.clone(),
            owner_category: owner.category,
            target: format!("{}.{token}", target.name),
            target_category: Category::VendorToken,
        })
    })
}

fn append_tuples(owner: &mut Element, target: &Element) -> BuildResult<()> {
    let tuples = match &target.payload {
        Payload::Tuples(tuples) => tuples,
        _ => return Err(mismatch(owner, target)),
    };
    if !matches!(owner.payload, Payload::Data) {
        return Err(mismatch(owner, target));
    }
    let bytes = tuples.to_bytes().map_err(|e| type_error(target, e))?;
    owner.append(&bytes)?;
    debug!(data = %owner.name, tuples = %target.name, len = bytes.len(), "appended vendor tuples");
    Ok(())
}
