//! Private data, text lists, vendor tokens and tuples, and the manifest.

use tplg_store::CompilerSession;
use tplg_types::{
    Category, Payload, TextList, TupleEntry, TupleKind, TupleSet, TupleValue, VendorTokens,
    VendorTuples,
};
use tracing::debug;

use crate::draft::Draft;
use crate::error::{IngestError, IngestResult};
use crate::node::{ConfigNode, NodeKind};
use crate::value;

/// Parse a list of hex values, each `width` bytes wide, into little-endian
/// bytes. The `0x` prefix is optional.
fn hex_values<N: ConfigNode>(node: &N, width: usize) -> IngestResult<Vec<u8>> {
    let limit = if width == 4 {
        u64::from(u32::MAX)
    } else {
        (1u64 << (8 * width)) - 1
    };
    let mut out = Vec::new();
    for item in value::comma_list(node)? {
        let digits = item
            .strip_prefix("0x")
            .or_else(|| item.strip_prefix("0X"))
            .unwrap_or(&item);
        let parsed = u64::from_str_radix(digits, 16)
            .map_err(|e| IngestError::invalid(node.id(), &item, e.to_string()))?;
        if parsed > limit {
            return Err(IngestError::invalid(
                node.id(),
                &item,
                format!("does not fit in {width} byte(s)"),
            ));
        }
        out.extend_from_slice(&parsed.to_le_bytes()[..width]);
    }
    Ok(out)
}

pub(crate) fn parse_data<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::PrivateData, node.id());

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "bytes" => draft.private.extend(hex_values(child, 1)?),
            "shorts" => draft.private.extend(hex_values(child, 2)?),
            "words" => draft.private.extend(hex_values(child, 4)?),
            "file" => {
                let path = session.config().data_dir.join(value::string(child)?);
                let bytes =
                    std::fs::read(&path).map_err(|source| IngestError::Io { path, source })?;
                debug!(name = node.id(), len = bytes.len(), "read data file");
                draft.private.extend(bytes);
            }
            "tuples" => {
                for name in value::string_list(child)? {
                    draft.reference(Category::VendorTuple, name);
                }
            }
            other => draft.unknown_key(session, other)?,
        }
    }

    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_text<N: ConfigNode>(session: &mut CompilerSession, node: &N) -> IngestResult<()> {
    let mut draft = Draft::new(Category::Text, node.id());
    let mut texts = TextList::default();

    for child in value::children(node)? {
        match child.id() {
            "index" => draft.index = value::unsigned(child)?,
            "values" => {
                for text in value::string_list(child)? {
                    texts.push(&text).map_err(|e| draft.type_error(e))?;
                }
            }
            other => draft.unknown_key(session, other)?,
        }
    }

    draft.payload = Payload::Text(texts);
    draft.commit(session)?;
    Ok(())
}

pub(crate) fn parse_tokens<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::VendorToken, node.id());
    let mut tokens = VendorTokens::default();
    for child in value::children(node)? {
        tokens
            .tokens
            .push((child.id().to_string(), value::unsigned(child)?));
    }
    draft.payload = Payload::Tokens(tokens);
    draft.commit(session)?;
    Ok(())
}

/// `aa:bb:...` or `aa,bb,...`, sixteen hex bytes.
fn parse_uuid(key: &str, text: &str) -> IngestResult<[u8; 16]> {
    let parts: Vec<&str> = text.split([':', ',']).map(str::trim).collect();
    let mut uuid = [0u8; 16];
    if parts.len() != uuid.len() {
        return Err(IngestError::invalid(key, text, "a UUID needs 16 bytes"));
    }
    for (slot, part) in uuid.iter_mut().zip(parts) {
        let digits = part.strip_prefix("0x").unwrap_or(part);
        *slot = u8::from_str_radix(digits, 16)
            .map_err(|e| IngestError::invalid(key, text, e.to_string()))?;
    }
    Ok(uuid)
}

fn tuple_value<N: ConfigNode>(kind: TupleKind, node: &N) -> IngestResult<TupleValue> {
    let key = node.id();
    let bounded = |max: u32| -> IngestResult<TupleValue> {
        let v = value::integer(node)?;
        u32::try_from(v)
            .ok()
            .filter(|v| *v <= max)
            .map(TupleValue::Number)
            .ok_or_else(|| IngestError::invalid(key, &v.to_string(), format!("exceeds {max:#x}")))
    };
    match kind {
        TupleKind::Uuid => Ok(TupleValue::Uuid(parse_uuid(key, &value::string(node)?)?)),
        TupleKind::String => Ok(TupleValue::String(value::string(node)?)),
        TupleKind::Bool => Ok(TupleValue::Number(u32::from(value::boolean(node)?))),
        TupleKind::Byte => bounded(u32::from(u8::MAX)),
        TupleKind::Short => bounded(u32::from(u16::MAX)),
        TupleKind::Word => bounded(u32::MAX),
    }
}

fn tuple_set<N: ConfigNode>(kind: TupleKind, node: &N) -> IngestResult<TupleSet> {
    let entries = value::children(node)?
        .into_iter()
        .map(|entry| {
            Ok(TupleEntry {
                token: entry.id().to_string(),
                token_id: None,
                value: tuple_value(kind, entry)?,
            })
        })
        .collect::<IngestResult<Vec<_>>>()?;
    Ok(TupleSet { kind, entries })
}

pub(crate) fn parse_tuples<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let mut draft = Draft::new(Category::VendorTuple, node.id());
    let mut tuples = VendorTuples::default();

    for child in value::children(node)? {
        match child.id() {
            "tokens" => draft.reference(Category::VendorToken, value::string(child)?),
            "tuples" => {
                for group in value::children(child)? {
                    // `word.set1` names a set of kind `word`.
                    let prefix = group.id().split('.').next().unwrap_or_default();
                    let kind = TupleKind::from_name(prefix).map_err(|e| draft.type_error(e))?;
                    let nested = value::children(group)?
                        .iter()
                        .all(|c| c.kind() == NodeKind::Compound);
                    if nested && !group.children().is_empty() {
                        for set in value::children(group)? {
                            tuples.sets.push(tuple_set(kind, set)?);
                        }
                    } else {
                        tuples.sets.push(tuple_set(kind, group)?);
                    }
                }
            }
            other => draft.unknown_key(session, other)?,
        }
    }

    draft.payload = Payload::Tuples(tuples);
    draft.commit(session)?;
    Ok(())
}

/// Every manifest section adds to the session's single manifest element.
pub(crate) fn parse_manifest<N: ConfigNode>(
    session: &mut CompilerSession,
    node: &N,
) -> IngestResult<()> {
    let section = Draft::new(Category::Manifest, node.id());
    let mut data = Vec::new();
    for child in value::children(node)? {
        match child.id() {
            "data" => data.extend(value::string_list(child)?),
            other => section.unknown_key(session, other)?,
        }
    }

    let id = session.manifest_id();
    for name in data {
        session.store.add_reference(id, Category::PrivateData, &name)?;
    }
    Ok(())
}
