//! Scalar conversions shared by the section parsers.

use crate::error::{IngestError, IngestResult};
use crate::node::{ConfigNode, NodeKind};

/// Keys that carry annotations rather than data.
pub fn is_comment(id: &str) -> bool {
    id == "comment" || id.starts_with('#')
}

pub fn string<N: ConfigNode>(node: &N) -> IngestResult<String> {
    node.string_value()
        .map(|s| s.into_owned())
        .ok_or_else(|| IngestError::ExpectedScalar {
            id: node.id().to_string(),
        })
}

/// Children of a compound node, with comment entries removed.
pub fn children<N: ConfigNode>(node: &N) -> IngestResult<Vec<&N>> {
    if node.kind() != NodeKind::Compound {
        return Err(IngestError::ExpectedCompound {
            id: node.id().to_string(),
        });
    }
    Ok(node
        .children()
        .into_iter()
        .filter(|c| !is_comment(c.id()))
        .collect())
}

/// Decimal or `0x`-prefixed hexadecimal, optionally negative.
pub fn parse_int(key: &str, text: &str) -> IngestResult<i64> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    };
    let value = parsed.map_err(|e| IngestError::invalid(key, text, e.to_string()))?;
    Ok(if negative { -value } else { value })
}

pub fn integer<N: ConfigNode>(node: &N) -> IngestResult<i64> {
    parse_int(node.id(), &string(node)?)
}

pub fn unsigned<N: ConfigNode>(node: &N) -> IngestResult<u32> {
    let value = integer(node)?;
    u32::try_from(value).map_err(|_| {
        IngestError::invalid(node.id(), &value.to_string(), "out of range for u32")
    })
}

pub fn signed<N: ConfigNode>(node: &N) -> IngestResult<i32> {
    let value = integer(node)?;
    i32::try_from(value).map_err(|_| {
        IngestError::invalid(node.id(), &value.to_string(), "out of range for i32")
    })
}

pub fn short<N: ConfigNode>(node: &N) -> IngestResult<u16> {
    let value = integer(node)?;
    u16::try_from(value).map_err(|_| {
        IngestError::invalid(node.id(), &value.to_string(), "out of range for u16")
    })
}

pub fn parse_bool(key: &str, text: &str) -> IngestResult<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(IngestError::invalid(key, text, "expected a boolean")),
    }
}

pub fn boolean<N: ConfigNode>(node: &N) -> IngestResult<bool> {
    parse_bool(node.id(), &string(node)?)
}

/// A scalar is a one-item list; a compound lists its scalar children.
pub fn string_list<N: ConfigNode>(node: &N) -> IngestResult<Vec<String>> {
    match node.kind() {
        NodeKind::Scalar => Ok(vec![string(node)?]),
        NodeKind::Compound => children(node)?.into_iter().map(string).collect(),
    }
}

/// Split a comma separated scalar (or a list of them) into trimmed,
/// non-empty items.
pub fn comma_list<N: ConfigNode>(node: &N) -> IngestResult<Vec<String>> {
    Ok(string_list(node)?
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}
