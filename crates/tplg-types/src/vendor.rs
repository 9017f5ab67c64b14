//! Vendor token tables and the typed tuple arrays built from them.

use bytes::BufMut;

use crate::error::{TypeError, TypeResult};
use crate::limits::{tuple_type, NAME_LEN};
use crate::wire::{put_name, wire_len};

/// A named table mapping token names to numeric token ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VendorTokens {
    pub tokens: Vec<(String, u32)>,
}

impl VendorTokens {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.tokens.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// Element type of a tuple array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TupleKind {
    Uuid,
    String,
    Bool,
    Byte,
    Short,
    Word,
}

impl TupleKind {
    pub fn from_name(name: &str) -> TypeResult<Self> {
        match name {
            "uuid" => Ok(Self::Uuid),
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            "byte" => Ok(Self::Byte),
            "short" => Ok(Self::Short),
            "word" => Ok(Self::Word),
            _ => Err(TypeError::UnknownName {
                what: "tuple type",
                name: name.to_string(),
            }),
        }
    }

    fn wire_type(self) -> u32 {
        match self {
            Self::Uuid => tuple_type::UUID,
            Self::String => tuple_type::STRING,
            Self::Bool => tuple_type::BOOL,
            Self::Byte => tuple_type::BYTE,
            Self::Short => tuple_type::SHORT,
            Self::Word => tuple_type::WORD,
        }
    }

    fn element_size(self) -> usize {
        match self {
            Self::Uuid => 4 + 16,
            Self::String => 4 + NAME_LEN,
            _ => 4 + 4,
        }
    }
}

/// A single tuple value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TupleValue {
    Uuid([u8; 16]),
    String(String),
    Number(u32),
}

/// One `token = value` pair. `token_id` is filled in when the owning tuple
/// set is bound to its token table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TupleEntry {
    pub token: String,
    pub token_id: Option<u32>,
    pub value: TupleValue,
}

/// A homogeneous group of tuples, encoded as one vendor array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TupleSet {
    pub kind: TupleKind,
    pub entries: Vec<TupleEntry>,
}

impl TupleSet {
    /// Encoded size of this set as a vendor array.
    pub fn wire_size(&self) -> usize {
        12 + self.entries.len() * self.kind.element_size()
    }

    /// Append the vendor array encoding. Every entry must be bound.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> TypeResult<()> {
        buf.put_u32_le(wire_len(self.wire_size()));
        buf.put_u32_le(self.kind.wire_type());
        buf.put_u32_le(wire_len(self.entries.len()));
        for entry in &self.entries {
            let token = entry.token_id.ok_or_else(|| TypeError::UnknownName {
                what: "vendor token",
                name: entry.token.clone(),
            })?;
            buf.put_u32_le(token);
            match &entry.value {
                TupleValue::Uuid(uuid) => buf.put_slice(uuid),
                TupleValue::String(s) => put_name(buf, s),
                TupleValue::Number(n) => buf.put_u32_le(*n),
            }
        }
        Ok(())
    }
}

/// Tuple sets declared against one token table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VendorTuples {
    pub sets: Vec<TupleSet>,
}

impl VendorTuples {
    /// Resolve every entry's token id against `tokens`.
    ///
    /// Returns the name of the first token missing from the table.
    pub fn bind(&mut self, tokens: &VendorTokens) -> Result<(), String> {
        for entry in self.sets.iter_mut().flat_map(|s| s.entries.iter_mut()) {
            match tokens.get(&entry.token) {
                Some(id) => entry.token_id = Some(id),
                None => return Err(entry.token.clone()),
            }
        }
        Ok(())
    }

    /// Encode every set as consecutive vendor arrays.
    pub fn to_bytes(&self) -> TypeResult<Vec<u8>> {
        let mut buf = Vec::new();
        for set in &self.sets {
            set.encode_into(&mut buf)?;
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(token: &str, value: u32) -> TupleEntry {
        TupleEntry {
            token: token.into(),
            token_id: None,
            value: TupleValue::Number(value),
        }
    }

    #[test]
    fn bound_word_set_encodes() {
        let tokens = VendorTokens {
            tokens: vec![("SOF_TKN_A".into(), 100), ("SOF_TKN_B".into(), 101)],
        };
        let mut tuples = VendorTuples {
            sets: vec![TupleSet {
                kind: TupleKind::Word,
                entries: vec![word("SOF_TKN_A", 7), word("SOF_TKN_B", 9)],
            }],
        };
        tuples.bind(&tokens).unwrap();
        let bytes = tuples.to_bytes().unwrap();
        assert_eq!(bytes.len(), 12 + 2 * 8);
        assert_eq!(&bytes[0..4], &28u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &tuple_type::WORD.to_le_bytes());
        assert_eq!(&bytes[8..12], &2u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &100u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &7u32.to_le_bytes());
    }

    #[test]
    fn missing_token_is_reported_by_name() {
        let mut tuples = VendorTuples {
            sets: vec![TupleSet {
                kind: TupleKind::Word,
                entries: vec![word("MISSING", 1)],
            }],
        };
        assert_eq!(tuples.bind(&VendorTokens::default()), Err("MISSING".to_string()));
    }

    #[test]
    fn unbound_entries_refuse_to_encode() {
        let tuples = VendorTuples {
            sets: vec![TupleSet {
                kind: TupleKind::Byte,
                entries: vec![word("X", 1)],
            }],
        };
        assert!(tuples.to_bytes().is_err());
    }
}
