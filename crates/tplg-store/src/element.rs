use std::fmt;

use tplg_types::{Category, Payload};

use crate::error::{StoreError, StoreResult};

/// Stable handle to an element: its category plus its position in that
/// category's insertion-ordered list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub category: Category,
    pub index: usize,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.category, self.index)
    }
}

/// A by-name dependency from one element on another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub target: String,
    pub category: Category,
    pub resolved: bool,
}

/// One named, typed record in the topology under construction.
#[derive(Clone, Debug)]
pub struct Element {
    pub name: String,
    pub category: Category,
    pub index: u32,
    pub vendor_version: u32,
    pub vendor_type: u32,
    pub payload: Payload,
    /// Bytes appended after the fixed header: private data, then any
    /// embedded control payloads.
    tail: Vec<u8>,
    pub references: Vec<Reference>,
    /// Set once the element has been folded into a parent; consumed
    /// elements are not emitted on their own.
    pub consumed: bool,
}

impl Element {
    pub fn new(category: Category, name: &str) -> Self {
        Self {
            name: name.to_string(),
            category,
            index: 0,
            vendor_version: 0,
            vendor_type: 0,
            payload: Payload::for_category(category, name),
            tail: Vec::new(),
            references: Vec::new(),
            consumed: false,
        }
    }

    /// Header size plus tail length.
    pub fn payload_size(&self) -> usize {
        self.payload.wire_size() + self.tail.len()
    }

    pub fn tail(&self) -> &[u8] {
        &self.tail
    }

    /// Grow the tail by `bytes` and return the new payload size.
    pub fn append(&mut self, bytes: &[u8]) -> StoreResult<usize> {
        let new_size = self.payload_size() + bytes.len();
        if u32::try_from(new_size).is_err() {
            return Err(StoreError::PayloadOverflow {
                name: self.name.clone(),
                category: self.category,
                limit: u32::MAX,
            });
        }
        self.tail.extend_from_slice(bytes);
        Ok(new_size)
    }

    /// Full payload: encoded header followed by the tail.
    pub fn payload_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.payload_size());
        self.payload.encode_into(&mut buf);
        buf.extend_from_slice(&self.tail);
        buf
    }

    /// Unresolved references, in declaration order.
    pub fn pending_references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| !r.resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tplg_types::{MixerControl, WireFormat};

    #[test]
    fn new_element_has_header_only_payload() {
        let elem = Element::new(Category::Mixer, "Master");
        assert_eq!(elem.payload_size(), MixerControl::WIRE_SIZE);
        assert!(elem.tail().is_empty());
        assert!(!elem.consumed);
    }

    #[test]
    fn payload_bytes_are_header_then_tail() {
        let mut elem = Element::new(Category::PrivateData, "blob");
        elem.append(&[1, 2, 3]).unwrap();
        assert_eq!(elem.payload_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn element_id_display() {
        let id = ElementId {
            category: Category::Widget,
            index: 3,
        };
        assert_eq!(id.to_string(), "widget#3");
    }

    proptest! {
        #[test]
        fn append_grows_by_blob_length(
            first in proptest::collection::vec(any::<u8>(), 0..64),
            blob in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let mut elem = Element::new(Category::Widget, "w");
            elem.append(&first).unwrap();
            let before = elem.payload_size();
            let after = elem.append(&blob).unwrap();
            prop_assert_eq!(after, before + blob.len());
            prop_assert_eq!(elem.payload_size(), after);
            let bytes = elem.payload_bytes();
            prop_assert_eq!(&bytes[bytes.len() - blob.len()..], blob.as_slice());
        }
    }
}
