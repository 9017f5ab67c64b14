use tplg_types::Category;

use crate::element::ElementId;

/// Errors from the element store and reference ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A reference named an element that does not exist.
    #[error("{owner_category} {owner:?} references missing {target_category} {target:?}")]
    UnresolvedReference {
        owner: String,
        owner_category: Category,
        target: String,
        target_category: Category,
    },

    /// An element id did not point into the store.
    #[error("no element at {0}")]
    UnknownElement(ElementId),

    /// An element referenced itself.
    #[error("{category} {name:?} references itself")]
    SelfReference { name: String, category: Category },

    /// Growing a payload would exceed the 32-bit size field.
    #[error("payload of {category} {name:?} would exceed {limit} bytes")]
    PayloadOverflow {
        name: String,
        category: Category,
        limit: u32,
    },

    /// Topology blobs are little-endian and this host is not.
    #[error("refusing to compile on a big-endian host")]
    UnsupportedHost,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
