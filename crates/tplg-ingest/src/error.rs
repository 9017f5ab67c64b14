use std::path::PathBuf;

use tplg_store::StoreError;
use tplg_types::{Category, TypeError};

/// Errors raised while turning a config tree or template into elements.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// A scalar appeared where a block of keys was expected.
    #[error("{id:?}: expected a compound node")]
    ExpectedCompound { id: String },

    /// A block appeared where a single value was expected.
    #[error("{id:?}: expected a scalar value")]
    ExpectedScalar { id: String },

    /// A scalar could not be interpreted.
    #[error("{key:?}: invalid value {value:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Unknown top-level section (strict mode only).
    #[error("unknown section {0:?}")]
    UnknownSection(String),

    /// Unknown key inside a section (strict mode only).
    #[error("{section} {name:?}: unknown key {key:?}")]
    UnknownKey {
        section: Category,
        name: String,
        key: String,
    },

    /// A second element with the same category and name.
    #[error("duplicate {category} {name:?}")]
    Duplicate { category: Category, name: String },

    /// A wire structure rejected a value.
    #[error("{category} {name:?}: {source}")]
    Element {
        category: Category,
        name: String,
        #[source]
        source: TypeError,
    },

    /// Elements cannot be added once the build passes have run.
    #[error("session has already been built")]
    AlreadyBuilt,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl IngestError {
    pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for ingestion.
pub type IngestResult<T> = Result<T, IngestError>;
