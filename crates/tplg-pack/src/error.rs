use std::path::PathBuf;

use thiserror::Error;
use tplg_store::StoreError;
use tplg_types::Category;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("session has not been built")]
    NotBuilt,

    #[error("{category} {name:?}: payload of {size} bytes does not fit a block")]
    PayloadTooLarge {
        name: String,
        category: Category,
        size: usize,
    },

    #[error("{0} elements have no block type")]
    UnsupportedCategory(Category),

    #[error("corrupt block at offset {offset}: {reason}")]
    CorruptBlock { offset: usize, reason: String },

    #[error("cannot commit output to {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PackResult<T> = Result<T, PackError>;
