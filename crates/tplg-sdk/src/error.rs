use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("topology has already been built")]
    AlreadyBuilt,

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] tplg_store::StoreError),

    #[error("ingest error: {0}")]
    Ingest(#[from] tplg_ingest::IngestError),

    #[error("build error: {0}")]
    Build(#[from] tplg_build::BuildError),

    #[error("output error: {0}")]
    Pack(#[from] tplg_pack::PackError),
}

pub type SdkResult<T> = Result<T, SdkError>;
