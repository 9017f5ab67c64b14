use std::path::Path;

use tplg_store::SessionConfig;
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Read a [`SessionConfig`] from a TOML file. Missing keys take their
/// defaults.
pub fn load_config(path: &Path) -> SdkResult<SessionConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| SdkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text).map_err(|source| SdkError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), ?config, "loaded session config");
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<SessionConfig, toml::de::Error> {
    toml::from_str(text)
}
