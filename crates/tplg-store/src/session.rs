use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tplg_types::{Category, Manifest, Payload};

use crate::element::ElementId;
use crate::error::{StoreError, StoreResult};
use crate::store::ElementStore;

/// Knobs that apply to one compilation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Version written into block headers of elements that carry none.
    pub version: u32,
    /// Directory that relative `file` data sources are read from.
    pub data_dir: PathBuf,
    /// Reject unknown sections and keys instead of skipping them.
    pub strict: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: 0,
            data_dir: PathBuf::from("."),
            strict: false,
        }
    }
}

/// All state of a single compilation run.
///
/// The session owns the element store; every stage of the compiler borrows
/// it in turn. Nothing outlives the session.
#[derive(Debug)]
pub struct CompilerSession {
    pub store: ElementStore,
    config: SessionConfig,
    manifest: Option<ElementId>,
    built: bool,
}

impl CompilerSession {
    /// Start a session. Fails on big-endian hosts.
    pub fn new(config: SessionConfig) -> StoreResult<Self> {
        if cfg!(target_endian = "big") {
            return Err(StoreError::UnsupportedHost);
        }
        Ok(Self {
            store: ElementStore::new(),
            config,
            manifest: None,
            built: false,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn version(&self) -> u32 {
        self.config.version
    }

    pub fn set_version(&mut self, version: u32) {
        self.config.version = version;
    }

    /// The single manifest element, created on first use.
    pub fn manifest_id(&mut self) -> ElementId {
        match self.manifest {
            Some(id) => id,
            None => {
                let id = self.store.create(Category::Manifest, "manifest");
                self.manifest = Some(id);
                id
            }
        }
    }

    /// The manifest element, if one has been created.
    pub fn existing_manifest(&self) -> Option<ElementId> {
        self.manifest
    }

    /// Mutable access to the manifest counters.
    pub fn manifest_mut(&mut self) -> StoreResult<&mut Manifest> {
        let id = self.manifest_id();
        match &mut self.store.get_mut(id)?.payload {
            Payload::Manifest(manifest) => Ok(manifest),
            _ => Err(StoreError::UnknownElement(id)),
        }
    }

    /// Whether the build passes have already run on this session.
    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn mark_built(&mut self) {
        self.built = true;
    }
}
