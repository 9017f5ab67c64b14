//! Ingestion: turning a config tree or object templates into elements.
//!
//! Ingestion only creates elements, fills in their headers and records
//! their by-name references. Nothing is resolved here; that is the job of
//! the build passes.
//!
//! Two front doors exist:
//!
//! - [`parse_tree`] walks any [`ConfigNode`] tree, section by section.
//!   [`ConfigTree`] is the bundled tree, read from TOML.
//! - [`add_object`] creates one element (or a widget with its controls)
//!   from an [`ObjectTemplate`].

pub mod error;
pub mod node;
pub mod parser;
pub mod template;
pub mod value;

mod ctl;
mod dapm;
mod data;
mod draft;
mod pcm;

use std::path::Path;

use tplg_store::CompilerSession;

pub use error::{IngestError, IngestResult};
pub use node::{ConfigNode, ConfigTree, ConfigValue, NodeKind};
pub use parser::{parse_tree, IngestStats};
pub use template::{
    add_object, BeDaiTemplate, BytesTemplate, ChannelTemplate, ComponentTemplate,
    ControlTemplate, DbScaleTemplate, EnumTemplate, GraphTemplate, HwConfigTemplate, LinkKind,
    LinkTemplate, MixerTemplate, ObjectTemplate, OpsTemplate, PcmTemplate, RouteTemplate,
    StreamCapsTemplate, StreamTemplate, WidgetControl, WidgetTemplate,
};

/// Parse a TOML topology document and ingest it.
pub fn load_str(session: &mut CompilerSession, source: &str) -> IngestResult<IngestStats> {
    let tree = ConfigTree::from_toml_str(source)?;
    parse_tree(session, &tree)
}

/// Read and ingest a TOML topology file.
pub fn load_file(session: &mut CompilerSession, path: &Path) -> IngestResult<IngestStats> {
    let source = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(session, &source)
}
