//! The build phase of the audio topology compiler.
//!
//! After ingestion every element holds a header and a list of by-name
//! references. Building walks the elements in a fixed sequence of passes,
//! resolves those references and merges each target into its owner: private
//! data is appended, TLVs and texts are copied into controls, controls are
//! embedded into widgets, capabilities and configurations are copied into
//! PCMs and links. The last pass validates the routing graph.
//!
//! # Quick Start
//!
//! ```rust
//! use tplg_build::build;
//! use tplg_store::{CompilerSession, SessionConfig};
//! use tplg_types::Category;
//!
//! let mut session = CompilerSession::new(SessionConfig::default()).unwrap();
//! let w = session.store.create(Category::Widget, "Speaker");
//! session.store.create(Category::Mixer, "Volume");
//! session.store.add_reference(w, Category::Mixer, "Volume").unwrap();
//!
//! let report = build(&mut session).unwrap();
//! assert_eq!(report.resolved(), 1);
//! ```

pub mod engine;
pub mod error;
pub mod merge;
pub mod pass;
pub mod passes;
pub mod validate;

pub use engine::{build, BuildReport, LinkEngine};
pub use error::{BuildError, BuildResult};
pub use merge::merge;
pub use pass::{BuildPass, PassReport, PassStats};
pub use validate::{check_route, validate_routes};
