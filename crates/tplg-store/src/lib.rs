//! Element storage and reference resolution for the audio topology compiler.
//!
//! A topology is a set of named, typed elements that refer to each other by
//! name. This crate holds them in an [`ElementStore`], records the by-name
//! dependencies on each element, and resolves them through a caller-supplied
//! merge step.
//!
//! # Design Rules
//!
//! 1. Elements are appended per category; insertion order is preserved and
//!    later becomes emission order.
//! 2. Lookup is exact on `(category, name)`; the first inserted match wins.
//! 3. A reference is resolved at most once; resolving again is a no-op.
//! 4. Payloads only grow, and only through [`Element::append`].
//! 5. All state lives in one [`CompilerSession`]; there is no global state.

pub mod element;
pub mod error;
pub mod refs;
pub mod session;
pub mod store;

pub use element::{Element, ElementId, Reference};
pub use error::{StoreError, StoreResult};
pub use session::{CompilerSession, SessionConfig};
pub use store::ElementStore;
