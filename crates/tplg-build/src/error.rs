use tplg_store::StoreError;
use tplg_types::{Category, TypeError};

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Lookup miss, payload overflow, or other store-level failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A wire structure rejected a value (for example a full fixed array).
    #[error("{category} {element:?}: {source}")]
    Type {
        element: String,
        category: Category,
        #[source]
        source: TypeError,
    },

    /// An element carries more references of one kind than allowed.
    #[error("{category} {element:?}: too many {what} (max {max})")]
    Capacity {
        element: String,
        category: Category,
        what: &'static str,
        max: usize,
    },

    /// A reference resolved to an element that cannot be merged into its
    /// owner.
    #[error("cannot merge {target_category} {target:?} into {owner_category} {owner:?}")]
    TypeMismatch {
        owner: String,
        owner_category: Category,
        target: String,
        target_category: Category,
    },

    /// A control was already embedded into another widget.
    #[error("{category} {target:?} is already embedded elsewhere, cannot embed into widget {owner:?}")]
    AlreadyConsumed {
        owner: String,
        target: String,
        category: Category,
    },

    /// A route names an endpoint or control that does not exist.
    #[error("route \"{route}\": {role} {name:?} is not an existing {expected}")]
    RouteEndpoint {
        route: String,
        role: &'static str,
        name: String,
        expected: &'static str,
    },

    /// The build passes already ran on this session.
    #[error("session has already been built")]
    AlreadyBuilt,
}

/// Result alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;
