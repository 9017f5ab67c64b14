/// Errors raised while constructing or validating wire-level values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// A fixed-size array inside a wire structure is already full.
    #[error("too many {what}: at most {max} allowed")]
    Capacity { what: &'static str, max: usize },

    /// A route line did not have the `source, control, sink` shape.
    #[error("malformed route {line:?}: {reason}")]
    MalformedRoute { line: String, reason: String },

    /// A symbolic name did not map to any known value.
    #[error("unknown {what} {name:?}")]
    UnknownName { what: &'static str, name: String },
}

/// Result alias for type-level operations.
pub type TypeResult<T> = Result<T, TypeError>;
