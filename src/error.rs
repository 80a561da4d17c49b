use thiserror::Error;

/// Errors surfaced by the `forestry` API boundary.
///
/// `InvalidArgument` and `Unimplemented` are caller mistakes and are always
/// returned as `Err`. `Internal` marks a broken invariant inside the engine
/// itself; debug builds additionally `debug_assert!` at the same call sites
/// so the condition is caught close to its source rather than bubbling up
/// through a `Result`.
#[derive(Debug, Error)]
pub enum ForestError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    #[error("internal invariant violated: {0}")]
    Internal(String),

    #[cfg(feature = "serde")]
    #[error("persistence error: {0}")]
    Persist(String),
}

impl ForestError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ForestError::InvalidArgument(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        ForestError::Internal(msg.into())
    }
}
