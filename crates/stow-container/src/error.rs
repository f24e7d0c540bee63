use stow_types::TypeError;

/// Errors raised while translating values to and from a container's layout.
///
/// The [`Container`](crate::Container) trait itself never returns these:
/// its operations treat a failure as "absent" (on read) or "not persisted"
/// (on write). Backends surface them through their own fallible methods.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Archive encoding or decoding failed.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// JSON encoding or decoding of a codable payload failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored entry does not have the layout the operation expects.
    #[error("unexpected layout for {key}: expected {expected}")]
    Layout { key: String, expected: &'static str },
}

/// Result alias for container layout operations.
pub type ContainerResult<T> = Result<T, ContainerError>;
