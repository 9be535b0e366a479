/// Convenience result type used across pagespot.
pub type PagespotResult<T> = Result<T, PagespotError>;

/// Top-level error taxonomy.
///
/// Geometry, navigation and state transitions are total and never produce one of these;
/// only manifest transport, configuration and persistence boundaries do.
#[derive(thiserror::Error, Debug)]
pub enum PagespotError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Manifest could not be fetched or parsed; no partial manifest is accepted.
    #[error("manifest unavailable: {0}")]
    ManifestUnavailable(String),

    /// Session storage read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PagespotError {
    /// Build a [`PagespotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PagespotError::ManifestUnavailable`] value.
    pub fn manifest_unavailable(msg: impl Into<String>) -> Self {
        Self::ManifestUnavailable(msg.into())
    }

    /// Build a [`PagespotError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`PagespotError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
