/// Convenience result type used across circuitar.
pub type CircuitarResult<T> = Result<T, CircuitarError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Experiment-level conditions (unmapped markers, missing files, ...) are not reported through
/// this type while a session is running; see [`crate::ExperimentError`].
#[derive(thiserror::Error, Debug)]
pub enum CircuitarError {
    /// Invalid user-provided configuration or experiment data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure while reading an experiment definition or asset.
    #[error("load error: {0}")]
    Load(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors raised by the raster compositor.
    #[error("composite error: {0}")]
    Composite(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CircuitarError {
    /// Build a [`CircuitarError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CircuitarError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`CircuitarError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`CircuitarError::Composite`] value.
    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }
}

impl From<serde_json::Error> for CircuitarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
