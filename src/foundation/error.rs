/// Convenience result type used across laserfx.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// None of these abort a render: the chain executor catches them per instance and turns the
/// failing instance into a passthrough for the current frame.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Invalid user-provided definition or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A parameter value could not be resolved against its spec.
    #[error("parameter error: {0}")]
    Parameter(String),

    /// Invalid curve control points or LUT request.
    #[error("curve error: {0}")]
    Curve(String),

    /// Invalid keyframe modulator state.
    #[error("keyframe error: {0}")]
    Keyframe(String),

    /// Chain tree addressing or structural errors.
    #[error("chain error: {0}")]
    Chain(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Parameter`] value.
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }

    /// Build a [`FxError::Curve`] value.
    pub fn curve(msg: impl Into<String>) -> Self {
        Self::Curve(msg.into())
    }

    /// Build a [`FxError::Keyframe`] value.
    pub fn keyframe(msg: impl Into<String>) -> Self {
        Self::Keyframe(msg.into())
    }

    /// Build a [`FxError::Chain`] value.
    pub fn chain(msg: impl Into<String>) -> Self {
        Self::Chain(msg.into())
    }

    /// Build a [`FxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
