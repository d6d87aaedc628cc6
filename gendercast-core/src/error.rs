use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenderCastError {
    /// The submitted name was empty or whitespace only.
    #[error("input cannot be empty")]
    EmptyInput,

    /// No model is loaded, so no prediction can be made.
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// The classification capability itself failed.
    #[error("classifier failure: {0}")]
    ClassifierFailure(String),

    /// IO-related failures (file not found, unreadable, etc.)
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The model artifact is not valid JSON for the expected shape.
    #[error("malformed model artifact: {0}")]
    MalformedArtifact(String),

    /// The model artifact parsed but violates a model invariant.
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),
}

impl GenderCastError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            reason: reason.into(),
        }
    }

    /// Errors raised while acquiring a model, as opposed to using one.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::MalformedArtifact(_) | Self::InvalidArtifact(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GenderCastError>;
