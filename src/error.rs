// SPDX-License-Identifier: MIT

//! Typed error handling for femiverse
//!
//! `FemiverseError` covers the questionnaire, configuration and session
//! surfaces. `ModelError` is kept separate so a failed language-model call
//! can always be told apart from everything else and answered with the
//! fallback reply instead of aborting the conversation.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for femiverse
#[derive(Debug, Error)]
pub enum FemiverseError {
    /// An answer that does not fit the question it targets
    #[error("Invalid answer for '{question}': {reason}")]
    InvalidAnswer { question: String, reason: String },

    /// Questionnaire session id not known to the store
    #[error("Session '{0}' not found")]
    SessionNotFound(Uuid),

    /// Configuration errors (missing env vars, invalid config, bad rule book)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report generation was requested for a transcript with nothing in it
    #[error("Report error: {0}")]
    Report(String),

    /// Language-model failures
    #[error(transparent)]
    Model(#[from] ModelError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured for provider: {0}")]
    ApiKeyMissing(String),

    /// Upstream answered with a non-success status
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// Upstream refused to answer (safety filters and the like)
    #[error("Response blocked: {0}")]
    Blocked(String),

    /// Invalid response from model
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    /// Request never completed
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl FemiverseError {
    /// Create an invalid answer error
    pub fn invalid_answer(question: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAnswer {
            question: question.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl ModelError {
    /// Create a status error
    pub fn status(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    /// HTTP status the relay should answer with when this error reaches it
    pub fn http_status(&self) -> u16 {
        match self {
            ModelError::ApiKeyMissing(_) => 400,
            ModelError::Status { status, .. } if *status >= 400 => *status,
            _ => 502,
        }
    }
}

pub type Result<T> = std::result::Result<T, FemiverseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_answer_message() {
        let err = FemiverseError::invalid_answer("age_group", "not an option");
        assert_eq!(
            err.to_string(),
            "Invalid answer for 'age_group': not an option"
        );
    }

    #[test]
    fn test_model_error_is_distinguishable() {
        let err: FemiverseError = ModelError::Blocked("SAFETY".into()).into();
        assert!(matches!(err, FemiverseError::Model(ModelError::Blocked(_))));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ModelError::ApiKeyMissing("Gemini".into()).http_status(), 400);
        assert_eq!(ModelError::status("Gemini", 429, "slow down").http_status(), 429);
        assert_eq!(
            ModelError::InvalidResponse("no candidates".into()).http_status(),
            502
        );
    }
}
