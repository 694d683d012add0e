//! Error types for the card generation pipeline

use thiserror::Error;

/// Main error type for all pipeline operations
#[derive(Error, Debug)]
pub enum CardpressError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid job: {0}")]
    InvalidJob(String),

    #[error("Unsupported template kind: {0}")]
    UnsupportedTemplate(String),

    #[error("Render function rejected the request: {0}")]
    BadInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Chunk {chunk} failed to render: {message}")]
    Render { chunk: u32, message: String },

    #[error("Merge operation failed: {0}")]
    Merge(String),

    #[error("Malformed document: {0}")]
    Document(String),

    #[error("Artifact store error: {0}")]
    Storage(String),

    #[error("Job timed out: {0}")]
    Timeout(String),
}

impl CardpressError {
    /// Errors the render retry loop must not spend attempts on.
    ///
    /// A definitive rejection of the request body will fail identically
    /// on every attempt; everything else (timeouts, throttling, cold
    /// starts) is treated as transient.
    pub fn is_fatal_for_retry(&self) -> bool {
        matches!(
            self,
            CardpressError::BadInput(_)
                | CardpressError::InvalidJob(_)
                | CardpressError::UnsupportedTemplate(_)
        )
    }
}

impl From<cardpress_types::UnknownTemplateKind> for CardpressError {
    fn from(err: cardpress_types::UnknownTemplateKind) -> Self {
        CardpressError::UnsupportedTemplate(err.0)
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, CardpressError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_input_is_fatal_for_retry() {
        assert!(CardpressError::BadInput("unknown template".into()).is_fatal_for_retry());
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(!CardpressError::Storage("connection reset".into()).is_fatal_for_retry());
        assert!(!CardpressError::Render {
            chunk: 3,
            message: "429 Too Many Requests".into()
        }
        .is_fatal_for_retry());
    }
}
