use thiserror::Error;

/// Errors surfaced by the query builder, transport and advisor.
#[derive(Error, Debug)]
pub enum CompassError {
    /// Missing credential or otherwise unusable settings. Never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or whitespace-only user input. No request is built.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request to Gemini failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Gemini response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gemini returned no text")]
    EmptyResponse,

    /// A request for this tab is still outstanding.
    #[error("A request for the '{0}' tab is already in progress")]
    Busy(String),
}

impl CompassError {
    /// True for failures of the external call itself (network, status, body).
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Json(_) | Self::EmptyResponse
        )
    }
}

pub type Result<T> = std::result::Result<T, CompassError>;
