use std::error::Error as StdError;
use thiserror::Error;

use crate::types::ErrorBody;

/// Result type alias for Flashduty operations
pub type Result<T> = std::result::Result<T, FlashDutyError>;

/// Errors that can occur when pushing alert events to Flashduty
#[derive(Debug, Error)]
pub enum FlashDutyError {
    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Failed to build the runtime backing a blocking push
    #[error("Failed to build blocking runtime: {0}")]
    BlockingRuntime(#[source] std::io::Error),

    /// No integration key was available at call time
    ///
    /// Raised before any network I/O when neither the event, the client,
    /// nor the process-wide configuration carries a key.
    #[error("No integration key available: call set_key() or provide one on the client or event")]
    MissingIntegrationKey,

    /// Alert event violates a documented field limit
    #[error("Invalid alert event: {0}")]
    Validation(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest_middleware::Error),

    /// Flashduty API returned an error response
    #[error("Flashduty API error: HTTP {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body of a success status was not a valid push response
    #[error("Failed to decode API response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FlashDutyError {
    /// Check if the error is retryable
    ///
    /// Returns `true` for:
    /// - Network/connection errors
    /// - Timeout errors
    /// - Server errors (5xx status codes)
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(source) => {
                if let Some(reqwest_err) = StdError::source(source) {
                    if let Some(err) = reqwest_err.downcast_ref::<reqwest::Error>() {
                        return err.is_connect() || err.is_timeout();
                    }
                }
                false
            }
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Decode the structured error body carried by an [`Api`] error
    ///
    /// Returns `None` for other variants, or when the body does not match
    /// the documented `{request_id, error: {code, message}}` shape.
    ///
    /// [`Api`]: FlashDutyError::Api
    pub fn api_error(&self) -> Option<ErrorBody> {
        match self {
            Self::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}
