//! Errors for the catalog HTTP boundary.
//!
//! The boundary normalizes every failure into [`CatalogError`]; nothing past
//! the client layer sees raw `reqwest` responses. The service never retries
//! or suppresses: callers surface a user-visible message and must not
//! conflate an `Err` with "no more results".

use thiserror::Error;

/// Errors that can occur when talking to the catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connection refused, timeout, no response).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status and a structured body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
        /// Field-level errors from the response body, verbatim.
        errors: Vec<String>,
    },

    /// The session was rejected (401, or the account is deactivated).
    ///
    /// Must propagate to the shared HTTP layer, which clears session state
    /// and redirects; the discovery pipeline never swallows this.
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// The response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl CatalogError {
    /// Whether this error must propagate to the session layer.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The message shown to the user for this error.
    ///
    /// Validation errors surface their `errors[]` verbatim (joined);
    /// transport and parse failures collapse to a generic retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message, errors, ..
            } => {
                if errors.is_empty() {
                    message.clone()
                } else {
                    errors.join("; ")
                }
            }
            Self::Auth(message) => message.clone(),
            Self::RateLimited(_) | Self::Http(_) | Self::Parse(_) => {
                "Failed to load products, please try again".to_string()
            }
        }
    }
}
