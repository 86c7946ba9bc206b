//! Tracker API error types.
//!
//! Every failure talking to the tracker is an upstream error and is propagated
//! to the caller unchanged. "Issue not found" is never an error: fetches return
//! `Ok(None)` for it.

use thiserror::Error;

use crate::types::IdentifierError;

/// An error from the tracker API or from preparing a request to it.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The identifier could not be split into team key and number.
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("tracker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The tracker answered with a non-success HTTP status.
    #[error("tracker API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The tracker answered 200 but reported GraphQL errors.
    #[error("tracker API error: {0}")]
    GraphQl(String),

    /// The response body did not have the expected shape.
    #[error("decode tracker response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_includes_code_and_body() {
        let err = TrackerError::Status {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.to_string(), "tracker API returned 401: unauthorized");
    }

    #[test]
    fn invalid_identifier_is_transparent() {
        let err = TrackerError::from(IdentifierError::MissingSeparator("NOSPACE".into()));
        assert_eq!(err.to_string(), "invalid identifier format: NOSPACE");
    }
}
