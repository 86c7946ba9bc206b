//! Code-host API error types.
//!
//! Listings are read in a one-shot batch, so there is no transient/permanent
//! split: every failure ends the scan and is reported with the URL that
//! produced it.

use thiserror::Error;

/// An error from a code-host REST request.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced a response, or its body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The page body was not the expected JSON array.
    #[error("decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GitHubError {
    /// HTTP status, when the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Status { status, .. } => Some(*status),
            GitHubError::Transport(e) => e.status().map(|s| s.as_u16()),
            GitHubError::Decode { .. } => None,
        }
    }
}
