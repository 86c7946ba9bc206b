//! Free-text extraction from webhook payloads.
//!
//! Each event type carries its human-written text in different fields. The
//! extractor pulls those fields out and ignores everything else, so the rest
//! of the pipeline only ever sees plain strings.
//!
//! | event                         | fields                    |
//! |-------------------------------|---------------------------|
//! | `push`                        | every commit message      |
//! | `pull_request`                | title, body               |
//! | `issues`                      | title, body               |
//! | `issue_comment`               | comment body              |
//! | `pull_request_review`         | review body               |
//! | `pull_request_review_comment` | comment body              |
//!
//! Unknown event types and payloads that do not decode yield no text. This is
//! never an error: a delivery we cannot read simply references nothing.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::types::null_as_empty;

/// Event types that carry text worth scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Push,
    PullRequest,
    Issues,
    IssueComment,
    PullRequestReview,
    PullRequestReviewComment,
}

impl EventKind {
    /// Maps an `X-GitHub-Event` value to a kind, or `None` for events we ignore.
    pub fn from_header(event_type: &str) -> Option<Self> {
        match event_type {
            "push" => Some(EventKind::Push),
            "pull_request" => Some(EventKind::PullRequest),
            "issues" => Some(EventKind::Issues),
            "issue_comment" => Some(EventKind::IssueComment),
            "pull_request_review" => Some(EventKind::PullRequestReview),
            "pull_request_review_comment" => Some(EventKind::PullRequestReviewComment),
            _ => None,
        }
    }
}

/// Returns the free-text fields of `payload` for the given event type.
///
/// # Examples
///
/// ```
/// use issue_bridge::webhooks::extract_texts;
///
/// let payload = br#"{"pull_request": {"title": "Fix MIR-42", "body": null}}"#;
/// assert_eq!(extract_texts("pull_request", payload), ["Fix MIR-42", ""]);
///
/// assert!(extract_texts("star", payload).is_empty());
/// assert!(extract_texts("push", b"not json").is_empty());
/// ```
pub fn extract_texts(event_type: &str, payload: &[u8]) -> Vec<String> {
    let Some(kind) = EventKind::from_header(event_type) else {
        return Vec::new();
    };

    match kind {
        EventKind::Push => decode::<PushPayload>(payload)
            .map(|p| p.commits.into_iter().map(|c| c.message).collect())
            .unwrap_or_default(),
        EventKind::PullRequest => decode::<PullRequestPayload>(payload)
            .map(|p| p.pull_request.into_texts())
            .unwrap_or_default(),
        EventKind::Issues => decode::<IssuesPayload>(payload)
            .map(|p| p.issue.into_texts())
            .unwrap_or_default(),
        EventKind::IssueComment | EventKind::PullRequestReviewComment => {
            decode::<CommentPayload>(payload)
                .map(|p| vec![p.comment.body])
                .unwrap_or_default()
        }
        EventKind::PullRequestReview => decode::<ReviewPayload>(payload)
            .map(|p| vec![p.review.body])
            .unwrap_or_default(),
    }
}

fn decode<T: DeserializeOwned>(payload: &[u8]) -> Option<T> {
    serde_json::from_slice(payload).ok()
}

// ============================================================================
// Raw payload shapes
//
// Only the text fields are modelled. Missing objects and fields default to
// empty, and `null` strings decode as empty.
// ============================================================================

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(default)]
    commits: Vec<RawCommit>,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    #[serde(default, deserialize_with = "null_as_empty")]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct TitledBody {
    #[serde(default, deserialize_with = "null_as_empty")]
    title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    body: String,
}

impl TitledBody {
    fn into_texts(self) -> Vec<String> {
        vec![self.title, self.body]
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawBody {
    #[serde(default, deserialize_with = "null_as_empty")]
    body: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    #[serde(default)]
    pull_request: TitledBody,
}

#[derive(Debug, Deserialize)]
struct IssuesPayload {
    #[serde(default)]
    issue: TitledBody,
}

#[derive(Debug, Deserialize)]
struct CommentPayload {
    #[serde(default)]
    comment: RawBody,
}

#[derive(Debug, Deserialize)]
struct ReviewPayload {
    #[serde(default)]
    review: RawBody,
}
