//! Issue read endpoint.
//!
//! Serves tracker issues through the TTL cache. Only issues carrying the
//! public label are shown in full; any other existing issue of the team gets
//! a stub so callers can tell "private" from "unknown".

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use super::AppState;
use crate::tracker::{IssueFetcher, TrackerError};
use crate::types::{Attachment, Issue, TeamKey};

/// Upper bound on a cache lookup, including any tracker round trip.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the issue endpoint.
#[derive(Debug, Error)]
pub enum IssueError {
    /// Not an identifier of this team, or no such issue.
    #[error("issue not found: {0}")]
    NotFound(String),

    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("tracker lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        match &self {
            IssueError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            IssueError::Tracker(_) | IssueError::Timeout(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Response body.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum IssueView {
    /// The issue exists but is not public.
    Stub { identifier: String, public: bool },

    /// A public issue with its linked pull requests.
    Public {
        #[serde(flatten)]
        issue: Issue,
        public: bool,
        pull_requests: Vec<Attachment>,
    },
}

impl IssueView {
    fn from_issue(identifier: String, issue: Issue) -> Self {
        if !issue.is_public() {
            return IssueView::Stub {
                identifier,
                public: false,
            };
        }

        let pull_requests = issue.github_prs().into_iter().cloned().collect();
        IssueView::Public {
            issue,
            public: true,
            pull_requests,
        }
    }
}

/// Issue handler.
///
/// # Response
///
/// - 200 OK: the issue (full if public, stub otherwise)
/// - 404 Not Found: not a `TEAM-<digits>` identifier, or no such issue
/// - 500 Internal Server Error: tracker failure or timeout
pub async fn issue_handler<L, F>(
    State(app_state): State<AppState<L, F>>,
    Path(identifier): Path<String>,
) -> Result<Json<IssueView>, IssueError>
where
    L: Send + Sync + 'static,
    F: IssueFetcher + Send + Sync + 'static,
{
    let identifier = identifier.to_uppercase();

    if !is_team_identifier(app_state.team_key(), &identifier) {
        return Err(IssueError::NotFound(identifier));
    }

    let lookup = tokio::time::timeout(LOOKUP_TIMEOUT, app_state.cache().get(&identifier)).await;
    let issue = match lookup {
        Ok(Ok(issue)) => issue,
        Ok(Err(e)) => {
            error!(identifier = %identifier, error = %e, "Failed to fetch issue");
            return Err(e.into());
        }
        Err(_) => {
            error!(identifier = %identifier, "Issue lookup timed out");
            return Err(IssueError::Timeout(LOOKUP_TIMEOUT));
        }
    };

    let Some(issue) = issue else {
        return Err(IssueError::NotFound(identifier));
    };

    if issue.is_public() {
        info!(identifier = %identifier, "Serving issue");
    }
    Ok(Json(IssueView::from_issue(identifier, issue)))
}

/// True if `identifier` is exactly `<TEAM>-<digits>`.
fn is_team_identifier(team_key: &TeamKey, identifier: &str) -> bool {
    identifier
        .strip_prefix(team_key.prefix().as_str())
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::server::build_router;
    use crate::server::test_support::test_state;
    use crate::tracker::fake::FakeTracker;
    use crate::types::issue::fixtures::issue;

    async fn get(tracker: Arc<FakeTracker>, path: &str) -> (StatusCode, serde_json::Value) {
        let app = build_router(test_state(None, Arc::default(), tracker));
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[test]
    fn team_identifier_shape() {
        let team = TeamKey::new("MIR");
        assert!(is_team_identifier(&team, "MIR-1"));
        assert!(is_team_identifier(&team, "MIR-0042"));
        assert!(!is_team_identifier(&team, "MIR-"));
        assert!(!is_team_identifier(&team, "MIR-1a"));
        assert!(!is_team_identifier(&team, "ENG-1"));
        assert!(!is_team_identifier(&team, "MIRX-1"));
        assert!(!is_team_identifier(&team, "mir-1"));
    }

    #[tokio::test]
    async fn public_issue_is_served_in_full() {
        let tracker = Arc::new(FakeTracker::default());
        let mut public = issue("MIR-42", &["public"]);
        public.attachments = vec![
            Attachment {
                url: "https://github.com/mirendev/runtime/pull/12".into(),
                title: "Add cache".into(),
            },
            Attachment {
                url: "https://example.com/doc".into(),
                title: "Design doc".into(),
            },
        ];
        tracker.insert(public);

        let (status, json) = get(tracker, "/api/v1/issues/MIR-42").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["identifier"], "MIR-42");
        assert_eq!(json["public"], true);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["state"]["type"], "unstarted");
        assert_eq!(json["pull_requests"].as_array().unwrap().len(), 1);
        assert_eq!(json["pull_requests"][0]["title"], "Add cache");
    }

    #[tokio::test]
    async fn private_issue_is_a_stub() {
        let tracker = Arc::new(FakeTracker::default());
        tracker.insert(issue("MIR-7", &["bug"]));

        let (status, json) = get(tracker, "/api/v1/issues/MIR-7").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({ "identifier": "MIR-7", "public": false })
        );
    }

    #[tokio::test]
    async fn lower_case_path_is_normalized() {
        let tracker = Arc::new(FakeTracker::default());
        tracker.insert(issue("MIR-7", &["public"]));

        let (status, json) = get(tracker.clone(), "/api/v1/issues/mir-7").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["identifier"], "MIR-7");
        assert_eq!(tracker.calls().len(), 1);
    }

    #[tokio::test]
    async fn other_team_is_not_found_without_fetching() {
        let tracker = Arc::new(FakeTracker::default());

        let (status, _) = get(tracker.clone(), "/api/v1/issues/ENG-1").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(tracker.issue_fetches(), 0);
    }

    #[tokio::test]
    async fn unknown_issue_is_not_found() {
        let tracker = Arc::new(FakeTracker::default());

        let (status, _) = get(tracker.clone(), "/api/v1/issues/MIR-404").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(tracker.issue_fetches(), 1);
    }

    #[tokio::test]
    async fn tracker_error_is_internal() {
        let tracker = Arc::new(FakeTracker::default());
        tracker.set_fail_fetch_issue(true);

        let (status, _) = get(tracker, "/api/v1/issues/MIR-1").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
