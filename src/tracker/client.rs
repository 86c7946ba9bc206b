//! GraphQL client for the Linear issue tracker.
//!
//! Implements the tracker capability traits with three operations:
//! - `IssueByIdentifier` query (team key + number filter)
//! - `LabelByName` query (team key + label name filter)
//! - `AddLabel` mutation

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::error::TrackerError;
use super::{IssueFetcher, LabelAdder, LabelLookup};
use crate::types::{Attachment, Identifier, Issue, Label, TeamKey, WorkflowState};

/// Production GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.linear.app/graphql";

/// Per-request timeout for tracker calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ─── GraphQL documents ────────────────────────────────────────────────────────

const ISSUE_BY_IDENTIFIER_QUERY: &str = r#"
query IssueByIdentifier($teamKey: String!, $number: Float!) {
  issues(
    filter: {
      team: { key: { eq: $teamKey } }
      number: { eq: $number }
    }
    first: 1
  ) {
    nodes {
      id
      identifier
      title
      description
      url
      priority
      createdAt
      updatedAt
      state {
        name
        color
        type
      }
      labels {
        nodes {
          id
          name
          color
        }
      }
      attachments {
        nodes {
          url
          title
        }
      }
    }
  }
}
"#;

const LABEL_BY_NAME_QUERY: &str = r#"
query LabelByName($teamKey: String!, $labelName: String!) {
  issueLabels(
    filter: {
      team: { key: { eq: $teamKey } }
      name: { eq: $labelName }
    }
    first: 1
  ) {
    nodes {
      id
      name
    }
  }
}
"#;

const ADD_LABEL_MUTATION: &str = r#"
mutation AddLabel($issueID: String!, $labelID: String!) {
  issueAddLabel(id: $issueID, labelId: $labelID) {
    success
  }
}
"#;

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IssuesData {
    issues: Nodes<RawIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssue {
    id: String,
    identifier: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    priority: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    state: RawState,
    labels: Nodes<RawLabel>,
    attachments: Nodes<RawAttachment>,
}

#[derive(Debug, Deserialize)]
struct RawState {
    name: String,
    #[serde(default)]
    color: String,
    #[serde(rename = "type", default)]
    category: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    id: String,
    name: String,
    #[serde(default)]
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawAttachment {
    url: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelsData {
    issue_labels: Nodes<LabelId>,
}

#[derive(Debug, Deserialize)]
struct LabelId {
    id: String,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            id: raw.id,
            identifier: raw.identifier,
            title: raw.title,
            description: raw.description.unwrap_or_default(),
            state: WorkflowState {
                name: raw.state.name,
                color: raw.state.color,
                category: raw.state.category,
            },
            priority: raw.priority,
            labels: raw
                .labels
                .nodes
                .into_iter()
                .map(|l| Label {
                    id: l.id,
                    name: l.name,
                    color: l.color,
                })
                .collect(),
            attachments: raw
                .attachments
                .nodes
                .into_iter()
                .map(|a| Attachment {
                    url: a.url,
                    title: a.title,
                })
                .collect(),
            url: raw.url,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Linear GraphQL client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct LinearClient {
    api_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl LinearClient {
    /// Creates a client against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, TrackerError> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Creates a client against a custom endpoint (tests, proxies).
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs a GraphQL document and decodes its `data` member as `T`.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, TrackerError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let envelope: GraphQlResponse = serde_json::from_slice(&body)?;
        if let Some(first) = envelope.errors.into_iter().next() {
            return Err(TrackerError::GraphQl(first.message));
        }
        let data = envelope
            .data
            .ok_or_else(|| TrackerError::GraphQl("response has no data".to_string()))?;

        Ok(serde_json::from_value(data)?)
    }
}

impl std::fmt::Debug for LinearClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl IssueFetcher for LinearClient {
    async fn fetch_issue(&self, identifier: &str) -> Result<Option<Issue>, TrackerError> {
        let id = Identifier::parse(identifier)?;
        debug!(identifier = %id, "Fetching issue");

        let data: IssuesData = self
            .execute(
                ISSUE_BY_IDENTIFIER_QUERY,
                json!({
                    "teamKey": id.team_key(),
                    "number": id.number() as f64,
                }),
            )
            .await?;

        Ok(data.issues.nodes.into_iter().next().map(Issue::from))
    }
}

impl LabelLookup for LinearClient {
    async fn fetch_label_by_name(
        &self,
        team_key: &TeamKey,
        name: &str,
    ) -> Result<Option<String>, TrackerError> {
        let data: LabelsData = self
            .execute(
                LABEL_BY_NAME_QUERY,
                json!({
                    "teamKey": team_key.as_str(),
                    "labelName": name,
                }),
            )
            .await?;

        Ok(data.issue_labels.nodes.into_iter().next().map(|l| l.id))
    }
}

impl LabelAdder for LinearClient {
    async fn add_label(&self, issue_id: &str, label_id: &str) -> Result<(), TrackerError> {
        let _: serde_json::Value = self
            .execute(
                ADD_LABEL_MUTATION,
                json!({
                    "issueID": issue_id,
                    "labelID": label_id,
                }),
            )
            .await?;
        Ok(())
    }
}
