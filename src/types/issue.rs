//! Tracker issue types.
//!
//! An [`Issue`] is a read-only snapshot of the tracker's view of a work item.
//! Every fetch produces a fresh value; nothing in this crate mutates one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the label that marks an issue as publicly visible.
pub const PUBLIC_LABEL: &str = "public";

/// A tracker issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Opaque tracker ID, used for mutations.
    pub id: String,

    /// Human identifier (e.g. `MIR-42`).
    pub identifier: String,

    pub title: String,

    /// Markdown description. Empty when the issue has none.
    pub description: String,

    pub state: WorkflowState,

    /// Tracker priority (0 = none, 1 = urgent ... 4 = low).
    pub priority: u8,

    pub labels: Vec<Label>,

    pub attachments: Vec<Attachment>,

    /// Canonical tracker URL.
    pub url: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Returns true if the issue carries a label with exactly this name.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// Returns true if the issue carries the public label.
    pub fn is_public(&self) -> bool {
        self.has_label(PUBLIC_LABEL)
    }

    /// Attachments that link to a code-host pull request, in attachment order.
    pub fn github_prs(&self) -> Vec<&Attachment> {
        self.attachments
            .iter()
            .filter(|a| a.is_github_pull_request())
            .collect()
    }
}

/// Workflow state of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub name: String,
    pub color: String,

    /// State category: backlog, unstarted, started, completed or cancelled.
    #[serde(rename = "type")]
    pub category: String,
}

/// A tracker label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// A link attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub title: String,
}

impl Attachment {
    fn is_github_pull_request(&self) -> bool {
        let Some(rest) = self
            .url
            .strip_prefix("https://github.com/")
            .or_else(|| self.url.strip_prefix("http://github.com/"))
        else {
            return false;
        };
        // owner/repo/pull/<n>
        let mut parts = rest.split('/');
        matches!(
            (parts.next(), parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(repo), Some("pull"), Some(n))
                if !owner.is_empty() && !repo.is_empty() && !n.is_empty()
        )
    }
}
