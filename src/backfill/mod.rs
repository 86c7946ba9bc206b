//! One-shot scan of a repository's history for issue references.
//!
//! The scanner visits its sources strictly in this order, one page at a time:
//!
//! 1. Local commit messages (`git log`), when a checkout is configured
//! 2. Pull requests, open and closed (title, body)
//! 3. Issues, open and closed (title, body)
//! 4. Issue comments
//! 5. Review comments
//!
//! Every text is filtered to the team's identifiers and merged into one
//! first-seen-order list, so the result is stable for a given repository
//! state. Any failure aborts the scan; a partial list would silently skip
//! issues.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::git::{GitError, log_messages};
use crate::github::{GitHubClient, GitHubError};
use crate::identifiers::IdentifierCollector;
use crate::types::{TeamKey, null_as_empty};

/// A code-host listing identifiers are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteSource {
    PullRequests,
    Issues,
    IssueComments,
    ReviewComments,
}

impl RemoteSource {
    /// In scan order.
    pub const ALL: [RemoteSource; 4] = [
        RemoteSource::PullRequests,
        RemoteSource::Issues,
        RemoteSource::IssueComments,
        RemoteSource::ReviewComments,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RemoteSource::PullRequests => "pull requests",
            RemoteSource::Issues => "issues",
            RemoteSource::IssueComments => "issue comments",
            RemoteSource::ReviewComments => "review comments",
        }
    }

    /// Listing path under the repository.
    fn path(self) -> &'static str {
        match self {
            RemoteSource::PullRequests => "/pulls?state=all",
            RemoteSource::Issues => "/issues?state=all",
            RemoteSource::IssueComments => "/issues/comments",
            RemoteSource::ReviewComments => "/pulls/comments",
        }
    }
}

impl fmt::Display for RemoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that end a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan git log: {0}")]
    Git(#[from] GitError),

    #[error("scan {source_name}: {error}")]
    Remote {
        source_name: RemoteSource,
        #[source]
        error: GitHubError,
    },
}

/// Pull requests and issues: both carry a title and a body.
#[derive(Debug, Deserialize)]
struct TitledItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    body: String,
}

#[derive(Debug, Deserialize)]
struct Comment {
    #[serde(default, deserialize_with = "null_as_empty")]
    body: String,
}

/// Scans one repository for a team's identifiers.
#[derive(Debug, Clone)]
pub struct RepoScanner {
    client: GitHubClient,
    git_dir: Option<PathBuf>,
}

impl RepoScanner {
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            git_dir: None,
        }
    }

    /// Also read commit messages from the checkout at `dir`.
    pub fn with_git_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.git_dir = Some(dir.into());
        self
    }

    pub fn git_dir(&self) -> Option<&std::path::Path> {
        self.git_dir.as_deref()
    }

    /// Returns every identifier of `team_key` referenced anywhere in the
    /// repository, deduplicated, in the order first encountered.
    pub async fn scan_repo(&self, team_key: &TeamKey) -> Result<Vec<String>, ScanError> {
        let mut collector = IdentifierCollector::new(team_key.clone());
        let mut before = 0;

        if let Some(dir) = &self.git_dir {
            info!(dir = %dir.display(), "Scanning git log");
            let log = log_messages(dir).await?;
            collector.collect(&log);
            log_progress("git log", &collector, &mut before);
        }

        for source in RemoteSource::ALL {
            info!(repo = %self.client.repo(), source = %source, "Scanning");
            self.scan_remote(source, &mut collector)
                .await
                .map_err(|error| ScanError::Remote {
                    source_name: source,
                    error,
                })?;
            log_progress(source.name(), &collector, &mut before);
        }

        Ok(collector.into_identifiers())
    }

    async fn scan_remote(
        &self,
        source: RemoteSource,
        collector: &mut IdentifierCollector,
    ) -> Result<usize, GitHubError> {
        let path = source.path();
        match source {
            RemoteSource::PullRequests | RemoteSource::Issues => {
                self.client
                    .for_each_item(source.name(), path, |item: TitledItem| {
                        collector.collect(&item.title);
                        collector.collect(&item.body);
                    })
                    .await
            }
            RemoteSource::IssueComments | RemoteSource::ReviewComments => {
                self.client
                    .for_each_item(source.name(), path, |comment: Comment| {
                        collector.collect(&comment.body);
                    })
                    .await
            }
        }
    }
}

fn log_progress(source: &str, collector: &IdentifierCollector, before: &mut usize) {
    info!(
        source = %source,
        new_ids = collector.len() - *before,
        total_ids = collector.len(),
        "Finished source"
    );
    *before = collector.len();
}
