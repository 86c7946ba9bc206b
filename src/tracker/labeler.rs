//! Applies the public label to issues that lack it.
//!
//! For each identifier the labeler:
//! 1. Fetches the issue live (never through the cache: the decision must see
//!    the current label set)
//! 2. Stops if the issue does not exist or is already public
//! 3. Resolves the public label's ID (once per labeler, see below)
//! 4. Adds the label
//!
//! The label ID is resolved at most once per [`PublicLabeler`]. The first
//! caller performs the lookup while every concurrent caller waits on it, and
//! the outcome (ID or error) is kept for the labeler's lifetime. A team with
//! no public label is a configuration error and is never retried.
//!
//! The per-issue fetch/apply sequence is not serialized: two concurrent calls
//! for the same issue may both add the label, which the tracker treats as a
//! no-op.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use super::error::TrackerError;
use super::{IssueFetcher, LabelAdder, LabelLookup};
use crate::types::{PUBLIC_LABEL, TeamKey};

/// Why the public label's ID could not be resolved.
///
/// Cloneable so that every caller sharing the one resolution gets the same
/// error.
#[derive(Debug, Clone, Error)]
pub enum ResolveLabelError {
    /// The team has no label with this name.
    #[error("label {label:?} not found in team {team}")]
    NotFound { label: &'static str, team: TeamKey },

    /// The lookup itself failed.
    #[error("resolve label {label:?}: {source}")]
    Upstream {
        label: &'static str,
        #[source]
        source: Arc<TrackerError>,
    },
}

/// Errors from ensuring an issue carries the public label.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("fetch issue {identifier}: {source}")]
    FetchIssue {
        identifier: String,
        #[source]
        source: TrackerError,
    },

    #[error(transparent)]
    ResolveLabel(#[from] ResolveLabelError),

    #[error("add label to {identifier}: {source}")]
    AddLabel {
        identifier: String,
        #[source]
        source: TrackerError,
    },
}

/// What ensuring the public label did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    /// The tracker has no such issue.
    NotFound,
    /// The issue was already public.
    AlreadyLabeled,
    /// The label was added.
    Applied,
}

/// Makes an issue public if it is not already.
pub trait Labeler {
    fn ensure_public_label(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<LabelOutcome, LabelError>> + Send;
}

/// [`Labeler`] backed by the tracker capability traits.
pub struct PublicLabeler<C> {
    client: C,
    team_key: TeamKey,
    label_id: OnceCell<Result<String, ResolveLabelError>>,
}

impl<C> PublicLabeler<C>
where
    C: IssueFetcher + LabelLookup + LabelAdder + Send + Sync,
{
    pub fn new(client: C, team_key: TeamKey) -> Self {
        Self {
            client,
            team_key,
            label_id: OnceCell::new(),
        }
    }

    pub fn team_key(&self) -> &TeamKey {
        &self.team_key
    }

    /// Returns the public label's ID, looking it up on first use.
    ///
    /// Concurrent first calls share a single lookup.
    pub async fn resolve_label_id(&self) -> Result<&str, ResolveLabelError> {
        let resolution = self
            .label_id
            .get_or_init(|| async {
                match self
                    .client
                    .fetch_label_by_name(&self.team_key, PUBLIC_LABEL)
                    .await
                {
                    Ok(Some(id)) => Ok(id),
                    Ok(None) => Err(ResolveLabelError::NotFound {
                        label: PUBLIC_LABEL,
                        team: self.team_key.clone(),
                    }),
                    Err(e) => Err(ResolveLabelError::Upstream {
                        label: PUBLIC_LABEL,
                        source: Arc::new(e),
                    }),
                }
            })
            .await;

        resolution.as_deref().map_err(Clone::clone)
    }
}

impl<C> Labeler for PublicLabeler<C>
where
    C: IssueFetcher + LabelLookup + LabelAdder + Send + Sync,
{
    async fn ensure_public_label(&self, identifier: &str) -> Result<LabelOutcome, LabelError> {
        let issue = self
            .client
            .fetch_issue(identifier)
            .await
            .map_err(|source| LabelError::FetchIssue {
                identifier: identifier.to_string(),
                source,
            })?;

        let Some(issue) = issue else {
            info!(identifier, "Issue not found, skipping");
            return Ok(LabelOutcome::NotFound);
        };

        if issue.is_public() {
            info!(identifier, "Issue already has public label");
            return Ok(LabelOutcome::AlreadyLabeled);
        }

        let label_id = self.resolve_label_id().await?;

        self.client
            .add_label(&issue.id, label_id)
            .await
            .map_err(|source| LabelError::AddLabel {
                identifier: identifier.to_string(),
                source,
            })?;

        info!(identifier, "Applied public label");
        Ok(LabelOutcome::Applied)
    }
}

impl<L: Labeler + Send + Sync> Labeler for Arc<L> {
    fn ensure_public_label(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<LabelOutcome, LabelError>> + Send {
        (**self).ensure_public_label(identifier)
    }
}
