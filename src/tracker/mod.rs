//! Issue tracker access.
//!
//! The rest of the crate talks to the tracker only through three capability
//! traits:
//! - [`IssueFetcher`] - look an issue up by its human identifier
//! - [`LabelLookup`] - find a team label's opaque ID by name
//! - [`LabelAdder`] - attach a label to an issue
//!
//! [`LinearClient`] implements all three over GraphQL. [`IssueCache`] wraps an
//! `IssueFetcher` for readers; [`PublicLabeler`] combines all three to apply
//! the public label exactly when it is missing.

mod cache;
mod client;
mod error;
mod labeler;

use std::future::Future;
use std::sync::Arc;

pub use cache::{DEFAULT_TTL, IssueCache};
pub use client::{DEFAULT_ENDPOINT, LinearClient};
pub use error::TrackerError;
pub use labeler::{LabelError, LabelOutcome, Labeler, PublicLabeler, ResolveLabelError};

use crate::types::{Issue, TeamKey};

/// Fetches an issue by identifier (e.g. `MIR-42`).
///
/// Returns `Ok(None)` when the tracker has no such issue.
pub trait IssueFetcher {
    fn fetch_issue(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Issue>, TrackerError>> + Send;
}

/// Looks up a label's opaque ID by name within a team.
///
/// Returns `Ok(None)` when the team has no label with that name.
pub trait LabelLookup {
    fn fetch_label_by_name(
        &self,
        team_key: &TeamKey,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, TrackerError>> + Send;
}

/// Adds a label to an issue. Adding a label the issue already has is a no-op
/// on the tracker side.
pub trait LabelAdder {
    fn add_label(
        &self,
        issue_id: &str,
        label_id: &str,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send;
}

impl<T: IssueFetcher + Send + Sync> IssueFetcher for Arc<T> {
    fn fetch_issue(
        &self,
        identifier: &str,
    ) -> impl Future<Output = Result<Option<Issue>, TrackerError>> + Send {
        (**self).fetch_issue(identifier)
    }
}

impl<T: LabelLookup + Send + Sync> LabelLookup for Arc<T> {
    fn fetch_label_by_name(
        &self,
        team_key: &TeamKey,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, TrackerError>> + Send {
        (**self).fetch_label_by_name(team_key, name)
    }
}

impl<T: LabelAdder + Send + Sync> LabelAdder for Arc<T> {
    fn add_label(
        &self,
        issue_id: &str,
        label_id: &str,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send {
        (**self).add_label(issue_id, label_id)
    }
}
