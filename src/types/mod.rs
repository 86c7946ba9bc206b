//! Core domain types for the issue bridge.
//!
//! Identifiers are newtypes so that team keys, issue identifiers and
//! repository coordinates cannot be confused with one another.

pub mod ids;
pub mod issue;

pub use ids::{Identifier, IdentifierError, RepoId, TeamKey};
pub use issue::{Attachment, Issue, Label, PUBLIC_LABEL, WorkflowState};

use serde::{Deserialize, Deserializer};

/// Deserializes a string that may be `null`, mapping `null` to empty.
///
/// Use with `#[serde(default, deserialize_with = "null_as_empty")]` so that a
/// missing field is empty too.
pub(crate) fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
