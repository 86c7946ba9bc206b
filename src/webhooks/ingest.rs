//! Turns an authenticated delivery into label applications.
//!
//! The texts of the event are joined with newlines and scanned once, so an
//! identifier mentioned in several commits is labeled once. Only identifiers
//! owned by the configured team are acted on, in first-mention order. A failed
//! application is logged and the rest continue.

use tracing::{debug, error};

use super::events::extract_texts;
use crate::identifiers::IdentifierCollector;
use crate::tracker::Labeler;
use crate::types::TeamKey;

/// What a delivery led to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Team identifiers found, in the order they were labeled.
    pub identifiers: Vec<String>,
    /// How many of those failed to label.
    pub failed: usize,
}

/// Ensures the public label on every team identifier referenced by `payload`.
pub async fn ingest_event<L: Labeler>(
    labeler: &L,
    team_key: &TeamKey,
    event_type: &str,
    payload: &[u8],
) -> IngestReport {
    let text = extract_texts(event_type, payload).join("\n");

    let mut collector = IdentifierCollector::new(team_key.clone());
    collector.collect(&text);
    let identifiers = collector.into_identifiers();

    debug!(
        event_type,
        count = identifiers.len(),
        "Identifiers referenced by delivery"
    );

    let mut failed = 0;
    for identifier in &identifiers {
        if let Err(e) = labeler.ensure_public_label(identifier).await {
            error!(identifier = %identifier, error = %e, "Failed to ensure public label");
            failed += 1;
        }
    }

    IngestReport {
        identifiers,
        failed,
    }
}
