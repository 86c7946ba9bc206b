//! Code-host webhook handling.
//!
//! - [`signature`]: HMAC-SHA256 verification of raw deliveries
//! - [`events`]: free-text extraction per event type
//! - [`ingest`]: scanning that text and labeling the issues it references

pub mod events;
pub mod ingest;
pub mod signature;

pub use events::{EventKind, extract_texts};
pub use ingest::{IngestReport, ingest_event};
pub use signature::{parse_signature_header, sign_payload, verify_signature};
