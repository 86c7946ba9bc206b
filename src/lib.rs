//! Issue Bridge - keeps tracker issues in step with the code host.
//!
//! Code-host activity (commits, pull requests, issues, comments) that mentions
//! a tracker identifier such as `MIR-42` marks that issue public. This library
//! provides the pieces shared by the webhook server and the backfill CLI.

pub mod backfill;
pub mod config;
pub mod git;
pub mod github;
pub mod identifiers;
pub mod server;
pub mod tracker;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
