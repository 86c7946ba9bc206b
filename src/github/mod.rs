//! Code-host REST access.
//!
//! A small reqwest-based client for the repository listings the backfill
//! reads: pull requests, issues, and both kinds of comments. Listings are
//! walked through the `Link` header cursor in [`pagination`].

mod client;
mod error;
pub mod pagination;

pub use client::{DEFAULT_BASE_URL, GitHubClient, Page};
pub use error::GitHubError;
pub use pagination::{PAGE_SIZE, next_page, next_page_url, with_page_size};

#[cfg(test)]
pub(crate) use client::fake;
