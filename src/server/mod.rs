//! HTTP server.
//!
//! # Endpoints
//!
//! - `GET /health` - liveness probe
//! - `GET /api/v1/issues/{identifier}` - issue as JSON, served through the cache
//! - `POST /webhook/github` - code-host deliveries; only mounted when a webhook
//!   secret is configured

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;

use crate::tracker::{IssueCache, IssueFetcher, Labeler};
use crate::types::TeamKey;

pub mod health;
pub mod issue;
pub mod webhook;

pub use health::health_handler;
pub use issue::{IssueError, issue_handler};
pub use webhook::{WebhookError, webhook_handler};

/// Largest webhook body accepted, in bytes.
pub const MAX_WEBHOOK_BODY: usize = 1 << 20;

/// Shared application state, passed to handlers via axum's `State` extractor.
///
/// `L` applies the public label for webhook deliveries; `F` backs the issue
/// cache used by the read endpoint.
pub struct AppState<L, F> {
    inner: Arc<AppStateInner<L, F>>,
}

struct AppStateInner<L, F> {
    team_key: TeamKey,

    /// Shared secret for HMAC-SHA256 webhook signatures. `None` disables the
    /// webhook route.
    webhook_secret: Option<Vec<u8>>,

    labeler: L,
    cache: IssueCache<F>,
}

impl<L, F> Clone for AppState<L, F> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L, F> AppState<L, F> {
    pub fn new(
        team_key: TeamKey,
        webhook_secret: Option<Vec<u8>>,
        labeler: L,
        cache: IssueCache<F>,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                team_key,
                webhook_secret,
                labeler,
                cache,
            }),
        }
    }

    pub fn team_key(&self) -> &TeamKey {
        &self.inner.team_key
    }

    pub fn webhook_secret(&self) -> Option<&[u8]> {
        self.inner.webhook_secret.as_deref()
    }

    pub fn labeler(&self) -> &L {
        &self.inner.labeler
    }

    pub fn cache(&self) -> &IssueCache<F> {
        &self.inner.cache
    }
}

/// Builds the router with all endpoints.
pub fn build_router<L, F>(app_state: AppState<L, F>) -> axum::Router
where
    L: Labeler + Send + Sync + 'static,
    F: IssueFetcher + Send + Sync + 'static,
{
    use axum::routing::{get, post};

    let mut router = axum::Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/issues/{identifier}", get(issue_handler::<L, F>));

    if app_state.webhook_secret().is_some() {
        router = router.route(
            "/webhook/github",
            post(webhook_handler::<L, F>).layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY)),
        );
    }

    router.with_state(app_state)
}
