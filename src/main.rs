use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use issue_bridge::config::Config;
use issue_bridge::server::{AppState, build_router};
use issue_bridge::tracker::{DEFAULT_TTL, IssueCache, LinearClient, PublicLabeler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    // Loaded first so RUST_LOG may come from it.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "issue_bridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let client = Arc::new(
        LinearClient::with_endpoint(&config.api_key, &config.tracker_endpoint)
            .context("build tracker client")?,
    );
    let labeler = PublicLabeler::new(client.clone(), config.team_key.clone());
    let cache = IssueCache::new(client, DEFAULT_TTL);

    if config.webhook_secret.is_none() {
        tracing::warn!("GITHUB_WEBHOOK_SECRET not set, webhook endpoint disabled");
    }

    let state = AppState::new(
        config.team_key.clone(),
        config.webhook_secret.map(String::into_bytes),
        labeler,
        cache,
    );
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, team_key = %config.team_key, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    axum::serve(listener, app).await.context("serve")?;

    Ok(())
}
