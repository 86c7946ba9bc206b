//! Labels every issue a repository has ever referenced.
//!
//! Dry run by default: prints the identifiers it would label. Pass `--apply`
//! to label them; the first failure stops the run.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tokio::process::Command;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use issue_bridge::backfill::RepoScanner;
use issue_bridge::github::GitHubClient;
use issue_bridge::tracker::{DEFAULT_ENDPOINT, Labeler, LinearClient, PublicLabeler};
use issue_bridge::types::{RepoId, TeamKey};

#[derive(Parser)]
#[command(
    name = "issue-bridge-backfill",
    about = "Apply the public label to every issue a repository references"
)]
struct Cli {
    /// Actually apply labels (default is a dry run)
    #[arg(long)]
    apply: bool,

    /// Repository to scan, as owner/repo
    #[arg(long, default_value = "mirendev/runtime")]
    repo: String,

    /// Local clone to read commit messages from; empty to skip
    #[arg(long, default_value = ".")]
    git_dir: PathBuf,

    /// Tracker API key
    #[arg(long, env = "LINEAR_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Team key whose identifiers are collected
    #[arg(long, env = "LINEAR_TEAM_KEY")]
    team_key: String,

    /// Tracker GraphQL endpoint
    #[arg(long, env = "LINEAR_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    linear_endpoint: String,

    /// Code-host token; falls back to `gh auth token`
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

#[tokio::main]
async fn main() {
    // Before the subscriber, so RUST_LOG may come from .env.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,issue_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let repo = RepoId::parse(&cli.repo).context("--repo")?;
    let team_key = TeamKey::new(&cli.team_key);
    if team_key.as_str().is_empty() {
        bail!("LINEAR_TEAM_KEY is required");
    }

    let token = resolve_token(cli.github_token).await;
    if token.is_none() {
        info!("No code-host token, using unauthenticated requests");
    }

    let client = GitHubClient::new(repo.clone(), token).context("build code-host client")?;
    let mut scanner = RepoScanner::new(client);
    if !cli.git_dir.as_os_str().is_empty() {
        scanner = scanner.with_git_dir(cli.git_dir);
    }

    let identifiers = scanner
        .scan_repo(&team_key)
        .await
        .with_context(|| format!("scan {repo}"))?;
    info!(identifiers = identifiers.len(), "Scan complete");

    if !cli.apply {
        println!("dry-run: would apply public label to:");
        for id in &identifiers {
            println!("  {id}");
        }
        println!("\nre-run with --apply to label these issues");
        return Ok(());
    }

    let tracker = Arc::new(
        LinearClient::with_endpoint(cli.api_key, cli.linear_endpoint)
            .context("build tracker client")?,
    );
    let labeler = PublicLabeler::new(tracker, team_key);

    for (i, id) in identifiers.iter().enumerate() {
        labeler
            .ensure_public_label(id)
            .await
            .with_context(|| format!("label {id} ({}/{})", i + 1, identifiers.len()))?;
    }

    info!(labeled = identifiers.len(), "Backfill complete");
    Ok(())
}

/// An explicit non-empty token wins; otherwise ask `gh`.
async fn resolve_token(explicit: Option<String>) -> Option<String> {
    match explicit.filter(|t| !t.is_empty()) {
        Some(token) => Some(token),
        None => gh_auth_token().await,
    }
}

/// Token from the `gh` CLI's login, if it is installed and logged in.
async fn gh_auth_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .kill_on_drop(true)
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_token_skips_gh() {
        assert_eq!(
            resolve_token(Some("ghp_explicit".to_string())).await.as_deref(),
            Some("ghp_explicit")
        );
    }

    #[tokio::test]
    async fn empty_token_falls_back_to_gh() {
        // `gh` may be missing or logged out here; either way no empty token.
        let token = resolve_token(Some(String::new())).await;
        assert!(token.as_deref().is_none_or(|t| !t.is_empty()));
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from([
            "issue-bridge-backfill",
            "--api-key",
            "k",
            "--team-key",
            "mir",
        ])
        .unwrap();
        assert!(!cli.apply);
        assert_eq!(cli.repo, "mirendev/runtime");
        assert_eq!(cli.git_dir, PathBuf::from("."));
    }
}
