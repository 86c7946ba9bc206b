//! Local git history.
//!
//! Commit messages in a local checkout are the cheapest source of issue
//! references: no API quota, and they include squashed or rebased history the
//! code host no longer shows on any pull request.
//!
//! Commands run with system and user config disabled, so aliases, hooks and
//! pagers configured on the machine cannot change the output.

use std::path::Path;
use std::process::Output;

use thiserror::Error;
use tokio::process::Command;

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git ran and exited non-zero.
    #[error("git command failed: {command}\nstderr: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Git could not be spawned.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Create a git command against `repo_dir` with a clean environment.
pub(crate) fn git_command(repo_dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(repo_dir);

    cmd.env("GIT_CONFIG_NOSYSTEM", "1");
    cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    // Dropping the future (e.g. on timeout) must not leave git running.
    cmd.kill_on_drop(true);

    cmd
}

/// Run a git command in `repo_dir`, failing on a non-zero exit.
pub async fn run_git(repo_dir: &Path, args: &[&str]) -> GitResult<Output> {
    let output = git_command(repo_dir).args(args).output().await?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(GitError::CommandFailed {
            command: format!("git -C {} {}", repo_dir.display(), args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Returns the full message of every commit reachable from `HEAD`, newest
/// first, as one string.
///
/// Messages are separated by blank lines. Invalid UTF-8 is replaced rather
/// than rejected; old commits are not always well encoded.
pub async fn log_messages(repo_dir: &Path) -> GitResult<String> {
    let output = run_git(repo_dir, &["log", "--format=%B"]).await?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
