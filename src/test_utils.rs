//! Shared test utilities.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Serves `router` on an ephemeral local port and returns its base URL.
///
/// The server runs on the test's runtime and stops when the runtime does.
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Creates a git repository under `dir` with one commit per message, oldest
/// first.
pub fn init_repo_with_commits(dir: &Path, messages: &[&str]) -> PathBuf {
    let repo = dir.join("repo");
    std::fs::create_dir_all(&repo).unwrap();

    let git = |args: &[&str]| {
        let output = Command::new("git")
            .arg("-C")
            .arg(&repo)
            .args(args)
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .env("GIT_AUTHOR_NAME", "test")
            .env("GIT_AUTHOR_EMAIL", "test@test.com")
            .env("GIT_COMMITTER_NAME", "test")
            .env("GIT_COMMITTER_EMAIL", "test@test.com")
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    };

    git(&["init", "-q", "-b", "main"]);
    for (i, message) in messages.iter().enumerate() {
        std::fs::write(repo.join(format!("file{}.txt", i)), message).unwrap();
        git(&["add", "."]);
        git(&["commit", "-q", "-m", message]);
    }
    repo
}
