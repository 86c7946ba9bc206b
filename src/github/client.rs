//! REST client scoped to a single repository.
//!
//! Only what the backfill needs: authenticated GETs of paginated listings.

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::error::GitHubError;
use super::pagination::{next_page, with_page_size};
use crate::types::RepoId;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

const ACCEPT_JSON: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One decoded page of a listing.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// URL of the following page, if any.
    pub next: Option<String>,
}

/// A code-host client scoped to one repository.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    repo: RepoId,
}

impl GitHubClient {
    /// Creates a client against the public API. An empty token counts as none.
    pub fn new(repo: RepoId, token: Option<String>) -> Result<Self, GitHubError> {
        Self::with_base_url(DEFAULT_BASE_URL, repo, token)
    }

    /// Creates a client against a custom API root (tests, enterprise hosts).
    pub fn with_base_url(
        base_url: impl Into<String>,
        repo: RepoId,
        token: Option<String>,
    ) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            repo,
        })
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Absolute URL of `path` under this repository (`/pulls?state=all`).
    pub fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.repo.owner, self.repo.repo, path
        )
    }

    /// Fetches and decodes one page.
    pub async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, GitHubError> {
        debug!(url, "Fetching page");

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let next = next_page(response.headers());
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(GitHubError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let items = serde_json::from_slice(&body).map_err(|source| GitHubError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(Page { items, next })
    }

    /// Walks every page of the listing at `path`, handing each item to
    /// `visit` in order. Returns the number of items seen.
    ///
    /// Any failed page aborts the walk.
    pub async fn for_each_item<T, F>(
        &self,
        source: &str,
        path: &str,
        mut visit: F,
    ) -> Result<usize, GitHubError>
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        let mut url = Some(with_page_size(&self.repo_url(path)));
        let mut page = 0;
        let mut total = 0;

        while let Some(current) = url.take() {
            page += 1;
            let Page { items, next } = self.get_page::<T>(&current).await?;
            total += items.len();
            items.into_iter().for_each(&mut visit);

            if next.is_some() {
                info!(
                    source,
                    page = page + 1,
                    items_so_far = total,
                    "Fetching next page"
                );
            }
            url = next;
        }

        Ok(total)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("repo", &self.repo)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde::Deserialize;
    use serde_json::json;

    use super::fake::FakeGitHub;
    use super::*;
    use crate::test_utils::spawn_server;

    #[derive(Debug, Deserialize)]
    struct Titled {
        title: String,
    }

    async fn client_for(fake: &FakeGitHub, token: Option<&str>) -> GitHubClient {
        let base = spawn_server(fake.router()).await;
        GitHubClient::with_base_url(
            base,
            RepoId::new("mirendev", "runtime"),
            token.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn repo_url_joins_base_repo_and_path() {
        let client = GitHubClient::with_base_url(
            "https://ghe.example.com/api/v3/",
            RepoId::new("o", "r"),
            None,
        )
        .unwrap();

        assert_eq!(
            client.repo_url("/issues?state=all"),
            "https://ghe.example.com/api/v3/repos/o/r/issues?state=all"
        );
    }

    #[test]
    fn empty_token_is_no_token() {
        let client = GitHubClient::new(RepoId::new("o", "r"), Some(String::new())).unwrap();
        assert!(!client.has_token());
    }

    #[tokio::test]
    async fn follows_next_links_across_pages() {
        let fake = FakeGitHub::default().pages(
            "/repos/mirendev/runtime/pulls",
            vec![
                json!([{ "title": "one" }, { "title": "two" }]),
                json!([{ "title": "three" }]),
            ],
        );
        let client = client_for(&fake, None).await;

        let mut titles = Vec::new();
        let total = client
            .for_each_item("pull requests", "/pulls?state=all", |t: Titled| {
                titles.push(t.title)
            })
            .await
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(titles, ["one", "two", "three"]);

        let seen = fake.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0].uri,
            "/repos/mirendev/runtime/pulls?state=all&per_page=100"
        );
        assert!(seen[1].uri.ends_with("page=2"));
    }

    #[tokio::test]
    async fn sends_bearer_token_and_headers_when_configured() {
        let fake = FakeGitHub::default();
        let client = client_for(&fake, Some("ghp_secret")).await;

        client
            .for_each_item("issues", "/issues?state=all", |_: Titled| {})
            .await
            .unwrap();

        let seen = &fake.seen()[0];
        assert_eq!(seen.authorization.as_deref(), Some("Bearer ghp_secret"));
        assert_eq!(seen.accept.as_deref(), Some(ACCEPT_JSON));
        assert_eq!(seen.user_agent.as_deref(), Some(CLIENT_USER_AGENT));
    }

    #[tokio::test]
    async fn omits_authorization_without_token() {
        let fake = FakeGitHub::default();
        let client = client_for(&fake, None).await;

        client
            .for_each_item("issues", "/issues?state=all", |_: Titled| {})
            .await
            .unwrap();

        assert_eq!(fake.seen()[0].authorization, None);
    }

    #[tokio::test]
    async fn error_status_is_fatal() {
        let fake =
            FakeGitHub::default().fail("/repos/mirendev/runtime/issues", StatusCode::UNAUTHORIZED);
        let client = client_for(&fake, None).await;

        let err = client
            .for_each_item("issues", "/issues?state=all", |_: Titled| {})
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[tokio::test]
    async fn unexpected_shape_is_a_decode_error() {
        let fake = FakeGitHub::default().pages(
            "/repos/mirendev/runtime/pulls",
            vec![json!({ "message": "not a list" })],
        );
        let client = client_for(&fake, None).await;

        let err = client
            .for_each_item("pull requests", "/pulls", |_: Titled| {})
            .await
            .unwrap_err();

        assert!(matches!(err, GitHubError::Decode { .. }));
    }
}
