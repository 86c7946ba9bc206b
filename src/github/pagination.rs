//! Link-header pagination.
//!
//! REST listings return one page at a time and advertise the next one in the
//! `Link` response header:
//!
//! ```text
//! Link: <https://api.github.com/repositories/1/pulls?page=2>; rel="next",
//!       <https://api.github.com/repositories/1/pulls?page=9>; rel="last"
//! ```
//!
//! The cursor is just that URL; page bodies are decoded separately.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};

/// Items requested per page.
pub const PAGE_SIZE: u32 = 100;

fn next_link_regex() -> &'static Regex {
    static NEXT_LINK: OnceLock<Regex> = OnceLock::new();
    NEXT_LINK.get_or_init(|| Regex::new(r#"<([^>]+)>;\s*rel="next""#).expect("next-link regex is valid"))
}

/// Appends `per_page=100` unless the URL already sets a page size.
///
/// # Examples
///
/// ```
/// use issue_bridge::github::with_page_size;
///
/// assert_eq!(with_page_size("https://h/pulls"), "https://h/pulls?per_page=100");
/// assert_eq!(
///     with_page_size("https://h/pulls?state=all"),
///     "https://h/pulls?state=all&per_page=100"
/// );
/// assert_eq!(with_page_size("https://h/pulls?per_page=5"), "https://h/pulls?per_page=5");
/// ```
pub fn with_page_size(url: &str) -> String {
    if url.contains("per_page=") {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}per_page={PAGE_SIZE}")
}

/// Extracts the `rel="next"` URL from a `Link` header value.
pub fn next_page_url(link: &str) -> Option<String> {
    next_link_regex()
        .captures(link)
        .map(|caps| caps[1].to_string())
}

/// The next page's URL from a response's headers, if there is one.
pub fn next_page(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(next_page_url)
}
