//! Liveness probe.

use axum::http::StatusCode;

/// Returns 200 with body `OK` while the process is serving requests. Does not
/// touch the tracker.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        assert_eq!(health_handler().await, (StatusCode::OK, "OK"));
    }
}
