//! Server configuration from the environment.
//!
//! | variable                | required | default                          |
//! |-------------------------|----------|----------------------------------|
//! | `LINEAR_API_KEY`        | yes      |                                  |
//! | `LINEAR_TEAM_KEY`       | yes      |                                  |
//! | `GITHUB_WEBHOOK_SECRET` | no       | webhook endpoint disabled        |
//! | `PORT`                  | no       | `8080`                           |
//! | `LINEAR_ENDPOINT`       | no       | `https://api.linear.app/graphql` |
//!
//! Empty values count as unset.

use thiserror::Error;

use crate::tracker::DEFAULT_ENDPOINT;
use crate::types::TeamKey;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub team_key: TeamKey,
    pub webhook_secret: Option<String>,
    pub port: u16,
    pub tracker_endpoint: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            api_key: require("LINEAR_API_KEY")?,
            team_key: TeamKey::new(require("LINEAR_TEAM_KEY")?),
            webhook_secret: get("GITHUB_WEBHOOK_SECRET"),
            port,
            tracker_endpoint: get("LINEAR_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("team_key", &self.team_key)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("tracker_endpoint", &self.tracker_endpoint)
            .finish_non_exhaustive()
    }
}
