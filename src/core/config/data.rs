use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::constants::{
    CHAT_ENDPOINT_ENV, DEFAULT_CHAT_ENDPOINT, DEFAULT_HEALTH_ENDPOINT, HEALTH_ENDPOINT_ENV,
};

/// Persisted settings, stored as TOML in the platform config directory.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target of the chat `POST`
    pub chat_endpoint: Option<String>,
    /// Target of the health `GET`
    pub health_endpoint: Option<String>,
}

/// Endpoints given on the command line; these win over everything else.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EndpointOverrides {
    pub chat: Option<String>,
    pub health: Option<String>,
}

/// The two URLs a session talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub chat: String,
    pub health: String,
}

impl Config {
    /// Resolves endpoints with precedence overrides > environment > config
    /// file > built-in defaults. Blank values at any layer are skipped.
    pub fn resolve_endpoints<F>(&self, overrides: &EndpointOverrides, env: F) -> Endpoints
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |cli: &Option<String>, env_key: &str, file: &Option<String>, default: &str| {
            non_blank(cli.clone())
                .or_else(|| non_blank(env(env_key)))
                .or_else(|| non_blank(file.clone()))
                .unwrap_or_else(|| default.to_string())
        };

        Endpoints {
            chat: pick(
                &overrides.chat,
                CHAT_ENDPOINT_ENV,
                &self.chat_endpoint,
                DEFAULT_CHAT_ENDPOINT,
            ),
            health: pick(
                &overrides.health,
                HEALTH_ENDPOINT_ENV,
                &self.health_endpoint,
                DEFAULT_HEALTH_ENDPOINT,
            ),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Checks that `value` is an absolute http(s) URL.
pub fn validate_endpoint(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    let url = reqwest::Url::parse(trimmed).map_err(|err| format!("invalid URL '{trimmed}': {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(format!(
            "unsupported scheme '{scheme}' in '{trimmed}' (expected http or https)"
        )),
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
