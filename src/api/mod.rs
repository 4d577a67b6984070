use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const CONNECT_TIMEOUT_SECONDS: u64 = 10;
const POOL_IDLE_TIMEOUT_SECONDS: u64 = 90;

/// Shared HTTP client for chat and health requests.
///
/// No overall request timeout is set here; each caller bounds its own
/// request so a timed-out chat call can be told apart from a failed one.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECONDS))
        .build()
}

/// Body of `POST {chat_endpoint}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Document served by the backend's health endpoint. Only used for display;
/// the HTTP status alone decides whether the backend is online.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Pulls the assistant text out of a chat response body.
///
/// `response` wins when it holds non-blank text, otherwise the first entry of
/// `results` is consulted for `generated_text`. Any other shape yields `None`
/// and the caller substitutes its fallback. The returned text is trimmed.
pub fn extract_reply_text(body: &Value) -> Option<&str> {
    body.get("response").and_then(non_blank).or_else(|| {
        body.get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(|first| first.get("generated_text"))
            .and_then(non_blank)
    })
}

fn non_blank(value: &Value) -> Option<&str> {
    value
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
