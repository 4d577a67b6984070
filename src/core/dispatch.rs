//! One question, one round trip.
//!
//! The [`Dispatcher`] records the user's message, posts it to the chat
//! endpoint and appends whatever comes back. At most one request is live at a
//! time; a newer submission made with [`Dispatcher::submit_superseding`]
//! cancels the older one, whose continuation then exits without touching the
//! session.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::api::{extract_reply_text, ChatRequest};
use crate::core::constants::{
    FALLBACK_REPLY, HEALTH_POLL_INTERVAL, HEALTH_PROBE_TIMEOUT, LAST_RESPONSE_TTL,
    REQUEST_TIMEOUT,
};
use crate::core::message::Message;
use crate::core::session::{DispatchTicket, Resolution, Session, SubmitGate};

/// Timer settings for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Duration,
    pub health_probe: Duration,
    pub health_interval: Duration,
    pub last_response: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: REQUEST_TIMEOUT,
            health_probe: HEALTH_PROBE_TIMEOUT,
            health_interval: HEALTH_POLL_INTERVAL,
            last_response: LAST_RESPONSE_TTL,
        }
    }
}

/// Why a dispatch ended without touching the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// Superseded by a newer submission or cancelled explicitly.
    Cancelled,
    /// No answer within the request timeout.
    TimedOut,
}

/// Round-trip failures that surface as the technical-difficulty notice.
#[derive(Debug)]
pub enum DispatchError {
    /// The request could not be sent or the body could not be read.
    Transport(reqwest::Error),
    /// The server answered with a non-success status.
    Status(StatusCode),
    /// The body was not JSON at all.
    Decode(serde_json::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Transport(err) => write!(f, "request failed: {err}"),
            DispatchError::Status(status) => write!(f, "server responded with {status}"),
            DispatchError::Decode(err) => write!(f, "response was not valid JSON: {err}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Transport(err) => Some(err),
            DispatchError::Status(_) => None,
            DispatchError::Decode(err) => Some(err),
        }
    }
}

/// What a call to [`Dispatcher::submit`] did to the session.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Blank text or a request already outstanding; nothing changed.
    Ignored,
    /// An assistant message was appended. `fallback` is set when the body
    /// carried no usable text and the apology was substituted.
    Replied { message: Message, fallback: bool },
    /// The round trip failed; `notice` is the appended apology.
    Failed {
        error: DispatchError,
        notice: Message,
    },
    /// Cancelled or timed out; only the user message was recorded.
    Abandoned(AbandonReason),
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    session: Session,
}

impl Dispatcher {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        timeouts: &Timeouts,
        session: Session,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout: timeouts.request,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Sends `text` unless it is blank or a request is already outstanding.
    pub async fn submit(&self, text: &str) -> DispatchOutcome {
        self.dispatch(text, SubmitGate::RespectBusy).await
    }

    /// Sends `text`, cancelling any request that is still outstanding.
    pub async fn submit_superseding(&self, text: &str) -> DispatchOutcome {
        self.dispatch(text, SubmitGate::Supersede).await
    }

    /// Abandons the outstanding request, if any.
    pub fn cancel(&self) -> bool {
        self.session.cancel_in_flight()
    }

    /// Records the user message and claims the in-flight slot without
    /// touching the network. Returns `None` when the submission is refused;
    /// the session is then unchanged.
    pub fn begin(&self, text: &str, gate: SubmitGate) -> Option<PendingDispatch> {
        let text = text.trim();
        let ticket = self.session.begin_dispatch(text, gate)?;
        Some(PendingDispatch {
            dispatcher: self.clone(),
            text: text.to_string(),
            ticket,
        })
    }

    async fn dispatch(&self, text: &str, gate: SubmitGate) -> DispatchOutcome {
        match self.begin(text, gate) {
            Some(pending) => pending.run().await,
            None => DispatchOutcome::Ignored,
        }
    }

    async fn round_trip(&self, text: &str) -> Result<Resolution, DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .json(&ChatRequest { message: text })
            .send()
            .await
            .map_err(DispatchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status));
        }

        let body = response.bytes().await.map_err(DispatchError::Transport)?;
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(DispatchError::Decode)?;

        let resolution = match extract_reply_text(&value) {
            Some(text) => Resolution::Reply {
                text: text.to_string(),
                fallback: false,
            },
            None => {
                debug!("response carried no text, using fallback reply");
                Resolution::Reply {
                    text: FALLBACK_REPLY.to_string(),
                    fallback: true,
                }
            }
        };
        Ok(resolution)
    }
}

/// A submission already recorded in the session, waiting for its round trip.
#[derive(Debug)]
pub struct PendingDispatch {
    dispatcher: Dispatcher,
    text: String,
    ticket: DispatchTicket,
}

impl PendingDispatch {
    pub async fn run(self) -> DispatchOutcome {
        let Self {
            dispatcher,
            text,
            ticket,
        } = self;
        debug!(generation = ticket.generation, endpoint = %dispatcher.endpoint, "sending chat request");

        let resolution = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => Resolution::Abandoned(AbandonReason::Cancelled),
            _ = tokio::time::sleep(dispatcher.timeout) => {
                info!(generation = ticket.generation, timeout = ?dispatcher.timeout, "chat request timed out");
                ticket.token.cancel();
                Resolution::Abandoned(AbandonReason::TimedOut)
            }
            result = dispatcher.round_trip(&text) => match result {
                Ok(reply) => reply,
                Err(err) => Resolution::Failed(err),
            },
        };

        dispatcher.session.finish_dispatch(&ticket, resolution)
    }
}
