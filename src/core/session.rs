//! Session context shared by the dispatcher, the health poller and the view.
//!
//! All mutable state of a running session lives in [`SessionState`] behind a
//! single mutex. Every mutation happens inside one short lock scope that never
//! spans an `.await`, so no task can observe a half-applied update.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::constants::{LAST_RESPONSE_TTL, TECHNICAL_DIFFICULTY_NOTICE};
use crate::core::conversation::ConversationStore;
use crate::core::dispatch::{AbandonReason, DispatchError, DispatchOutcome};
use crate::core::message::{Message, Sender};
use crate::utils::logging::TranscriptLog;

/// Whether a new submission may replace one that is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitGate {
    /// Refuse while a request is outstanding.
    RespectBusy,
    /// Cancel the outstanding request and take its place.
    Supersede,
}

/// How a dispatch's network phase ended, before it is applied to the session.
#[derive(Debug)]
pub(crate) enum Resolution {
    Reply { text: String, fallback: bool },
    Failed(DispatchError),
    Abandoned(AbandonReason),
}

/// Handle given to the dispatch that currently owns the in-flight slot.
#[derive(Debug, Clone)]
pub(crate) struct DispatchTicket {
    pub token: CancellationToken,
    pub generation: u64,
}

#[derive(Debug)]
struct InFlight {
    token: CancellationToken,
    generation: u64,
}

#[derive(Debug)]
struct LastResponse {
    text: String,
    stored_at: Instant,
}

#[derive(Debug)]
struct SessionState {
    conversation: ConversationStore,
    online: bool,
    busy: bool,
    in_flight: Option<InFlight>,
    next_generation: u64,
    last_response: Option<LastResponse>,
    transcript: TranscriptLog,
}

impl SessionState {
    fn push(&mut self, sender: Sender, text: &str) -> Option<Message> {
        let message = self.conversation.record(sender, text)?.clone();
        if let Err(err) = self.transcript.log_message(&message) {
            warn!(error = %err, "failed to write transcript");
        }
        Some(message)
    }

    fn owns_in_flight(&self, generation: u64) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == generation)
    }

    fn release_in_flight(&mut self) {
        self.in_flight = None;
        self.busy = false;
    }
}

/// Point-in-time copy of everything the view renders.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub messages: Vec<Message>,
    pub online: bool,
    pub busy: bool,
    pub last_response: Option<String>,
}

/// Cheaply cloneable handle to the session state.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    last_response_ttl: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TranscriptLog::default())
    }
}

impl Session {
    pub fn new(transcript: TranscriptLog) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                conversation: ConversationStore::new(),
                online: true,
                busy: false,
                in_flight: None,
                next_generation: 0,
                last_response: None,
                transcript,
            })),
            last_response_ttl: LAST_RESPONSE_TTL,
        }
    }

    pub fn with_last_response_ttl(mut self, ttl: Duration) -> Self {
        self.last_response_ttl = ttl;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().conversation.snapshot()
    }

    pub fn message_count(&self) -> usize {
        self.lock().conversation.len()
    }

    pub fn is_online(&self) -> bool {
        self.lock().online
    }

    pub fn set_online(&self, online: bool) {
        let mut state = self.lock();
        if state.online != online {
            debug!(online, "connectivity changed");
        }
        state.online = online;
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    /// Most recent assistant reply, until it expires.
    pub fn last_response(&self) -> Option<String> {
        let state = self.lock();
        self.live_last_response(&state)
    }

    fn live_last_response(&self, state: &SessionState) -> Option<String> {
        state
            .last_response
            .as_ref()
            .filter(|last| last.stored_at.elapsed() < self.last_response_ttl)
            .map(|last| last.text.clone())
    }

    pub fn view(&self) -> SessionView {
        let state = self.lock();
        SessionView {
            messages: state.conversation.snapshot(),
            online: state.online,
            busy: state.busy,
            last_response: self.live_last_response(&state),
        }
    }

    /// Cancels the outstanding request, if any, and frees the busy flag right
    /// away. The cancelled dispatch finishes without touching the session.
    pub fn cancel_in_flight(&self) -> bool {
        let mut state = self.lock();
        match state.in_flight.take() {
            Some(in_flight) => {
                in_flight.token.cancel();
                state.busy = false;
                debug!(generation = in_flight.generation, "cancelled in-flight request");
                true
            }
            None => false,
        }
    }

    pub fn set_log_file(&self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        self.lock().transcript.set_log_file(path)
    }

    pub fn toggle_logging(&self) -> Result<String, Box<dyn std::error::Error>> {
        self.lock().transcript.toggle_logging()
    }

    pub fn logging_status(&self) -> String {
        self.lock().transcript.get_status_string()
    }

    /// Opens a dispatch: supersedes any outstanding request, records the user
    /// message and marks the session busy. Returns `None` when the gate or the
    /// text refuses the submission, in which case nothing changed.
    pub(crate) fn begin_dispatch(&self, text: &str, gate: SubmitGate) -> Option<DispatchTicket> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut state = self.lock();
        if state.busy && gate == SubmitGate::RespectBusy {
            debug!("submission ignored while a request is outstanding");
            return None;
        }

        if let Some(previous) = state.in_flight.take() {
            debug!(
                generation = previous.generation,
                "superseding in-flight request"
            );
            previous.token.cancel();
        }

        state.push(Sender::User, text)?;
        state.busy = true;

        state.next_generation += 1;
        let ticket = DispatchTicket {
            token: CancellationToken::new(),
            generation: state.next_generation,
        };
        state.in_flight = Some(InFlight {
            token: ticket.token.clone(),
            generation: ticket.generation,
        });
        Some(ticket)
    }

    /// Applies a finished dispatch. A dispatch that no longer owns the
    /// in-flight slot was superseded or cancelled and changes nothing.
    pub(crate) fn finish_dispatch(
        &self,
        ticket: &DispatchTicket,
        resolution: Resolution,
    ) -> DispatchOutcome {
        let mut state = self.lock();
        if !state.owns_in_flight(ticket.generation) {
            debug!(
                generation = ticket.generation,
                "dropping result of superseded request"
            );
            let reason = match resolution {
                Resolution::Abandoned(reason) => reason,
                _ => AbandonReason::Cancelled,
            };
            return DispatchOutcome::Abandoned(reason);
        }

        state.release_in_flight();

        match resolution {
            Resolution::Reply { text, fallback } => {
                state.online = true;
                let Some(message) = state.push(Sender::Assistant, &text) else {
                    return DispatchOutcome::Ignored;
                };
                state.last_response = Some(LastResponse {
                    text: message.text().to_string(),
                    stored_at: Instant::now(),
                });
                DispatchOutcome::Replied { message, fallback }
            }
            Resolution::Failed(error) => {
                warn!(error = %error, "chat request failed");
                state.online = false;
                match state.push(Sender::Assistant, TECHNICAL_DIFFICULTY_NOTICE) {
                    Some(notice) => DispatchOutcome::Failed { error, notice },
                    None => DispatchOutcome::Ignored,
                }
            }
            Resolution::Abandoned(reason) => DispatchOutcome::Abandoned(reason),
        }
    }
}
