use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::api::build_client;
use crate::commands::{process_input, CommandResult};
use crate::core::config::Endpoints;
use crate::core::constants::QUICK_SUGGESTIONS;
use crate::core::dispatch::{DispatchOutcome, Dispatcher, Timeouts};
use crate::core::health::HealthPoller;
use crate::core::session::{Session, SubmitGate};
use crate::ui::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::ui::renderer;
use crate::utils::logging::TranscriptLog;

const PAGE_SCROLL: usize = 10;
const BUSY_HINT: &str = "Still waiting for the last answer (Alt+Enter sends anyway)";

/// Everything the interactive session needs to start.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub endpoints: Endpoints,
    pub timeouts: Timeouts,
    pub log_file: Option<String>,
}

/// What a key press asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    None,
    Send(String),
    SendSuperseding(String),
    Cancel,
    Quit,
}

/// View-only state: the compose line, scroll position and transient notices.
/// The conversation itself lives in the [`Session`].
#[derive(Debug, Default)]
pub struct ChatView {
    pub input: crate::utils::input::InputLine,
    /// Rows hidden below the viewport; zero follows new messages.
    pub scroll_from_bottom: usize,
    pub status: Option<String>,
    pub info: Option<Vec<String>>,
    pub should_quit: bool,
}

impl ChatView {
    pub fn handle_key(&mut self, key: KeyEvent, session: &Session) -> UiAction {
        self.info = None;

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                UiAction::Quit
            }
            KeyCode::Esc => {
                self.status = None;
                if session.is_busy() {
                    UiAction::Cancel
                } else {
                    UiAction::None
                }
            }
            KeyCode::Enter => self.submit(session, alt),
            KeyCode::F(n @ 1..=4) => {
                self.input.set_text(QUICK_SUGGESTIONS[usize::from(n) - 1]);
                UiAction::None
            }
            KeyCode::Char(c) if !ctrl => {
                if !self.input.insert_char(c) {
                    self.status = Some("Input limit reached".to_string());
                }
                UiAction::None
            }
            KeyCode::Backspace => {
                self.input.backspace();
                UiAction::None
            }
            KeyCode::Delete => {
                self.input.delete();
                UiAction::None
            }
            KeyCode::Left => {
                self.input.move_left();
                UiAction::None
            }
            KeyCode::Right => {
                self.input.move_right();
                UiAction::None
            }
            KeyCode::Home => {
                self.input.move_home();
                UiAction::None
            }
            KeyCode::End => {
                self.input.move_end();
                UiAction::None
            }
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(PAGE_SCROLL),
            KeyCode::PageDown => self.scroll_down(PAGE_SCROLL),
            _ => UiAction::None,
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.info = None;
        self.input.insert_str(text);
    }

    fn submit(&mut self, session: &Session, supersede: bool) -> UiAction {
        if self.input.is_blank() {
            return UiAction::None;
        }

        match process_input(session, self.input.text()) {
            CommandResult::ProcessAsMessage(_) => {}
            CommandResult::Status(message) => {
                self.input.clear();
                self.status = Some(message);
                return UiAction::None;
            }
            CommandResult::Info(lines) => {
                self.input.clear();
                self.info = Some(lines);
                return UiAction::None;
            }
            CommandResult::FillInput(text) => {
                self.input.set_text(&text);
                return UiAction::None;
            }
            CommandResult::Quit => {
                self.should_quit = true;
                return UiAction::Quit;
            }
        }

        if session.is_busy() && !supersede {
            self.status = Some(BUSY_HINT.to_string());
            return UiAction::None;
        }

        let text = self.input.take();
        self.status = None;
        self.scroll_from_bottom = 0;
        if supersede {
            UiAction::SendSuperseding(text)
        } else {
            UiAction::Send(text)
        }
    }

    fn scroll_up(&mut self, rows: usize) -> UiAction {
        // The renderer clamps this to the content height.
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows);
        UiAction::None
    }

    fn scroll_down(&mut self, rows: usize) -> UiAction {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
        UiAction::None
    }
}

pub async fn run_chat(settings: ChatSettings) -> Result<(), Box<dyn Error>> {
    let session = Session::new(TranscriptLog::new(settings.log_file.clone()))
        .with_last_response_ttl(settings.timeouts.last_response);
    let client = build_client()?;
    let dispatcher = Dispatcher::new(
        client.clone(),
        settings.endpoints.chat.clone(),
        &settings.timeouts,
        session.clone(),
    );
    let poller = HealthPoller::spawn(
        client,
        settings.endpoints.health.clone(),
        &settings.timeouts,
        session,
    );

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &dispatcher).await;

    dispatcher.cancel();
    poller.shutdown().await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    dispatcher: &Dispatcher,
) -> Result<(), Box<dyn Error>> {
    let mut chat = ChatView::default();

    loop {
        let view = dispatcher.session().view();
        terminal.draw(|frame| renderer::draw(frame, &mut chat, &view))?;

        if chat.should_quit {
            return Ok(());
        }

        if !event::poll(Duration::from_millis(50))? {
            tokio::task::yield_now().await;
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                chat.handle_key(key, dispatcher.session())
            }
            Event::Paste(text) => {
                chat.handle_paste(&text);
                UiAction::None
            }
            _ => UiAction::None,
        };

        match action {
            UiAction::Send(text) => {
                start_dispatch(dispatcher, &mut chat, text, SubmitGate::RespectBusy);
            }
            UiAction::SendSuperseding(text) => {
                start_dispatch(dispatcher, &mut chat, text, SubmitGate::Supersede);
            }
            UiAction::Cancel => {
                if dispatcher.cancel() {
                    chat.status = Some("Request cancelled".to_string());
                }
            }
            UiAction::Quit | UiAction::None => {}
        }
    }
}

/// Records the question on the event-loop thread, then hands the round trip
/// to a task. A refused question goes back into the input line.
fn start_dispatch(
    dispatcher: &Dispatcher,
    chat: &mut ChatView,
    text: String,
    gate: SubmitGate,
) -> bool {
    let Some(pending) = dispatcher.begin(&text, gate) else {
        chat.input.set_text(&text);
        chat.status = Some(BUSY_HINT.to_string());
        return false;
    };

    tokio::spawn(async move {
        match pending.run().await {
            DispatchOutcome::Replied { fallback, .. } => debug!(fallback, "reply appended"),
            DispatchOutcome::Failed { error, .. } => debug!(%error, "technical-difficulty notice appended"),
            DispatchOutcome::Abandoned(reason) => debug!(?reason, "request abandoned"),
            DispatchOutcome::Ignored => debug!("submission ignored"),
        }
    });
    true
}
