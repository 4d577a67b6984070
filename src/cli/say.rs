//! TUI-less "say" command

use std::error::Error;
use std::process::ExitCode;

use tracing::warn;

use crate::api::build_client;
use crate::core::config::Endpoints;
use crate::core::dispatch::{AbandonReason, DispatchOutcome, Dispatcher, Timeouts};
use crate::core::session::Session;
use crate::utils::logging::TranscriptLog;

pub async fn run_say(
    prompt: Vec<String>,
    endpoints: Endpoints,
    log_file: Option<String>,
) -> Result<ExitCode, Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: admissions-chat say <prompt>".into());
    }

    let timeouts = Timeouts::default();
    let dispatcher = Dispatcher::new(
        build_client()?,
        endpoints.chat,
        &timeouts,
        Session::new(TranscriptLog::new(log_file)),
    );

    let answer = ask(&dispatcher, &prompt, &timeouts).await?;
    println!("{}", answer.text);
    Ok(if answer.delivered {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Answer {
    pub text: String,
    /// False when `text` is the technical-difficulty notice.
    pub delivered: bool,
}

pub(crate) async fn ask(
    dispatcher: &Dispatcher,
    prompt: &str,
    timeouts: &Timeouts,
) -> Result<Answer, Box<dyn Error>> {
    match dispatcher.submit(prompt).await {
        DispatchOutcome::Replied { message, fallback } => {
            if fallback {
                warn!("reply carried no usable text");
            }
            Ok(Answer {
                text: message.text().to_string(),
                delivered: true,
            })
        }
        DispatchOutcome::Failed { error, notice } => {
            eprintln!("❌ {error}");
            Ok(Answer {
                text: notice.text().to_string(),
                delivered: false,
            })
        }
        DispatchOutcome::Abandoned(AbandonReason::TimedOut) => {
            Err(format!("no reply within {} seconds", timeouts.request.as_secs()).into())
        }
        DispatchOutcome::Abandoned(AbandonReason::Cancelled) => Err("request was cancelled".into()),
        DispatchOutcome::Ignored => Err("nothing to send".into()),
    }
}
