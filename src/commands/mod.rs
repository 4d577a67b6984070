//! Slash commands available from the chat input line.
//!
//! Commands never touch the conversation; they report back through the
//! status line or an info panel.

mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::constants::QUICK_ACTIONS;
use crate::core::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Not a known command; send the text as a question.
    ProcessAsMessage(String),
    /// One-line feedback for the status line.
    Status(String),
    /// Several lines shown in the info panel until the next key press.
    Info(Vec<String>),
    /// Replace the input line with this text.
    FillInput(String),
    Quit,
}

pub fn process_input(session: &Session, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => (command.handler)(
            session,
            CommandInvocation { args },
        ),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub(super) fn handle_help(session: &Session, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut lines = vec!["Commands:".to_string()];
    for command in all_commands() {
        lines.push(format!("  {:<18} {}", command.usage, command.help));
    }
    lines.push("Keys:".to_string());
    lines.push("  Enter              Send the question".to_string());
    lines.push("  Alt+Enter          Send now, replacing a pending question".to_string());
    lines.push("  Esc                Cancel the pending question".to_string());
    lines.push("  F1-F4              Use a suggested question".to_string());
    lines.push("  Up/Down, PgUp/PgDn Scroll the conversation".to_string());
    lines.push("  Ctrl+C             Quit".to_string());
    lines.push(format!("Transcript log: {}", session.logging_status()));
    CommandResult::Info(lines)
}

pub(super) fn handle_log(session: &Session, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.args.split_whitespace().collect();

    let result = match parts.as_slice() {
        [] => session.toggle_logging(),
        [filename] => session.set_log_file(filename.to_string()),
        _ => return CommandResult::Status("Usage: /log [filename]".to_string()),
    };

    match result {
        Ok(message) => CommandResult::Status(message),
        Err(e) => CommandResult::Status(format!("Log error: {e}")),
    }
}

pub(super) fn handle_actions(
    _session: &Session,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if invocation.args.is_empty() {
        let mut lines = vec!["Quick actions (use /actions <number>):".to_string()];
        lines.extend(
            QUICK_ACTIONS
                .iter()
                .enumerate()
                .map(|(index, action)| format!("  {}. {}", index + 1, action.label)),
        );
        return CommandResult::Info(lines);
    }

    match invocation
        .args
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| QUICK_ACTIONS.get(index))
    {
        Some(action) => CommandResult::FillInput(action.prompt.to_string()),
        None => CommandResult::Status(format!(
            "No quick action '{}'; pick 1-{}",
            invocation.args,
            QUICK_ACTIONS.len()
        )),
    }
}

pub(super) fn handle_quit(_session: &Session, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
