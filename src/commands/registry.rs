use super::CommandResult;
use crate::core::session::Session;

pub type CommandHandler = fn(&Session, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands and key bindings.",
        handler: super::handle_help,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Log the conversation to a file, or pause/resume logging.",
        handler: super::handle_log,
    },
    Command {
        name: "actions",
        usage: "/actions [number]",
        help: "List quick actions, or load one into the input line.",
        handler: super::handle_actions,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
