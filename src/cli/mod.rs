//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod health;
pub mod say;

use std::error::Error;
use std::fmt;
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::cli::health::run_health;
use crate::cli::say::run_say;
use crate::core::config::data::validate_endpoint;
use crate::core::config::{Config, EndpointOverrides};
use crate::core::dispatch::Timeouts;
use crate::ui::chat_loop::{run_chat, ChatSettings};

#[derive(Parser)]
#[command(name = "admissions-chat")]
#[command(about = "A terminal chat client for the AdmissionAI Pro admissions assistant")]
#[command(
    long_about = "admissions-chat is a full-screen terminal client for a college-admissions \
assistant backed by IBM Granite. Questions are posted to the chat endpoint one at a time \
and a background health check shows whether the backend is reachable.\n\n\
Endpoints (highest precedence first):\n\
  --chat-endpoint / --health-endpoint flags\n\
  ADMISSIONS_CHAT_URL / ADMISSIONS_HEALTH_URL environment variables\n\
  'admissions-chat set chat-endpoint <url>' (config file)\n\
  http://localhost:5000/api/chat and /api/health\n\n\
Controls:\n\
  Enter             Send the question\n\
  Alt+Enter         Send now, replacing a pending question\n\
  Esc               Cancel the pending question\n\
  F1-F4             Use a suggested question\n\
  Up/Down, PgUp/Dn  Scroll the conversation\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show commands and keys\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume\n\
  /actions [n]      List quick actions or load one into the input"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// URL questions are posted to
    #[arg(long, global = true, value_name = "URL", value_parser = validate_endpoint)]
    pub chat_endpoint: Option<String>,

    /// URL polled for backend health
    #[arg(long, global = true, value_name = "URL", value_parser = validate_endpoint)]
    pub health_endpoint: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Write diagnostic output (filtered by RUST_LOG) to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask one question and print the answer
    Say {
        /// The question; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Check whether the backend is reachable
    Health,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: ConfigKey,
        /// Value to set for the key
        value: String,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: ConfigKey,
    },
    /// Print the configuration and the endpoints in effect
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    ChatEndpoint,
    HealthEndpoint,
}

impl ConfigKey {
    fn slot(self, config: &mut Config) -> &mut Option<String> {
        match self {
            ConfigKey::ChatEndpoint => &mut config.chat_endpoint,
            ConfigKey::HealthEndpoint => &mut config.health_endpoint,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKey::ChatEndpoint => f.write_str("chat-endpoint"),
            ConfigKey::HealthEndpoint => f.write_str("health-endpoint"),
        }
    }
}

pub fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args)?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

/// Installs the tracing subscriber. The chat screen owns the terminal, so it
/// only gets diagnostics when they go to a file.
fn init_tracing(args: &Args) -> Result<(), Box<dyn Error>> {
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(path) = &args.debug_log {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|err| err.to_string())?;
    } else if matches!(args.command, Some(Commands::Say { .. } | Commands::Health)) {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

async fn async_main(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    let mut config = Config::load()?;
    let overrides = EndpointOverrides {
        chat: args.chat_endpoint,
        health: args.health_endpoint,
    };
    let endpoints = config.resolve_endpoints(&overrides, |key| std::env::var(key).ok());

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            run_chat(ChatSettings {
                endpoints,
                timeouts: Timeouts::default(),
                log_file: args.log,
            })
            .await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Say { prompt } => run_say(prompt, endpoints, args.log).await,
        Commands::Health => run_health(&endpoints.health).await,
        Commands::Set { key, value } => {
            let value = validate_endpoint(&value)?;
            *key.slot(&mut config) = Some(value.clone());
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Unset { key } => {
            *key.slot(&mut config) = None;
            config.save()?;
            println!("✅ Unset {key}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            config.print_all();
            Ok(ExitCode::SUCCESS)
        }
    }
}
