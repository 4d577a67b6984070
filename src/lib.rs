//! A terminal chat client for a college-admissions AI assistant.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session: the append-only conversation, the request
//!   dispatcher that performs one round trip per question, the health poller
//!   that drives the online indicator, and configuration.
//! - [`ui`] renders the full-screen view and runs the interactive event loop.
//! - [`commands`] implements the slash commands available in the chat view.
//! - [`api`] defines the wire payloads exchanged with the assistant backend.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
