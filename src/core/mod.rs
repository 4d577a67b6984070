pub mod config;
pub mod constants;
pub mod conversation;
pub mod dispatch;
pub mod health;
pub mod message;
pub mod session;
