//! Terminal UI layer for interactive chat sessions.
//!
//! [`chat_loop`] runs the interaction loop and turns key presses into
//! dispatcher calls; [`renderer`] and [`layout`] compose each frame from a
//! [`crate::core::session::SessionView`]. This layer only presents state; the
//! conversation, connectivity and request lifecycle belong to [`crate::core`].

pub mod chat_loop;
pub mod layout;
pub mod lifecycle;
pub mod renderer;
