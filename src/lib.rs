//! A Flappy Bird style side-scroller for the terminal.
//!
//! [`session::GameSession`] holds the game rules and is driven through the
//! [`engine::Scene`] hooks by an [`engine::Stage`]. Everything else (physics,
//! timers, storage, rendering, sound) is a small collaborator it calls out to.

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod physics;
pub mod render;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{Error, Result};
