//! Terminal input module (flight-facing).
//!
//! This module is independent of the renderer. It maps `crossterm` key events
//! into [`crate::types::InputCommand`], folds them into one
//! [`crate::types::FrameInput`] per frame (including terminals without
//! key-release events), and runs the blocking terminal reads on a producer
//! thread so the game loop never waits on the keyboard.

pub mod handler;
pub mod map;
pub mod pump;

pub use rocket_console_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_quit};
pub use pump::{InputPump, TimedKey, MAX_EVENTS_PER_FRAME};
