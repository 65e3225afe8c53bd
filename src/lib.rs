//! Rocket console (workspace facade crate).
//!
//! This package exposes `rocket_console::{core,input,term,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use rocket_console_core as core;
pub use rocket_console_input as input;
pub use rocket_console_term as term;
pub use rocket_console_types as types;
