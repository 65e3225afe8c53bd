//! Terminal "flight renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout frameworks and instead renders into a simple
//! framebuffer that is diffed and flushed to the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Draw a camera-relative world (sky, scenery, rocket) plus a HUD
//! - Only send changed cells to the terminal

pub mod fb;
pub mod flight_view;
pub mod renderer;

pub use rocket_console_core as core;
pub use rocket_console_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use flight_view::{sky_color, Camera, FlightView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
