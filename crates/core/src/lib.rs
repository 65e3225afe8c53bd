//! Core flight logic - pure, deterministic, and testable
//!
//! This crate holds the simulation: gravity, staged thrust and fuel, ground
//! collision and the crash reset. It has **no dependencies** on the terminal
//! or on input devices, which keeps it:
//!
//! - **Deterministic**: the same state, `dt` and configuration always give the same result
//! - **Testable**: every rule is exercised by unit tests
//! - **Portable**: runs headless as happily as behind a terminal
//!
//! # Module Structure
//!
//! - [`gravity`]: inverse-square and cutoff gravity models
//! - [`config`]: world constants, the stage table, env overrides and validation
//! - [`rocket`]: rocket state, sprites and the launch pad
//! - [`physics`]: the per-frame integration step
//! - [`stage`]: stock stages and stage cycling
//! - [`collision`]: unsafe-landing check and crash reset
//! - [`flight`]: one game-loop frame (input, physics, crash handling)
//! - [`scenery`]: clouds, trees and the star hash
//! - [`rng`]: small LCG for scenery placement
//! - [`snapshot`]: read-only frame data for the renderer
//!
//! # Flight Rules
//!
//! - **Coordinates**: integer world cells, Y grows downward, altitude is `ground_level - y`
//! - **Fuel**: burned only for vertical thrust above hover-neutral; an empty tank cuts vertical thrust
//! - **Stages**: each has its own thrust ceilings and burn rate; Space cycles through them
//! - **Landing**: touching down faster than 20 units/s is a crash and resets the rocket (stage kept)
//!
//! # Example
//!
//! ```
//! use rocket_console_core::{FlightState, GameConfig};
//! use rocket_console_types::FrameInput;
//!
//! let mut flight = FlightState::new(GameConfig::default());
//!
//! let mut input = FrameInput::default();
//! input.up = true;
//! for _ in 0..60 {
//!     flight.step(&input, 33);
//! }
//!
//! assert!(flight.snapshot().altitude > 4.0);
//! assert!(flight.rocket().fuel < flight.config().world.max_fuel);
//! ```
//!
//! # Timing
//!
//! The loop runs at a fixed period (33 ms by default). Each frame passes its
//! elapsed wall time to [`FlightState::step`](flight::FlightState::step),
//! which caps the physics step at 250 ms.

pub mod collision;
pub mod config;
pub mod flight;
pub mod gravity;
pub mod physics;
pub mod rng;
pub mod rocket;
pub mod scenery;
pub mod snapshot;
pub mod stage;

pub use rocket_console_types as types;

// Re-export commonly used types for convenience
pub use collision::{check_unsafe_landing, reset_after_crash};
pub use config::{ConfigError, GameConfig, GravityKind, RunConfig, StageTable, WorldConfig};
pub use flight::{Explosion, FlightState, FrameEvent};
pub use gravity::GravityModel;
pub use physics::{advance, hover_thrust, StepReport};
pub use rng::SimpleRng;
pub use rocket::{sprite_for, RocketState};
pub use scenery::{is_star_at, Prop, PropKind, Scenery};
pub use snapshot::FlightSnapshot;
pub use stage::{cycle_stage, default_stages};
