//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (physics core, input mapping, terminal rendering).
//!
//! # World Units
//!
//! One world unit is one terminal cell. The Y axis grows downward, so the
//! ground sits at the largest Y a resting rocket can occupy and altitude is
//! `ground_level - y`.
//!
//! - **Scale**: 1 unit = 100 m (the HUD shows altitude in km as `altitude / 10`)
//! - **Kármán line**: 100 km = 1000 units above ground
//!
//! # Loop Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 33 | Fixed loop period (~30 FPS) |
//! | `EXPLOSION_MS` | 2000 | Hold time after an unsafe landing |
//! | `MAX_FRAME_DT_SECS` | 0.25 | Upper bound on a single physics step |
//!
//! # Flight Thresholds
//!
//! - `SAFE_LANDING_SPEED`: 20 units/s, faster touchdowns explode
//! - `COSMIC_SPEED_THRESHOLD`: 100 units/s downward, shows the HUD banner
//! - `EXHAUST_THRESHOLD`: 0.5 thrust units away from neutral, shows exhaust
//!
//! # Examples
//!
//! ```
//! use rocket_console_types::{InputCommand, FrameInput, Stage};
//!
//! let mut input = FrameInput::default();
//! input.apply(InputCommand::ThrustUp);
//! input.apply(InputCommand::ToggleStage);
//! assert!(input.up && input.stage_toggle);
//!
//! let stage = Stage::new("Main", 2.0, 15.0, 1.0, "  /\\  ");
//! assert_eq!(stage.max_thrust_y, 15.0);
//! ```

/// Fixed loop period in milliseconds (33ms ≈ 30 FPS)
pub const TICK_MS: u32 = 33;

/// How long the explosion is shown (and the simulation held) after a crash.
pub const EXPLOSION_MS: u32 = 2000;

/// Longest step handed to the physics core, in seconds.
///
/// A suspended terminal can stall the loop for seconds; one huge step would
/// tunnel the rocket through several bands of scenery.
pub const MAX_FRAME_DT_SECS: f64 = 0.25;

/// Standard gravity at ground level (units/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Kármán line altitude in meters.
pub const KARMAN_LINE_M: f64 = 100_000.0;

/// Meters represented by one world unit.
pub const METERS_PER_UNIT: f64 = 100.0;

/// Default cutoff altitude (world units) for the step gravity model.
pub const DEFAULT_GRAVITY_CUTOFF: f64 = 100.0;

/// World width in units.
pub const WORLD_WIDTH: i32 = 10_000;

/// World height in units.
pub const WORLD_HEIGHT: i32 = 20_000;

/// Y coordinate of the ground line.
pub const GROUND_LEVEL: i32 = 0;

/// Fuel loaded at start and after every reset.
pub const MAX_FUEL: f64 = 10_000.0;

/// Maximum downward speed (units/s) for a survivable touchdown.
pub const SAFE_LANDING_SPEED: f64 = 20.0;

/// Per-second horizontal velocity retention (`vx *= 0.9^dt`).
pub const HORIZONTAL_DAMPING: f64 = 0.9;

/// Downward speed above which the HUD shows the cosmic speed banner.
pub const COSMIC_SPEED_THRESHOLD: f64 = 100.0;

/// Thrust offset from neutral needed before exhaust markers are drawn.
pub const EXHAUST_THRESHOLD: f64 = 0.5;

/// Vertical thrust change per frame while up/down is held.
pub const VERTICAL_THRUST_STEP: f64 = 0.5;

/// Horizontal thrust change per frame while left/right is held.
pub const HORIZONTAL_THRUST_STEP: f64 = 0.5;

/// Default number of clouds scattered above the ground.
pub const DEFAULT_CLOUD_COUNT: usize = 200;

/// Default number of trees planted along the ground.
pub const DEFAULT_TREE_COUNT: usize = 200;

/// A rocket stage profile.
///
/// Stages are immutable configuration. The player cycles through them in
/// table order; each one changes the thrust ceilings, the fuel burn rate and
/// the nozzle row drawn under the hull.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Label shown in the HUD
    pub name: String,
    /// Ceiling for `|thrust_x|`
    pub max_thrust_x: f64,
    /// Ceiling for `|thrust_y|`
    pub max_thrust_y: f64,
    /// Multiplier on fuel burned above hover-neutral thrust
    pub fuel_consumption_rate: f64,
    /// Nozzle sprite rows appended under the rocket body
    pub marker: Vec<String>,
}

impl Stage {
    /// Create a stage with a single-row nozzle marker.
    pub fn new(
        name: &str,
        max_thrust_x: f64,
        max_thrust_y: f64,
        fuel_consumption_rate: f64,
        marker: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            max_thrust_x,
            max_thrust_y,
            fuel_consumption_rate,
            marker: vec![marker.to_string()],
        }
    }
}

/// Discrete commands produced by the key mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCommand {
    /// Increase vertical thrust
    ThrustUp,
    /// Decrease vertical thrust
    ThrustDown,
    /// Push left (negative X thrust)
    ThrustLeft,
    /// Push right (positive X thrust)
    ThrustRight,
    /// Switch to the next stage
    ToggleStage,
    /// Leave the game
    Quit,
}

impl InputCommand {
    /// Parse a command from its name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use rocket_console_types::InputCommand;
    ///
    /// assert_eq!(InputCommand::from_str("thrustUp"), Some(InputCommand::ThrustUp));
    /// assert_eq!(InputCommand::from_str("STAGE"), Some(InputCommand::ToggleStage));
    /// assert_eq!(InputCommand::from_str("warp"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "thrustup" | "up" => Some(InputCommand::ThrustUp),
            "thrustdown" | "down" => Some(InputCommand::ThrustDown),
            "thrustleft" | "left" => Some(InputCommand::ThrustLeft),
            "thrustright" | "right" => Some(InputCommand::ThrustRight),
            "togglestage" | "stage" => Some(InputCommand::ToggleStage),
            "quit" => Some(InputCommand::Quit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputCommand::ThrustUp => "thrustUp",
            InputCommand::ThrustDown => "thrustDown",
            InputCommand::ThrustLeft => "thrustLeft",
            InputCommand::ThrustRight => "thrustRight",
            InputCommand::ToggleStage => "toggleStage",
            InputCommand::Quit => "quit",
        }
    }
}

/// Everything the game loop needs from the keyboard for one frame.
///
/// Directional flags are level-style ("was pressed during this frame").
/// `stage_toggle` is an edge: it is set at most once per physical key press,
/// so a held key does not cycle stages every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub stage_toggle: bool,
    pub quit_requested: bool,
}

impl FrameInput {
    /// Fold one command into the frame.
    pub fn apply(&mut self, command: InputCommand) {
        match command {
            InputCommand::ThrustUp => self.up = true,
            InputCommand::ThrustDown => self.down = true,
            InputCommand::ThrustLeft => self.left = true,
            InputCommand::ThrustRight => self.right = true,
            InputCommand::ToggleStage => self.stage_toggle = true,
            InputCommand::Quit => self.quit_requested = true,
        }
    }

    /// True when no key did anything this frame.
    pub fn is_idle(&self) -> bool {
        *self == FrameInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_scale_matches_kilometer_readout() {
        // altitude / 10 == km on the HUD
        assert_eq!(METERS_PER_UNIT / 1000.0, 0.1);
        assert_eq!(KARMAN_LINE_M / METERS_PER_UNIT, 1000.0);
    }

    #[test]
    fn thresholds_are_ordered() {
        assert!(SAFE_LANDING_SPEED < COSMIC_SPEED_THRESHOLD);
        assert!(HORIZONTAL_DAMPING > 0.0 && HORIZONTAL_DAMPING < 1.0);
    }
}
