//! Rocket state and sprites.

use crate::config::{GameConfig, StageTable, WorldConfig};
use crate::physics::hover_thrust;
use crate::types::Stage;

/// Hull rows shared by every stage. The stage's nozzle marker goes underneath.
pub const ROCKET_BODY: [&str; 3] = ["  /\\  ", " |==| ", " |  | "];

/// Drawn at the impact site after a crash.
pub const EXPLOSION_SPRITE: [&str; 7] = [
    "   ***   ",
    "  *****  ",
    " ******* ",
    "*********",
    " ******* ",
    "  *****  ",
    "   ***   ",
];

/// Full rocket sprite for a stage: hull rows followed by the nozzle rows.
pub fn sprite_for(stage: &Stage) -> Vec<&str> {
    let mut rows: Vec<&str> = ROCKET_BODY.to_vec();
    rows.extend(stage.marker.iter().map(String::as_str));
    rows
}

/// Sprite height in rows; the vertical extent used for ground contact.
pub fn footprint_height(stage: &Stage) -> i32 {
    (ROCKET_BODY.len() + stage.marker.len()) as i32
}

/// Widest sprite row in columns.
pub fn footprint_width(stage: &Stage) -> i32 {
    let body = ROCKET_BODY.iter().map(|row| row.chars().count());
    let marker = stage.marker.iter().map(|row| row.chars().count());
    body.chain(marker).max().unwrap_or(0) as i32
}

/// The simulated rocket.
///
/// `(x, y)` is the top-left corner of the sprite in world units, Y grows
/// downward. Velocities are in units per second. Fractional motion that has
/// not yet added up to a whole cell lives in the accumulators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocketState {
    pub x: i32,
    pub y: i32,
    pub vx: f64,
    pub vy: f64,
    pub thrust_x: f64,
    pub thrust_y: f64,
    pub fuel: f64,
    pub accum_x: f64,
    pub accum_y: f64,
    pub stage_index: usize,
}

impl RocketState {
    /// Fresh rocket on the launch pad: centred, resting on the ground, full
    /// tank, vertical thrust at hover-neutral for the pad altitude, first
    /// stage selected.
    pub fn at_launch_pad(config: &GameConfig) -> Self {
        Self::at_launch_pad_with_stage(config, 0)
    }

    /// Fresh rocket with `stage_index` already selected.
    pub fn at_launch_pad_with_stage(config: &GameConfig, stage_index: usize) -> Self {
        let stage_index = stage_index % config.stages.len();
        let stage = config.stages.get(stage_index);
        let (x, y) = launch_position(&config.world, stage);
        let altitude = (config.world.ground_level - y) as f64;
        let gravity = config.world.gravity.at(altitude);
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            thrust_x: 0.0,
            thrust_y: hover_thrust(gravity, stage, &config.stages),
            fuel: config.world.max_fuel,
            accum_x: 0.0,
            accum_y: 0.0,
            stage_index,
        }
    }

    /// Height above ground in world units (`ground_level - y`).
    pub fn altitude(&self, world: &WorldConfig) -> f64 {
        (world.ground_level as f64) - (self.y as f64)
    }

    /// Y of the row just below the sprite.
    pub fn footprint_bottom(&self, stages: &StageTable) -> i32 {
        self.y
            .saturating_add(footprint_height(stages.get(self.stage_index)))
    }

    pub fn stage<'a>(&self, stages: &'a StageTable) -> &'a Stage {
        stages.get(self.stage_index)
    }
}

/// World-centre, ground-adjacent start position for a stage's sprite.
pub fn launch_position(world: &WorldConfig, stage: &Stage) -> (i32, i32) {
    let x = world.world_width / 2 - footprint_width(stage) / 2;
    let y = world.ground_level - footprint_height(stage);
    (x, y)
}
