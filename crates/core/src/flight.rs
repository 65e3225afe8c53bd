//! Flight session: one game-loop frame at a time.
//!
//! `FlightState` owns the configuration and the rocket and applies a frame's
//! input in a fixed order: explosion hold, stage toggle, thrust mapping,
//! physics, crash check.

use crate::collision::{check_unsafe_landing, reset_after_crash};
use crate::config::GameConfig;
use crate::physics::{advance, hover_thrust, StepReport};
use crate::rocket::{footprint_width, RocketState, EXPLOSION_SPRITE};
use crate::snapshot::FlightSnapshot;
use crate::stage::cycle_stage;
use crate::types::{
    FrameInput, Stage, COSMIC_SPEED_THRESHOLD, EXPLOSION_MS, HORIZONTAL_THRUST_STEP,
    MAX_FRAME_DT_SECS, VERTICAL_THRUST_STEP,
};

/// Explosion left on screen after a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explosion {
    /// Top-left of the explosion sprite in world units
    pub x: i32,
    pub y: i32,
    pub remaining_ms: u32,
}

/// What happened during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    /// An explosion is showing; input and physics were skipped.
    Holding,
    /// Normal flight.
    Flew(StepReport),
    /// Unsafe touchdown; the rocket is already back on the pad.
    Crashed { speed: f64 },
}

/// Apply one frame of directional input to the commanded thrust.
///
/// Up raises vertical thrust by a fixed step up to the stage ceiling; down
/// lowers it without a floor (the physics clamp provides one). Left and right
/// step horizontal thrust within the stage's range. An axis with no key held
/// relaxes toward zero at `decay_rate` per second.
pub fn map_thrust(
    state: &mut RocketState,
    input: &FrameInput,
    stage: &Stage,
    dt: f64,
    decay_rate: f64,
) {
    if input.up {
        state.thrust_y = (state.thrust_y + VERTICAL_THRUST_STEP).min(stage.max_thrust_y);
    } else if input.down {
        state.thrust_y -= VERTICAL_THRUST_STEP;
    } else {
        state.thrust_y -= state.thrust_y * decay_rate * dt;
    }

    if input.left {
        state.thrust_x = (state.thrust_x - HORIZONTAL_THRUST_STEP).max(-stage.max_thrust_x);
    } else if input.right {
        state.thrust_x = (state.thrust_x + HORIZONTAL_THRUST_STEP).min(stage.max_thrust_x);
    } else {
        state.thrust_x -= state.thrust_x * decay_rate * dt;
    }
}

/// Convert a frame's wall time into a physics step, capped so a stalled
/// terminal cannot tunnel the rocket.
pub fn frame_dt(elapsed_ms: u32) -> f64 {
    (elapsed_ms as f64 / 1000.0).min(MAX_FRAME_DT_SECS)
}

#[derive(Debug, Clone)]
pub struct FlightState {
    config: GameConfig,
    rocket: RocketState,
    explosion: Option<Explosion>,
    thrust_decay_rate: f64,
    crashes: u32,
    frames: u64,
}

impl FlightState {
    /// New session with the rocket on the launch pad.
    pub fn new(config: GameConfig) -> Self {
        let rocket = RocketState::at_launch_pad(&config);
        Self {
            config,
            rocket,
            explosion: None,
            thrust_decay_rate: 0.0,
            crashes: 0,
            frames: 0,
        }
    }

    /// Thrust relaxation per second on axes with no key held (0 holds thrust).
    pub fn with_thrust_decay(mut self, rate: f64) -> Self {
        self.thrust_decay_rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rocket(&self) -> &RocketState {
        &self.rocket
    }

    pub fn rocket_mut(&mut self) -> &mut RocketState {
        &mut self.rocket
    }

    pub fn explosion(&self) -> Option<Explosion> {
        self.explosion
    }

    pub fn crashes(&self) -> u32 {
        self.crashes
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame.
    pub fn step(&mut self, input: &FrameInput, elapsed_ms: u32) -> FrameEvent {
        self.frames = self.frames.wrapping_add(1);

        if let Some(explosion) = self.explosion.as_mut() {
            explosion.remaining_ms = explosion.remaining_ms.saturating_sub(elapsed_ms);
            if explosion.remaining_ms == 0 {
                self.explosion = None;
                log::debug!("explosion cleared, resuming flight");
            }
            return FrameEvent::Holding;
        }

        let dt = frame_dt(elapsed_ms);

        if input.stage_toggle {
            let index = cycle_stage(&mut self.rocket, &self.config.stages);
            log::info!("stage -> {} ({})", index, self.config.stages.get(index).name);
        }

        let stage = self.config.stages.get(self.rocket.stage_index);
        map_thrust(&mut self.rocket, input, stage, dt, self.thrust_decay_rate);

        let report = advance(&mut self.rocket, dt, &self.config.world, &self.config.stages);
        if report.starved {
            log::info!("fuel exhausted at altitude {:.0}", report.altitude);
        }

        // The ground clamp zeroes vy, so judge the landing by the speed it absorbed.
        let mut landing = self.rocket;
        if let Some(speed) = report.touchdown_speed {
            landing.vy = speed;
        }
        if check_unsafe_landing(&landing, &self.config.world, &self.config.stages) {
            self.crash(landing.vy);
            return FrameEvent::Crashed { speed: landing.vy };
        }

        FrameEvent::Flew(report)
    }

    fn crash(&mut self, speed: f64) {
        let stage = self.config.stages.get(self.rocket.stage_index);
        let sprite_w = EXPLOSION_SPRITE
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0) as i32;
        let sprite_h = EXPLOSION_SPRITE.len() as i32;
        let centre_x = self.rocket.x + footprint_width(stage) / 2;

        self.explosion = Some(Explosion {
            x: centre_x - sprite_w / 2,
            y: self.config.world.ground_level - sprite_h,
            remaining_ms: EXPLOSION_MS,
        });
        self.crashes = self.crashes.saturating_add(1);
        log::warn!(
            "unsafe landing at {:.1} u/s (limit {:.1}), crash #{}",
            speed,
            self.config.world.safe_landing_speed,
            self.crashes
        );

        reset_after_crash(&mut self.rocket, &self.config);
        log::info!("rocket reset to launch pad on stage {}", stage.name);
    }

    /// Read-only view for the renderer.
    pub fn snapshot(&self) -> FlightSnapshot<'_> {
        let world = &self.config.world;
        let altitude = self.rocket.altitude(world);
        let gravity = world.gravity.at(altitude);
        let stage = self.rocket.stage(&self.config.stages);
        FlightSnapshot {
            rocket: self.rocket,
            stage,
            altitude,
            gravity,
            hover_thrust: hover_thrust(gravity, stage, &self.config.stages),
            ground_level: world.ground_level,
            meters_per_unit: world.meters_per_unit,
            max_fuel: world.max_fuel,
            in_space: altitude > world.karman_line_units(),
            cosmic_speed: self.rocket.vy > COSMIC_SPEED_THRESHOLD,
            explosion: self.explosion,
            crashes: self.crashes,
        }
    }
}
