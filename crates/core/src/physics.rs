//! Physics core: one integration step for the rocket.
//!
//! This module is pure. It never blocks, sleeps, logs or touches I/O, and the
//! same inputs always produce the same outputs.
//!
//! # Step order
//!
//! 1. Altitude and gravity at the current position
//! 2. Resolve the active stage (`index mod len`)
//! 3. Fuel: burn for thrust above hover-neutral; an empty tank kills vertical thrust
//! 4. Clamp thrust to the stage ceilings
//! 5. Net acceleration, scaled by the stage's efficiency relative to stage 0
//! 6. Integrate velocity
//! 7. Exponential horizontal damping (`vx *= damping^dt`)
//! 8. Sub-pixel accumulation into integer position
//! 9. Ground clamp while descending or resting

use crate::config::{StageTable, WorldConfig};
use crate::rocket::{footprint_height, RocketState};
use crate::types::Stage;

/// What a step observed, for collision checks and the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Altitude used for gravity (before the move)
    pub altitude: f64,
    /// Gravity applied during the step
    pub gravity: f64,
    /// Vertical speed the ground clamp absorbed, if it fired
    pub touchdown_speed: Option<f64>,
    /// The tank ran dry during this step
    pub starved: bool,
}

/// Thrust multipliers `(x, y)` of `stage` relative to the baseline stage.
pub fn stage_efficiency(stage: &Stage, stages: &StageTable) -> (f64, f64) {
    let baseline = stages.baseline();
    (
        stage.max_thrust_x / baseline.max_thrust_x,
        stage.max_thrust_y / baseline.max_thrust_y,
    )
}

/// Commanded vertical thrust whose effective push cancels `gravity` on `stage`.
pub fn hover_thrust(gravity: f64, stage: &Stage, stages: &StageTable) -> f64 {
    let (_, efficiency_y) = stage_efficiency(stage, stages);
    gravity / efficiency_y
}

/// Advance `state` by `dt` seconds.
///
/// Negative or non-finite `dt` is treated as zero: thrust and fuel invariants
/// are still enforced but nothing moves.
pub fn advance(
    state: &mut RocketState,
    dt: f64,
    world: &WorldConfig,
    stages: &StageTable,
) -> StepReport {
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

    let altitude = state.altitude(world);
    let gravity = world.gravity.at(altitude);
    let stage = stages.get(state.stage_index);

    // Fuel accounting.
    let had_fuel = state.fuel > 0.0;
    if state.thrust_y > gravity {
        state.fuel -= (state.thrust_y - gravity) * dt * stage.fuel_consumption_rate;
    }
    if state.fuel <= 0.0 || state.fuel.is_nan() {
        state.fuel = 0.0;
        state.thrust_y = 0.0;
    }
    let starved = had_fuel && state.fuel == 0.0;

    // Stage ceilings.
    state.thrust_y = state.thrust_y.clamp(-stage.max_thrust_y, stage.max_thrust_y);
    state.thrust_x = state.thrust_x.clamp(-stage.max_thrust_x, stage.max_thrust_x);

    let (efficiency_x, efficiency_y) = stage_efficiency(stage, stages);
    let net_acc_y = state.thrust_y * efficiency_y - gravity;
    let net_acc_x = state.thrust_x * efficiency_x;

    // Y grows downward: net upward acceleration reduces vy.
    state.vy -= net_acc_y * dt;
    state.vx += net_acc_x * dt;
    state.vx *= world.horizontal_damping.powf(dt);

    // Only whole cells move the sprite; the remainder carries over.
    state.accum_x += state.vx * dt;
    state.accum_y += state.vy * dt;
    let dx = state.accum_x.trunc();
    let dy = state.accum_y.trunc();
    state.accum_x -= dx;
    state.accum_y -= dy;
    state.x = state.x.saturating_add(dx as i32);
    state.y = state.y.saturating_add(dy as i32);

    // Liftoff (vy < 0) is never clamped.
    let height = footprint_height(stage);
    let mut touchdown_speed = None;
    if state.y.saturating_add(height) > world.ground_level && state.vy >= 0.0 {
        touchdown_speed = Some(state.vy);
        state.y = world.ground_level - height;
        state.vy = 0.0;
        state.accum_y = 0.0;
    }

    StepReport {
        altitude,
        gravity,
        touchdown_speed,
        starved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::gravity::GravityModel;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn config() -> GameConfig {
        GameConfig::default()
    }

    /// Rocket parked high above ground with engines idle.
    fn coasting(cfg: &GameConfig) -> RocketState {
        let mut r = RocketState::at_launch_pad(cfg);
        r.y = cfg.world.ground_level - 5_000;
        r.thrust_y = 0.0;
        r
    }

    /// Parked high up with vertical thrust exactly cancelling gravity.
    fn hovering(cfg: &GameConfig) -> RocketState {
        let mut r = coasting(cfg);
        r.thrust_y = cfg.world.gravity.at(r.altitude(&cfg.world));
        r
    }

    #[test]
    fn thrust_above_ceiling_is_clamped_before_integration() {
        let cfg = config();
        let mut r = RocketState::at_launch_pad(&cfg);
        r.fuel = 10_000.0;
        r.thrust_y = 20.0;

        let report = advance(&mut r, 1.0, &cfg.world, &cfg.stages);

        assert_eq!(r.thrust_y, 15.0);
        assert_relative_eq!(r.vy, -(15.0 - report.gravity), max_relative = 1e-12);
        assert!(r.y < cfg.world.ground_level - 4, "rocket should have lifted off");
    }

    #[test]
    fn fuel_starvation_kills_vertical_thrust() {
        let cfg = config();
        let mut r = RocketState::at_launch_pad(&cfg);
        r.fuel = 0.05;
        r.thrust_y = 14.0;

        let report = advance(&mut r, 1.0, &cfg.world, &cfg.stages);

        assert_eq!(r.fuel, 0.0);
        assert_eq!(r.thrust_y, 0.0);
        assert!(report.starved);
    }

    #[test]
    fn empty_tank_stays_empty_and_silent() {
        let cfg = config();
        let mut r = coasting(&cfg);
        r.fuel = 0.0;
        r.thrust_y = 12.0;

        let report = advance(&mut r, 0.5, &cfg.world, &cfg.stages);

        assert_eq!(r.fuel, 0.0);
        assert_eq!(r.thrust_y, 0.0);
        assert!(!report.starved, "tank was already empty");
    }

    #[test]
    fn fuel_never_goes_negative() {
        let cfg = config();
        for &dt in &[0.0, 0.001, 0.033, 0.5, 1.0, 10.0, 1_000.0] {
            for &fuel in &[0.0, 0.01, 1.0, 50.0, 10_000.0] {
                for stage in 0..cfg.stages.len() {
                    let mut r = coasting(&cfg);
                    r.stage_index = stage;
                    r.fuel = fuel;
                    r.thrust_y = 40.0;
                    advance(&mut r, dt, &cfg.world, &cfg.stages);
                    assert!(r.fuel >= 0.0, "fuel {} after dt={dt}", r.fuel);
                    if r.fuel == 0.0 {
                        assert_eq!(r.thrust_y, 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn burn_scales_with_stage_rate() {
        let cfg = config();
        let mut main = coasting(&cfg);
        main.thrust_y = 14.0;
        let mut booster = main;
        booster.stage_index = 1;

        let g = advance(&mut main, 1.0, &cfg.world, &cfg.stages).gravity;
        advance(&mut booster, 1.0, &cfg.world, &cfg.stages);

        let main_burn = cfg.world.max_fuel - main.fuel;
        let booster_burn = cfg.world.max_fuel - booster.fuel;
        assert_relative_eq!(main_burn, 14.0 - g, max_relative = 1e-9);
        assert_relative_eq!(booster_burn, 2.0 * main_burn, max_relative = 1e-9);
    }

    #[test]
    fn hover_thrust_burns_nothing() {
        let cfg = config();
        let mut r = RocketState::at_launch_pad(&cfg);
        advance(&mut r, 1.0, &cfg.world, &cfg.stages);
        assert_eq!(r.fuel, cfg.world.max_fuel);
    }

    #[test]
    fn descending_rocket_is_clamped_to_ground() {
        let cfg = config();
        let mut r = RocketState::at_launch_pad(&cfg);
        r.y = cfg.world.ground_level - 6;
        r.vy = 30.0;
        r.thrust_y = 0.0;

        let report = advance(&mut r, 0.2, &cfg.world, &cfg.stages);

        assert_eq!(r.footprint_bottom(&cfg.stages), cfg.world.ground_level);
        assert_eq!(r.vy, 0.0);
        assert_eq!(r.accum_y, 0.0);
        let absorbed = report.touchdown_speed.expect("clamp should fire");
        assert!(absorbed > 30.0);
    }

    #[test]
    fn ground_clamp_holds_for_many_descents() {
        let cfg = config();
        for start_vy in [0.0, 0.5, 5.0, 19.0, 25.0, 300.0] {
            for height_above in [0, 1, 3, 10] {
                let mut r = RocketState::at_launch_pad(&cfg);
                r.y -= height_above;
                r.vy = start_vy;
                r.thrust_y = 0.0;
                for _ in 0..200 {
                    advance(&mut r, 0.033, &cfg.world, &cfg.stages);
                    assert!(r.footprint_bottom(&cfg.stages) <= cfg.world.ground_level);
                }
            }
        }
    }

    #[test]
    fn liftoff_is_never_clamped() {
        let cfg = config();
        let mut r = RocketState::at_launch_pad(&cfg);
        // Overlapping the ground by two rows while climbing hard.
        r.y += 2;
        r.vy = -50.0;
        r.thrust_y = 15.0;
        let y_before = r.y;

        let report = advance(&mut r, 0.1, &cfg.world, &cfg.stages);

        assert!(report.touchdown_speed.is_none());
        assert!(r.vy < 0.0);
        assert_eq!(r.y, y_before - 5);
    }

    #[test]
    fn damping_is_frame_rate_independent() {
        let cfg = config();
        let mut one = coasting(&cfg);
        one.vx = 10.0;
        let mut two = one;

        advance(&mut one, 1.0, &cfg.world, &cfg.stages);
        advance(&mut two, 0.5, &cfg.world, &cfg.stages);
        advance(&mut two, 0.5, &cfg.world, &cfg.stages);

        assert_relative_eq!(one.vx, 9.0, max_relative = 1e-12);
        assert_relative_eq!(one.vx, two.vx, max_relative = 1e-12);
    }

    #[test]
    fn slow_motion_accumulates_into_whole_cells() {
        let cfg = config();
        let mut r = hovering(&cfg);
        r.thrust_x = 0.4; // 0.4 units/s² of push
        let x0 = r.x;

        let mut moved = false;
        for _ in 0..60 {
            advance(&mut r, 0.1, &cfg.world, &cfg.stages);
            assert!(r.accum_x.abs() < 1.0);
            if r.x != x0 {
                moved = true;
            }
        }
        assert!(moved, "sub-cell speed should eventually move the rocket");
    }

    #[test]
    fn accumulator_keeps_fraction() {
        let cfg = config();
        let mut r = hovering(&cfg);
        r.vx = 2.5;
        // Undo damping so the displacement is exactly vx * dt.
        let world = WorldConfig {
            horizontal_damping: 1.0,
            ..cfg.world.clone()
        };
        let x0 = r.x;

        advance(&mut r, 1.0, &world, &cfg.stages);

        assert_eq!(r.x, x0 + 2);
        assert_abs_diff_eq!(r.accum_x, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn booster_is_more_efficient_than_main() {
        let cfg = config();
        let mut main = coasting(&cfg);
        main.thrust_y = 10.0;
        let mut booster = main;
        booster.stage_index = 1;

        advance(&mut main, 0.1, &cfg.world, &cfg.stages);
        advance(&mut booster, 0.1, &cfg.world, &cfg.stages);

        assert!(booster.vy < main.vy, "booster should climb faster");
    }

    #[test]
    fn negative_thrust_is_floored_at_stage_ceiling() {
        let cfg = config();
        let mut r = coasting(&cfg);
        r.thrust_y = -100.0;
        r.thrust_x = -100.0;
        advance(&mut r, 0.0, &cfg.world, &cfg.stages);
        assert_eq!(r.thrust_y, -15.0);
        assert_eq!(r.thrust_x, -2.0);
    }

    #[test]
    fn negative_or_nan_dt_is_a_no_op_move() {
        let cfg = config();
        let mut r = coasting(&cfg);
        r.vx = 3.0;
        r.vy = -4.0;
        let before = r;

        advance(&mut r, -1.0, &cfg.world, &cfg.stages);
        advance(&mut r, f64::NAN, &cfg.world, &cfg.stages);

        assert_eq!(r.x, before.x);
        assert_eq!(r.y, before.y);
        assert_eq!(r.vx, before.vx);
        assert_eq!(r.vy, before.vy);
        assert_eq!(r.fuel, before.fuel);
    }

    #[test]
    fn advance_is_deterministic() {
        let cfg = config();
        let mut a = RocketState::at_launch_pad(&cfg);
        a.thrust_y = 13.0;
        a.thrust_x = 1.0;
        let mut b = a;
        for _ in 0..300 {
            advance(&mut a, 0.033, &cfg.world, &cfg.stages);
            advance(&mut b, 0.033, &cfg.world, &cfg.stages);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn cutoff_model_has_no_gravity_above_threshold() {
        let cfg = config();
        let world = cfg.world.clone().with_gravity(GravityModel::cutoff(100.0));
        let mut r = coasting(&cfg);
        r.vy = 0.0;

        let report = advance(&mut r, 1.0, &world, &cfg.stages);

        assert_eq!(report.gravity, 0.0);
        assert_eq!(r.vy, 0.0);
    }
}
