//! Ground impact checks and the crash reset.

use crate::config::{GameConfig, StageTable, WorldConfig};
use crate::rocket::RocketState;

/// True when the sprite's bottom edge is at or below the ground and the
/// rocket is descending faster than the safe landing speed.
pub fn check_unsafe_landing(state: &RocketState, world: &WorldConfig, stages: &StageTable) -> bool {
    state.footprint_bottom(stages) >= world.ground_level && state.vy > world.safe_landing_speed
}

/// Put the rocket back on the launch pad after a crash.
///
/// Position, velocity, thrust, fuel and the sub-pixel accumulators return to
/// their launch values. The selected stage survives.
pub fn reset_after_crash(state: &mut RocketState, config: &GameConfig) {
    *state = RocketState::at_launch_pad_with_stage(config, state.stage_index);
}
