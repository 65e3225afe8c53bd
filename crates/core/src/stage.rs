//! Stage table defaults and stage cycling.

use crate::config::StageTable;
use crate::rocket::RocketState;
use crate::types::Stage;

/// The three stock stages: balanced main engine, heavy booster, nimble
/// maneuvering thrusters.
pub fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new("Main", 2.0, 15.0, 1.0, "  /\\  "),
        Stage::new("Booster", 1.0, 25.0, 2.0, " /||\\ "),
        Stage::new("Maneuver", 3.5, 10.0, 0.7, " <||> "),
    ]
}

/// Select the next stage, wrapping to the first after the last.
///
/// Returns the new stage index. Callers must only invoke this on a toggle
/// edge, never once per frame while the key is held.
pub fn cycle_stage(state: &mut RocketState, stages: &StageTable) -> usize {
    state.stage_index = (state.stage_index + 1) % stages.len();
    state.stage_index
}
