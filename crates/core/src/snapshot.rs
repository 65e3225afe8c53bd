//! Read-only frame data handed to the renderer.

use crate::flight::Explosion;
use crate::rocket::RocketState;
use crate::types::Stage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSnapshot<'a> {
    pub rocket: RocketState,
    pub stage: &'a Stage,
    /// World units above ground
    pub altitude: f64,
    /// Gravity at `altitude`
    pub gravity: f64,
    /// Commanded vertical thrust that holds the active stage steady
    pub hover_thrust: f64,
    pub ground_level: i32,
    pub meters_per_unit: f64,
    pub max_fuel: f64,
    /// Above the Kármán line
    pub in_space: bool,
    /// Descending faster than the cosmic-speed threshold
    pub cosmic_speed: bool,
    pub explosion: Option<Explosion>,
    pub crashes: u32,
}

impl FlightSnapshot<'_> {
    /// World point the camera centres on: the explosion while one is shown,
    /// otherwise the rocket.
    pub fn focus(&self) -> (i32, i32) {
        match self.explosion {
            Some(e) => (e.x, e.y),
            None => (self.rocket.x, self.rocket.y),
        }
    }

    pub fn altitude_km(&self) -> f64 {
        self.altitude * self.meters_per_unit / 1000.0
    }

    /// Fuel as a fraction of a full tank.
    pub fn fuel_ratio(&self) -> f64 {
        if self.max_fuel > 0.0 {
            (self.rocket.fuel / self.max_fuel).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
