//! Gravity models.
//!
//! Two shapes of gravity exist: a flat field that switches off above a cutoff
//! altitude, and an inverse-square falloff measured from the planet's centre.
//! Both are pure functions of altitude (world units above ground) and are
//! selected once at startup.

use crate::config::ConfigError;
use crate::types::{EARTH_RADIUS_M, METERS_PER_UNIT, STANDARD_GRAVITY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GravityModel {
    /// `g` below `altitude_threshold` (world units), nothing at or above it.
    Cutoff { altitude_threshold: f64, g: f64 },
    /// `g0 * (R / (R + h))^2` with `h = altitude * meters_per_unit`.
    InverseSquare {
        earth_radius_m: f64,
        g0: f64,
        meters_per_unit: f64,
    },
}

impl Default for GravityModel {
    fn default() -> Self {
        Self::inverse_square_earth()
    }
}

impl GravityModel {
    /// Earth-sized inverse-square field at the game's 100 m/unit scale.
    pub fn inverse_square_earth() -> Self {
        GravityModel::InverseSquare {
            earth_radius_m: EARTH_RADIUS_M,
            g0: STANDARD_GRAVITY,
            meters_per_unit: METERS_PER_UNIT,
        }
    }

    /// Standard gravity that vanishes at `altitude_threshold` units.
    pub fn cutoff(altitude_threshold: f64) -> Self {
        GravityModel::Cutoff {
            altitude_threshold,
            g: STANDARD_GRAVITY,
        }
    }

    /// Gravitational acceleration at `altitude` world units above ground.
    ///
    /// Non-increasing in altitude. Altitudes below ground (and NaN) are
    /// evaluated as ground level.
    pub fn at(&self, altitude: f64) -> f64 {
        let altitude = if altitude > 0.0 { altitude } else { 0.0 };
        match *self {
            GravityModel::Cutoff {
                altitude_threshold,
                g,
            } => {
                if altitude < altitude_threshold {
                    g
                } else {
                    0.0
                }
            }
            GravityModel::InverseSquare {
                earth_radius_m,
                g0,
                meters_per_unit,
            } => {
                let altitude_m = altitude * meters_per_unit;
                let ratio = earth_radius_m / (earth_radius_m + altitude_m);
                g0 * ratio * ratio
            }
        }
    }

    /// Gravity at ground level; the hover-neutral thrust of a grounded rocket.
    pub fn surface(&self) -> f64 {
        self.at(0.0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GravityModel::Cutoff { .. } => "cutoff",
            GravityModel::InverseSquare { .. } => "inverse-square",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            GravityModel::Cutoff {
                altitude_threshold,
                g,
            } => {
                require_positive("gravity.altitude_threshold", altitude_threshold)?;
                require_positive("gravity.g", g)
            }
            GravityModel::InverseSquare {
                earth_radius_m,
                g0,
                meters_per_unit,
            } => {
                require_positive("gravity.earth_radius_m", earth_radius_m)?;
                require_positive("gravity.g0", g0)?;
                require_positive("gravity.meters_per_unit", meters_per_unit)
            }
        }
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidConstant { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_square_is_exact_at_ground() {
        let g = GravityModel::inverse_square_earth();
        assert_eq!(g.at(0.0), STANDARD_GRAVITY);
        assert_eq!(g.surface(), STANDARD_GRAVITY);
    }

    #[test]
    fn inverse_square_matches_closed_form() {
        let g = GravityModel::inverse_square_earth();
        // 1000 units = 100 km
        let expected = STANDARD_GRAVITY * (6_371_000.0_f64 / 6_471_000.0).powi(2);
        assert_relative_eq!(g.at(1000.0), expected, max_relative = 1e-12);
    }

    #[test]
    fn inverse_square_is_positive_and_non_increasing() {
        let g = GravityModel::inverse_square_earth();
        let mut prev = g.at(0.0);
        for alt in (0..200_000).step_by(997) {
            let cur = g.at(alt as f64);
            assert!(cur > 0.0);
            assert!(cur <= prev, "gravity rose at altitude {alt}");
            prev = cur;
        }
    }

    #[test]
    fn below_ground_reads_as_ground() {
        let g = GravityModel::inverse_square_earth();
        assert_eq!(g.at(-50.0), STANDARD_GRAVITY);
        assert_eq!(g.at(f64::NAN), STANDARD_GRAVITY);
    }

    #[test]
    fn cutoff_is_a_step() {
        let g = GravityModel::cutoff(100.0);
        assert_eq!(g.at(0.0), STANDARD_GRAVITY);
        assert_eq!(g.at(99.9), STANDARD_GRAVITY);
        assert_eq!(g.at(100.0), 0.0);
        assert_eq!(g.at(5_000.0), 0.0);
    }

    #[test]
    fn validation_rejects_non_positive_parameters() {
        assert!(GravityModel::cutoff(0.0).validate().is_err());
        let bad = GravityModel::InverseSquare {
            earth_radius_m: f64::INFINITY,
            g0: 9.81,
            meters_per_unit: 100.0,
        };
        assert!(bad.validate().is_err());
        assert!(GravityModel::default().validate().is_ok());
    }
}
