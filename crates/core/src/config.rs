//! Game configuration: world constants, the stage table and startup overrides.
//!
//! Everything here is built once before the loop starts and is read-only
//! afterwards. Validation happens at construction time so the physics core can
//! assume a non-empty stage table and finite, positive constants.

use thiserror::Error;

use crate::gravity::{require_positive, GravityModel};
use crate::rocket::footprint_width;
use crate::stage::default_stages;
use crate::types::*;

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("stage table is empty")]
    EmptyStageTable,

    #[error("stage {index} ({name}) has no nozzle rows")]
    EmptyStageMarker { index: usize, name: String },

    #[error("stage {index} ({name}): {field} must be positive and finite, got {value}")]
    InvalidStageValue {
        index: usize,
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("{field} must be positive and finite, got {value}")]
    InvalidConstant { field: &'static str, value: f64 },

    #[error("horizontal damping must be in (0, 1], got {0}")]
    InvalidDamping(f64),

    #[error("world {width}x{height} is too small for the rocket")]
    InvalidWorldBounds { width: i32, height: i32 },

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Immutable world constants.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Y of the ground line; a resting rocket's footprint ends here
    pub ground_level: i32,
    pub world_width: i32,
    pub world_height: i32,
    pub gravity: GravityModel,
    /// Altitude of the cosmetic "in space" marker, in meters
    pub karman_line_m: f64,
    /// Meters per world unit, used for HUD readouts
    pub meters_per_unit: f64,
    pub max_fuel: f64,
    /// Touchdowns faster than this (units/s) are crashes
    pub safe_landing_speed: f64,
    /// Fraction of `vx` kept per second
    pub horizontal_damping: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_level: GROUND_LEVEL,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            gravity: GravityModel::default(),
            karman_line_m: KARMAN_LINE_M,
            meters_per_unit: METERS_PER_UNIT,
            max_fuel: MAX_FUEL,
            safe_landing_speed: SAFE_LANDING_SPEED,
            horizontal_damping: HORIZONTAL_DAMPING,
        }
    }
}

impl WorldConfig {
    pub fn with_gravity(mut self, gravity: GravityModel) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_width <= 0 || self.world_height <= 0 {
            return Err(ConfigError::InvalidWorldBounds {
                width: self.world_width,
                height: self.world_height,
            });
        }
        self.gravity.validate()?;
        require_positive("karman_line_m", self.karman_line_m)?;
        require_positive("meters_per_unit", self.meters_per_unit)?;
        require_positive("max_fuel", self.max_fuel)?;
        require_positive("safe_landing_speed", self.safe_landing_speed)?;
        let d = self.horizontal_damping;
        if d.is_nan() || d <= 0.0 || d > 1.0 {
            return Err(ConfigError::InvalidDamping(d));
        }
        Ok(())
    }

    /// Kármán line expressed in world units above ground.
    pub fn karman_line_units(&self) -> f64 {
        self.karman_line_m / self.meters_per_unit
    }
}

/// Ordered, non-empty list of stages. Lookups wrap around.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTable {
    stages: Vec<Stage>,
}

impl StageTable {
    pub fn new(stages: Vec<Stage>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::EmptyStageTable);
        }
        for (index, stage) in stages.iter().enumerate() {
            let invalid = |field: &'static str, value: f64| ConfigError::InvalidStageValue {
                index,
                name: stage.name.clone(),
                field,
                value,
            };
            for (field, value) in [
                ("max_thrust_x", stage.max_thrust_x),
                ("max_thrust_y", stage.max_thrust_y),
                ("fuel_consumption_rate", stage.fuel_consumption_rate),
            ] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(invalid(field, value));
                }
            }
            if stage.marker.is_empty() || stage.marker.iter().all(|row| row.is_empty()) {
                return Err(ConfigError::EmptyStageMarker {
                    index,
                    name: stage.name.clone(),
                });
            }
        }
        Ok(Self { stages })
    }

    /// Stage at `index mod len`.
    pub fn get(&self, index: usize) -> &Stage {
        &self.stages[index % self.stages.len()]
    }

    /// Stage 0, the reference for thrust efficiency.
    pub fn baseline(&self) -> &Stage {
        &self.stages[0]
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self {
            stages: default_stages(),
        }
    }
}

/// World constants plus stage table, validated together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub stages: StageTable,
}

impl GameConfig {
    pub fn new(world: WorldConfig, stages: StageTable) -> Result<Self, ConfigError> {
        world.validate()?;
        let widest = stages
            .iter()
            .map(footprint_width)
            .max()
            .unwrap_or(0);
        if widest > world.world_width {
            return Err(ConfigError::InvalidWorldBounds {
                width: world.world_width,
                height: world.world_height,
            });
        }
        Ok(Self { world, stages })
    }
}

/// Which gravity model to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityKind {
    #[default]
    InverseSquare,
    Cutoff,
}

impl GravityKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inverse-square" | "inverse_square" | "inversesquare" => {
                Some(GravityKind::InverseSquare)
            }
            "cutoff" => Some(GravityKind::Cutoff),
            _ => None,
        }
    }
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub gravity: GravityKind,
    /// Cutoff altitude in world units (cutoff model only)
    pub gravity_cutoff: f64,
    /// Scenery seed; `None` means "derive one from the clock"
    pub seed: Option<u64>,
    pub tick_ms: u32,
    pub cloud_count: usize,
    pub tree_count: usize,
    pub log_path: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gravity: GravityKind::default(),
            gravity_cutoff: DEFAULT_GRAVITY_CUTOFF,
            seed: None,
            tick_ms: TICK_MS,
            cloud_count: DEFAULT_CLOUD_COUNT,
            tree_count: DEFAULT_TREE_COUNT,
            log_path: None,
        }
    }
}

impl RunConfig {
    /// Create from environment variables.
    ///
    /// - `ROCKET_GRAVITY`: `inverse-square` (default) or `cutoff`
    /// - `ROCKET_GRAVITY_CUTOFF`: cutoff altitude in world units
    /// - `ROCKET_SEED`: scenery seed
    /// - `ROCKET_TICK_MS`: loop period
    /// - `ROCKET_CLOUDS`, `ROCKET_TREES`: scenery counts
    /// - `ROCKET_LOG_PATH`: diagnostic log file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let gravity = match get("ROCKET_GRAVITY") {
            None => defaults.gravity,
            Some(v) => GravityKind::from_str(&v).ok_or_else(|| ConfigError::InvalidEnv {
                var: "ROCKET_GRAVITY",
                value: v.clone(),
                reason: "expected `inverse-square` or `cutoff`".to_string(),
            })?,
        };

        let gravity_cutoff = match get("ROCKET_GRAVITY_CUTOFF") {
            None => defaults.gravity_cutoff,
            Some(v) => parse_env::<f64>("ROCKET_GRAVITY_CUTOFF", &v)?,
        };
        let seed = match get("ROCKET_SEED") {
            None => None,
            Some(v) => Some(parse_env::<u64>("ROCKET_SEED", &v)?),
        };
        let tick_ms = match get("ROCKET_TICK_MS") {
            None => defaults.tick_ms,
            Some(v) => {
                let ms = parse_env::<u32>("ROCKET_TICK_MS", &v)?;
                if ms == 0 {
                    return Err(ConfigError::InvalidEnv {
                        var: "ROCKET_TICK_MS",
                        value: v,
                        reason: "must be at least 1".to_string(),
                    });
                }
                ms
            }
        };
        let cloud_count = match get("ROCKET_CLOUDS") {
            None => defaults.cloud_count,
            Some(v) => parse_env::<usize>("ROCKET_CLOUDS", &v)?,
        };
        let tree_count = match get("ROCKET_TREES") {
            None => defaults.tree_count,
            Some(v) => parse_env::<usize>("ROCKET_TREES", &v)?,
        };

        Ok(Self {
            gravity,
            gravity_cutoff,
            seed,
            tick_ms,
            cloud_count,
            tree_count,
            log_path: get("ROCKET_LOG_PATH"),
        })
    }

    pub fn gravity_model(&self) -> GravityModel {
        match self.gravity {
            GravityKind::InverseSquare => GravityModel::inverse_square_earth(),
            GravityKind::Cutoff => GravityModel::cutoff(self.gravity_cutoff),
        }
    }

    /// Build and validate the game configuration for this run.
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let world = WorldConfig::default().with_gravity(self.gravity_model());
        GameConfig::new(world, StageTable::new(default_stages())?)
    }
}

fn parse_env<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
