//! Data-driven game balance
//!
//! Defaults mirror [`crate::consts`]. A JSON document may override any subset
//! of fields; missing fields keep their defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::grid::{Cell, Direction, Grid};
use crate::sim::hazard::{self, Hazard, Orientation};
use crate::sim::powerup::PowerUpConfig;
use crate::sim::snake::Snake;

/// Laser placement as written in tuning files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardSpec {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub orientation: Orientation,
    pub length: u32,
}

impl HazardSpec {
    pub fn to_hazard(self) -> Hazard {
        Hazard::new(Cell::new(self.x, self.y), self.orientation, self.length)
    }
}

impl From<Hazard> for HazardSpec {
    fn from(h: Hazard) -> Self {
        Self {
            x: h.origin.x,
            y: h.origin.y,
            orientation: h.orientation,
            length: h.length,
        }
    }
}

/// Rejected tuning
#[derive(Debug)]
pub enum TuningError {
    Json(serde_json::Error),
    GridTooSmall(i32),
    BadSnakeLength(usize),
    BadSpeed { initial: u32, min: u32 },
    NoPowerUpSlots,
    ZeroSpawnInterval,
    EmptyHazard(usize),
    HazardOutOfBounds(usize),
    HazardOnSnake(usize),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Json(e) => write!(f, "invalid tuning JSON: {e}"),
            TuningError::GridTooSmall(size) => write!(f, "grid size {size} is below 4"),
            TuningError::BadSnakeLength(len) => {
                write!(f, "initial snake length {len} does not fit the grid")
            }
            TuningError::BadSpeed { initial, min } => write!(
                f,
                "min speed {min} must be positive and not above initial speed {initial}"
            ),
            TuningError::NoPowerUpSlots => write!(f, "max_power_ups must be at least 1"),
            TuningError::ZeroSpawnInterval => {
                write!(f, "power_up_spawn_interval must be at least 1 ms")
            }
            TuningError::EmptyHazard(i) => write!(f, "hazard #{i} has zero length"),
            TuningError::HazardOutOfBounds(i) => write!(f, "hazard #{i} leaves the grid"),
            TuningError::HazardOnSnake(i) => write!(f, "hazard #{i} covers the starting snake"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub grid_size: i32,
    pub initial_snake_length: usize,

    // === Speed curve (ms per step) ===
    pub initial_speed: u32,
    pub speed_decrement: u32,
    pub min_speed: u32,

    // === Scoring ===
    pub food_score: u32,
    pub pickup_score: u32,

    // === Power-ups (ms) ===
    pub power_up_duration: u64,
    pub power_up_spawn_interval: u64,
    pub power_up_lifetime: u64,
    pub max_power_ups: usize,

    /// Random probes before the exhaustive scan
    pub max_creation_attempts: u32,

    pub hazards: Vec<HazardSpec>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            initial_snake_length: INITIAL_SNAKE_LENGTH,
            initial_speed: INITIAL_SPEED,
            speed_decrement: SPEED_DECREMENT,
            min_speed: MIN_SPEED,
            food_score: FOOD_SCORE,
            pickup_score: SHIELD_SCORE,
            power_up_duration: POWER_UP_DURATION,
            power_up_spawn_interval: POWER_UP_SPAWN_INTERVAL,
            power_up_lifetime: POWER_UP_LIFETIME,
            max_power_ups: MAX_POWER_UPS,
            max_creation_attempts: MAX_CREATION_ATTEMPTS,
            hazards: hazard::default_layout()
                .into_iter()
                .map(HazardSpec::from)
                .collect(),
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }

    pub fn hazard_layout(&self) -> Vec<Hazard> {
        self.hazards.iter().map(|h| h.to_hazard()).collect()
    }

    /// Snake every session starts with: head at grid centre, heading right
    pub fn starting_snake(&self) -> Snake {
        Snake::spawn(
            self.grid().center(),
            Direction::Right,
            self.initial_snake_length,
        )
    }

    pub fn power_up_config(&self) -> PowerUpConfig {
        PowerUpConfig {
            spawn_interval: self.power_up_spawn_interval,
            lifetime: self.power_up_lifetime,
            effect_duration: self.power_up_duration,
            max_active: self.max_power_ups,
            pickup_score: self.pickup_score,
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.grid_size < 4 {
            return Err(TuningError::GridTooSmall(self.grid_size));
        }
        let len = self.initial_snake_length;
        if len == 0 || len > (self.grid_size / 2) as usize {
            return Err(TuningError::BadSnakeLength(len));
        }
        if self.min_speed == 0 || self.min_speed > self.initial_speed {
            return Err(TuningError::BadSpeed {
                initial: self.initial_speed,
                min: self.min_speed,
            });
        }
        if self.max_power_ups == 0 {
            return Err(TuningError::NoPowerUpSlots);
        }
        if self.power_up_spawn_interval == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }

        let grid = self.grid();
        let snake = self.starting_snake();
        for (i, spec) in self.hazards.iter().enumerate() {
            let hazard = spec.to_hazard();
            if hazard.length == 0 {
                return Err(TuningError::EmptyHazard(i));
            }
            let too_long = hazard.length > grid.size as u32;
            if too_long || !hazard.cells().all(|c| grid.in_bounds(c)) {
                return Err(TuningError::HazardOutOfBounds(i));
            }
            if hazard.cells().any(|c| snake.occupies(c)) {
                return Err(TuningError::HazardOnSnake(i));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        tuning.validate().unwrap();
        assert_eq!(tuning.hazards.len(), 4);
        assert_eq!(tuning.power_up_config(), PowerUpConfig::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "initial_speed": 120, "min_speed": 60 }"#).unwrap();
        assert_eq!(tuning.initial_speed, 120);
        assert_eq!(tuning.min_speed, 60);
        assert_eq!(tuning.grid_size, GRID_SIZE);
        assert_eq!(tuning.hazard_layout(), hazard::default_layout());
    }

    #[test]
    fn test_hazard_json_format() {
        let tuning = Tuning::from_json(
            r#"{ "hazards": [ { "x": 1, "y": 2, "type": "vertical", "length": 3 } ] }"#,
        )
        .unwrap();
        assert_eq!(
            tuning.hazard_layout(),
            vec![Hazard::new(Cell::new(1, 2), Orientation::Vertical, 3)]
        );
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "grid_size": 3 }"#),
            Err(TuningError::GridTooSmall(3))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "min_speed": 0 }"#),
            Err(TuningError::BadSpeed { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "max_power_ups": 0 }"#),
            Err(TuningError::NoPowerUpSlots)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "hazards": [ { "x": 18, "y": 0, "type": "horizontal", "length": 5 } ] }"#),
            Err(TuningError::HazardOutOfBounds(0))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "hazards": [ { "x": 8, "y": 8, "type": "vertical", "length": 5 } ] }"#),
            Err(TuningError::HazardOnSnake(0))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "power_up_spawn_interval": 0 }"#),
            Err(TuningError::ZeroSpawnInterval)
        ));
        assert!(matches!(
            Tuning::from_json(
                r#"{ "hazards": [ { "x": 5, "y": 5, "type": "horizontal", "length": 3000000000 } ] }"#
            ),
            Err(TuningError::HazardOutOfBounds(0))
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Json(_))
        ));
    }
}
