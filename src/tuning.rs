//! Data-driven physics balance
//!
//! Every rate is expressed per 60 Hz baseline step and scaled by the frame's
//! step scale inside the simulation. Defaults reproduce the stock feel; a
//! JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tuning value `{field}` must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Physics constants for all five modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Shared ===
    /// Forward speed for every mode except wave
    pub run_speed: f32,
    /// Downward acceleration for cube (ball scales it)
    pub gravity: f32,
    /// Largest vertical speed reachable by falling
    pub terminal_velocity: f32,

    // === Cube ===
    pub jump_power: f32,
    /// Minimum baseline steps between two jumps
    pub jump_interval: f32,
    /// Airborne spin (degrees per step)
    pub cube_spin: f32,

    // === Ball ===
    pub ball_gravity_scale: f32,

    // === Ship ===
    pub ship_max_speed: f32,
    /// Acceleration toward the upper bound while input is held
    pub ship_lift: f32,
    /// Acceleration toward the lower bound while released
    pub ship_fall: f32,

    // === Wave ===
    /// Both axes; equal to `run_speed` gives a 45 degree diagonal
    pub wave_speed: f32,

    // === Spider ===
    /// Flash decay per step (flash starts at 1.0)
    pub spider_flash_decay: f32,

    // === Boost pads ===
    pub boost_cube: f32,
    pub boost_ball: f32,
    pub boost_ship: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_speed: 6.0,
            gravity: 0.6,
            terminal_velocity: 15.0,

            jump_power: 11.25,
            jump_interval: 10.0,
            cube_spin: 7.5,

            ball_gravity_scale: 0.9,

            ship_max_speed: 8.0,
            ship_lift: 0.5,
            ship_fall: 0.4,

            wave_speed: 6.0,

            spider_flash_decay: 0.1,

            boost_cube: 16.0,
            boost_ball: 12.0,
            boost_ship: 9.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All constants must be finite and strictly positive
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields: [(&'static str, f32); 15] = [
            ("run_speed", self.run_speed),
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("jump_power", self.jump_power),
            ("jump_interval", self.jump_interval),
            ("cube_spin", self.cube_spin),
            ("ball_gravity_scale", self.ball_gravity_scale),
            ("ship_max_speed", self.ship_max_speed),
            ("ship_lift", self.ship_lift),
            ("ship_fall", self.ship_fall),
            ("wave_speed", self.wave_speed),
            ("spider_flash_decay", self.spider_flash_decay),
            ("boost_cube", self.boost_cube),
            ("boost_ball", self.boost_ball),
            ("boost_ship", self.boost_ship),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.8 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.jump_power, Tuning::default().jump_power);
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = Tuning::from_json(r#"{ "ship_max_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotPositive { field: "ship_max_speed", .. }
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Tuning::from_json("{ gravity: }"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            wave_speed: 7.0,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
