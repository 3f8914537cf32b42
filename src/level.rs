//! Level descriptors
//!
//! A level is an ordered, read-only list of obstacles and portals plus the
//! playfield geometry. Descriptors are validated once at load so the
//! simulation can assume finite coordinates and positive sizes.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GROUND_BAND, LEVEL_HEIGHT};
use crate::sim::geometry::Rect;
use crate::sim::state::{Bounds, Mode, Obstacle, Portal};

/// Reasons a level is rejected at load time
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{what} {index} has a non-finite coordinate or rotation")]
    NonFinite { what: &'static str, index: usize },
    #[error("{what} {index} has a non-positive size")]
    NonPositiveSize { what: &'static str, index: usize },
    #[error("ground band {ground_band} does not fit in level height {height}")]
    BadBounds { height: f32, ground_band: f32 },
    #[error("finish line must be finite, got {0}")]
    BadFinish(f32),
    #[error("spawn point must be finite")]
    BadSpawn,
}

fn default_height() -> f32 {
    LEVEL_HEIGHT
}

fn default_ground_band() -> f32 {
    GROUND_BAND
}

fn default_mode() -> Mode {
    Mode::Cube
}

/// A complete level as handed over by the level provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub portals: Vec<Portal>,
    /// Crossing this x finishes the level
    pub finish_x: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    /// Height of the ground strip below the floor line
    #[serde(default = "default_ground_band")]
    pub ground_band: f32,
    /// Top-left spawn position; defaults to resting on the floor at x = 0
    #[serde(default)]
    pub spawn: Option<Vec2>,
    #[serde(default = "default_mode")]
    pub start_mode: Mode,
}

impl Level {
    /// Empty level with default geometry
    pub fn new(finish_x: f32) -> Self {
        Self {
            name: String::new(),
            obstacles: Vec::new(),
            portals: Vec::new(),
            finish_x,
            height: LEVEL_HEIGHT,
            ground_band: GROUND_BAND,
            spawn: None,
            start_mode: Mode::Cube,
        }
    }

    #[must_use]
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    #[must_use]
    pub fn with_portal(mut self, portal: Portal) -> Self {
        self.portals.push(portal);
        self
    }

    /// Parse and validate a level document
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        log::info!(
            "Loaded level '{}': {} obstacles, {} portals, finish at x={}",
            level.name,
            level.obstacles.len(),
            level.portals.len(),
            level.finish_x
        );
        Ok(level)
    }

    /// Load a level file from disk
    pub fn load(path: &std::path::Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject descriptors the simulation must never see
    pub fn validate(&self) -> Result<(), LevelError> {
        if !self.height.is_finite()
            || !self.ground_band.is_finite()
            || self.ground_band < 0.0
            || self.ground_band >= self.height
        {
            return Err(LevelError::BadBounds {
                height: self.height,
                ground_band: self.ground_band,
            });
        }
        if !self.finish_x.is_finite() {
            return Err(LevelError::BadFinish(self.finish_x));
        }
        if self.spawn.is_some_and(|s| !s.is_finite()) {
            return Err(LevelError::BadSpawn);
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            check_rect("obstacle", index, &obstacle.rect)?;
            if obstacle.rotation.is_some_and(|r| !r.is_finite()) {
                return Err(LevelError::NonFinite {
                    what: "obstacle",
                    index,
                });
            }
        }
        for (index, portal) in self.portals.iter().enumerate() {
            check_rect("portal", index, &portal.rect)?;
        }
        Ok(())
    }

    /// Ceiling at y = 0, floor at the top of the ground band
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, self.height - self.ground_band)
    }

    /// Where a fresh run starts
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn.unwrap_or_else(|| {
            let height = self.start_mode.size().y;
            Vec2::new(0.0, self.bounds().floor - height)
        })
    }
}

fn check_rect(what: &'static str, index: usize, rect: &Rect) -> Result<(), LevelError> {
    if !rect.pos.is_finite() || !rect.size.is_finite() {
        return Err(LevelError::NonFinite { what, index });
    }
    if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
        return Err(LevelError::NonPositiveSize { what, index });
    }
    Ok(())
}
