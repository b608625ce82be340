//! Gameplay settings
//!
//! Loaded from JSON by the host page (or built from defaults). Every field is
//! optional in the JSON; missing fields fall back to `crate::consts`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::ScoreRules;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid needs at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("filled_rows ({filled}) exceeds grid rows ({rows})")]
    TooManyFilledRows { filled: usize, rows: usize },
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("projectile_speed ({speed}) must stay below the contact radius ({reach})")]
    TunnelingSpeed { speed: f32, reach: f32 },
    #[error("min_match must be at least 1")]
    ZeroMinMatch,
}

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    pub rows: usize,
    pub cols: usize,
    /// Rows randomly filled on start/restart
    pub filled_rows: usize,
    /// Number of colors in play
    pub palette_size: u8,

    // === Geometry ===
    pub cell_radius: f32,
    pub projectile_radius: f32,
    /// Distance travelled per simulation tick
    pub projectile_speed: f32,

    // === Aiming ===
    /// Preview bounce budget
    pub max_bounces: u32,
    /// Minimum upward component of a launch direction
    pub min_aim_rise: f32,

    // === Animation ===
    pub shift_duration_ms: f64,
    pub swap_duration_ms: f64,

    // === Scoring ===
    pub match_points: u64,
    pub floating_points: u64,
    pub min_match: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            filled_rows: FILLED_ROWS,
            palette_size: PALETTE_SIZE,

            cell_radius: CELL_RADIUS,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,

            max_bounces: MAX_BOUNCES,
            min_aim_rise: MIN_AIM_RISE,

            shift_duration_ms: SHIFT_DURATION_MS,
            swap_duration_ms: SWAP_DURATION_MS,

            match_points: MATCH_POINTS,
            floating_points: FLOATING_POINTS,
            min_match: MIN_MATCH,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SettingsError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.filled_rows > self.rows {
            return Err(SettingsError::TooManyFilledRows {
                filled: self.filled_rows,
                rows: self.rows,
            });
        }
        if self.palette_size == 0 {
            return Err(SettingsError::EmptyPalette);
        }
        let positives = [
            ("cell_radius", self.cell_radius as f64),
            ("projectile_radius", self.projectile_radius as f64),
            ("projectile_speed", self.projectile_speed as f64),
            ("min_aim_rise", self.min_aim_rise as f64),
        ];
        for (name, value) in positives {
            // `!(value > 0.0)` also catches NaN
            if !(value > 0.0) {
                return Err(SettingsError::NonPositive { name, value });
            }
        }
        if self.shift_duration_ms < 0.0 || self.swap_duration_ms < 0.0 {
            return Err(SettingsError::NonPositive {
                name: "animation duration",
                value: self.shift_duration_ms.min(self.swap_duration_ms),
            });
        }
        let reach = self.contact_radius();
        if self.projectile_speed >= reach {
            return Err(SettingsError::TunnelingSpeed {
                speed: self.projectile_speed,
                reach,
            });
        }
        if self.min_match == 0 {
            return Err(SettingsError::ZeroMinMatch);
        }
        Ok(())
    }

    /// Center distance at which a projectile touches a placed cell
    pub fn contact_radius(&self) -> f32 {
        crate::sim::collision::contact_radius(self.cell_radius, self.projectile_radius)
    }

    /// Scoring rules handed to landing resolution
    pub fn score_rules(&self) -> ScoreRules {
        ScoreRules {
            min_match: self.min_match,
            match_points: self.match_points,
            floating_points: self.floating_points,
        }
    }
}
