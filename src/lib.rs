//! Hex Popper - simulation core for a hex-grid bubble shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, matching, trajectory, projectile, row shift)
//! - `platform`: Clock abstraction and browser bindings
//! - `settings`: Data-driven gameplay tuning

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{GameEvent, GameSession, Rejected, Snapshot};

use glam::Vec2;

/// Game configuration constants (defaults for `Settings`)
pub mod consts {
    /// Nominal frame length used by manual drivers (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest frame delta the session clock accepts (stalls don't fast-forward)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Grid dimensions
    pub const GRID_ROWS: usize = 12;
    pub const GRID_COLS: usize = 8;
    /// Rows filled at session start / restart
    pub const FILLED_ROWS: usize = 4;
    pub const PALETTE_SIZE: u8 = 5;

    /// Cell and projectile geometry
    pub const CELL_RADIUS: f32 = 16.0;
    pub const PROJECTILE_RADIUS: f32 = 16.0;
    /// Distance travelled per tick (must stay below the contact radius)
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Contact radius shrink so grazing shots slip between packed cells
    pub const COLLISION_EPSILON: f32 = 1.0;

    /// Preview trace bounce budget
    pub const MAX_BOUNCES: u32 = 8;
    /// Smallest upward component of a launch direction
    pub const MIN_AIM_RISE: f32 = 0.02;

    /// Animation durations
    pub const SHIFT_DURATION_MS: f64 = 400.0;
    pub const SWAP_DURATION_MS: f64 = 150.0;

    /// Scoring
    pub const MATCH_POINTS: u64 = 10;
    pub const FLOATING_POINTS: u64 = 5;
    pub const MIN_MATCH: usize = 3;

    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 256;
}

/// Normalized angle to [-π, π) (non-finite input is returned unchanged)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU itself
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Unit direction for an aim angle (screen space, y grows downward, -π/2 is straight up)
#[inline]
pub fn angle_to_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Resolve an aim angle into a launch direction.
///
/// Aim clearly below the horizon (`y > min_rise`) or a non-finite angle is
/// refused. Anything whose
/// upward component is weaker than `min_rise` is lifted to exactly that rise,
/// keeping its horizontal side, so a shot never travels flat or downward.
pub fn resolve_aim(angle: f32, min_rise: f32) -> Option<Vec2> {
    let dir = angle_to_direction(angle);
    if !dir.is_finite() || dir.y > min_rise {
        return None;
    }
    if dir.y >= -min_rise {
        let side = if dir.x < 0.0 { -1.0 } else { 1.0 };
        let run = (1.0 - min_rise * min_rise).max(0.0).sqrt();
        return Some(Vec2::new(side * run, -min_rise));
    }
    Some(dir)
}
