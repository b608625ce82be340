//! Row-shift animation
//!
//! Two-phase: the renderer gets an eased visual offset while `Shifting`, and
//! the grid data only moves once the duration has elapsed. The lock is held
//! through one extra `Settling` update so the committed rows are never drawn
//! under the old offset. Time is passed in by the caller, so the whole thing
//! runs without real delays in tests.

use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// Which way the grid contents move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftDirection {
    /// +1: rows move toward row 0, row 0 is discarded
    TowardCeiling,
    /// -1: rows move away from row 0, the last row is discarded
    AwayFromCeiling,
}

impl ShiftDirection {
    pub fn sign(self) -> f32 {
        match self {
            ShiftDirection::TowardCeiling => 1.0,
            ShiftDirection::AwayFromCeiling => -1.0,
        }
    }

    /// Parse the +1/-1 convention used by the input layer
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(ShiftDirection::TowardCeiling),
            -1 => Some(ShiftDirection::AwayFromCeiling),
            _ => None,
        }
    }

    fn apply(self, grid: &mut Grid) {
        match self {
            ShiftDirection::TowardCeiling => grid.shift_toward_ceiling(),
            ShiftDirection::AwayFromCeiling => grid.shift_away_from_ceiling(),
        }
    }
}

/// Animator state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ShiftPhase {
    #[default]
    Idle,
    /// Visual offset running, grid untouched
    Shifting {
        start_ms: f64,
        duration_ms: f64,
        direction: ShiftDirection,
    },
    /// Grid committed, lock held for one more update
    Settling { direction: ShiftDirection },
}

/// Smoothstep easing on [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowShifter {
    phase: ShiftPhase,
}

impl RowShifter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ShiftPhase {
        self.phase
    }

    /// Begin a shift; ignored (returns false) unless idle
    pub fn start(&mut self, direction: ShiftDirection, now_ms: f64, duration_ms: f64) -> bool {
        if self.phase != ShiftPhase::Idle {
            return false;
        }
        self.phase = ShiftPhase::Shifting {
            start_ms: now_ms,
            duration_ms,
            direction,
        };
        true
    }

    /// True while firing and projectile physics must wait
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.phase != ShiftPhase::Idle
    }

    /// Eased progress of the running shift (0 when not shifting)
    pub fn progress(&self, now_ms: f64) -> f32 {
        match self.phase {
            ShiftPhase::Shifting {
                start_ms,
                duration_ms,
                ..
            } => {
                if duration_ms <= 0.0 {
                    return 1.0;
                }
                ease_in_out(((now_ms - start_ms) / duration_ms) as f32)
            }
            _ => 0.0,
        }
    }

    /// Render-only vertical offset: `-sign × eased progress × row spacing`
    pub fn visual_offset(&self, now_ms: f64, row_spacing: f32) -> f32 {
        match self.phase {
            ShiftPhase::Shifting { direction, .. } => {
                -direction.sign() * self.progress(now_ms) * row_spacing
            }
            _ => 0.0,
        }
    }

    /// Advance the state machine
    ///
    /// Returns the direction on the single update that commits the grid shift.
    pub fn update(&mut self, now_ms: f64, grid: &mut Grid) -> Option<ShiftDirection> {
        match self.phase {
            ShiftPhase::Idle => None,
            ShiftPhase::Shifting {
                start_ms,
                duration_ms,
                direction,
            } => {
                if now_ms - start_ms < duration_ms {
                    return None;
                }
                direction.apply(grid);
                self.phase = ShiftPhase::Settling { direction };
                Some(direction)
            }
            ShiftPhase::Settling { .. } => {
                self.phase = ShiftPhase::Idle;
                None
            }
        }
    }

    /// Drop any running shift without touching the grid (restart)
    pub fn reset(&mut self) {
        self.phase = ShiftPhase::Idle;
    }
}
