//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick projectile step (never scaled by wall-clock time)
//! - Seeded RNG only
//! - Time enters only through `GameSession::update(now_ms)` (or a `platform::Clock`)
//! - No rendering dependencies

pub mod collision;
pub mod connectivity;
pub mod grid;
pub mod projectile;
pub mod shift;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use connectivity::{ceiling_reachable, floating_cells, match_cluster};
pub use grid::{CellCoord, Color, Grid};
pub use projectile::{Flight, Landing, Projectile, ScoreRules, land};
pub use shift::{RowShifter, ShiftDirection, ShiftPhase};
pub use state::{AimState, GameEvent, GameSession, Rejected, Shooter, Snapshot, SwapAnimation};
pub use trajectory::{Segment, TraceOutcome, Trajectory, trace};
