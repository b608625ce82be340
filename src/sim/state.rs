//! Game session aggregate and input commands
//!
//! Every piece of mutable game state lives in `GameSession`; the UI layer
//! only reaches it through the commands and queries below.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::grid::{CellCoord, Color, Grid};
use super::projectile::Projectile;
use super::shift::{RowShifter, ShiftDirection};
use super::trajectory::{Trajectory, trace};
use crate::consts::MAX_PENDING_EVENTS;
use crate::settings::{Settings, SettingsError};
use crate::{normalize_angle, resolve_aim};

/// Why a command was refused (the UI may ignore these; state is unchanged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("a projectile is already in flight")]
    InFlight,
    #[error("aim points below the horizon")]
    AimBelowHorizon,
    #[error("aim angle is not a finite number")]
    InvalidAim,
    #[error("the grid is shifting")]
    ShiftLocked,
    #[error("the game is paused")]
    Paused,
    #[error("a row shift is already running")]
    ShiftInProgress,
}

/// Notifications for the UI layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Fired { color: Color },
    Landed { cell: CellCoord, color: Color },
    /// Snap target was already occupied; nothing placed
    ShotDiscarded { cell: CellCoord },
    /// Projectile left the field without landing
    ShotLost,
    Popped { cells: Vec<CellCoord>, points: u64 },
    Dropped { cells: Vec<CellCoord>, points: u64 },
    Swapped { main: Color, secondary: Color },
    ShiftStarted { direction: ShiftDirection },
    ShiftCommitted { direction: ShiftDirection },
    PauseToggled { paused: bool },
    Restarted { seed: u64 },
}

/// Launcher: position, loaded colors, and the live projectile
#[derive(Debug, Clone, Serialize)]
pub struct Shooter {
    pub position: Vec2,
    /// Loaded color (fired next)
    pub main: Color,
    /// On-deck color
    pub secondary: Color,
    pub(crate) projectile: Option<Projectile>,
}

impl Shooter {
    /// A projectile is in flight
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.projectile.is_some()
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }
}

/// Pointer aim
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AimState {
    pub angle: f32,
    /// Pointer is down / hovering over the field
    pub engaged: bool,
}

/// Brief color-swap animation on the launcher
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwapAnimation {
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl SwapAnimation {
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }
}

/// Frame timing: wall time in, simulation time out (paused time is skipped)
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SessionClock {
    pub(crate) last_frame_ms: Option<f64>,
    pub(crate) sim_ms: f64,
}

/// Per-frame view for renderers
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub cell_radius: f32,
    pub width: f32,
    /// Row-major palette indices
    pub cells: Vec<Option<u8>>,
    pub shooter_position: Vec2,
    pub main: Color,
    pub secondary: Color,
    pub projectile: Option<Vec2>,
    pub trajectory: Option<Trajectory>,
    pub shift_offset: f32,
    pub swap_progress: Option<f32>,
    pub score: u64,
    pub locked: bool,
    pub paused: bool,
}

/// The whole game: grid, launcher, aim, animations, score
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) settings: Settings,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) grid: Grid,
    pub(crate) shooter: Shooter,
    pub(crate) aim: AimState,
    pub(crate) shifter: RowShifter,
    pub(crate) swap: Option<SwapAnimation>,
    pub(crate) score: u64,
    pub(crate) paused: bool,
    pub(crate) clock: SessionClock,
    /// Simulation ticks run (physics steps only)
    pub(crate) time_ticks: u64,
    /// Pending notifications; the host must call `drain_events` every frame.
    /// Past `MAX_PENDING_EVENTS` the oldest are dropped.
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    /// Validate `settings`, then start a session
    pub fn try_new(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::new(settings, seed))
    }

    /// Start a session with a freshly generated grid
    ///
    /// `settings` must pass `Settings::validate`; use `try_new` for untrusted
    /// input. An empty grid or palette panics.
    pub fn new(settings: Settings, seed: u64) -> Self {
        debug_assert!(settings.validate().is_ok(), "invalid settings: {settings:?}");
        let grid = Grid::new(settings.rows, settings.cols, settings.cell_radius);
        let position = default_launch_position(&grid);
        let mut session = Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            grid,
            shooter: Shooter {
                position,
                main: Color(0),
                secondary: Color(0),
                projectile: None,
            },
            aim: AimState::default(),
            shifter: RowShifter::new(),
            swap: None,
            score: 0,
            paused: false,
            clock: SessionClock::default(),
            time_ticks: 0,
            events: Vec::new(),
            settings,
        };
        session.populate();
        log::info!(
            "Session started: {}x{} grid, seed {}",
            session.grid.rows(),
            session.grid.cols(),
            seed
        );
        session
    }

    /// Discard everything and deal a new grid (launcher position is kept)
    pub fn restart(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.grid.clear();
        self.shooter.projectile = None;
        self.aim = AimState::default();
        self.shifter.reset();
        self.swap = None;
        self.score = 0;
        self.paused = false;
        self.time_ticks = 0;
        self.events.clear();
        self.populate();
        self.emit(GameEvent::Restarted { seed });
        log::info!("Session restarted with seed: {}", seed);
    }

    /// Queue a notification for the UI, dropping the oldest past the cap
    pub(crate) fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.emit(event);
    }

    fn populate(&mut self) {
        self.grid
            .fill_random(self.settings.filled_rows, self.settings.palette_size, &mut self.rng);
        self.shooter.main = self.random_color();
        self.shooter.secondary = self.random_color();
    }

    fn random_color(&mut self) -> Color {
        Color(self.rng.random_range(0..self.settings.palette_size))
    }

    // === Commands ===

    /// Track the pointer; the preview shows while the aim resolves upward.
    /// Non-finite angles are ignored.
    pub fn update_aim(&mut self, angle: f32) {
        if !angle.is_finite() {
            return;
        }
        self.aim.angle = normalize_angle(angle);
        self.aim.engaged = true;
    }

    /// Pointer left the field or was released without firing
    pub fn release_aim(&mut self) {
        self.aim.engaged = false;
    }

    /// Fire the loaded color along `angle`
    pub fn attempt_fire(&mut self, angle: f32) -> Result<(), Rejected> {
        if self.paused {
            return Err(Rejected::Paused);
        }
        if !angle.is_finite() {
            return Err(Rejected::InvalidAim);
        }
        if self.shooter.is_moving() {
            return Err(Rejected::InFlight);
        }
        if self.shifter.is_locked() {
            return Err(Rejected::ShiftLocked);
        }
        let direction =
            resolve_aim(angle, self.settings.min_aim_rise).ok_or(Rejected::AimBelowHorizon)?;

        let color = self.shooter.main;
        self.shooter.projectile = Some(Projectile::launch(
            self.shooter.position,
            direction,
            self.settings.projectile_speed,
            self.settings.projectile_radius,
            color,
        ));
        self.shooter.main = self.shooter.secondary;
        self.shooter.secondary = self.random_color();
        self.aim.engaged = false;
        self.emit(GameEvent::Fired { color });
        log::debug!("Fired {:?} along {:?}", color, direction);
        Ok(())
    }

    /// Exchange loaded and on-deck colors; no-op while a shot is in flight
    pub fn swap_loaded(&mut self) -> bool {
        if self.shooter.is_moving() {
            return false;
        }
        std::mem::swap(&mut self.shooter.main, &mut self.shooter.secondary);
        self.swap = Some(SwapAnimation {
            start_ms: self.clock.sim_ms,
            duration_ms: self.settings.swap_duration_ms,
        });
        self.emit(GameEvent::Swapped {
            main: self.shooter.main,
            secondary: self.shooter.secondary,
        });
        true
    }

    /// Begin a one-row shift; ignored while another is running
    pub fn start_shift(&mut self, direction: ShiftDirection) -> Result<(), Rejected> {
        let started =
            self.shifter
                .start(direction, self.clock.sim_ms, self.settings.shift_duration_ms);
        if !started {
            return Err(Rejected::ShiftInProgress);
        }
        self.emit(GameEvent::ShiftStarted { direction });
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.emit(GameEvent::PauseToggled {
            paused: self.paused,
        });
        log::info!("Paused: {}", self.paused);
    }

    /// Layout moved the launcher (canvas resize)
    pub fn set_launch_position(&mut self, position: Vec2) {
        self.shooter.position = position;
    }

    // === Queries ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn shooter(&self) -> &Shooter {
        &self.shooter
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.shooter.projectile()
    }

    pub fn aim(&self) -> AimState {
        self.aim
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Firing and projectile motion are blocked by a running shift
    pub fn is_locked(&self) -> bool {
        self.shifter.is_locked()
    }

    pub fn shifter(&self) -> &RowShifter {
        &self.shifter
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Simulation time in ms (excludes paused time)
    pub fn sim_time_ms(&self) -> f64 {
        self.clock.sim_ms
    }

    /// Whether the aim preview should be shown
    pub fn aim_active(&self) -> bool {
        self.aim.engaged && !self.shooter.is_moving() && !self.shifter.is_locked()
    }

    /// Preview path for the current aim (recomputed on every call)
    pub fn aim_trajectory(&self) -> Option<Trajectory> {
        if !self.aim_active() {
            return None;
        }
        let direction = resolve_aim(self.aim.angle, self.settings.min_aim_rise)?;
        Some(trace(
            &self.grid,
            self.shooter.position,
            direction,
            self.settings.projectile_radius,
            self.settings.max_bounces,
        ))
    }

    /// Render-only vertical offset of the grid during a shift
    pub fn shift_offset(&self) -> f32 {
        self.shifter
            .visual_offset(self.clock.sim_ms, self.grid.row_spacing())
    }

    /// Progress of the launcher swap animation, if one is running
    pub fn swap_progress(&self) -> Option<f32> {
        self.swap.map(|s| s.progress(self.clock.sim_ms))
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            cell_radius: self.grid.cell_radius(),
            width: self.grid.width(),
            cells: self.grid.cells().iter().map(|c| c.map(|c| c.0)).collect(),
            shooter_position: self.shooter.position,
            main: self.shooter.main,
            secondary: self.shooter.secondary,
            projectile: self.projectile().map(|p| p.pos),
            trajectory: self.aim_trajectory(),
            shift_offset: self.shift_offset(),
            swap_progress: self.swap_progress(),
            score: self.score,
            locked: self.is_locked(),
            paused: self.paused,
        }
    }
}

/// Launcher centered below the grid with two cell diameters of clearance
pub fn default_launch_position(grid: &Grid) -> Vec2 {
    Vec2::new(grid.width() / 2.0, grid.height() + 4.0 * grid.cell_radius())
}
