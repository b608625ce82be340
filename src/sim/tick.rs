//! Per-frame update
//!
//! Order within a frame: advance the session clock, skip everything else if
//! paused, run the row-shift animator, expire the swap animation, then step the
//! projectile unless the shift lock is held.

use glam::Vec2;

use super::grid::Color;
use super::projectile::{Flight, land};
use super::state::{GameEvent, GameSession};
use crate::consts::MAX_FRAME_MS;
use crate::platform::Clock;

impl GameSession {
    /// Advance one frame using the driver's clock
    pub fn frame<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.update(clock.now_ms());
    }

    /// Advance one frame at wall time `now_ms`
    pub fn update(&mut self, now_ms: f64) {
        let delta = match self.clock.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.clock.last_frame_ms = Some(now_ms);
        if self.paused {
            return;
        }
        self.clock.sim_ms += delta;
        let now = self.clock.sim_ms;

        if let Some(direction) = self.shifter.update(now, &mut self.grid) {
            self.emit(GameEvent::ShiftCommitted { direction });
            log::info!("Row shift committed: {:?}", direction);
        }

        if self.swap.is_some_and(|s| s.is_finished(now)) {
            self.swap = None;
        }

        if self.shifter.is_locked() {
            return;
        }
        self.step_projectile();
    }

    /// One fixed physics step for the live projectile
    fn step_projectile(&mut self) {
        let floor = self.shooter.position.y + self.settings.projectile_radius;
        let Some(projectile) = self.shooter.projectile.as_mut() else {
            return;
        };
        self.time_ticks += 1;

        match projectile.advance(&self.grid, floor) {
            Flight::Flying => {}
            Flight::Lost => {
                self.shooter.projectile = None;
                self.emit(GameEvent::ShotLost);
                log::debug!("Projectile left the field");
            }
            Flight::Contact => {
                let Some(projectile) = self.shooter.projectile.take() else {
                    return;
                };
                self.resolve_landing(projectile.pos, projectile.color);
            }
        }
    }

    fn resolve_landing(&mut self, pos: Vec2, color: Color) {
        let rules = self.settings.score_rules();
        let landing = land(&mut self.grid, pos, color, &rules);

        if !landing.placed {
            log::warn!(
                "Shot snapped to occupied cell {:?}; discarded",
                landing.cell
            );
            self.emit(GameEvent::ShotDiscarded { cell: landing.cell });
            return;
        }
        log::debug!("Landed {:?} at {:?}", color, landing.cell);
        self.emit(GameEvent::Landed {
            cell: landing.cell,
            color,
        });

        if !landing.popped.is_empty() {
            let points = landing.popped.len() as u64 * rules.match_points;
            log::debug!("Popped {} cells", landing.popped.len());
            self.emit(GameEvent::Popped {
                cells: landing.popped,
                points,
            });
        }
        if !landing.dropped.is_empty() {
            let points = landing.dropped.len() as u64 * rules.floating_points;
            log::debug!("Dropped {} floating cells", landing.dropped.len());
            self.emit(GameEvent::Dropped {
                cells: landing.dropped,
                points,
            });
        }
        self.score += landing.points;
    }
}
