//! Live projectile kinematics and landing resolution

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{contact_radius, segment_circle_entry};
use super::connectivity::{floating_cells, match_cluster};
use super::grid::{CellCoord, Color, Grid};

/// A fired projectile (owned by the shooter while in flight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Result of advancing a projectile one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    Flying,
    /// Touched the ceiling or a placed cell; `pos` is the contact point
    Contact,
    /// Left the field below `floor`
    Lost,
}

impl Projectile {
    /// Launch from `origin` along a unit `direction`
    pub fn launch(origin: Vec2, direction: Vec2, speed: f32, radius: f32, color: Color) -> Self {
        Self {
            pos: origin,
            vel: direction * speed,
            radius,
            color,
        }
    }

    /// Integrate one fixed step, mirroring off the side walls
    ///
    /// Returns the point where the wall was met, if it was.
    pub fn step(&mut self, play_width: f32) -> Option<Vec2> {
        let from = self.pos;
        let min_x = self.radius;
        let max_x = play_width - self.radius;
        self.pos += self.vel;

        let (wall_x, away) = if self.pos.x < min_x {
            (min_x, 1.0)
        } else if self.pos.x > max_x {
            (max_x, -1.0)
        } else {
            return None;
        };

        let t = if self.vel.x != 0.0 {
            ((wall_x - from.x) / self.vel.x).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.pos.x = (2.0 * wall_x - self.pos.x).clamp(min_x, max_x);
        self.vel.x = away * self.vel.x.abs();
        Some(Vec2::new(wall_x, from.y + self.vel.y * t))
    }

    /// Advance one tick against the current grid
    ///
    /// Contact is swept along the step, so the projectile stops at the same
    /// point the analytic trace reports instead of overshooting into a cell.
    pub fn advance(&mut self, grid: &Grid, floor: f32) -> Flight {
        let reach = contact_radius(grid.cell_radius(), self.radius);
        let from = self.pos;
        let legs = match self.step(grid.width()) {
            Some(wall) => [(from, wall), (wall, self.pos)],
            None => [(from, self.pos), (self.pos, self.pos)],
        };

        for (a, b) in legs {
            if let Some(point) = self.first_contact(grid, a, b, reach) {
                self.pos = point;
                return Flight::Contact;
            }
        }

        if self.pos.y - self.radius > floor {
            Flight::Lost
        } else {
            Flight::Flying
        }
    }

    /// Earliest ceiling or cell contact along `a..b`
    fn first_contact(&self, grid: &Grid, a: Vec2, b: Vec2, reach: f32) -> Option<Vec2> {
        let ceiling = if b.y - self.radius <= 0.0 {
            let t = if a.y - self.radius <= 0.0 || a.y == b.y {
                0.0
            } else {
                (a.y - self.radius) / (a.y - b.y)
            };
            Some(t)
        } else {
            None
        };
        let cell = grid
            .occupied()
            .filter_map(|(cell, _)| segment_circle_entry(a, b, grid.cell_center(cell), reach))
            .min_by(f32::total_cmp);

        let t = match (ceiling, cell) {
            (Some(c), Some(h)) => c.min(h),
            (c, h) => c.or(h)?,
        };
        Some(a.lerp(b, t))
    }
}

/// Point values and cluster threshold used when a shot lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRules {
    pub min_match: usize,
    pub match_points: u64,
    pub floating_points: u64,
}

/// What happened when a projectile landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Landing {
    /// Snap target (reported even when the shot is discarded)
    pub cell: CellCoord,
    /// False if the snap target was already occupied
    pub placed: bool,
    /// Cleared same-color cluster (row-major)
    pub popped: Vec<CellCoord>,
    /// Cells cleared for losing their ceiling anchor (row-major)
    pub dropped: Vec<CellCoord>,
    pub points: u64,
}

/// Snap a projectile at `pos` into the grid and clear what it completes
///
/// An occupied snap target is never overwritten: the shot is discarded.
pub fn land(grid: &mut Grid, pos: Vec2, color: Color, rules: &ScoreRules) -> Landing {
    let cell = grid.nearest_cell(pos);
    let mut landing = Landing {
        cell,
        placed: false,
        popped: Vec::new(),
        dropped: Vec::new(),
        points: 0,
    };
    if grid.is_occupied(cell) {
        return landing;
    }

    grid.set(cell, Some(color));
    landing.placed = true;

    let cluster = match_cluster(grid, cell, color);
    if cluster.len() < rules.min_match {
        return landing;
    }

    for &c in &cluster {
        grid.set(c, None);
    }
    landing.points += cluster.len() as u64 * rules.match_points;
    landing.popped = cluster.into_iter().collect();

    let floating = floating_cells(grid);
    for &c in &floating {
        grid.set(c, None);
    }
    landing.points += floating.len() as u64 * rules.floating_points;
    landing.dropped = floating;

    landing
}
