//! Analytic aim preview
//!
//! Traces the launch ray leg by leg: each leg runs to the next wall or ceiling
//! event, and is cut short by the earliest occupied cell it touches. The
//! per-tick simulator in `projectile` uses the same contact radius and wall
//! limits, so the preview shows where the shot will actually stick.

use glam::Vec2;
use serde::Serialize;

use super::collision::{contact_radius, segment_circle_entry};
use super::grid::{CellCoord, Grid};

/// One straight leg of the path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

/// How a trace ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TraceOutcome {
    /// Touched an occupied cell; `landing` is where the shot would snap
    Collision {
        point: Vec2,
        struck: CellCoord,
        landing: CellCoord,
    },
    /// Reached the ceiling without touching anything
    Ceiling { point: Vec2, landing: CellCoord },
    /// Used up the bounce budget
    BounceLimit,
    /// Ray never meets a wall or the ceiling
    Escaped,
}

/// Bounce-segmented path from the launcher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub segments: Vec<Segment>,
    pub bounces: u32,
    pub outcome: TraceOutcome,
}

impl Trajectory {
    /// Contact point and struck cell, if the ray hit something
    pub fn collision(&self) -> Option<(Vec2, CellCoord)> {
        match self.outcome {
            TraceOutcome::Collision { point, struck, .. } => Some((point, struck)),
            _ => None,
        }
    }

    /// Cell the shot would occupy (ghost preview)
    pub fn landing(&self) -> Option<CellCoord> {
        match self.outcome {
            TraceOutcome::Collision { landing, .. } | TraceOutcome::Ceiling { landing, .. } => {
                Some(landing)
            }
            _ => None,
        }
    }

    pub fn end_point(&self) -> Option<Vec2> {
        self.segments.last().map(|s| s.end)
    }
}

/// Trace a projectile of `projectile_radius` launched from `origin` along
/// `direction` (unit vector)
pub fn trace(
    grid: &Grid,
    origin: Vec2,
    direction: Vec2,
    projectile_radius: f32,
    max_bounces: u32,
) -> Trajectory {
    let reach = contact_radius(grid.cell_radius(), projectile_radius);
    let min_x = projectile_radius;
    let max_x = grid.width() - projectile_radius;

    let mut pos = Vec2::new(origin.x.clamp(min_x, max_x), origin.y);
    let mut dir = direction;
    let mut segments = Vec::new();
    let mut bounces = 0;

    loop {
        let t_wall = if dir.x > 0.0 {
            (max_x - pos.x) / dir.x
        } else if dir.x < 0.0 {
            (min_x - pos.x) / dir.x
        } else {
            f32::INFINITY
        };
        let t_ceiling = if dir.y < 0.0 {
            ((projectile_radius - pos.y) / dir.y).max(0.0)
        } else {
            f32::INFINITY
        };

        let hits_ceiling = t_ceiling <= t_wall;
        let t_event = t_wall.min(t_ceiling).max(0.0);
        if !t_event.is_finite() {
            return Trajectory {
                segments,
                bounces,
                outcome: TraceOutcome::Escaped,
            };
        }

        let mut end = pos + dir * t_event;
        if !hits_ceiling {
            // Land exactly on the wall line so rounding never leaves the play width
            end.x = if dir.x > 0.0 { max_x } else { min_x };
        }

        if let Some((t, struck)) = earliest_contact(grid, pos, end, reach) {
            let point = pos.lerp(end, t);
            segments.push(Segment { start: pos, end: point });
            return Trajectory {
                segments,
                bounces,
                outcome: TraceOutcome::Collision {
                    point,
                    struck,
                    landing: grid.nearest_cell(point),
                },
            };
        }

        if end != pos {
            segments.push(Segment { start: pos, end });
        }

        if hits_ceiling {
            return Trajectory {
                segments,
                bounces,
                outcome: TraceOutcome::Ceiling {
                    point: end,
                    landing: grid.nearest_cell(end),
                },
            };
        }

        if bounces >= max_bounces {
            return Trajectory {
                segments,
                bounces,
                outcome: TraceOutcome::BounceLimit,
            };
        }
        bounces += 1;
        dir.x = -dir.x;
        pos = end;
    }
}

/// Earliest occupied cell touched along `start..end`, as (fraction, cell)
fn earliest_contact(grid: &Grid, start: Vec2, end: Vec2, reach: f32) -> Option<(f32, CellCoord)> {
    grid.occupied()
        .filter_map(|(cell, _)| {
            segment_circle_entry(start, end, grid.cell_center(cell), reach).map(|t| (t, cell))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
}
