//! Grid-line marching ray caster.
//!
//! A ray is intersected separately with the vertical grid lines (`x` a multiple
//! of the cell size) and the horizontal ones (`y` a multiple of the cell size).
//! Each sub-cast steps from one crossing to the next until the cell just past
//! the crossing is a wall; the nearer of the two results is the hit.

use tracing::warn;

use crate::config::Config;
use crate::map::{BOUNDARY_WALL, GridMap};
use crate::player::Player;

/// Below this `|cos|` (or `|sin|`) the ray is treated as parallel to the grid
/// lines of that family and the sub-cast is skipped.
const AXIS_EPSILON: f64 = 1e-12;

/// One intersection of a ray with a wall face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub hit_x: f64,
    pub hit_y: f64,
    /// Euclidean distance from the ray origin, before fisheye correction.
    pub distance: f64,
    /// Always > 0.
    pub wall_id: u32,
}

/// Which family of grid lines the winning hit lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A line of constant `x`; the face runs along `y`.
    Vertical,
    /// A line of constant `y`; the face runs along `x`.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub record: HitRecord,
    pub side: Side,
}

impl RayHit {
    /// Column inside the wall's texture tile, always in `[0, cell_size)`.
    pub fn texture_offset(&self, cell_size: usize) -> usize {
        let along = match self.side {
            Side::Vertical => self.record.hit_y,
            Side::Horizontal => self.record.hit_x,
        };
        let offset = along.rem_euclid(cell_size as f64).floor();
        // NaN and negative values saturate to 0 on the cast
        (offset as usize).min(cell_size.saturating_sub(1))
    }
}

/// Casts rays against a `GridMap` using a fixed cell size.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    cell: f64,
}

impl Raycaster {
    pub fn new(config: &Config) -> Self {
        Self {
            cell: config.cell(),
        }
    }

    /// Nearest wall along the ray from `origin` at absolute direction `angle`.
    /// On an exact distance tie the vertical-line hit wins.
    pub fn cast(&self, origin: &Player, angle: f64, map: &GridMap) -> RayHit {
        let vertical = self.cast_vertical(origin, angle, map);
        let horizontal = self.cast_horizontal(origin, angle, map);
        match (vertical, horizontal) {
            (Some(v), Some(h)) if h.distance < v.distance => RayHit {
                record: h,
                side: Side::Horizontal,
            },
            (Some(v), _) => RayHit {
                record: v,
                side: Side::Vertical,
            },
            (None, Some(h)) => RayHit {
                record: h,
                side: Side::Horizontal,
            },
            (None, None) => {
                warn!(angle, "ray is parallel to both grid axes, using origin as hit");
                RayHit {
                    record: HitRecord {
                        hit_x: origin.x,
                        hit_y: origin.y,
                        distance: 0.0,
                        wall_id: BOUNDARY_WALL,
                    },
                    side: Side::Vertical,
                }
            }
        }
    }

    /// March across lines of constant `x`. `None` when the ray runs parallel
    /// to them.
    pub fn cast_vertical(&self, origin: &Player, angle: f64, map: &GridMap) -> Option<HitRecord> {
        let cos = angle.cos();
        if cos.abs() < AXIS_EPSILON {
            return None;
        }
        let right = cos >= 0.0;
        let tan = angle.tan();
        let home = (origin.x / self.cell).floor() as i64;
        let (mut line, step) = if right { (home + 1, 1) } else { (home, -1) };

        let mut last = (origin.x, origin.y);
        for _ in 0..Self::step_cap(map) {
            let x = line as f64 * self.cell;
            let y = origin.y + (x - origin.x) * tan;
            let cx = if right { line } else { line - 1 };
            let cy = (y / self.cell).floor() as i64;
            let wall_id = map.wall_at(cx, cy);
            if wall_id > 0 {
                return Some(Self::record(origin, x, y, wall_id));
            }
            last = (x, y);
            line += step;
        }
        Some(Self::capped(origin, angle, last))
    }

    /// March across lines of constant `y`. `None` when the ray runs parallel
    /// to them.
    pub fn cast_horizontal(&self, origin: &Player, angle: f64, map: &GridMap) -> Option<HitRecord> {
        let sin = angle.sin();
        if sin.abs() < AXIS_EPSILON {
            return None;
        }
        let down = sin >= 0.0;
        let tan = angle.tan();
        let home = (origin.y / self.cell).floor() as i64;
        let (mut line, step) = if down { (home + 1, 1) } else { (home, -1) };

        let mut last = (origin.x, origin.y);
        for _ in 0..Self::step_cap(map) {
            let y = line as f64 * self.cell;
            let x = origin.x + (y - origin.y) / tan;
            let cx = (x / self.cell).floor() as i64;
            let cy = if down { line } else { line - 1 };
            let wall_id = map.wall_at(cx, cy);
            if wall_id > 0 {
                return Some(Self::record(origin, x, y, wall_id));
            }
            last = (x, y);
            line += step;
        }
        Some(Self::capped(origin, angle, last))
    }

    /// Crossings needed to leave the grid from anywhere inside it, plus slack.
    #[inline]
    fn step_cap(map: &GridMap) -> usize {
        map.cols().max(map.rows()) + 2
    }

    #[inline]
    fn record(origin: &Player, x: f64, y: f64, wall_id: u32) -> HitRecord {
        HitRecord {
            hit_x: x,
            hit_y: y,
            distance: origin.distance_to(x, y),
            wall_id,
        }
    }

    fn capped(origin: &Player, angle: f64, last: (f64, f64)) -> HitRecord {
        warn!(
            angle,
            x = last.0,
            y = last.1,
            "ray march hit its step cap, treating last crossing as solid"
        );
        Self::record(origin, last.0, last.1, BOUNDARY_WALL)
    }
}
