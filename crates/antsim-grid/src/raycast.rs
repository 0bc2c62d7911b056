use antsim_core::Vec2;

use crate::cell::CellCoord;
use crate::grid::SpatialGrid;

/// First wall crossing of a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPoint {
    pub cell: CellCoord,
    pub point: Vec2,
    /// Axis-aligned surface normal: `(±1, 0)` or `(0, ±1)`.
    pub normal: Vec2,
    pub distance: f32,
}

impl SpatialGrid {
    /// Marches cell by cell from `origin` along `direction` and reports the
    /// first wall cell entered within `max_distance`.
    ///
    /// Leaving the grid is not a hit: the march stops and returns `None`, and
    /// the mover finds out through `cell_at` that it left the world.
    pub fn first_hit(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<HitPoint> {
        let dir = direction.normalized();
        if dir == Vec2::ZERO || max_distance <= 0.0 {
            return None;
        }
        let cs = self.cell_size();
        let mut cell = CellCoord::new(
            (origin.x / cs).floor() as i32,
            (origin.y / cs).floor() as i32,
        );

        let step_x = axis_step(dir.x);
        let step_y = axis_step(dir.y);
        let t_delta_x = if step_x != 0 { cs / dir.x.abs() } else { f32::INFINITY };
        let t_delta_y = if step_y != 0 { cs / dir.y.abs() } else { f32::INFINITY };
        let mut t_max_x = first_crossing(origin.x, dir.x, cell.x, step_x, cs);
        let mut t_max_y = first_crossing(origin.y, dir.y, cell.y, step_y, cs);

        loop {
            let (t, normal) = if t_max_x < t_max_y {
                cell.x += step_x;
                let t = t_max_x;
                t_max_x += t_delta_x;
                (t, Vec2::new(-step_x as f32, 0.0))
            } else {
                cell.y += step_y;
                let t = t_max_y;
                t_max_y += t_delta_y;
                (t, Vec2::new(0.0, -step_y as f32))
            };

            if t > max_distance || !self.in_bounds(cell) {
                return None;
            }
            if self.is_wall(cell) {
                return Some(HitPoint {
                    cell,
                    point: origin + dir * t,
                    normal,
                    distance: t,
                });
            }
        }
    }
}

fn axis_step(d: f32) -> i32 {
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}

fn first_crossing(origin: f32, d: f32, cell: i32, step: i32, cs: f32) -> f32 {
    match step {
        1 => ((cell + 1) as f32 * cs - origin) / d,
        -1 => (cell as f32 * cs - origin) / d,
        _ => f32::INFINITY,
    }
}
