use antsim_core::{ColonyId, Vec2};

use crate::cell::CellCoord;
use crate::grid::SpatialGrid;
use crate::marker::MarkerChannel;

/// Outcome of a neighborhood scan around an agent.
///
/// Forward-channel and repellent maxima are tracked independently: an agent
/// may flee a repellent while still being pulled by the best trail.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplingResult {
    pub max_intensity: f32,
    /// Unit vector from the sampling position toward the chosen cell.
    pub max_direction: Vec2,
    pub max_cell: Option<CellCoord>,
    /// A permanent source (food for `ToFood`, home for `ToHome`) was found;
    /// `max_*` then points at the nearest one.
    pub found_permanent: bool,
    /// Some colony is fighting inside the scanned area.
    pub found_fight: bool,
    pub max_repellent: f32,
    pub repellent_cell: Option<CellCoord>,
    pub repellent_direction: Vec2,
}

impl SpatialGrid {
    /// Scans every in-bounds, non-wall cell whose center lies within
    /// `search_radius` of `p`, rows top to bottom.
    ///
    /// Ties keep the first cell encountered in scan order, so the result is an
    /// approximation of the true maximum with bounded cost.
    pub fn sample_directional_intensity(
        &self,
        p: Vec2,
        channel: MarkerChannel,
        colony: ColonyId,
        search_radius: f32,
    ) -> SamplingResult {
        let mut result = SamplingResult::default();
        let Some(origin) = self.cell_at(p) else {
            return result;
        };
        let r = (search_radius / self.cell_size()).ceil() as i32;
        let mut best_permanent_dist = f32::INFINITY;

        for dy in -r..=r {
            for dx in -r..=r {
                let cell = CellCoord::new(origin.x + dx, origin.y + dy);
                let Some(idx) = self.idx(cell) else { continue };
                if self.is_wall(cell) {
                    continue;
                }
                let center = self.cell_center(cell);
                let offset = center - p;
                let dist = offset.length();
                if dist > search_radius {
                    continue;
                }

                let cells = self.colony_cells(idx);
                if cells.iter().any(|c| c.occupancy.fighting) {
                    result.found_fight = true;
                }
                let Some(own) = cells.get(colony.index()) else {
                    continue;
                };

                let permanent = match channel {
                    MarkerChannel::ToFood => self.food(cell) > 0,
                    MarkerChannel::ToHome => own.home,
                    _ => false,
                };
                if permanent && dist < best_permanent_dist {
                    best_permanent_dist = dist;
                    result.found_permanent = true;
                    result.max_cell = Some(cell);
                    result.max_direction = offset.normalized();
                    result.max_intensity = result
                        .max_intensity
                        .max(own.intensity[channel.index()]);
                }

                let intensity = own.intensity[channel.index()];
                if !result.found_permanent && intensity > result.max_intensity {
                    result.max_intensity = intensity;
                    result.max_cell = Some(cell);
                    result.max_direction = offset.normalized();
                }

                let repellent = own.intensity[MarkerChannel::Repellent.index()];
                if repellent > result.max_repellent {
                    result.max_repellent = repellent;
                    result.repellent_cell = Some(cell);
                    result.repellent_direction = offset.normalized();
                }
            }
        }

        result
    }
}
