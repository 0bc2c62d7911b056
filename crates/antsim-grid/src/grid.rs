use antsim_core::{AgentId, ColonyId, Vec2};

use crate::cell::{CellCoord, ClaimOutcome, ColonyCell, GroundCell, Occupancy};
use crate::marker::{MarkerChannel, MarkerDecay};

/// Another colony's agent found around a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub colony: ColonyId,
    pub agent: AgentId,
}

/// Fixed-size uniform grid over the world.
///
/// Each cell holds ground state (wall, food units) plus one [`ColonyCell`]
/// per colony. Every write is additive or slot-local, so the order in which
/// agents deposit or claim within a pass does not change the outcome beyond
/// the last-writer-wins occupancy slot.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    /// World-space bounds; may stop short of the last row/column of cells.
    extent: Vec2,
    colony_count: usize,
    decay: MarkerDecay,
    ground: Vec<GroundCell>,
    colonies: Vec<ColonyCell>,
}

impl SpatialGrid {
    /// Grid of `width` x `height` cells of `cell_size` world units each.
    pub fn new(
        width: u32,
        height: u32,
        cell_size: f32,
        colony_count: usize,
        decay: MarkerDecay,
    ) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        assert!(cell_size > 0.0, "cell_size must be > 0");
        assert!(colony_count > 0, "grid needs at least one colony");
        assert!(
            width <= i32::MAX as u32 && height <= i32::MAX as u32,
            "grid dimensions must fit in i32"
        );
        let Some(len) = (width as usize)
            .checked_mul(height as usize)
            .filter(|len| len.checked_mul(colony_count).is_some())
        else {
            panic!("grid cell count overflows usize");
        };
        Self {
            width: width as i32,
            height: height as i32,
            cell_size,
            extent: Vec2::new(width as f32 * cell_size, height as f32 * cell_size),
            colony_count,
            decay,
            ground: vec![GroundCell::default(); len],
            colonies: vec![ColonyCell::default(); len * colony_count],
        }
    }

    /// Grid covering a `world_width` x `world_height` area. Positions past
    /// the world size are outside even when the last cells extend further.
    pub fn for_world(
        world_width: f32,
        world_height: f32,
        cell_size: f32,
        colony_count: usize,
        decay: MarkerDecay,
    ) -> Self {
        let w = (world_width / cell_size).ceil().max(1.0) as u32;
        let h = (world_height / cell_size).ceil().max(1.0) as u32;
        let mut grid = Self::new(w, h, cell_size, colony_count, decay);
        grid.extent = Vec2::new(world_width, world_height);
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub fn colony_count(&self) -> usize {
        self.colony_count
    }

    pub fn decay(&self) -> MarkerDecay {
        self.decay
    }

    pub(crate) fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub(crate) fn idx(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }

    fn colony_idx(&self, idx: usize, colony: ColonyId) -> Option<usize> {
        let c = colony.index();
        if c >= self.colony_count {
            return None;
        }
        Some(idx * self.colony_count + c)
    }

    /// Maps a world position to its cell, or `None` when the position is
    /// outside the world. Never clamps.
    pub fn cell_at(&self, p: Vec2) -> Option<CellCoord> {
        let inside = p.x >= 0.0 && p.y >= 0.0 && p.x < self.extent.x && p.y < self.extent.y;
        if !inside {
            return None;
        }
        let cell = CellCoord::new(
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        );
        self.in_bounds(cell).then_some(cell)
    }

    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn colony_cell(&self, cell: CellCoord, colony: ColonyId) -> Option<&ColonyCell> {
        let idx = self.idx(cell)?;
        let c = self.colony_idx(idx, colony)?;
        Some(&self.colonies[c])
    }

    fn colony_cell_mut_at(&mut self, p: Vec2, colony: ColonyId) -> Option<&mut ColonyCell> {
        let cell = self.cell_at(p)?;
        let idx = self.idx(cell)?;
        let c = self.colony_idx(idx, colony)?;
        Some(&mut self.colonies[c])
    }

    pub(crate) fn colony_cells(&self, idx: usize) -> &[ColonyCell] {
        let start = idx * self.colony_count;
        &self.colonies[start..start + self.colony_count]
    }

    // --- walls and food -------------------------------------------------

    pub fn set_wall(&mut self, cell: CellCoord, wall: bool) {
        if let Some(idx) = self.idx(cell) {
            self.ground[idx].wall = wall;
        }
    }

    /// Out-of-grid cells are not walls; leaving the world is handled by the
    /// caller through `cell_at`.
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.idx(cell)
            .map(|idx| self.ground[idx].wall)
            .unwrap_or(false)
    }

    pub fn food(&self, cell: CellCoord) -> u32 {
        self.idx(cell).map(|idx| self.ground[idx].food).unwrap_or(0)
    }

    pub fn add_food_at(&mut self, p: Vec2, amount: u32) {
        if let Some(idx) = self.cell_at(p).and_then(|c| self.idx(c)) {
            let ground = &mut self.ground[idx];
            if !ground.wall {
                ground.food = ground.food.saturating_add(amount);
            }
        }
    }

    pub fn is_on_food(&self, p: Vec2) -> bool {
        self.cell_at(p).map(|c| self.food(c) > 0).unwrap_or(false)
    }

    /// Takes one food unit; returns `true` only if that was the cell's last
    /// unit.
    pub fn pick_food(&mut self, p: Vec2) -> bool {
        let Some(idx) = self.cell_at(p).and_then(|c| self.idx(c)) else {
            return false;
        };
        let ground = &mut self.ground[idx];
        if ground.food == 0 {
            return false;
        }
        ground.food -= 1;
        ground.food == 0
    }

    pub fn total_food(&self) -> u64 {
        self.ground.iter().map(|g| g.food as u64).sum()
    }

    /// Flags every cell whose center lies within `radius` of `center` as part
    /// of `colony`'s home.
    pub fn mark_home(&mut self, center: Vec2, radius: f32, colony: ColonyId) {
        let r = (radius / self.cell_size).ceil() as i32;
        let Some(origin) = self.cell_at(center) else {
            return;
        };
        for dy in -r..=r {
            for dx in -r..=r {
                let cell = CellCoord::new(origin.x + dx, origin.y + dy);
                let Some(idx) = self.idx(cell) else { continue };
                let cell_center = self.cell_center(cell);
                if cell_center.distance(center) > radius || self.cell_at(cell_center).is_none() {
                    continue;
                }
                if let Some(c) = self.colony_idx(idx, colony) {
                    self.colonies[c].home = true;
                }
            }
        }
    }

    // --- markers --------------------------------------------------------

    pub fn intensity(&self, p: Vec2, channel: MarkerChannel, colony: ColonyId) -> f32 {
        self.cell_at(p)
            .and_then(|cell| self.colony_cell(cell, colony))
            .map(|c| c.intensity[channel.index()])
            .unwrap_or(0.0)
    }

    /// Adds `amount` to the channel of `colony` at `p`. Out-of-world deposits
    /// are dropped.
    pub fn deposit_marker(&mut self, p: Vec2, channel: MarkerChannel, colony: ColonyId, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        if let Some(cell) = self.colony_cell_mut_at(p, colony) {
            cell.intensity[channel.index()] += amount;
        }
    }

    /// Exponential decay of every channel of every cell over `dt` seconds.
    pub fn decay_tick(&mut self, dt: f32) {
        let factors = self.decay.factors(dt);
        for cell in self.colonies.iter_mut() {
            for (value, factor) in cell.intensity.iter_mut().zip(factors) {
                *value *= factor;
            }
        }
    }

    // --- occupancy ------------------------------------------------------

    pub fn occupancy(&self, p: Vec2, colony: ColonyId) -> Option<Occupancy> {
        let cell = self.cell_at(p)?;
        self.colony_cell(cell, colony).map(|c| c.occupancy)
    }

    /// Records `agent` as the occupant of its cell for `colony`.
    ///
    /// A slot flagged fighting is only rewritten by its own occupant.
    pub fn claim_occupancy(
        &mut self,
        p: Vec2,
        agent: AgentId,
        colony: ColonyId,
        fighting: bool,
    ) -> ClaimOutcome {
        let Some(cell) = self.colony_cell_mut_at(p, colony) else {
            return ClaimOutcome::OutOfBounds;
        };
        let slot = &mut cell.occupancy;
        if slot.fighting && slot.agent != Some(agent) {
            return ClaimOutcome::Blocked;
        }
        slot.agent = Some(agent);
        slot.fighting = fighting;
        ClaimOutcome::Claimed
    }

    /// Clears the slot if `agent` is its recorded occupant; otherwise a no-op.
    pub fn release_occupancy(&mut self, p: Vec2, agent: AgentId, colony: ColonyId) {
        if let Some(cell) = self.colony_cell_mut_at(p, colony) {
            if cell.occupancy.agent == Some(agent) {
                cell.occupancy = Occupancy::default();
            }
        }
    }

    /// Occupants of colonies other than `colony` in the 3x3 block around `p`,
    /// in fixed scan order (rows top to bottom, then colony id).
    pub fn enemies_around(&self, p: Vec2, colony: ColonyId) -> Vec<Occupant> {
        let mut out = Vec::new();
        let Some(origin) = self.cell_at(p) else {
            return out;
        };
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(idx) = self.idx(CellCoord::new(origin.x + dx, origin.y + dy)) else {
                    continue;
                };
                for (c, cell) in self.colony_cells(idx).iter().enumerate() {
                    if c == colony.index() {
                        continue;
                    }
                    if let Some(agent) = cell.occupancy.agent {
                        out.push(Occupant {
                            colony: ColonyId(c as u8),
                            agent,
                        });
                    }
                }
            }
        }
        out
    }
}
