//! Multi-colony simulation: owns the grid and every colony and runs the fixed
//! per-tick pass order.

use antsim_core::{ColonyId, TickContext, UniformSource, Vec2};
use antsim_grid::{CellCoord, SpatialGrid};

use crate::colony::Colony;
use crate::combat::{apply_strikes, pair_fights, Roster};
use crate::config::{FoodPatch, SimConfig};
use crate::error::ConfigError;
use crate::snapshot::WorldSnapshot;

/// Counters for one call to [`Simulation::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub fight_requests: usize,
    pub pairs: usize,
    pub strikes: usize,
    pub spawned: usize,
    pub retired: usize,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    grid: SpatialGrid,
    colonies: Vec<Colony>,
    tick: TickContext,
}

impl Simulation {
    /// Validates `config`, builds the grid, marks every home and seeds food.
    pub fn new(config: SimConfig, rng: &mut impl UniformSource) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut grid = SpatialGrid::for_world(
            config.world.width,
            config.world.height,
            config.world.cell_size,
            config.colonies.len(),
            config.markers.decay(),
        );
        for patch in &config.food {
            place_food(&mut grid, patch);
        }

        let mut colonies = Vec::with_capacity(config.colonies.len());
        for (index, home) in config.colonies.iter().enumerate() {
            let id = ColonyId(index as u8);
            grid.mark_home(home.position(), config.colony.home_radius, id);
            colonies.push(Colony::new(id, home.position(), &config, rng));
        }

        tracing::debug!(
            colonies = colonies.len(),
            width = grid.width(),
            height = grid.height(),
            food = grid.total_food(),
            "simulation created"
        );

        Ok(Self {
            config,
            grid,
            colonies,
            tick: TickContext::new(0, 0.0),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// World editing (walls, extra food) between steps.
    pub fn grid_mut(&mut self) -> &mut SpatialGrid {
        &mut self.grid
    }

    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn colony(&self, id: ColonyId) -> Option<&Colony> {
        self.colonies.get(id.index())
    }

    pub fn colony_mut(&mut self, id: ColonyId) -> Option<&mut Colony> {
        self.colonies.get_mut(id.index())
    }

    pub fn tick(&self) -> u64 {
        self.tick.tick
    }

    pub fn population(&self) -> usize {
        self.colonies.iter().map(Colony::len).sum()
    }

    /// Advances the world by `dt` seconds.
    ///
    /// Pass order: marker decay, roster capture, initial pass for every
    /// colony, fight pairing, main pass for every colony, strike application,
    /// retirement.
    pub fn step(&mut self, dt: f32, rng: &mut impl UniformSource) -> StepReport {
        self.tick = self.tick.advance(dt);
        let mut report = StepReport {
            tick: self.tick.tick,
            ..StepReport::default()
        };

        self.grid.decay_tick(dt);

        let roster = Roster::capture(&self.colonies);
        let mut requests = Vec::new();
        for colony in &mut self.colonies {
            colony.initial_update(&self.grid, &roster, &self.config, dt, &mut requests);
        }
        report.fight_requests = requests.len();
        report.pairs = pair_fights(&requests, &roster, &mut self.colonies);

        let mut strikes = Vec::new();
        for colony in &mut self.colonies {
            if colony.update(&mut self.grid, &roster, &self.config, rng, dt, &mut strikes) {
                report.spawned += 1;
            }
        }
        report.strikes = apply_strikes(&strikes, &mut self.colonies);

        for colony in &mut self.colonies {
            report.retired += colony.kill_weak_ants(&mut self.grid);
        }

        tracing::trace!(
            tick = report.tick,
            population = self.population(),
            pairs = report.pairs,
            strikes = report.strikes,
            spawned = report.spawned,
            retired = report.retired,
            "step"
        );
        report
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick.tick,
            ground_food: self.grid.total_food(),
            colonies: self.colonies.iter().map(Colony::snapshot).collect(),
        }
    }
}

/// Seeds every cell whose center lies within the patch radius; a zero radius
/// seeds the single cell under the patch center.
fn place_food(grid: &mut SpatialGrid, patch: &FoodPatch) {
    let center = Vec2::new(patch.x, patch.y);
    let Some(origin) = grid.cell_at(center) else {
        return;
    };
    if patch.radius <= 0.0 {
        grid.add_food_at(center, patch.amount);
        return;
    }
    let r = (patch.radius / grid.cell_size()).ceil() as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            let cell = CellCoord::new(origin.x + dx, origin.y + dy);
            let p = grid.cell_center(cell);
            if p.distance(center) <= patch.radius && grid.cell_at(p).is_some() {
                grid.add_food_at(p, patch.amount);
            }
        }
    }
}
