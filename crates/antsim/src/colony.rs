//! Colony population lifecycle: creation policy, promotion, per-tick passes
//! and retirement.

use std::collections::VecDeque;

use core::f32::consts::TAU;

use antsim_core::{AgentId, ColonyId, Cooldown, SlotStore, UniformSource, Vec2};
use antsim_grid::SpatialGrid;

use crate::agent::{Agent, AgentClass, Strike};
use crate::combat::{FightRequest, Roster};
use crate::config::SimConfig;
use crate::resource::ColonyResource;
use crate::snapshot::{AgentSnapshot, ColonySnapshot};
use crate::updater::AgentUpdater;

/// Bounded ring of live-population samples taken on a fixed period.
#[derive(Debug, Clone)]
pub struct PopulationHistory {
    sample: Cooldown,
    samples: VecDeque<usize>,
    capacity: usize,
}

impl PopulationHistory {
    pub fn new(period: f32, capacity: usize) -> Self {
        Self {
            sample: Cooldown::new(period),
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn update(&mut self, dt: f32, population: usize) {
        if !self.sample.update_auto_reset(dt) || self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(population);
    }

    /// Population change across the retained window.
    pub fn delta(&self) -> i64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => *last as i64 - *first as i64,
            _ => 0,
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = usize> + '_ {
        self.samples.iter().copied()
    }
}

/// One colony: its live agents plus the shared home resource.
#[derive(Debug, Clone)]
pub struct Colony {
    id: ColonyId,
    resource: ColonyResource,
    agents: SlotStore<Agent>,
    capacity: usize,
    creation: Cooldown,
    /// Agents created so far, initial population included.
    creation_count: u64,
    population: PopulationHistory,
}

impl Colony {
    /// Colony at `home` with the configured initial population of free
    /// workers.
    pub fn new(id: ColonyId, home: Vec2, config: &SimConfig, rng: &mut impl UniformSource) -> Self {
        let c = &config.colony;
        let mut colony = Self {
            id,
            resource: ColonyResource::new(home, c.home_radius),
            agents: SlotStore::new(),
            capacity: c.capacity,
            creation: Cooldown::new(c.creation_period),
            creation_count: 0,
            population: PopulationHistory::new(c.population_sample_period, c.population_history),
        };
        for _ in 0..c.initial_population.min(c.capacity) {
            colony.create_worker(config, rng);
        }
        colony
    }

    pub fn id(&self) -> ColonyId {
        self.id
    }

    pub fn agents(&self) -> &SlotStore<Agent> {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    pub fn resource(&self) -> &ColonyResource {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut ColonyResource {
        &mut self.resource
    }

    pub fn population(&self) -> &PopulationHistory {
        &self.population
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.agents.len() >= self.capacity
    }

    pub fn soldiers_count(&self) -> usize {
        self.agents
            .values()
            .filter(|a| a.class == AgentClass::Soldier)
            .count()
    }

    pub fn workers_count(&self) -> usize {
        self.agents.len() - self.soldiers_count()
    }

    /// Spawns a worker at home facing a random direction. Free of charge;
    /// food gating belongs to [`Colony::create_new_ants`].
    pub fn create_worker(&mut self, config: &SimConfig, rng: &mut impl UniformSource) -> AgentId {
        self.creation_count += 1;
        let angle = rng.uniform_under(TAU);
        let colony = self.id;
        let home = self.resource.position;
        let id = self
            .agents
            .insert_with(|id| Agent::new(id, colony, home, angle, &config.agent, rng));
        tracing::debug!(colony = colony.0, agent = ?id, "worker spawned");
        id
    }

    /// Promotes a live worker in place and consumes one pending sighting.
    pub fn promote_to_soldier(&mut self, id: AgentId, config: &SimConfig) -> bool {
        let Some(agent) = self.agents.get_mut(id) else {
            return false;
        };
        if agent.class == AgentClass::Soldier {
            return false;
        }
        agent.promote(&config.soldier);
        self.resource.enemies_sighted = self.resource.enemies_sighted.saturating_sub(1);
        tracing::debug!(colony = self.id.0, agent = ?id, "soldier promoted");
        true
    }

    fn must_create_soldier(&self, soldier_period: u64) -> bool {
        self.resource.enemies_sighted > 0
            && soldier_period > 0
            && self.creation_count % soldier_period == 0
    }

    /// Creation policy. On each expiry of the creation cooldown, with room
    /// left, buys a soldier (if sightings are pending on a soldier turn) or a
    /// worker. Insufficient food skips the turn. Returns the new agent.
    pub fn create_new_ants(
        &mut self,
        config: &SimConfig,
        rng: &mut impl UniformSource,
        dt: f32,
    ) -> Option<AgentId> {
        if !self.creation.update_auto_reset(dt) || self.is_full() {
            return None;
        }
        let c = &config.colony;
        if self.must_create_soldier(c.soldier_period) {
            if !self.resource.use_food(c.soldier_cost_factor * c.agent_cost) {
                return None;
            }
            let id = self.create_worker(config, rng);
            self.promote_to_soldier(id, config);
            Some(id)
        } else if self.resource.use_food(c.agent_cost) {
            Some(self.create_worker(config, rng))
        } else {
            None
        }
    }

    /// Combat bookkeeping for every agent; pushes pending fight requests.
    pub fn initial_update(
        &mut self,
        grid: &SpatialGrid,
        roster: &Roster,
        config: &SimConfig,
        dt: f32,
        requests: &mut Vec<FightRequest>,
    ) {
        for (_, agent) in self.agents.iter_ordered_mut() {
            if let Some(request) = AgentUpdater::initial_update(agent, grid, roster, config, dt) {
                requests.push(request);
            }
        }
    }

    /// Main pass: population sampling, creation, then behavior and home
    /// interaction for every agent. Strikes are buffered for the caller.
    /// Returns `true` if an agent was created.
    pub fn update(
        &mut self,
        grid: &mut SpatialGrid,
        roster: &Roster,
        config: &SimConfig,
        rng: &mut impl UniformSource,
        dt: f32,
        strikes: &mut Vec<Strike>,
    ) -> bool {
        self.population.update(dt, self.agents.len());
        let spawned = self.create_new_ants(config, rng, dt).is_some();
        for (_, agent) in self.agents.iter_ordered_mut() {
            AgentUpdater::update(agent, grid, roster, config, rng, dt, strikes);
            agent.check_colony(&mut self.resource, &config.agent);
        }
        spawned
    }

    /// Kills every exhausted agent, then removes the dead from the live set.
    /// Returns how many were removed.
    pub fn kill_weak_ants(&mut self, grid: &mut SpatialGrid) -> usize {
        for (_, agent) in self.agents.iter_ordered_mut() {
            if agent.is_done() && !agent.is_dead() {
                agent.kill(grid);
            }
        }
        let removed = self.agents.remove_where(Agent::is_dead);
        if !removed.is_empty() {
            tracing::debug!(colony = self.id.0, count = removed.len(), "agents retired");
        }
        removed.len()
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot {
            id: self.id,
            resource: self.resource,
            workers: self.workers_count(),
            soldiers: self.soldiers_count(),
            population_delta: self.population.delta(),
            agents: self.agents.values().map(AgentSnapshot::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use antsim_core::{ConstantSource, SplitMix64};
    use antsim_grid::MarkerDecay;

    use super::*;
    use crate::agent::Phase;

    fn config(initial: usize) -> SimConfig {
        let mut config = SimConfig::default();
        config.colony.initial_population = initial;
        config
    }

    fn grid() -> SpatialGrid {
        SpatialGrid::new(400, 225, 4.0, 2, MarkerDecay::default())
    }

    #[test]
    fn starts_with_free_initial_population() {
        let cfg = config(16);
        let colony = Colony::new(ColonyId(0), Vec2::new(400.0, 450.0), &cfg, &mut SplitMix64::new(1));
        assert_eq!(colony.len(), 16);
        assert_eq!(colony.workers_count(), 16);
        assert_eq!(colony.resource().food, 0.0);
        assert!(colony
            .agents()
            .values()
            .all(|a| a.position == Vec2::new(400.0, 450.0) && a.phase == Phase::ToFood));
    }

    #[test]
    fn creation_is_food_gated() {
        let cfg = config(0);
        let mut rng = ConstantSource::new(0.5);
        let mut colony = Colony::new(ColonyId(0), Vec2::new(100.0, 100.0), &cfg, &mut rng);
        colony.resource_mut().food = 3.0;
        for _ in 0..10 {
            assert_eq!(colony.create_new_ants(&cfg, &mut rng, 0.125), None);
        }
        colony.resource_mut().add_food(1.0);
        assert!(colony.create_new_ants(&cfg, &mut rng, 0.125).is_some());
        assert_eq!(colony.resource().food, 0.0);
    }

    #[test]
    fn sightings_buy_a_soldier_on_its_turn() {
        let cfg = config(0);
        let mut rng = ConstantSource::new(0.5);
        let mut colony = Colony::new(ColonyId(0), Vec2::new(100.0, 100.0), &cfg, &mut rng);
        colony.resource_mut().food = 100.0;
        colony.resource_mut().enemies_sighted = 1;

        // creation_count == 0 is a soldier turn.
        let id = colony.create_new_ants(&cfg, &mut rng, 0.125).unwrap();
        assert_eq!(colony.agent(id).unwrap().class, AgentClass::Soldier);
        assert_eq!(colony.resource().food, 88.0);
        assert_eq!(colony.resource().enemies_sighted, 0);

        let id = colony.create_new_ants(&cfg, &mut rng, 0.125).unwrap();
        assert_eq!(colony.agent(id).unwrap().class, AgentClass::Worker);
        assert_eq!(colony.resource().food, 84.0);
    }

    #[test]
    fn capacity_stops_creation() {
        let mut cfg = config(2);
        cfg.colony.capacity = 2;
        let mut rng = ConstantSource::new(0.5);
        let mut colony = Colony::new(ColonyId(0), Vec2::new(100.0, 100.0), &cfg, &mut rng);
        colony.resource_mut().food = 100.0;
        assert_eq!(colony.create_new_ants(&cfg, &mut rng, 0.125), None);
        assert_eq!(colony.resource().food, 100.0);
    }

    #[test]
    fn weak_ants_are_killed_then_compacted() {
        let cfg = config(3);
        let mut rng = ConstantSource::new(0.5);
        let mut g = grid();
        let mut colony = Colony::new(ColonyId(0), Vec2::new(100.0, 100.0), &cfg, &mut rng);
        let ids: Vec<_> = colony.agents().iter_ordered().map(|(id, _)| id).collect();
        {
            let a = colony.agent_mut(ids[1]).unwrap();
            a.phase = Phase::ToHome;
            a.terminate();
        }
        assert_eq!(colony.kill_weak_ants(&mut g), 1);
        assert_eq!(colony.len(), 2);
        assert!(colony.agent(ids[1]).is_none());
        assert!(g.is_on_food(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn population_history_reports_window_delta() {
        let mut h = PopulationHistory::new(1.0, 3);
        for population in [10, 12, 15, 20] {
            h.update(1.0, population);
        }
        assert_eq!(h.samples().collect::<Vec<_>>(), vec![12, 15, 20]);
        assert_eq!(h.delta(), 8);
    }
}
