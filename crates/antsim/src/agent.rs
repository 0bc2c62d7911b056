use core::f32::consts::PI;

use antsim_core::{AgentId, AntRef, ColonyId, Cooldown, Heading, UniformSource, Vec2};
use antsim_grid::{ClaimOutcome, MarkerChannel, SpatialGrid};
use serde::{Deserialize, Serialize};

use crate::config::{AgentConfig, MarkerConfig, SoldierConfig};
use crate::resource::ColonyResource;

/// Behavior state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    ToFood,
    ToHome,
    /// Carrying the last unit of a source home; leaves repellent behind.
    ToHomeNoFood,
    ToEnemy,
    Refill,
    /// Terminal. Only the colony's compaction pass touches a dead agent.
    Dead,
}

impl Phase {
    pub fn carries_food(self) -> bool {
        matches!(self, Phase::ToHome | Phase::ToHomeNoFood)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentClass {
    Worker,
    Soldier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FightMode {
    NoFight,
    /// Opponent spotted, waiting for the pairing pass.
    ToFight,
    Fighting,
}

/// Class-dependent scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentBody {
    pub width: f32,
    pub length: f32,
    pub speed: f32,
    pub damage: f32,
    pub lifespan: f32,
}

impl AgentBody {
    pub fn worker(config: &AgentConfig) -> Self {
        Self {
            width: config.width,
            length: config.length,
            speed: config.speed,
            damage: config.damage,
            lifespan: config.lifespan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combat {
    pub mode: FightMode,
    /// Weak reference to the opponent; resolve through the roster on use.
    pub target: Option<AntRef>,
    pub request: Option<AntRef>,
    pub anchor: Vec2,
    /// Unit vector from this agent toward its opponent at pairing time.
    pub axis: Vec2,
    pub attack: Cooldown,
    pub to_fight_time: f32,
}

impl Combat {
    fn new(attack_period: f32) -> Self {
        Self {
            mode: FightMode::NoFight,
            target: None,
            request: None,
            anchor: Vec2::ZERO,
            axis: Vec2::ZERO,
            attack: Cooldown::new(attack_period),
            to_fight_time: 0.0,
        }
    }
}

/// Damage owed to an opponent, applied after the main pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub attacker: AntRef,
    pub target: AntRef,
    pub damage: f32,
}

/// One simulated ant.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub colony: ColonyId,
    pub class: AgentClass,
    pub phase: Phase,
    pub position: Vec2,
    pub heading: Heading,
    pub body: AgentBody,
    pub combat: Combat,
    /// Age/exhaustion; the agent is retired once it reaches `body.lifespan`.
    pub fatigue: f32,
    /// Chance per sensing to ignore markers and keep exploring.
    pub liberty: f32,
    pub enemy_found: bool,
    pub enemy_intensity: f32,
    /// Set by [`Agent::terminate`]; nothing revives a retiring agent.
    pub(crate) retiring: bool,
    pub(crate) bounces: u16,
    pub(crate) direction_update: Cooldown,
    pub(crate) marker_add: Cooldown,
    /// Time since the last reference point (home or food); weakens trails.
    pub(crate) trail_clock: f32,
    pub(crate) enemy_trail_clock: f32,
}

impl Agent {
    pub fn new(
        id: AgentId,
        colony: ColonyId,
        position: Vec2,
        angle: f32,
        config: &AgentConfig,
        rng: &mut impl UniformSource,
    ) -> Self {
        let direction_update = Cooldown::with_value(
            config.direction_update_period,
            config.direction_update_period * rng.uniform(),
        );
        let marker_add =
            Cooldown::with_value(config.marker_period, config.marker_period * rng.uniform());
        let liberty = rng.uniform_range(config.liberty_min, config.liberty_max);
        Self {
            id,
            colony,
            class: AgentClass::Worker,
            phase: Phase::ToFood,
            position,
            heading: Heading::new(angle),
            body: AgentBody::worker(config),
            combat: Combat::new(config.attack_period),
            fatigue: 0.0,
            liberty,
            enemy_found: false,
            enemy_intensity: 0.0,
            retiring: false,
            bounces: 0,
            direction_update,
            marker_add,
            trail_clock: 0.0,
            enemy_trail_clock: 0.0,
        }
    }

    pub fn handle(&self) -> AntRef {
        AntRef::new(self.colony, self.id)
    }

    /// Turns a worker into a soldier in place; identity and position are kept.
    pub fn promote(&mut self, soldier: &SoldierConfig) {
        if self.class == AgentClass::Soldier {
            return;
        }
        self.class = AgentClass::Soldier;
        self.body.width *= soldier.size_scale;
        self.body.length *= soldier.size_scale;
        self.body.damage *= soldier.damage_scale;
        self.body.lifespan *= soldier.lifespan_scale;
    }

    pub fn is_fighting(&self) -> bool {
        self.combat.mode == FightMode::Fighting
    }

    pub fn is_done(&self) -> bool {
        self.retiring || self.fatigue >= self.body.lifespan
    }

    pub fn is_dead(&self) -> bool {
        self.phase == Phase::Dead
    }

    pub fn carries_food(&self) -> bool {
        self.phase.carries_food()
    }

    /// Forces retirement at the end of the tick.
    pub fn terminate(&mut self) {
        self.retiring = true;
        self.fatigue = self.body.lifespan + 1.0;
    }

    pub(crate) fn update_clocks(&mut self, dt: f32) {
        self.fatigue += dt;
        self.trail_clock += dt;
        self.enemy_trail_clock += dt;
    }

    pub(crate) fn reset_markers(&mut self) {
        self.trail_clock = 0.0;
        self.enemy_trail_clock = 0.0;
    }

    /// Channel sampled while sensing; every home-bound phase follows the home
    /// trail.
    pub fn sampling_channel(&self) -> MarkerChannel {
        match self.phase {
            Phase::ToFood => MarkerChannel::ToFood,
            Phase::ToEnemy => MarkerChannel::ToEnemy,
            Phase::ToHome | Phase::ToHomeNoFood | Phase::Refill | Phase::Dead => {
                MarkerChannel::ToHome
            }
        }
    }

    // --- grid bookkeeping -----------------------------------------------

    pub(crate) fn claim_cell(&mut self, grid: &mut SpatialGrid) {
        let fighting = self.is_fighting();
        if grid.claim_occupancy(self.position, self.id, self.colony, fighting)
            == ClaimOutcome::OutOfBounds
        {
            self.terminate();
        }
    }

    pub(crate) fn release_cell(&self, grid: &mut SpatialGrid) {
        grid.release_occupancy(self.position, self.id, self.colony);
    }

    // --- movement -------------------------------------------------------

    /// Advances along the heading, bouncing off walls.
    pub(crate) fn update_position(
        &mut self,
        grid: &SpatialGrid,
        dt: f32,
        bounce_threshold: u16,
    ) {
        let mut v = self.heading.vec();
        let step = dt * self.body.speed;
        if let Some(hit) = grid.first_hit(self.position, v, step) {
            if self.bounces > bounce_threshold {
                self.terminate();
            } else {
                if hit.normal.x != 0.0 {
                    v.x = -v.x;
                }
                if hit.normal.y != 0.0 {
                    v.y = -v.y;
                }
            }
            self.bounces = self.bounces.saturating_add(1);
            self.heading.set_vec_now(v);
        } else {
            self.bounces = 0;
            self.position += v * step;
            if grid.cell_at(self.position).is_none() {
                self.terminate();
            }
        }
    }

    // --- interactions -----------------------------------------------------

    /// Picks food when standing on it. Returns `true` if a unit was taken.
    pub(crate) fn check_food(
        &mut self,
        grid: &mut SpatialGrid,
        agent: &AgentConfig,
        markers: &MarkerConfig,
    ) -> bool {
        if !grid.is_on_food(self.position) {
            return false;
        }
        self.phase = Phase::ToHome;
        self.heading.add_now(PI);
        self.fatigue = 0.0;
        self.trail_clock = 0.0;
        if grid.pick_food(self.position) {
            self.phase = Phase::ToHomeNoFood;
            self.marker_add.target = agent.repellent_period;
            self.marker_add.reset();
            grid.deposit_marker(
                self.position,
                MarkerChannel::Repellent,
                self.colony,
                markers.repellent_burst,
            );
        }
        true
    }

    /// Home interaction. Returns `true` if the agent was inside the capture
    /// radius.
    pub fn check_colony(&mut self, base: &mut ColonyResource, config: &AgentConfig) -> bool {
        if self.is_dead() || self.retiring || !base.contains(self.position) {
            return false;
        }
        self.marker_add.target = config.marker_period;
        if self.carries_food() {
            base.add_food(1.0);
            self.heading.add_now(PI);
            if self.enemy_found {
                base.enemies_sighted = base.enemies_sighted.saturating_add(1);
            }
        }
        if !self.is_fighting() {
            self.fatigue = 0.0;
        }
        self.enemy_intensity = 0.0;
        self.reset_markers();
        self.enemy_found = false;
        self.phase = match self.class {
            AgentClass::Soldier => Phase::ToEnemy,
            AgentClass::Worker => Phase::ToFood,
        };
        true
    }

    fn marker_intensity(base: f32, coef: f32, elapsed: f32) -> f32 {
        base * (-coef * elapsed).exp()
    }

    /// Drops the trail matching the opposite of the current phase.
    pub(crate) fn deposit_markers(&self, grid: &mut SpatialGrid, markers: &MarkerConfig) {
        let base = markers.base_intensity;
        match self.phase {
            Phase::ToFood | Phase::ToHome => {
                let channel = if self.phase == Phase::ToFood {
                    MarkerChannel::ToHome
                } else {
                    MarkerChannel::ToFood
                };
                let intensity = Self::marker_intensity(base, markers.trail_coef, self.trail_clock);
                grid.deposit_marker(self.position, channel, self.colony, intensity);
            }
            Phase::ToHomeNoFood => {
                let intensity =
                    Self::marker_intensity(base, markers.repellent_trail_coef, self.trail_clock);
                grid.deposit_marker(self.position, MarkerChannel::Repellent, self.colony, intensity);
            }
            Phase::ToEnemy | Phase::Refill | Phase::Dead => {}
        }
        if self.enemy_found {
            let intensity = self.enemy_intensity.min(markers.enemy_intensity_cap)
                * Self::marker_intensity(base, markers.enemy_trail_coef, self.enemy_trail_clock);
            grid.deposit_marker(self.position, MarkerChannel::ToEnemy, self.colony, intensity);
        }
    }

    // --- combat -----------------------------------------------------------

    pub(crate) fn detect_enemy(&mut self, step: f32) {
        self.enemy_found = true;
        self.enemy_trail_clock = 0.0;
        self.combat.to_fight_time = 0.0;
        self.enemy_intensity += step;
    }

    pub(crate) fn request_fight(&mut self, target: AntRef) {
        self.combat.mode = FightMode::ToFight;
        self.combat.request = Some(target);
    }

    pub(crate) fn drop_fight_request(&mut self) {
        self.combat.mode = FightMode::NoFight;
        self.combat.request = None;
        self.combat.to_fight_time = 0.0;
    }

    /// Locks this agent into a fight around a shared anchor.
    pub(crate) fn engage(&mut self, target: AntRef, anchor: Vec2, axis: Vec2) {
        self.combat.request = None;
        self.combat.mode = FightMode::Fighting;
        self.combat.target = Some(target);
        self.combat.anchor = anchor;
        self.combat.axis = axis;
        self.heading.set_vec_now(axis);
        self.enemy_found = true;
    }

    /// Holds position near the anchor and strikes on each cooldown expiry.
    /// With the opponent gone, drops out of combat instead.
    pub(crate) fn attack(
        &mut self,
        dt: f32,
        opponent_alive: bool,
        recovery: f32,
    ) -> Option<Strike> {
        let target = self.combat.target.filter(|_| opponent_alive);
        let Some(target) = target else {
            self.combat.mode = FightMode::NoFight;
            self.combat.target = None;
            if self.class == AgentClass::Soldier {
                self.fatigue = (self.fatigue - recovery).max(0.0);
            }
            return None;
        };

        let fight_dist = self.body.length * 0.25;
        let offset = 0.5 * self.body.length + self.combat.attack.ratio() * fight_dist;
        self.position = self.combat.anchor - self.combat.axis * offset;
        self.combat.attack.update(dt);
        if self.combat.attack.ready() {
            self.combat.attack.reset();
            return Some(Strike {
                attacker: self.handle(),
                target,
                damage: self.body.damage,
            });
        }
        None
    }

    /// Retires the agent: drops carried food, releases its cell, becomes
    /// `Dead`.
    pub(crate) fn kill(&mut self, grid: &mut SpatialGrid) {
        if self.carries_food() {
            grid.add_food_at(self.position, 1);
        }
        self.phase = Phase::Dead;
        self.release_cell(grid);
    }
}

#[cfg(test)]
mod tests {
    use antsim_core::ConstantSource;
    use antsim_grid::MarkerDecay;

    use super::*;

    fn agent_at(position: Vec2) -> Agent {
        let mut rng = ConstantSource::new(0.5);
        Agent::new(
            AgentId::new(0, 0),
            ColonyId(0),
            position,
            0.0,
            &AgentConfig::default(),
            &mut rng,
        )
    }

    fn grid() -> SpatialGrid {
        SpatialGrid::new(50, 50, 4.0, 2, MarkerDecay::default())
    }

    #[test]
    fn promotion_scales_body_but_keeps_identity() {
        let mut a = agent_at(Vec2::new(10.0, 10.0));
        let before = a.clone();
        a.promote(&SoldierConfig::default());
        assert_eq!(a.class, AgentClass::Soldier);
        assert_eq!(a.id, before.id);
        assert_eq!(a.position, before.position);
        assert_eq!(a.body.length, before.body.length * 2.0);
        assert_eq!(a.body.damage, before.body.damage * 4.0);
        assert_eq!(a.body.lifespan, before.body.lifespan * 2.0);

        // Promoting twice is a no-op.
        a.promote(&SoldierConfig::default());
        assert_eq!(a.body.lifespan, before.body.lifespan * 2.0);
    }

    #[test]
    fn reaching_food_yields_to_home_or_no_food() {
        let agent_cfg = AgentConfig::default();
        let markers = MarkerConfig::default();
        let mut g = grid();
        let p = Vec2::new(50.0, 50.0);
        g.add_food_at(p, 2);

        let mut a = agent_at(p);
        a.fatigue = 12.0;
        assert!(a.check_food(&mut g, &agent_cfg, &markers));
        assert_eq!(a.phase, Phase::ToHome);
        assert_eq!(a.fatigue, 0.0);

        let mut b = agent_at(p);
        assert!(b.check_food(&mut g, &agent_cfg, &markers));
        assert_eq!(b.phase, Phase::ToHomeNoFood);
        assert_eq!(b.marker_add.target, agent_cfg.repellent_period);
        assert!(g.intensity(p, MarkerChannel::Repellent, ColonyId(0)) >= markers.repellent_burst);
    }

    #[test]
    fn bouncing_too_often_terminates() {
        let mut g = grid();
        for y in 0..50 {
            g.set_wall(antsim_grid::CellCoord::new(5, y), true);
        }
        let mut a = agent_at(Vec2::new(19.5, 10.0));
        for _ in 0..10 {
            // Keep facing the wall so every step collides.
            a.heading.set_now(0.0);
            a.update_position(&g, 0.1, 4);
        }
        assert!(a.is_done());
    }

    #[test]
    fn leaving_the_world_terminates() {
        let g = grid();
        let mut a = agent_at(Vec2::new(199.0, 10.0));
        a.update_position(&g, 0.1, 4);
        assert!(a.is_done());
    }

    #[test]
    fn soldier_recovers_when_opponent_vanishes() {
        let mut a = agent_at(Vec2::new(10.0, 10.0));
        a.promote(&SoldierConfig::default());
        a.engage(
            AntRef::new(ColonyId(1), AgentId::new(3, 0)),
            Vec2::new(12.0, 10.0),
            Vec2::new(1.0, 0.0),
        );
        a.fatigue = 10.0;
        assert!(a.attack(0.1, false, 3.0).is_none());
        assert_eq!(a.combat.mode, FightMode::NoFight);
        assert_eq!(a.combat.target, None);
        assert_eq!(a.fatigue, 7.0);
    }

    #[test]
    fn kill_drops_carried_food_and_releases_cell() {
        let mut g = grid();
        let p = Vec2::new(30.0, 30.0);
        let mut a = agent_at(p);
        a.claim_cell(&mut g);
        a.phase = Phase::ToHome;
        a.kill(&mut g);
        assert!(a.is_dead());
        assert!(g.is_on_food(p));
        assert_eq!(g.occupancy(p, ColonyId(0)).and_then(|o| o.agent), None);
    }

    #[test]
    fn trail_weakens_with_time_since_reference_point() {
        let markers = MarkerConfig::default();
        let mut g = grid();
        let p = Vec2::new(40.0, 40.0);
        let mut a = agent_at(p);
        a.trail_clock = 10.0;
        a.deposit_markers(&mut g, &markers);

        let expected = markers.base_intensity * (-markers.trail_coef * 10.0).exp();
        let got = g.intensity(p, MarkerChannel::ToHome, ColonyId(0));
        assert!((got - expected).abs() < 1e-3, "{got} vs {expected}");
        assert_eq!(g.intensity(p, MarkerChannel::ToFood, ColonyId(0)), 0.0);
        assert_eq!(g.intensity(p, MarkerChannel::ToEnemy, ColonyId(0)), 0.0);
    }

    #[test]
    fn enemy_trail_is_capped_by_intensity_limit() {
        let markers = MarkerConfig::default();
        let mut g = grid();
        let p = Vec2::new(40.0, 40.0);
        let mut a = agent_at(p);
        a.phase = Phase::ToHome;
        a.enemy_found = true;
        a.enemy_intensity = 5.0;
        a.deposit_markers(&mut g, &markers);

        let expected = markers.enemy_intensity_cap * markers.base_intensity;
        let got = g.intensity(p, MarkerChannel::ToEnemy, ColonyId(0));
        assert!((got - expected).abs() < 1e-3, "{got} vs {expected}");
        // Carrying food home lays the food trail.
        assert!(g.intensity(p, MarkerChannel::ToFood, ColonyId(0)) > 0.0);
    }

    #[test]
    fn soldier_reaching_home_goes_after_enemies() {
        let agent_cfg = AgentConfig::default();
        let home = Vec2::new(40.0, 40.0);
        let mut base = ColonyResource::new(home, 20.0);
        let mut a = agent_at(home + Vec2::new(5.0, 0.0));
        a.promote(&SoldierConfig::default());
        a.phase = Phase::ToHome;
        a.enemy_found = true;
        a.fatigue = 50.0;

        assert!(a.check_colony(&mut base, &agent_cfg));
        assert_eq!(a.phase, Phase::ToEnemy);
        assert_eq!(a.fatigue, 0.0);
        assert_eq!(base.food, 1.0);
        assert_eq!(base.enemies_sighted, 1);
        assert!(!a.enemy_found);
    }

    #[test]
    fn terminated_agent_is_not_revived_at_home() {
        let agent_cfg = AgentConfig::default();
        let home = Vec2::new(40.0, 40.0);
        let mut base = ColonyResource::new(home, 20.0);
        let mut a = agent_at(home);
        a.phase = Phase::ToHome;
        a.terminate();

        assert!(!a.check_colony(&mut base, &agent_cfg));
        assert!(a.is_done());
        assert_eq!(base.food, 0.0);

        // Resetting fatigue elsewhere does not undo retirement either.
        a.fatigue = 0.0;
        assert!(a.is_done());
    }
}
