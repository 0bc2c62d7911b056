use antsim_core::{AntRef, UniformSource};
use antsim_grid::SpatialGrid;

use crate::agent::{Agent, AgentClass, FightMode, Phase, Strike};
use crate::combat::{FightRequest, Roster};
use crate::config::SimConfig;

/// Stateless sequencing of one agent's tick.
///
/// `initial_update` runs for every agent of every colony before any
/// `update`, so pairing sees pre-tick positions only.
pub struct AgentUpdater;

impl AgentUpdater {
    /// Combat bookkeeping and enemy detection. Returns the agent's pending
    /// fight request, if any.
    pub fn initial_update(
        agent: &mut Agent,
        grid: &SpatialGrid,
        roster: &Roster,
        config: &SimConfig,
        dt: f32,
    ) -> Option<FightRequest> {
        if agent.is_dead() {
            return None;
        }

        match agent.combat.mode {
            FightMode::Fighting => return None,
            FightMode::ToFight => {
                agent.combat.to_fight_time += dt;
                let target_alive = agent.combat.request.is_some_and(|r| roster.is_live(r));
                if !target_alive || agent.combat.to_fight_time > config.agent.fight_timeout {
                    agent.drop_fight_request();
                }
            }
            FightMode::NoFight => {}
        }

        if agent.combat.mode == FightMode::NoFight {
            let enemy = grid
                .enemies_around(agent.position, agent.colony)
                .into_iter()
                .map(|o| AntRef::new(o.colony, o.agent))
                .find(|r| {
                    roster
                        .resolve(*r)
                        .is_some_and(|e| e.mode != FightMode::Fighting && e.phase != Phase::Dead)
                });
            if let Some(enemy) = enemy {
                agent.detect_enemy(config.agent.enemy_intensity_step);
                agent.request_fight(enemy);
            }
        }

        agent.combat.request.map(|target| FightRequest {
            from: agent.handle(),
            target,
        })
    }

    /// Main pass: fight or sense/move/pick/deposit, then claim the new cell.
    pub fn update(
        agent: &mut Agent,
        grid: &mut SpatialGrid,
        roster: &Roster,
        config: &SimConfig,
        rng: &mut impl UniformSource,
        dt: f32,
        strikes: &mut Vec<Strike>,
    ) {
        if agent.is_dead() {
            return;
        }
        agent.update_clocks(dt);
        agent.release_cell(grid);

        if agent.is_fighting() {
            let alive = agent.combat.target.is_some_and(|t| roster.is_live(t));
            if let Some(strike) = agent.attack(dt, alive, config.agent.soldier_recovery) {
                strikes.push(strike);
            }
        } else {
            agent.heading.update(dt, config.agent.turn_speed);
            if agent.direction_update.update_auto_reset(dt) {
                Self::sense(agent, grid, config, rng);
            }
            agent.update_position(grid, dt, config.agent.bounce_threshold);
            if agent.phase == Phase::ToFood {
                agent.check_food(grid, &config.agent, &config.markers);
            }
            if agent.marker_add.update_auto_reset(dt) {
                agent.deposit_markers(grid, &config.markers);
            }
            if agent.class == AgentClass::Soldier
                && agent.phase == Phase::ToEnemy
                && agent.fatigue > config.agent.refill_ratio * agent.body.lifespan
            {
                agent.phase = Phase::Refill;
            }
        }

        agent.claim_cell(grid);
    }

    /// Samples the channel implied by the phase and steers accordingly.
    pub fn sense(
        agent: &mut Agent,
        grid: &SpatialGrid,
        config: &SimConfig,
        rng: &mut impl UniformSource,
    ) {
        let result = grid.sample_directional_intensity(
            agent.position,
            agent.sampling_channel(),
            agent.colony,
            config.agent.detection_radius,
        );
        if result.found_fight {
            agent.detect_enemy(config.agent.enemy_intensity_step);
        }

        let noise = rng.uniform_full_range(config.agent.direction_noise);
        let fleeing = agent.phase == Phase::ToFood
            && !result.found_permanent
            && result.max_repellent > result.max_intensity;

        if fleeing {
            agent.heading.steer_toward(-result.repellent_direction);
        } else if result.found_permanent
            || (result.max_intensity > 0.0 && !rng.proba(agent.liberty))
        {
            agent.heading.steer_toward(result.max_direction);
        }
        agent.heading.perturb(noise);
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::FRAC_PI_2;

    use antsim_core::{AgentId, ColonyId, ConstantSource, Vec2};
    use antsim_grid::{MarkerChannel, SpatialGrid};

    use super::*;
    use crate::colony::Colony;

    fn grid(colonies: usize) -> SpatialGrid {
        let config = SimConfig::default();
        SpatialGrid::for_world(400.0, 400.0, 4.0, colonies, config.markers.decay())
    }

    fn agent(position: Vec2, angle: f32, rng: &mut impl UniformSource) -> Agent {
        let config = SimConfig::default();
        Agent::new(AgentId::new(0, 0), ColonyId(0), position, angle, &config.agent, rng)
    }

    #[test]
    fn tired_soldier_turns_back_to_refill() {
        let config = SimConfig::default();
        let mut rng = ConstantSource::new(0.5);
        let mut g = grid(1);
        let mut a = agent(Vec2::new(202.0, 202.0), 0.0, &mut rng);
        a.promote(&config.soldier);
        a.phase = Phase::ToEnemy;
        a.fatigue = config.agent.refill_ratio * a.body.lifespan - 1.0;

        let mut strikes = Vec::new();
        AgentUpdater::update(&mut a, &mut g, &Roster::default(), &config, &mut rng, 0.05, &mut strikes);
        assert_eq!(a.phase, Phase::ToEnemy);

        a.fatigue += 2.0;
        AgentUpdater::update(&mut a, &mut g, &Roster::default(), &config, &mut rng, 0.05, &mut strikes);
        assert_eq!(a.phase, Phase::Refill);
        assert_eq!(a.sampling_channel(), MarkerChannel::ToHome);
        assert!(strikes.is_empty());
    }

    #[test]
    fn unpaired_fight_request_lapses_after_timeout() {
        let mut config = SimConfig::default();
        config.colony.initial_population = 1;
        let mut rng = ConstantSource::new(0.5);
        let g = grid(2);
        let enemy_colony = Colony::new(ColonyId(1), Vec2::new(300.0, 300.0), &config, &mut rng);
        let roster = Roster::capture(&[
            Colony::new(ColonyId(0), Vec2::new(100.0, 100.0), &config, &mut rng),
            enemy_colony,
        ]);
        let target = AntRef::new(ColonyId(1), AgentId::new(0, 0));
        assert!(roster.is_live(target));

        let mut a = agent(Vec2::new(202.0, 202.0), 0.0, &mut rng);
        a.request_fight(target);

        let dt = 0.6 * config.agent.fight_timeout;
        let pending = AgentUpdater::initial_update(&mut a, &g, &roster, &config, dt);
        assert_eq!(pending.map(|r| r.target), Some(target));
        assert_eq!(a.combat.mode, FightMode::ToFight);

        let pending = AgentUpdater::initial_update(&mut a, &g, &roster, &config, dt);
        assert_eq!(pending, None);
        assert_eq!(a.combat.mode, FightMode::NoFight);
        assert_eq!(a.combat.request, None);
    }

    #[test]
    fn request_for_vanished_target_is_dropped() {
        let config = SimConfig::default();
        let mut rng = ConstantSource::new(0.5);
        let g = grid(2);
        let mut a = agent(Vec2::new(202.0, 202.0), 0.0, &mut rng);
        a.request_fight(AntRef::new(ColonyId(1), AgentId::new(3, 2)));

        let pending = AgentUpdater::initial_update(&mut a, &g, &Roster::default(), &config, 0.01);
        assert_eq!(pending, None);
        assert_eq!(a.combat.mode, FightMode::NoFight);
    }

    #[test]
    fn forager_steers_away_from_repellent() {
        let config = SimConfig::default();
        let mut rng = ConstantSource::new(0.5);
        let mut g = grid(1);
        let p = Vec2::new(202.0, 202.0);
        g.deposit_marker(Vec2::new(222.0, 202.0), MarkerChannel::Repellent, ColonyId(0), 50.0);
        g.deposit_marker(Vec2::new(202.0, 222.0), MarkerChannel::ToFood, ColonyId(0), 10.0);

        let mut a = agent(p, FRAC_PI_2, &mut rng);
        AgentUpdater::sense(&mut a, &g, &config, &mut rng);
        let target = Vec2::from_angle(a.heading.target());
        assert!((target.x + 1.0).abs() < 1e-4, "target {target:?}");
    }

    #[test]
    fn liberty_draw_ignores_markers_but_not_food() {
        let config = SimConfig::default();
        let p = Vec2::new(202.0, 202.0);
        let mut g = grid(1);
        g.deposit_marker(Vec2::new(222.0, 202.0), MarkerChannel::ToFood, ColonyId(0), 10.0);

        // A draw of 0.5 never passes the liberty check: follow the trail east.
        let mut follow = ConstantSource::new(0.5);
        let mut a = agent(p, FRAC_PI_2, &mut follow);
        AgentUpdater::sense(&mut a, &g, &config, &mut follow);
        assert!(a.heading.target().abs() < 1e-4);

        // A draw of 0.0 always does: keep the heading, plus the noise draw.
        let mut wander = ConstantSource::new(0.0);
        let mut a = agent(p, FRAC_PI_2, &mut wander);
        AgentUpdater::sense(&mut a, &g, &config, &mut wander);
        let expected = FRAC_PI_2 - config.agent.direction_noise;
        assert!((a.heading.target() - expected).abs() < 1e-4);

        // Food is a permanent source and wins over liberty.
        g.add_food_at(Vec2::new(202.0, 182.0), 1);
        let mut a = agent(p, FRAC_PI_2, &mut wander);
        AgentUpdater::sense(&mut a, &g, &config, &mut wander);
        let expected = -FRAC_PI_2 - config.agent.direction_noise;
        assert!((a.heading.target() - expected).abs() < 1e-4);
    }
}
