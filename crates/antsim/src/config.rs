//! Simulation configuration.
//!
//! A flat set of named numeric options, consumed once at construction. Every
//! section defaults to the reference tuning, so a YAML file only needs the
//! values it changes.

use core::f32::consts::PI;

use antsim_core::Vec2;
use antsim_grid::MarkerDecay;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Colonies are addressed by a `u8` and the grid stores one slice per colony.
pub const MAX_COLONIES: usize = 8;

/// Upper bound on grid cells times colonies.
pub const MAX_GRID_CELLS: u64 = 1 << 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub markers: MarkerConfig,
    pub agent: AgentConfig,
    pub soldier: SoldierConfig,
    pub colony: ColonyConfig,
    /// Home positions, one per colony.
    pub colonies: Vec<HomeConfig>,
    /// Food placed at construction.
    pub food: Vec<FoodPatch>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            markers: MarkerConfig::default(),
            agent: AgentConfig::default(),
            soldier: SoldierConfig::default(),
            colony: ColonyConfig::default(),
            colonies: vec![
                HomeConfig { x: 400.0, y: 450.0 },
                HomeConfig { x: 1200.0, y: 450.0 },
            ],
            food: vec![FoodPatch {
                x: 800.0,
                y: 200.0,
                radius: 24.0,
                amount: 5,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            cell_size: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Intensity of a fresh trail deposit.
    pub base_intensity: f32,
    /// Exponential decay rates (1/s) per channel.
    pub decay_to_home: f32,
    pub decay_to_food: f32,
    pub decay_to_enemy: f32,
    pub decay_repellent: f32,
    /// Trail weakening `k` in `base * exp(-k * t)` since the last reset.
    pub trail_coef: f32,
    pub repellent_trail_coef: f32,
    pub enemy_trail_coef: f32,
    /// Upper bound of the accumulated enemy intensity used as a deposit scale.
    pub enemy_intensity_cap: f32,
    /// Repellent dropped on a food cell when its last unit is taken.
    pub repellent_burst: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            base_intensity: 1000.0,
            decay_to_home: 0.05,
            decay_to_food: 0.05,
            decay_to_enemy: 0.1,
            decay_repellent: 0.005,
            trail_coef: 0.05,
            repellent_trail_coef: 0.1,
            enemy_trail_coef: 0.05,
            enemy_intensity_cap: 0.1,
            repellent_burst: 300.0,
        }
    }
}

impl MarkerConfig {
    pub fn decay(&self) -> MarkerDecay {
        MarkerDecay::new(
            self.decay_to_home,
            self.decay_to_food,
            self.decay_to_enemy,
            self.decay_repellent,
        )
    }
}

/// Worker parameters; soldiers derive theirs through [`SoldierConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub speed: f32,
    pub width: f32,
    pub length: f32,
    pub damage: f32,
    /// Fatigue at which the agent is retired.
    pub lifespan: f32,
    pub detection_radius: f32,
    pub direction_update_period: f32,
    pub marker_period: f32,
    /// Half-width of the uniform heading perturbation applied per sensing.
    pub direction_noise: f32,
    /// Maximum heading rotation in radians per second.
    pub turn_speed: f32,
    /// Marker period used on the way home from an exhausted source.
    pub repellent_period: f32,
    pub attack_period: f32,
    pub fight_timeout: f32,
    /// Consecutive wall bounces tolerated before retirement.
    pub bounce_threshold: u16,
    pub liberty_min: f32,
    pub liberty_max: f32,
    /// Fatigue a soldier recovers when its opponent disappears.
    pub soldier_recovery: f32,
    pub enemy_intensity_step: f32,
    /// Fraction of the lifespan after which a soldier returns home.
    pub refill_ratio: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 40.0,
            width: 3.0,
            length: 4.7,
            damage: 10.0,
            lifespan: 300.0,
            detection_radius: 40.0,
            direction_update_period: 0.25,
            marker_period: 0.25,
            direction_noise: PI * 0.02,
            turn_speed: 2.0 * PI,
            repellent_period: 128.0,
            attack_period: 1.5,
            fight_timeout: 1.0,
            bounce_threshold: 4,
            liberty_min: 0.001,
            liberty_max: 0.01,
            soldier_recovery: 3.0,
            enemy_intensity_step: 0.001,
            refill_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoldierConfig {
    pub size_scale: f32,
    pub damage_scale: f32,
    pub lifespan_scale: f32,
}

impl Default for SoldierConfig {
    fn default() -> Self {
        Self {
            size_scale: 2.0,
            damage_scale: 4.0,
            lifespan_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    pub capacity: usize,
    /// Workers created for free at construction.
    pub initial_population: usize,
    pub home_radius: f32,
    pub creation_period: f32,
    pub agent_cost: f32,
    /// Soldiers cost `agent_cost * soldier_cost_factor`.
    pub soldier_cost_factor: f32,
    /// Only every Nth creation event may produce a soldier.
    pub soldier_period: u64,
    pub population_sample_period: f32,
    pub population_history: usize,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            capacity: 2000,
            initial_population: 16,
            home_radius: 20.0,
            creation_period: 0.125,
            agent_cost: 4.0,
            soldier_cost_factor: 3.0,
            soldier_period: 5,
            population_sample_period: 1.0,
            population_history: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeConfig {
    pub x: f32,
    pub y: f32,
}

impl HomeConfig {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Disc of cells around `(x, y)`, each seeded with `amount` food units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodPatch {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub radius: f32,
    pub amount: u32,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if !(w.width > 0.0 && w.height > 0.0) {
            return Err(ConfigError::WorldSize {
                width: w.width,
                height: w.height,
            });
        }
        if !(w.cell_size > 0.0) {
            return Err(ConfigError::CellSize(w.cell_size));
        }

        let m = &self.markers;
        for (channel, rate) in [
            ("to_home", m.decay_to_home),
            ("to_food", m.decay_to_food),
            ("to_enemy", m.decay_to_enemy),
            ("repellent", m.decay_repellent),
        ] {
            if !(rate >= 0.0) {
                return Err(ConfigError::DecayRate { channel, rate });
            }
        }

        let a = &self.agent;
        for (name, value) in [
            ("agent.speed", a.speed),
            ("agent.width", a.width),
            ("agent.length", a.length),
            ("agent.damage", a.damage),
            ("agent.lifespan", a.lifespan),
            ("agent.detection_radius", a.detection_radius),
            ("agent.direction_update_period", a.direction_update_period),
            ("agent.marker_period", a.marker_period),
            ("agent.attack_period", a.attack_period),
            ("soldier.size_scale", self.soldier.size_scale),
            ("soldier.damage_scale", self.soldier.damage_scale),
            ("soldier.lifespan_scale", self.soldier.lifespan_scale),
            ("colony.home_radius", self.colony.home_radius),
            ("colony.creation_period", self.colony.creation_period),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.colony.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.colonies.is_empty() {
            return Err(ConfigError::NoColonies);
        }
        if self.colonies.len() > MAX_COLONIES {
            return Err(ConfigError::TooManyColonies {
                count: self.colonies.len(),
                max: MAX_COLONIES,
            });
        }
        let columns = (w.width / w.cell_size).ceil() as f64;
        let rows = (w.height / w.cell_size).ceil() as f64;
        let cells = columns * rows * self.colonies.len() as f64;
        if cells > MAX_GRID_CELLS as f64 {
            return Err(ConfigError::GridTooLarge {
                cells: cells as u64,
                max: MAX_GRID_CELLS,
            });
        }

        for (index, home) in self.colonies.iter().enumerate() {
            if !(0.0..w.width).contains(&home.x) || !(0.0..w.height).contains(&home.y) {
                return Err(ConfigError::HomeOutsideWorld {
                    index,
                    x: home.x,
                    y: home.y,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_home_outside_world() {
        let mut config = SimConfig::default();
        config.colonies.push(HomeConfig { x: -5.0, y: 10.0 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HomeOutsideWorld { index: 2, .. })
        ));
    }

    #[test]
    fn rejects_negative_decay_and_nan_speed() {
        let mut config = SimConfig::default();
        config.markers.decay_repellent = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DecayRate { channel: "repellent", .. })
        ));

        let mut config = SimConfig::default();
        config.agent.speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "agent.speed", .. })
        ));
    }

    #[test]
    fn rejects_oversized_grid() {
        let mut config = SimConfig::default();
        config.world.cell_size = 0.01;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { max: MAX_GRID_CELLS, .. })
        ));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "world:\n  width: 320\n  height: 240\ncolony:\n  capacity: 10\ncolonies:\n  - { x: 50, y: 50 }\n";
        let config: SimConfig = serde_yaml::from_str(yaml).expect("parse config");
        assert_eq!(config.world.width, 320.0);
        assert_eq!(config.world.cell_size, 4.0);
        assert_eq!(config.colony.capacity, 10);
        assert_eq!(config.colony.agent_cost, 4.0);
        assert_eq!(config.colonies.len(), 1);
        assert_eq!(config.validate(), Ok(()));
    }
}
