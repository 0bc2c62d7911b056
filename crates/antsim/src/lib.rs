//! Colony agent simulation: the per-agent phase state machine, cross-colony
//! combat, colony population lifecycle and the tick loop tying them to the
//! shared [`SpatialGrid`](antsim_grid::SpatialGrid).
//!
//! The core is single-threaded and deterministic: a run is a function of the
//! configuration and the call order against the injected
//! [`UniformSource`](antsim_core::UniformSource).

#![forbid(unsafe_code)]

pub mod agent;
pub mod colony;
pub mod combat;
pub mod config;
pub mod error;
pub mod resource;
pub mod snapshot;
pub mod updater;
pub mod world;

pub use agent::{Agent, AgentBody, AgentClass, Combat, FightMode, Phase, Strike};
pub use colony::{Colony, PopulationHistory};
pub use combat::{apply_strikes, pair_fights, FightRequest, Roster, RosterEntry};
pub use config::{
    AgentConfig, ColonyConfig, FoodPatch, HomeConfig, MarkerConfig, SimConfig, SoldierConfig,
    WorldConfig, MAX_COLONIES, MAX_GRID_CELLS,
};
pub use error::ConfigError;
pub use resource::ColonyResource;
pub use snapshot::{AgentSnapshot, ColonySnapshot, WorldSnapshot};
pub use updater::AgentUpdater;
pub use world::{Simulation, StepReport};
