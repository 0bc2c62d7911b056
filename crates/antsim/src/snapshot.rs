//! Read-only views for front-ends and serialization.

use antsim_core::{AgentId, ColonyId, Vec2};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentClass, FightMode, Phase};
use crate::resource::ColonyResource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Vec2,
    pub angle: f32,
    pub phase: Phase,
    pub class: AgentClass,
    pub fight: FightMode,
    pub carries_food: bool,
    pub fatigue: f32,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            position: agent.position,
            angle: agent.heading.angle(),
            phase: agent.phase,
            class: agent.class,
            fight: agent.combat.mode,
            carries_food: agent.carries_food(),
            fatigue: agent.fatigue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub id: ColonyId,
    pub resource: ColonyResource,
    pub workers: usize,
    pub soldiers: usize,
    /// Population change over the sampled history window.
    pub population_delta: i64,
    /// Live agents in slot order.
    pub agents: Vec<AgentSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    /// Food units still lying on the ground.
    pub ground_food: u64,
    pub colonies: Vec<ColonySnapshot>,
}

impl WorldSnapshot {
    pub fn population(&self) -> usize {
        self.colonies.iter().map(|c| c.agents.len()).sum()
    }
}
