//! Deterministic, engine-agnostic primitives for the colony simulation.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod cooldown;
pub mod ids;
pub mod math;
pub mod rng;
pub mod store;
pub mod tick;

pub use cooldown::Cooldown;
pub use ids::{AgentId, AntRef, ColonyId};
pub use math::{Heading, Vec2};
pub use rng::{ConstantSource, SplitMix64, UniformSource};
pub use store::SlotStore;
pub use tick::TickContext;
