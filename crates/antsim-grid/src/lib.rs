//! Uniform spatial grid shared by every colony: decaying marker channels, food,
//! walls, per-colony occupancy, ray marching and directional sampling.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod cell;
pub mod grid;
pub mod marker;
pub mod raycast;
pub mod sampling;

pub use cell::{CellCoord, ClaimOutcome, ColonyCell, Occupancy};
pub use grid::{Occupant, SpatialGrid};
pub use marker::{MarkerChannel, MarkerDecay, CHANNEL_COUNT};
pub use raycast::HitPoint;
pub use sampling::SamplingResult;
