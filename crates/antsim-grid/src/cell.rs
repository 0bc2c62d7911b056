use antsim_core::AgentId;

use crate::marker::CHANNEL_COUNT;

/// Integer cell coordinates. Always in bounds when handed out by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Who stands in a cell, per colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupancy {
    pub agent: Option<AgentId>,
    /// Set while the occupant is locked in combat. A fighting slot is not
    /// reassigned to a third agent.
    pub fighting: bool,
}

/// Result of an occupancy claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum ClaimOutcome {
    Claimed,
    /// Slot held by a fighting agent other than the claimant.
    Blocked,
    /// Position lies outside the grid.
    OutOfBounds,
}

/// One colony's slice of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColonyCell {
    pub intensity: [f32; CHANNEL_COUNT],
    /// Part of this colony's home area (permanent home-bound source).
    pub home: bool,
    pub occupancy: Occupancy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct GroundCell {
    pub wall: bool,
    pub food: u32,
}
