use antsim_core::Vec2;
use serde::{Deserialize, Serialize};

/// Per-colony shared state written by many agents within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColonyResource {
    pub position: Vec2,
    /// Capture radius around `position`.
    pub radius: f32,
    /// Food stock; never negative.
    pub food: f32,
    /// Enemy sightings reported home and not yet turned into soldiers.
    pub enemies_sighted: u32,
}

impl ColonyResource {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            food: 0.0,
            enemies_sighted: 0,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (p - self.position).length() < self.radius
    }

    pub fn add_food(&mut self, amount: f32) {
        self.food += amount.max(0.0);
    }

    /// Spends `amount` if the stock covers it; otherwise leaves the stock
    /// untouched and returns `false`.
    pub fn use_food(&mut self, amount: f32) -> bool {
        if self.food >= amount {
            self.food = (self.food - amount).max(0.0);
            true
        } else {
            false
        }
    }
}
