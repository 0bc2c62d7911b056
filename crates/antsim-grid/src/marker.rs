/// Behavior channel a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerChannel {
    /// Trail leading back to the colony.
    ToHome,
    /// Trail leading to food.
    ToFood,
    /// Trail leading to enemy contact.
    ToEnemy,
    /// "Exhausted source, stay away."
    Repellent,
}

pub const CHANNEL_COUNT: usize = 4;

impl MarkerChannel {
    pub const ALL: [MarkerChannel; CHANNEL_COUNT] = [
        MarkerChannel::ToHome,
        MarkerChannel::ToFood,
        MarkerChannel::ToEnemy,
        MarkerChannel::Repellent,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            MarkerChannel::ToHome => 0,
            MarkerChannel::ToFood => 1,
            MarkerChannel::ToEnemy => 2,
            MarkerChannel::Repellent => 3,
        }
    }
}

/// Per-channel exponential decay rates, in 1/seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerDecay {
    pub rates: [f32; CHANNEL_COUNT],
}

impl MarkerDecay {
    pub fn new(to_home: f32, to_food: f32, to_enemy: f32, repellent: f32) -> Self {
        Self {
            rates: [to_home, to_food, to_enemy, repellent],
        }
    }

    pub fn rate(&self, channel: MarkerChannel) -> f32 {
        self.rates[channel.index()]
    }

    /// Multiplier applied to an intensity after `dt` seconds.
    pub fn factor(&self, channel: MarkerChannel, dt: f32) -> f32 {
        (-self.rate(channel).max(0.0) * dt.max(0.0)).exp()
    }

    pub fn factors(&self, dt: f32) -> [f32; CHANNEL_COUNT] {
        MarkerChannel::ALL.map(|c| self.factor(c, dt))
    }
}

impl Default for MarkerDecay {
    fn default() -> Self {
        // Repellent outlives trails by an order of magnitude.
        Self::new(0.05, 0.05, 0.1, 0.005)
    }
}
