/// Per-step timing handed to every pass of a simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self {
            tick,
            dt_seconds: dt_seconds.max(0.0),
        }
    }

    /// Context for the following step, which lasts `dt_seconds`.
    pub fn advance(self, dt_seconds: f32) -> Self {
        Self::new(self.tick + 1, dt_seconds)
    }
}
