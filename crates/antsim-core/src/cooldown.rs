/// Polled countdown used for every periodic agent/colony behavior.
///
/// `value` accumulates elapsed time; the cooldown is ready once it reaches
/// `target`. Nothing here blocks or schedules: callers poll it once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldown {
    pub target: f32,
    pub value: f32,
}

impl Cooldown {
    pub fn new(target: f32) -> Self {
        Self { target, value: 0.0 }
    }

    /// Cooldown that starts part-way through its period.
    pub fn with_value(target: f32, value: f32) -> Self {
        Self { target, value }
    }

    pub fn update(&mut self, dt: f32) {
        self.value += dt;
    }

    pub fn ready(&self) -> bool {
        self.value >= self.target
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Advances by `dt` and, if the period elapsed, resets and returns `true`.
    pub fn update_auto_reset(&mut self, dt: f32) -> bool {
        self.update(dt);
        if self.ready() {
            self.reset();
            true
        } else {
            false
        }
    }

    /// Fraction of the period elapsed, clamped to `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.target <= 0.0 {
            return 1.0;
        }
        (self.value / self.target).clamp(0.0, 1.0)
    }
}
