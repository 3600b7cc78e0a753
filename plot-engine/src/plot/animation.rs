#[derive(Copy, Clone, Debug, PartialEq)]
/// Decides when the surface mesh is sampled again.
pub struct RegenerationClock {
    interval: f32,
    elapsed: f32,
    since_last: f32,
}

impl RegenerationClock {
    pub const DEFAULT_INTERVAL: f32 = 1.0 / 8.0;

    #[must_use]
    pub const fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            since_last: 0.0,
        }
    }

    /// Total time fed to the clock, in seconds.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advances the clock by a frame.
    ///
    /// Returns the total elapsed time when a regeneration is due, which is
    /// the time parameter to sample the surface at.
    pub fn tick(&mut self, delta_seconds: f32) -> Option<f32> {
        self.elapsed += delta_seconds;
        self.since_last += delta_seconds;

        if self.since_last < self.interval {
            return None;
        }

        self.since_last = 0.0;
        Some(self.elapsed)
    }
}

impl Default for RegenerationClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
