/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Monotonic game clock in milliseconds.
///
/// Only the frame loop advances it, so every timestamp the game compares
/// (foul display, cue reveal lag) is taken from simulated time and never
/// goes backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    elapsed_ms: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the clock was created.
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Advance by a frame delta given in seconds. Negative deltas are ignored.
    pub fn advance(&mut self, dt_seconds: f32) {
        self.advance_ms(f64::from(dt_seconds) * 1000.0);
    }

    /// Advance by a number of milliseconds. Negative deltas are ignored.
    pub fn advance_ms(&mut self, ms: f64) {
        if ms > 0.0 {
            self.elapsed_ms += ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        assert!((clock.now_ms() - 500.0).abs() < 1e-6);
        clock.advance_ms(-200.0);
        assert!((clock.now_ms() - 500.0).abs() < 1e-6);
        clock.advance_ms(250.0);
        assert!((clock.now_ms() - 750.0).abs() < 1e-6);
    }
}
