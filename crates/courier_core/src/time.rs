//! Frame timing for the simulation loop.

use std::time::{Duration, Instant};

/// Longest frame the clock will accept before clamping (avoids a spiral of catch-up steps).
const MAX_FRAME: Duration = Duration::from_millis(250);

/// Tracks frame deltas and feeds a fixed-timestep accumulator.
///
/// Frames can be driven from the wall clock (`update`) or fed explicitly
/// (`advance`), which is what headless runs and tests do.
#[derive(Debug)]
pub struct FrameClock {
    /// Time of the last wall-clock frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total simulated time.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for the simulation (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
        }
    }

    /// Clock with a fixed rate in Hz.
    pub fn with_fixed_rate(hz: f64) -> Self {
        let mut clock = Self::new();
        clock.set_fixed_rate(hz);
        clock
    }

    /// Measure a frame against the wall clock.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.advance(delta);
    }

    /// Feed a frame of the given duration.
    pub fn advance(&mut self, delta: Duration) {
        let delta = delta.min(MAX_FRAME);
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
        self.accumulator += delta;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clock_fixed_updates_consume_accumulator() {
        let mut clock = FrameClock::with_fixed_rate(60.0);
        clock.advance(Duration::from_secs_f64(3.5 / 60.0));
        let mut steps = 0;
        while clock.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn frame_clock_clamps_long_frames() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_secs(10));
        assert!((clock.delta_seconds() - 0.25).abs() < 1e-6);
    }
}
