//! Simulation clock for the fixed-step game loop.

use std::time::Duration;

/// Per-tick timing handed to every simulation call in place of a global clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickContext {
    /// Seconds covered by this tick.
    pub delta_seconds: f32,
    /// Simulation time at the end of this tick, in seconds.
    pub simulation_time: f32,
}

impl TickContext {
    pub fn new(delta_seconds: f32, simulation_time: f32) -> Self {
        Self {
            delta_seconds,
            simulation_time,
        }
    }
}

/// Manages simulation time. Time only moves when the owner advances it, so
/// a run is reproducible regardless of wall-clock speed.
#[derive(Debug)]
pub struct Time {
    /// Duration of the last tick.
    delta: Duration,
    /// Total simulated time since start.
    elapsed: Duration,
    /// Tick count since start.
    frame_count: u64,
    /// Fixed timestep (default 60 Hz).
    fixed_timestep: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock at t = 0 ticking at 60 Hz.
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
        }
    }

    /// Create a clock with the given fixed rate in Hz.
    pub fn with_fixed_rate(hz: f64) -> Self {
        let mut time = Self::new();
        time.set_fixed_rate(hz);
        time
    }

    /// Advance by one fixed step and return the context for that tick.
    pub fn tick(&mut self) -> TickContext {
        self.advance(self.fixed_timestep)
    }

    /// Advance by an arbitrary delta and return the context for that tick.
    pub fn advance(&mut self, delta: Duration) -> TickContext {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
        TickContext::new(self.delta_seconds(), self.elapsed_seconds())
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Set the fixed timestep rate in Hz. Non-positive rates are ignored.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        if hz > 0.0 && hz.is_finite() {
            self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
        } else {
            log::warn!("Ignoring invalid fixed rate {hz} Hz");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tick_advances_by_fixed_step() {
        let mut time = Time::with_fixed_rate(10.0);
        let first = time.tick();
        let second = time.tick();
        assert_abs_diff_eq!(first.delta_seconds, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(second.simulation_time, 0.2, epsilon = 1e-6);
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn invalid_rate_keeps_previous_step() {
        let mut time = Time::with_fixed_rate(20.0);
        time.set_fixed_rate(0.0);
        assert_abs_diff_eq!(time.fixed_timestep_seconds(), 0.05, epsilon = 1e-6);
    }
}
