//! Animation clock

use std::time::Instant;

/// Longest frame delta handed to input handling, in seconds
const MAX_DELTA: f64 = 0.25;

/// Tracks seconds since the demo started and the time since the last frame
#[derive(Debug, Clone)]
pub struct AnimationClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock frozen at `seconds`, for single-frame renders
    pub fn at(seconds: f64) -> Self {
        Self {
            total_time: seconds.max(0.0),
            ..Self::default()
        }
    }

    /// Advance from wall time. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance by an explicit step. Only the frame delta is clamped.
    pub fn advance(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        self.delta_time = dt.min(MAX_DELTA);
        self.total_time += dt;
    }

    /// Seconds since start
    pub fn elapsed(&self) -> f32 {
        self.total_time as f32
    }

    pub fn elapsed_millis(&self) -> f64 {
        self.total_time * 1000.0
    }

    pub fn delta(&self) -> f32 {
        self.delta_time as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = AnimationClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = AnimationClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, 0.0);
    }

    #[test]
    fn test_advance_accumulates_and_clamps() {
        let mut clock = AnimationClock::new();
        clock.advance(0.1);
        clock.advance(0.2);
        assert!((clock.total_time - 0.3).abs() < 1e-10);

        clock.advance(5.0);
        assert_eq!(clock.delta_time, 0.25);
        assert!((clock.total_time - 5.3).abs() < 1e-10);

        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        assert!((clock.total_time - 5.3).abs() < 1e-10);
    }

    #[test]
    fn test_long_stall_keeps_wall_time() {
        let mut clock = AnimationClock::new();
        clock.advance(2.0);
        assert_eq!(clock.delta_time, 0.25);
        clock.advance(0.5);
        assert_eq!(clock.delta_time, 0.25);
        assert!((clock.total_time - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_at_and_millis() {
        let clock = AnimationClock::at(1.5);
        assert_eq!(clock.elapsed(), 1.5);
        assert_eq!(clock.elapsed_millis(), 1500.0);
        assert_eq!(AnimationClock::at(-3.0).total_time, 0.0);
    }
}
