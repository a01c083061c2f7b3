//! Fixed-step tick clock
//!
//! The simulation advances in whole ticks; wall-clock pacing is the
//! caller's concern.

use std::time::Duration;

/// Default simulation tick rate (60 Hz)
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;

/// Counts completed ticks and the simulated time they represent.
#[derive(Debug, Clone)]
pub struct TickClock {
    tick_rate_hz: u32,
    tick_duration: Duration,
    tick_count: u64,
}

impl TickClock {
    /// A zero rate is clamped to 1 Hz.
    pub fn new(tick_rate_hz: u32) -> Self {
        let tick_rate_hz = tick_rate_hz.max(1);
        Self {
            tick_rate_hz,
            tick_duration: Duration::from_secs(1) / tick_rate_hz,
            tick_count: 0,
        }
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance(&mut self) {
        self.tick_count += 1;
    }

    /// Simulated time covered by the completed ticks.
    pub fn elapsed(&self) -> Duration {
        let ticks = u32::try_from(self.tick_count).unwrap_or(u32::MAX);
        self.tick_duration.saturating_mul(ticks)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_in_fixed_steps() {
        let mut clock = TickClock::new(50);
        assert_eq!(clock.tick_duration(), Duration::from_millis(20));
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick_count(), 2);
        assert_eq!(clock.elapsed(), Duration::from_millis(40));
    }

    #[test]
    fn zero_rate_is_clamped() {
        assert_eq!(TickClock::new(0).tick_rate_hz(), 1);
    }
}
