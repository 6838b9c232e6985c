//! Simulation Clock
//!
//! Tick-driven day scheduler. Each external tick advances a progress gauge;
//! filling it to 100 signals a day boundary. The gauge carries no economic
//! state of its own.

use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;

/// Progress units in one simulated day.
pub const DAY_LENGTH: f64 = 100.0;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Clock is stopped or at speed 0
    Idle,
    /// Progress advanced by `increment` without reaching the boundary
    Advanced { increment: f64 },
    /// Progress reached the boundary; the caller must run day-end settlement
    DayEnded { increment: f64 },
}

impl TickOutcome {
    /// Progress units consumed by this tick.
    pub fn increment(self) -> f64 {
        match self {
            TickOutcome::Idle => 0.0,
            TickOutcome::Advanced { increment } | TickOutcome::DayEnded { increment } => increment,
        }
    }
}

/// Stopped/running day scheduler with a speed multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    running: bool,
    speed: f64,
    day_progress: f64,
    base_increment: f64,
    allowed_speeds: Vec<f64>,
}

impl SimulationClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            running: false,
            speed: 1.0,
            day_progress: 0.0,
            base_increment: config.base_increment,
            allowed_speeds: config.allowed_speeds.clone(),
        }
    }

    pub fn day_progress(&self) -> f64 {
        self.day_progress
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether ticks currently move the gauge. Speed 0 counts as stopped.
    pub fn is_advancing(&self) -> bool {
        self.running && self.speed > 0.0
    }

    /// Sets the speed multiplier; returns false for unsupported values.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !self.allowed_speeds.iter().any(|s| (s - speed).abs() < f64::EPSILON) {
            return false;
        }
        self.speed = speed;
        true
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Starts the clock. A clock parked at speed 0 resumes at speed 1.
    pub fn resume(&mut self) {
        self.running = true;
        if self.speed <= 0.0 {
            self.speed = 1.0;
        }
    }

    /// Advances the gauge by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_advancing() {
            return TickOutcome::Idle;
        }

        let increment = self.base_increment * self.speed;
        self.day_progress += increment;

        if self.day_progress >= DAY_LENGTH {
            self.day_progress = 0.0;
            TickOutcome::DayEnded { increment }
        } else {
            TickOutcome::Advanced { increment }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_clock() -> SimulationClock {
        let mut clock = SimulationClock::new(&ClockConfig::default());
        clock.resume();
        clock
    }

    #[test]
    fn test_new_clock_is_stopped() {
        let mut clock = SimulationClock::new(&ClockConfig::default());
        assert!(!clock.is_running());
        assert_eq!(clock.tick(), TickOutcome::Idle);
        assert_eq!(clock.day_progress(), 0.0);
    }

    #[test]
    fn test_ten_ticks_per_day_at_normal_speed() {
        let mut clock = running_clock();
        for _ in 0..9 {
            assert!(matches!(clock.tick(), TickOutcome::Advanced { .. }));
        }
        assert_eq!(clock.tick(), TickOutcome::DayEnded { increment: 10.0 });
        assert_eq!(clock.day_progress(), 0.0);
    }

    #[test]
    fn test_max_speed_ends_a_day_every_tick() {
        let mut clock = running_clock();
        assert!(clock.set_speed(10.0));
        assert_eq!(clock.tick(), TickOutcome::DayEnded { increment: 100.0 });
        assert_eq!(clock.tick(), TickOutcome::DayEnded { increment: 100.0 });
    }

    #[test]
    fn test_half_speed() {
        let mut clock = running_clock();
        assert!(clock.set_speed(0.5));
        assert_eq!(clock.tick(), TickOutcome::Advanced { increment: 5.0 });
        assert_eq!(clock.day_progress(), 5.0);
    }

    #[test]
    fn test_speed_zero_is_stopped() {
        let mut clock = running_clock();
        assert!(clock.set_speed(0.0));
        assert!(clock.is_running());
        assert!(!clock.is_advancing());
        assert_eq!(clock.tick(), TickOutcome::Idle);

        clock.resume();
        assert_eq!(clock.speed(), 1.0);
        assert!(clock.is_advancing());
    }

    #[test]
    fn test_unsupported_speed_rejected() {
        let mut clock = running_clock();
        assert!(!clock.set_speed(2.0));
        assert_eq!(clock.speed(), 1.0);
    }

    #[test]
    fn test_pause_keeps_progress() {
        let mut clock = running_clock();
        clock.tick();
        clock.tick();
        clock.pause();
        assert_eq!(clock.tick(), TickOutcome::Idle);
        assert_eq!(clock.day_progress(), 20.0);
    }
}
