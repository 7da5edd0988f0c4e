//! Countdown timer advanced by the simulation delta

use serde::{Deserialize, Serialize};

/// Elapsed-time countdown used for grace periods (coyote time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    /// Total duration in seconds
    pub duration: f32,
    /// Seconds elapsed since the last restart
    pub elapsed: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
        }
    }

    /// Seconds left before the timer completes (negative once overrun)
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.duration - self.elapsed
    }

    #[inline]
    pub fn completed(&self) -> bool {
        self.remaining() <= 0.0
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_completes_after_duration() {
        let mut timer = Timer::new(0.2);
        assert!(!timer.completed());

        timer.update(0.1);
        assert!(!timer.completed());
        assert!((timer.remaining() - 0.1).abs() < 1e-6);

        timer.update(0.1);
        assert!(timer.completed());
    }

    #[test]
    fn test_timer_restart() {
        let mut timer = Timer::new(0.5);
        timer.update(1.0);
        assert!(timer.completed());

        timer.restart();
        assert!(!timer.completed());
        assert_eq!(timer.elapsed, 0.0);
    }

    #[test]
    fn test_zero_duration_is_immediately_complete() {
        assert!(Timer::new(0.0).completed());
    }
}
