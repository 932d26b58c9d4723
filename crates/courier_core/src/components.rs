//! Small gameplay components shared by the session and its tests.

use serde::{Deserialize, Serialize};

/// A timer that counts down to zero and stays there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    /// Restart the countdown at `seconds`.
    pub fn start(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `dt` seconds. Returns true on the tick that reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Remaining lives for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives {
    pub current: u32,
    pub max: u32,
}

impl Lives {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Lose one life. Returns the lives left.
    pub fn lose_one(&mut self) -> u32 {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    pub fn is_exhausted(&self) -> bool {
        self.current == 0
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

impl Default for Lives {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_floors_at_zero() {
        let mut c = Countdown::new(1.0);
        assert!(!c.tick(0.4));
        assert!(c.tick(0.9));
        assert_eq!(c.remaining(), 0.0);
        // Already expired: no second expiry, no negative time.
        assert!(!c.tick(5.0));
        assert_eq!(c.remaining(), 0.0);
    }

    #[test]
    fn countdown_strictly_decreasing_until_zero() {
        let mut c = Countdown::new(1.0);
        let mut last = c.remaining();
        for _ in 0..100 {
            c.tick(1.0 / 60.0);
            assert!(c.remaining() <= last);
            assert!(c.remaining() >= 0.0);
            last = c.remaining();
        }
        assert!(!c.is_active());
    }

    #[test]
    fn lives_saturate_and_refill() {
        let mut lives = Lives::new(2);
        assert_eq!(lives.lose_one(), 1);
        assert_eq!(lives.lose_one(), 0);
        assert_eq!(lives.lose_one(), 0);
        assert!(lives.is_exhausted());
        lives.refill();
        assert_eq!(lives.current, 2);
    }
}
