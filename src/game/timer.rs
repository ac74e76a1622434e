//! Countdown timers for cooldowns, reloads, dashes and bullet lifetimes

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    remaining: f32,
}

impl Timer {
    /// Already finished
    pub fn elapsed() -> Timer {
        Timer { remaining: 0.0 }
    }

    pub fn with_remaining(remaining: f32) -> Timer {
        Timer { remaining: remaining.max(0.0) }
    }

    /// Count down by `dt`; true once nothing remains.
    pub fn step_and_is_elapsed(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining <= 0.0
    }

    pub fn reset(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_and_clamps() {
        let mut t = Timer::with_remaining(1.0);
        assert!(t.is_running());
        assert!(!t.step_and_is_elapsed(0.4));
        assert!(t.step_and_is_elapsed(0.7));
        assert_eq!(t, Timer::elapsed());
        assert!(!t.is_running());
    }

    #[test]
    fn test_elapsed_stays_elapsed() {
        let mut t = Timer::elapsed();
        assert!(t.step_and_is_elapsed(0.0));
        t.reset(0.5);
        assert!(!t.step_and_is_elapsed(0.25));
    }
}
