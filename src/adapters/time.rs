//! Host clock adapter.
//!
//! Monotonic uptime from `std::time::Instant` and blocking sleeps on the
//! calling thread.  Tests substitute a manual clock that advances on
//! `sleep` instead of waiting.

use std::time::{Duration, Instant};

use crate::app::ports::ClockPort;

/// Clock backed by the OS monotonic timer.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl ClockPort for SystemClock {
    fn uptime(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
