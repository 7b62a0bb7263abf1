// Monotonic clock sources
// The engine never reads wall-clock time; timing always goes through Clock

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source, unaffected by wall-clock adjustments.
/// Timestamps are offsets from an arbitrary per-clock epoch; only
/// differences between them are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Real clock backed by `Instant`, with its epoch at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for simulation hosts and tests.
/// Clones share the same underlying time, so a harness can hold one
/// clone and hand another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Move time forward by a number of seconds.
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }

    /// Jump to an absolute timestamp. Must not move backwards.
    pub fn set(&self, now: Duration) {
        debug_assert!(now >= self.now.get(), "ManualClock must stay monotonic");
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
