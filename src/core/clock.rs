//! Monotonic millisecond clocks
//!
//! The engine never reads time on its own; it asks an injected `Clock`.

use std::cell::Cell;
use std::time::Instant;

use crate::core::types::Millis;

/// Read-only monotonic millisecond counter
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Wall clock whose epoch is the moment it was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }
}

/// Clock that only moves when told to
///
/// Used by tests and the headless runner to drive exact millisecond sequences.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump to an absolute reading; going backwards is a logic error
    pub fn set(&self, ms: Millis) {
        assert!(ms >= self.now.get(), "clock must be non-decreasing");
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}
