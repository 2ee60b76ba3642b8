//! Time and frame-request capabilities used by the scheduler

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic milliseconds
pub trait FrameClock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time since construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock moved by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl FrameClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Asks the host for one display-frame callback
pub trait FrameRequester {
    fn request_frame(&self);
}

/// Requester that only counts requests; the host ticks on its own schedule
#[derive(Debug, Clone, Default)]
pub struct FrameRequestCounter {
    count: Rc<Cell<usize>>,
}

impl FrameRequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Return the count and reset it
    pub fn take(&self) -> usize {
        self.count.replace(0)
    }
}

impl FrameRequester for FrameRequestCounter {
    fn request_frame(&self) {
        self.count.set(self.count.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(16.0);
        other.advance(1.0);
        assert_eq!(clock.now_ms(), 17.0);
        clock.set(3.0);
        assert_eq!(other.now_ms(), 3.0);
    }

    #[test]
    fn test_request_counter() {
        let counter = FrameRequestCounter::new();
        let handle = counter.clone();
        handle.request_frame();
        handle.request_frame();
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.take(), 2);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        assert!(clock.now_ms() >= first);
    }
}
