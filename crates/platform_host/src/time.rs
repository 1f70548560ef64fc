//! Activity clocks that stamp window-store transitions.
//!
//! The window store records when each window was created and last touched, and the dock picks
//! "the most recent window of an app" from those stamps. Stamps therefore have to be strictly
//! increasing per clock, even when several intents land in the same wall-clock millisecond.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Source of activity stamps for window-store transitions.
pub trait ActivityClock {
    /// Returns the stamp for the next transition. Never repeats a previous stamp of this clock.
    fn next_stamp_ms(&self) -> u64;
}

/// Wall-clock stamps, bumped by one millisecond whenever the wall clock stalls or steps back.
#[derive(Debug, Default)]
pub struct SystemActivityClock {
    last: Cell<u64>,
}

impl SystemActivityClock {
    fn stamp_after(&self, now: u64) -> u64 {
        let next = now.max(self.last.get().saturating_add(1));
        self.last.set(next);
        next
    }
}

impl ActivityClock for SystemActivityClock {
    fn next_stamp_ms(&self) -> u64 {
        self.stamp_after(unix_time_ms_now())
    }
}

/// Deterministic clock for headless runs and replays: starts at `start` and advances by `step`.
#[derive(Debug)]
pub struct ManualActivityClock {
    next: Cell<u64>,
    step: u64,
}

impl ManualActivityClock {
    /// Creates a clock whose first stamp is `start`. A zero `step` is treated as one.
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            next: Cell::new(start),
            step: step.max(1),
        }
    }

    /// Moves the clock forward without producing a stamp.
    pub fn advance(&self, ms: u64) {
        self.next.set(self.next.get().saturating_add(ms));
    }

    /// Stamp the next call will return.
    pub fn peek(&self) -> u64 {
        self.next.get()
    }
}

impl Default for ManualActivityClock {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl ActivityClock for ManualActivityClock {
    fn next_stamp_ms(&self) -> u64 {
        let stamp = self.next.get();
        self.next.set(stamp.saturating_add(self.step));
        stamp
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn system_clock_never_repeats_within_a_millisecond() {
        let clock = SystemActivityClock::default();
        assert_eq!(clock.stamp_after(500), 500);
        assert_eq!(clock.stamp_after(500), 501);
        assert_eq!(clock.stamp_after(450), 502);
        assert_eq!(clock.stamp_after(900), 900);

        let live = SystemActivityClock::default();
        let first = live.next_stamp_ms();
        assert!(live.next_stamp_ms() > first);
    }

    #[test]
    fn manual_clock_steps_and_advances() {
        let clock = ManualActivityClock::new(10, 5);
        assert_eq!(clock.next_stamp_ms(), 10);
        assert_eq!(clock.next_stamp_ms(), 15);
        clock.advance(100);
        assert_eq!(clock.peek(), 120);
        assert_eq!(clock.next_stamp_ms(), 120);

        let stalled = ManualActivityClock::new(3, 0);
        assert_eq!(stalled.next_stamp_ms(), 3);
        assert_eq!(stalled.next_stamp_ms(), 4);
    }
}
