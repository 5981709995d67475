//! # Clock Abstraction
//!
//! The facility never calls `Timestamp::now()` directly. It asks an injected
//! [`Clock`], so production gates use [`SystemClock`] while tests and
//! scripted replays use [`ManualClock`], where time only moves when told to.

use chrono::Duration;
use parking_lot::Mutex;

use crate::temporal::Timestamp;

// ─── Clock Trait ────────────────────────────────────────────────────────────

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current UTC time, seconds precision.
    fn now(&self) -> Timestamp;
}

// ─── System Clock ───────────────────────────────────────────────────────────

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

// ─── Manual Clock ───────────────────────────────────────────────────────────

/// Virtual clock for deterministic tests and replays.
///
/// Interior mutability lets a shared facility keep reading the clock while
/// the driver advances it through `&self`.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Move time forward by `by`. Saturates at the current reading if the
    /// shift would leave the representable range.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        if let Some(next) = current.checked_add(by) {
            *current = next;
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: Timestamp) {
        *self.current.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn start() -> Timestamp {
        Timestamp::parse("2026-01-15T08:00:00Z").unwrap()
    }

    #[test]
    fn test_manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::new(start());
        assert_eq!(clock.now(), start());
        assert_eq!(clock.now(), start());
        clock.advance(Duration::minutes(30));
        assert_eq!(clock.now().to_iso8601(), "2026-01-15T08:30:00Z");
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new(start());
        let later = Timestamp::parse("2026-01-16T00:00:00Z").unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_shared_clock_observes_advances() {
        let clock = Arc::new(ManualClock::new(start()));
        let reader: Arc<ManualClock> = Arc::clone(&clock);
        clock.advance(Duration::hours(2));
        assert_eq!(reader.now().seconds_since(&start()), 7200);
    }

    #[test]
    fn test_system_clock_is_recent() {
        let before = Timestamp::now();
        let reading = SystemClock.now();
        assert!(reading >= before);
    }
}
