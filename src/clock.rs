//! Time sources for cache freshness decisions
//!
//! Freshness is measured on a monotonic reading so wall-clock corrections can
//! neither extend nor cut short a cached value's lifetime. The wall-clock time is
//! only recorded alongside, for display.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::time::Instant;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Monotonic reading used to measure elapsed time
    fn instant(&self) -> Instant;

    /// Wall-clock time
    fn now(&self) -> DateTime<Utc>;
}

/// System clock: `Instant::now` and `Utc::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct ManualState {
    instant: Instant,
    wall: DateTime<Utc>,
}

/// Clock that only moves when told to
///
/// [`advance`](Self::advance) moves both readings; [`set`](Self::set) steps the
/// wall clock alone, the way an NTP correction would.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

impl ManualClock {
    /// Creates a clock whose wall reading is frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(ManualState {
                instant: Instant::now(),
                wall: start,
            }),
        }
    }

    /// Moves the clock forward by `by`
    pub fn advance(&self, by: std::time::Duration) {
        let mut state = self.state.lock();
        state.instant += by;
        let by = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
        state.wall = state
            .wall
            .checked_add_signed(by)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    /// Sets the wall clock to an absolute time; the monotonic reading is unchanged
    pub fn set(&self, to: DateTime<Utc>) {
        self.state.lock().wall = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn instant(&self) -> Instant {
        self.state.lock().instant
    }

    fn now(&self) -> DateTime<Utc> {
        self.state.lock().wall
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn instant(&self) -> Instant {
        (**self).instant()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_manual_clock_is_frozen_until_advanced() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let instant = clock.instant();

        assert_eq!(clock.now(), start);
        assert_eq!(clock.instant(), instant);

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(5));
        assert_eq!(clock.instant() - instant, Duration::from_secs(5));
    }

    #[test]
    fn test_manual_clock_set_only_moves_wall_time() {
        let clock = ManualClock::default();
        let instant = clock.instant();
        let target = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();

        clock.set(target);

        assert_eq!(clock.now(), target);
        assert_eq!(clock.instant(), instant);
    }

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();

        assert!(now >= before && now <= after);
    }

    #[test]
    fn test_system_clock_instant_never_goes_backwards() {
        let first = SystemClock.instant();
        let second = SystemClock.instant();

        assert!(second >= first);
    }
}
