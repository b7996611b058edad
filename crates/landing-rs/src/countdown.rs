//! 24-hour offer countdown persisted in durable storage.
//!
//! The deadline is an epoch-millisecond timestamp stored as a string under
//! [`COUNTDOWN_KEY`]. It is created on the first visit, or when the stored
//! value is expired or unreadable, and reused otherwise, so reloading the
//! page does not reset the offer.

use std::fmt;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage::{COUNTDOWN_KEY, SharedStore};

/// Length of a fresh countdown.
pub const COUNTDOWN_DURATION_MS: i64 = 24 * 60 * 60 * 1000;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const HOUR_MS: i64 = 60 * 60 * 1000;
const MINUTE_MS: i64 = 60 * 1000;

/// Wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownFields {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownFields {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Split a non-negative distance in milliseconds.
    pub fn from_distance(distance_ms: i64) -> Self {
        if distance_ms < 0 {
            return Self::ZERO;
        }
        Self {
            days: distance_ms / DAY_MS,
            hours: (distance_ms % DAY_MS) / HOUR_MS,
            minutes: (distance_ms % HOUR_MS) / MINUTE_MS,
            seconds: (distance_ms % MINUTE_MS) / 1000,
        }
    }

    /// Days, hours, minutes and seconds, each zero-padded to two digits.
    pub fn padded(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|v| format!("{v:02}"))
    }
}

impl fmt::Display for CountdownFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d, h, m, s] = self.padded();
        write!(f, "{d}:{h}:{m}:{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running(CountdownFields),
    /// The deadline passed. Always carries zeros; no further ticks follow.
    Expired(CountdownFields),
}

impl CountdownTick {
    pub fn fields(&self) -> CountdownFields {
        match self {
            Self::Running(f) | Self::Expired(f) => *f,
        }
    }
}

pub struct CountdownStore {
    storage: SharedStore,
    deadline_ms: i64,
    running: bool,
}

impl CountdownStore {
    /// Load the stored deadline, writing a fresh one when needed.
    pub fn load(storage: SharedStore, now_ms: i64) -> Result<Self, StorageError> {
        let stored = storage.get(COUNTDOWN_KEY)?;
        let deadline_ms = match stored.as_deref().and_then(parse_deadline) {
            Some(end) if now_ms <= end => {
                debug!("Reusing countdown deadline {end}");
                end
            }
            _ => {
                let end = now_ms.saturating_add(COUNTDOWN_DURATION_MS);
                storage.set(COUNTDOWN_KEY, &end.to_string())?;
                debug!("Started new countdown ending at {end}");
                end
            }
        };
        Ok(Self {
            storage,
            deadline_ms,
            running: true,
        })
    }

    pub fn deadline_ms(&self) -> i64 {
        self.deadline_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Compute the display for `now_ms`.
    ///
    /// The stored key is re-read first so a deadline written by another
    /// page instance is picked up. A failed or garbled read keeps the
    /// cached deadline.
    pub fn tick(&mut self, now_ms: i64) -> CountdownTick {
        if !self.running {
            return CountdownTick::Expired(CountdownFields::ZERO);
        }

        match self.storage.get(COUNTDOWN_KEY) {
            Ok(Some(value)) => {
                if let Some(end) = parse_deadline(&value) {
                    self.deadline_ms = end;
                }
            }
            Ok(None) => {}
            Err(e) => debug!("Countdown re-read failed, using cached deadline: {e}"),
        }

        // Another process may have stored any i64.
        let distance = self.deadline_ms.saturating_sub(now_ms);
        if distance < 0 {
            self.running = false;
            debug!("Countdown expired");
            return CountdownTick::Expired(CountdownFields::ZERO);
        }
        CountdownTick::Running(CountdownFields::from_distance(distance))
    }
}

fn parse_deadline(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Start the countdown, or return `None` when durable storage is not
/// usable. The caller hides the countdown element in that case.
pub fn init_countdown(storage: SharedStore, now_ms: i64) -> Option<CountdownStore> {
    match CountdownStore::load(storage, now_ms) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Could not access durable storage. Countdown timer disabled: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DisabledStore, KeyValueStore, MemoryStore};
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn first_visit_writes_a_24h_deadline() {
        let storage = MemoryStore::shared();
        let store = CountdownStore::load(storage.clone(), NOW).unwrap();
        assert_eq!(store.deadline_ms(), NOW + COUNTDOWN_DURATION_MS);
        assert_eq!(
            storage.get(COUNTDOWN_KEY).unwrap(),
            Some((NOW + COUNTDOWN_DURATION_MS).to_string())
        );
    }

    #[test]
    fn existing_deadline_is_reused() {
        let storage = MemoryStore::shared();
        storage.set(COUNTDOWN_KEY, &(NOW + 5_000).to_string()).unwrap();
        let store = CountdownStore::load(storage, NOW).unwrap();
        assert_eq!(store.deadline_ms(), NOW + 5_000);
    }

    #[test]
    fn expired_or_garbled_deadline_is_regenerated() {
        for stale in [(NOW - 1).to_string(), "soon".to_string(), String::new()] {
            let storage = MemoryStore::shared();
            storage.set(COUNTDOWN_KEY, &stale).unwrap();
            let store = CountdownStore::load(storage, NOW).unwrap();
            assert_eq!(store.deadline_ms(), NOW + COUNTDOWN_DURATION_MS);
        }
    }

    #[test]
    fn tick_splits_one_hour_one_minute_one_second() {
        let storage = MemoryStore::shared();
        storage.set(COUNTDOWN_KEY, &(NOW + 3_661_000).to_string()).unwrap();
        let mut store = CountdownStore::load(storage, NOW).unwrap();

        let tick = store.tick(NOW);
        assert!(matches!(tick, CountdownTick::Running(_)));
        assert_eq!(tick.fields().padded(), ["00", "01", "01", "01"]);
        assert_eq!(tick.fields().to_string(), "00:01:01:01");
    }

    #[test]
    fn past_deadline_shows_zeros_and_stops() {
        let storage = MemoryStore::shared();
        storage.set(COUNTDOWN_KEY, &(NOW + 1_000).to_string()).unwrap();
        let mut store = CountdownStore::load(storage, NOW).unwrap();

        assert_eq!(
            store.tick(NOW + 1_001),
            CountdownTick::Expired(CountdownFields::ZERO)
        );
        assert!(!store.is_running());
        // Stays stopped even if time appears to go backwards.
        assert_eq!(
            store.tick(NOW),
            CountdownTick::Expired(CountdownFields::ZERO)
        );
    }

    #[test]
    fn tick_picks_up_a_deadline_written_elsewhere() {
        let storage = MemoryStore::shared();
        let mut store = CountdownStore::load(storage.clone(), NOW).unwrap();
        storage.set(COUNTDOWN_KEY, &(NOW + 2 * DAY_MS).to_string()).unwrap();
        assert_eq!(store.tick(NOW).fields().days, 2);
    }

    #[test]
    fn tick_keeps_cached_deadline_on_garbage() {
        let storage = MemoryStore::shared();
        let mut store = CountdownStore::load(storage.clone(), NOW).unwrap();
        storage.set(COUNTDOWN_KEY, "???").unwrap();
        assert_eq!(store.tick(NOW).fields().hours, 0);
        assert_eq!(store.tick(NOW).fields().days, 1);
    }

    #[test]
    fn extreme_stored_deadline_expires_instead_of_overflowing() {
        let storage = MemoryStore::shared();
        let mut store = CountdownStore::load(storage.clone(), NOW).unwrap();
        storage.set(COUNTDOWN_KEY, &i64::MIN.to_string()).unwrap();
        assert_eq!(store.tick(NOW), CountdownTick::Expired(CountdownFields::ZERO));
        assert!(!store.is_running());
    }

    #[test]
    fn far_future_stored_deadline_keeps_running() {
        let storage = MemoryStore::shared();
        let mut store = CountdownStore::load(storage.clone(), -NOW).unwrap();
        storage.set(COUNTDOWN_KEY, &i64::MAX.to_string()).unwrap();
        assert!(matches!(store.tick(-NOW), CountdownTick::Running(_)));
    }

    #[test]
    fn unavailable_storage_disables_the_countdown() {
        let storage: SharedStore = Arc::new(DisabledStore::new("blocked"));
        assert!(init_countdown(storage, NOW).is_none());
    }

    #[test]
    fn negative_distance_is_clamped() {
        assert_eq!(CountdownFields::from_distance(-5), CountdownFields::ZERO);
        let f = CountdownFields::from_distance(DAY_MS + 59_999);
        assert_eq!((f.days, f.hours, f.minutes, f.seconds), (1, 0, 0, 59));
    }
}
