use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of "now" in the clinic's local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Settable clock for tests and replay.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Arc::new(RwLock::new(now)) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        // A poisoned lock still holds a valid timestamp.
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_fixed_clock_can_be_moved() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
            .and_time(NaiveTime::from_hms_opt(14, 5, 0).unwrap());
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());

        let later = start + chrono::Duration::hours(12);
        clock.set(later);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 17).unwrap());
    }

    #[test]
    fn test_system_clock_follows_timezone_offset() {
        let utc = SystemClock::new(Tz::UTC).now();
        let tokyo = SystemClock::new(Tz::Asia__Tokyo).now();
        let diff = (tokyo - utc).num_minutes();
        // Tokyo is UTC+9 year round; allow for the two reads straddling a minute.
        assert!((539..=541).contains(&diff), "unexpected offset {}", diff);
    }
}
