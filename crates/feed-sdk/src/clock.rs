//! Time source for write timestamps

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Supplies the current time to the gateway
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
///
/// Readings never repeat within the process: a reading that would not be
/// later than the previous one is moved one nanosecond past it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

static LAST_READING_NANOS: AtomicI64 = AtomicI64::new(i64::MIN);

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now();
        let Some(wall_nanos) = wall.timestamp_nanos_opt() else {
            return wall;
        };

        let mut reading = wall_nanos;
        let _ = LAST_READING_NANOS.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            reading = wall_nanos.max(last.saturating_add(1));
            Some(reading)
        });
        DateTime::from_timestamp_nanos(reading)
    }
}

/// Manually advanced clock for deterministic timestamps
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Render a timestamp the way it is stored in documents
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(chrono::Duration::seconds(90));

        assert_eq!(format_timestamp(clock.now()), "2024-05-01T12:01:30.000000000Z");
    }

    #[test]
    fn test_system_clock_readings_strictly_increase() {
        let clock = SystemClock;
        let mut previous = format_timestamp(clock.now());
        for _ in 0..1000 {
            let next = format_timestamp(clock.now());
            assert!(next > previous, "{} is not after {}", next, previous);
            previous = next;
        }
    }
}
