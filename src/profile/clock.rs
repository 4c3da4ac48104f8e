//! Time source for task ids and creation timestamps.
//!
//! Trait-based so tests can pin the clock.

use chrono::{DateTime, SecondsFormat, Utc};

#[cfg(test)]
use mockall::automock;

/// Source of the current time. Can be mocked in tests.
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Task id derived from a timestamp: milliseconds since the epoch.
///
/// Two tasks created within the same millisecond get the same id.
pub fn task_id(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

/// Creation timestamp, RFC 3339 in UTC with millisecond precision.
pub fn created_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn task_id_is_epoch_millis() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(task_id(at), "1735689600000");
    }

    #[test]
    fn created_at_matches_iso_format() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap();
        assert_eq!(created_at(at), "2025-01-01T12:30:00.000Z");
    }

    #[test]
    fn mock_clock_returns_configured_time() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let mut clock = MockClock::new();
        clock.expect_now().times(1).return_const(at);

        assert_eq!(clock.now(), at);
    }
}
