// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock abstraction with an explicit timezone offset.
//!
//! All day-boundary logic (daily rate window, global breaker midnight,
//! quiet hours) goes through [`Clock`] so the "today" comparison is
//! timezone-explicit rather than an implicit server-local assumption,
//! and so tests can pin time with [`ManualClock`].

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::SokoniError;

/// Source of current time for the pipeline.
///
/// `offset` is the bot's operating timezone as a fixed UTC offset. Daily
/// counters and quiet hours are evaluated in that offset; log timestamps
/// are always stored in UTC.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn offset(&self) -> FixedOffset;

    /// Current instant in the bot's timezone.
    fn now_local(&self) -> DateTime<FixedOffset> {
        self.now_utc().with_timezone(&self.offset())
    }

    /// Today's date in the bot's timezone.
    fn today(&self) -> NaiveDate {
        self.now_local().date_naive()
    }

    /// Current hour-of-day [0, 24) in the bot's timezone.
    fn local_hour(&self) -> u32 {
        use chrono::Timelike;
        self.now_local().hour()
    }

    /// Today's local midnight expressed as a UTC instant.
    ///
    /// Used to bound "sends so far today" queries against UTC-stamped rows.
    fn day_start_utc(&self) -> DateTime<Utc> {
        let midnight_local = self.today().and_time(NaiveTime::MIN);
        let offset_secs = i64::from(self.offset().local_minus_utc());
        Utc.from_utc_datetime(&(midnight_local - Duration::seconds(offset_secs)))
    }
}

/// Formats a UTC instant the way log rows store it: `%Y-%m-%dT%H:%M:%S%.3fZ`.
///
/// One format everywhere keeps timestamp strings lexicographically
/// comparable in SQL range queries.
pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Production clock reading the system time.
#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Creates a clock operating at the given whole-hour UTC offset.
    ///
    /// Accepts offsets in [-12, +14], matching real-world timezones.
    pub fn from_offset_hours(hours: i32) -> Result<Self, SokoniError> {
        if !(-12..=14).contains(&hours) {
            return Err(SokoniError::Config(format!(
                "utc_offset_hours must be within [-12, 14], got {hours}"
            )));
        }
        let offset = FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
            SokoniError::Config(format!("invalid UTC offset: {hours} hours"))
        })?;
        Ok(Self { offset })
    }
}

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A settable clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Pins the clock at the given UTC instant with a zero offset.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, 0)
    }

    /// Pins the clock at the given UTC instant with a whole-hour offset.
    pub fn with_offset(now: DateTime<Utc>, offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Self {
            now: std::sync::Mutex::new(now),
            offset,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn system_clock_rejects_out_of_range_offsets() {
        assert!(SystemClock::from_offset_hours(-13).is_err());
        assert!(SystemClock::from_offset_hours(15).is_err());
        assert!(SystemClock::from_offset_hours(3).is_ok());
    }

    #[test]
    fn today_respects_offset() {
        // 23:30 UTC on Jan 1 is already Jan 2 at UTC+3.
        let clock = ManualClock::with_offset(utc("2026-01-01T23:30:00Z"), 3);
        assert_eq!(clock.today().to_string(), "2026-01-02");

        let clock = ManualClock::at(utc("2026-01-01T23:30:00Z"));
        assert_eq!(clock.today().to_string(), "2026-01-01");
    }

    #[test]
    fn local_hour_respects_offset() {
        let clock = ManualClock::with_offset(utc("2026-01-01T23:30:00Z"), 3);
        assert_eq!(clock.local_hour(), 2);
    }

    #[test]
    fn day_start_utc_converts_local_midnight() {
        // At UTC+3, local midnight of Jan 2 is Jan 1 21:00 UTC.
        let clock = ManualClock::with_offset(utc("2026-01-01T23:30:00Z"), 3);
        assert_eq!(clock.day_start_utc(), utc("2026-01-01T21:00:00Z"));

        let clock = ManualClock::at(utc("2026-01-01T23:30:00Z"));
        assert_eq!(clock.day_start_utc(), utc("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn format_utc_is_sortable_and_z_suffixed() {
        let a = format_utc(utc("2026-01-01T09:05:00Z"));
        let b = format_utc(utc("2026-01-01T10:00:00Z"));
        assert_eq!(a, "2026-01-01T09:05:00.000Z");
        assert!(a < b);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at(utc("2026-01-01T00:00:00Z"));
        clock.advance(Duration::hours(25));
        assert_eq!(clock.now_utc(), utc("2026-01-02T01:00:00Z"));
    }
}
