use std::fmt;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::page::Selector;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Input format for target date-times: `2026-03-05T00:00:00`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Attribute that binds a page element to a countdown field.
pub const BINDING_ATTRIBUTE: &str = "data-countdown";

/// One of the four displayed countdown units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    /// Render order within a tick.
    pub const ALL: [Field; 4] = [Field::Days, Field::Hours, Field::Minutes, Field::Seconds];

    pub fn key(self) -> &'static str {
        match self {
            Field::Days => "days",
            Field::Hours => "hours",
            Field::Minutes => "minutes",
            Field::Seconds => "seconds",
        }
    }

    /// `[data-countdown="<key>"]`
    pub fn selector(self) -> Selector {
        Selector::attribute(BINDING_ATTRIBUTE, self.key())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The instant being counted down to. Fixed for the lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInstant(DateTime<Local>);

impl TargetInstant {
    /// Resolve a wall-clock date-time in the viewer's local timezone.
    ///
    /// Ambiguous times (clocks turned back) resolve to the earlier instant.
    pub fn from_local(naive: NaiveDateTime) -> Result<Self, ValidationError> {
        match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(Self(dt)),
            LocalResult::Ambiguous(earliest, _) => Ok(Self(earliest)),
            LocalResult::None => Err(ValidationError::NonexistentLocalTime(naive)),
        }
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS` as local time.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Self::from_local(parse_local(input)?)
    }

    pub fn from_datetime<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Self(instant.with_timezone(&Local))
    }

    pub fn as_datetime(&self) -> DateTime<Local> {
        self.0
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Milliseconds left at `now_ms`; negative once the target has passed.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        self.timestamp_ms().saturating_sub(now_ms)
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SS` without attaching a timezone.
pub fn parse_local(input: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(input.trim(), DATE_TIME_FORMAT).map_err(|_| {
        ValidationError::InvalidDateTime {
            input: input.to_string(),
        }
    })
}

/// Remaining time broken down into whole days, hours, minutes and seconds.
///
/// Pure duration arithmetic: 24-hour days, no calendar months or years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    /// Truncating decomposition. `None` when `ms` is negative (target passed).
    pub fn from_millis(ms: i64) -> Option<Self> {
        let ms = u64::try_from(ms).ok()?;
        Some(Self {
            days: ms / MS_PER_DAY as u64,
            hours: (ms / MS_PER_HOUR as u64) % 24,
            minutes: (ms / MS_PER_MINUTE as u64) % 60,
            seconds: (ms / MS_PER_SECOND as u64) % 60,
        })
    }

    pub fn get(&self, field: Field) -> u64 {
        match field {
            Field::Days => self.days,
            Field::Hours => self.hours,
            Field::Minutes => self.minutes,
            Field::Seconds => self.seconds,
        }
    }

    /// Display text for `field`.
    pub fn format(&self, field: Field) -> String {
        format_field(self.get(field))
    }

    /// Whole milliseconds represented by the breakdown.
    pub fn total_ms(&self) -> u64 {
        self.days * MS_PER_DAY as u64
            + self.hours * MS_PER_HOUR as u64
            + self.minutes * MS_PER_MINUTE as u64
            + self.seconds * MS_PER_SECOND as u64
    }
}

/// Zero-pad to two digits. Wider values are kept whole.
pub fn format_field(value: u64) -> String {
    format!("{value:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_seconds_before_midnight() {
        let target = TargetInstant::parse("2026-03-05T00:00:00").unwrap();
        let now = TargetInstant::parse("2026-03-04T23:59:58").unwrap();
        let r = Remaining::from_millis(target.remaining_ms(now.timestamp_ms())).unwrap();
        assert_eq!(
            Field::ALL.map(|f| r.format(f)),
            ["00", "00", "00", "02"].map(String::from)
        );
    }

    #[test]
    fn negative_remaining_is_ended() {
        assert_eq!(Remaining::from_millis(-1), None);
        assert_eq!(Remaining::from_millis(0), Some(Remaining::default()));
    }

    #[test]
    fn padding_keeps_wide_values() {
        assert_eq!(format_field(7), "07");
        assert_eq!(format_field(5), "05");
        assert_eq!(format_field(0), "00");
        assert_eq!(format_field(123), "123");
    }

    #[test]
    fn decomposition_of_mixed_duration() {
        let ms = 7 * MS_PER_DAY + 5 * MS_PER_HOUR + 59 * MS_PER_MINUTE + 3 * MS_PER_SECOND + 999;
        let r = Remaining::from_millis(ms).unwrap();
        assert_eq!(
            r,
            Remaining {
                days: 7,
                hours: 5,
                minutes: 59,
                seconds: 3
            }
        );
        assert_eq!(r.format(Field::Days), "07");
        assert_eq!(r.format(Field::Hours), "05");
    }

    #[test]
    fn selector_uses_binding_attribute() {
        assert_eq!(
            Field::Minutes.selector().to_string(),
            "[data-countdown=\"minutes\"]"
        );
    }

    #[test]
    fn parse_rejects_other_formats() {
        assert!(TargetInstant::parse("2026-03-05").is_err());
        assert!(TargetInstant::parse("05/03/2026 00:00").is_err());
    }

    proptest! {
        #[test]
        fn breakdown_brackets_remaining(ms in 0i64..(400 * MS_PER_DAY)) {
            let r = Remaining::from_millis(ms).unwrap();
            let floor = r.total_ms() as i64;
            prop_assert!(floor <= ms);
            prop_assert!(ms < floor + MS_PER_SECOND);
            prop_assert!(r.hours < 24);
            prop_assert!(r.minutes < 60);
            prop_assert!(r.seconds < 60);
        }

        #[test]
        fn formatted_fields_are_at_least_two_digits(ms in 0i64..(1_000 * MS_PER_DAY)) {
            let r = Remaining::from_millis(ms).unwrap();
            for field in Field::ALL {
                let text = r.format(field);
                prop_assert!(text.len() >= 2);
                prop_assert_eq!(text.parse::<u64>().unwrap(), r.get(field));
            }
        }
    }
}
