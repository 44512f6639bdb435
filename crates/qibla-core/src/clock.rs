//! Time-of-day values without a date.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Minutes in a day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A wall-clock time with minute precision.
///
/// Ordering is lexicographic on `(hour, minute)`, which the derived `Ord`
/// gives us through field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    /// Creates a clock time after range validation.
    pub const fn new(hour: u32, minute: u32) -> Result<Self, EngineError> {
        if hour > 23 || minute > 59 {
            return Err(EngineError::InvalidClockTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    #[must_use]
    pub const fn hour(self) -> u32 {
        self.hour
    }

    #[must_use]
    pub const fn minute(self) -> u32 {
        self.minute
    }

    /// Minutes elapsed since midnight.
    #[must_use]
    pub const fn minutes_since_midnight(self) -> i64 {
        (self.hour * 60 + self.minute) as i64
    }

    /// Builds a clock time from a minute count, wrapping into a single day.
    ///
    /// Uses floor division so negative counts wrap back from midnight
    /// instead of producing negative minutes.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rem_euclid keeps both values small and non-negative"
    )]
    pub const fn from_total_minutes(total: i64) -> Self {
        let hour = total.div_euclid(60).rem_euclid(24);
        let minute = total.rem_euclid(60);
        Self {
            hour: hour as u32,
            minute: minute as u32,
        }
    }

    /// Shifts by a signed number of minutes, wrapping across midnight.
    #[must_use]
    pub const fn add_minutes(self, minutes: i64) -> Self {
        Self::from_total_minutes(self.minutes_since_midnight() + minutes)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = EngineError;

    /// Parses `HH:MM` or `H:MM`.
    ///
    /// Timing services append a zone label such as `05:12 (NZDT)`; anything
    /// after the first whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || EngineError::UnparsableClockTime {
            input: s.to_string(),
        };

        let clock = s.split_whitespace().next().ok_or_else(unparsable)?;
        let (hour, minute) = clock.split_once(':').ok_or_else(unparsable)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(unparsable());
        }
        if !all_digits(hour) || !all_digits(minute) {
            return Err(unparsable());
        }
        let hour: u32 = hour.parse().map_err(|_| unparsable())?;
        let minute: u32 = minute.parse().map_err(|_| unparsable())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}
