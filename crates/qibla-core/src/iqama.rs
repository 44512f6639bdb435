//! Secondary (iqama) times derived from primary (adhan) times.
//!
//! A venue configures one rule per event. Rules come in three shapes:
//!
//! - a fixed clock time that ignores the adhan entirely,
//! - a minute offset from the adhan, wrapping across midnight,
//! - a seasonal pair that picks one of the above by season.
//!
//! Season selection is a caller input, see [`crate::season::SeasonPolicy`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::EngineError;
use crate::timetable::{EventName, EventTimeTable, JUMUAH_ANCHOR};

/// A non-seasonal rule, usable on its own or as one side of a seasonal pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalBranch {
    FixedTime(ClockTime),
    OffsetMinutes(i32),
}

impl SeasonalBranch {
    fn apply(self, primary: ClockTime) -> ClockTime {
        match self {
            Self::FixedTime(time) => time,
            Self::OffsetMinutes(minutes) => primary.add_minutes(i64::from(minutes)),
        }
    }
}

impl fmt::Display for SeasonalBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedTime(time) => write!(f, "{time}"),
            Self::OffsetMinutes(minutes) => write!(f, "{minutes:+}"),
        }
    }
}

impl FromStr for SeasonalBranch {
    type Err = EngineError;

    /// `+20` or `-5` for offsets, `13:40` for fixed times.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with(['+', '-']) {
            return s
                .parse()
                .map(Self::OffsetMinutes)
                .map_err(|_| EngineError::MalformedSecondaryRule {
                    reason: format!("`{s}` is not a minute offset"),
                });
        }
        s.parse().map(Self::FixedTime)
    }
}

/// A summer/winter pair. Both sides are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSeasonalRule")]
pub struct SeasonalRule {
    summer: SeasonalBranch,
    winter: SeasonalBranch,
}

#[derive(Deserialize)]
struct RawSeasonalRule {
    summer: Option<SeasonalBranch>,
    winter: Option<SeasonalBranch>,
}

impl SeasonalRule {
    pub const fn new(summer: SeasonalBranch, winter: SeasonalBranch) -> Self {
        Self { summer, winter }
    }

    /// Builds a rule from optional parts, rejecting a missing side.
    pub fn from_parts(
        summer: Option<SeasonalBranch>,
        winter: Option<SeasonalBranch>,
    ) -> Result<Self, EngineError> {
        match (summer, winter) {
            (Some(summer), Some(winter)) => Ok(Self::new(summer, winter)),
            (None, None) => Err(EngineError::MalformedSecondaryRule {
                reason: "seasonal rule has neither a summer nor a winter branch".to_string(),
            }),
            (None, Some(_)) => Err(EngineError::MalformedSecondaryRule {
                reason: "seasonal rule is missing its summer branch".to_string(),
            }),
            (Some(_), None) => Err(EngineError::MalformedSecondaryRule {
                reason: "seasonal rule is missing its winter branch".to_string(),
            }),
        }
    }

    const fn select(&self, is_summer: bool) -> SeasonalBranch {
        if is_summer { self.summer } else { self.winter }
    }
}

impl TryFrom<RawSeasonalRule> for SeasonalRule {
    type Error = EngineError;

    fn try_from(raw: RawSeasonalRule) -> Result<Self, Self::Error> {
        Self::from_parts(raw.summer, raw.winter)
    }
}

/// How a secondary time is derived from its primary time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryTimeRule {
    FixedTime(ClockTime),
    OffsetMinutes(i32),
    Seasonal(SeasonalRule),
}

impl From<SeasonalBranch> for SecondaryTimeRule {
    fn from(branch: SeasonalBranch) -> Self {
        match branch {
            SeasonalBranch::FixedTime(time) => Self::FixedTime(time),
            SeasonalBranch::OffsetMinutes(minutes) => Self::OffsetMinutes(minutes),
        }
    }
}

impl fmt::Display for SecondaryTimeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedTime(time) => write!(f, "{time}"),
            Self::OffsetMinutes(minutes) => write!(f, "{minutes:+}"),
            Self::Seasonal(rule) => write!(f, "{}/{}", rule.summer, rule.winter),
        }
    }
}

impl FromStr for SecondaryTimeRule {
    type Err = EngineError;

    /// Compact rule syntax used on the command line.
    ///
    /// `13:40` is a fixed time, `+20` an offset, and `summer/winter` a
    /// seasonal pair such as `13:40/12:40` or `+15/+10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((summer, winter)) => {
                let summer = (!summer.trim().is_empty())
                    .then(|| summer.parse())
                    .transpose()?;
                let winter = (!winter.trim().is_empty())
                    .then(|| winter.parse())
                    .transpose()?;
                SeasonalRule::from_parts(summer, winter).map(Self::Seasonal)
            }
            None => s.parse::<SeasonalBranch>().map(Self::from),
        }
    }
}

/// Derives a secondary time from a primary time.
///
/// `is_summer` only matters for seasonal rules.
pub fn derive(primary: ClockTime, rule: SecondaryTimeRule, is_summer: bool) -> ClockTime {
    match rule {
        SecondaryTimeRule::FixedTime(time) => time,
        SecondaryTimeRule::OffsetMinutes(minutes) => primary.add_minutes(i64::from(minutes)),
        SecondaryTimeRule::Seasonal(seasonal) => seasonal.select(is_summer).apply(primary),
    }
}

/// A venue's secondary-time rules.
///
/// Jumuah is kept apart from the daily events: it is evaluated against the
/// dhuhr adhan but has its own rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    events: HashMap<EventName, SecondaryTimeRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jumuah: Option<SecondaryTimeRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rule(mut self, name: EventName, rule: SecondaryTimeRule) -> Self {
        self.events.insert(name, rule);
        self
    }

    #[must_use]
    pub fn with_jumuah(mut self, rule: SecondaryTimeRule) -> Self {
        self.jumuah = Some(rule);
        self
    }

    pub fn rule_for(&self, name: &str) -> Option<SecondaryTimeRule> {
        self.events.get(name).copied()
    }

    pub const fn jumuah(&self) -> Option<SecondaryTimeRule> {
        self.jumuah
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.jumuah.is_none()
    }

    /// Derives the secondary time for `name`, if it has both a rule and an adhan.
    pub fn derive_for(
        &self,
        name: &str,
        table: &EventTimeTable,
        is_summer: bool,
    ) -> Option<ClockTime> {
        let rule = self.rule_for(name)?;
        let primary = table.get(name)?;
        Some(derive(primary, rule, is_summer))
    }

    /// Derives the jumuah time against the dhuhr adhan.
    pub fn derive_jumuah(&self, table: &EventTimeTable, is_summer: bool) -> Option<ClockTime> {
        let rule = self.jumuah?;
        let primary = table.get(JUMUAH_ANCHOR)?;
        Some(derive(primary, rule, is_summer))
    }
}
