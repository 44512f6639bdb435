//! A day's named events and next-event resolution.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::{ClockTime, MINUTES_PER_DAY};
use crate::error::EngineError;

/// Conventional daily order: five prayers plus sunrise.
pub const STANDARD_ORDER: [&str; 6] = ["fajr", "sunrise", "dhuhr", "asr", "maghrib", "isha"];

/// Event whose primary time anchors the weekly jumuah rule.
pub const JUMUAH_ANCHOR: &str = "dhuhr";

/// A validated event name such as `fajr` or `maghrib`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventName(String);

impl EventName {
    /// Creates a name after validation. Names are trimmed and lowercased.
    pub fn new(name: impl Into<String>) -> Result<Self, EngineError> {
        let name = name.into().trim().to_lowercase();
        if name.is_empty() {
            return Err(EngineError::EmptyEventName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The conventional daily order as owned names.
    pub fn standard_order() -> Vec<Self> {
        STANDARD_ORDER
            .iter()
            .map(|name| Self((*name).to_string()))
            .collect()
    }
}

impl TryFrom<String> for EventName {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        name.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The next event after a reference time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextEvent {
    pub name: EventName,
    pub time: ClockTime,
    pub minutes_until: i64,
    pub is_tomorrow: bool,
}

/// Named event times for a single calendar day.
///
/// Lookups never depend on insertion order; scans take an explicit order.
///
/// Deserialization rejects two keys that normalize to the same name, such as
/// `"Fajr"` and `"fajr"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventTimeTable {
    events: HashMap<EventName, ClockTime>,
}

impl EventTimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from untrusted entries, rejecting repeated names.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (EventName, ClockTime)>,
    ) -> Result<Self, EngineError> {
        let mut table = Self::new();
        for (name, time) in entries {
            table.try_insert(name, time)?;
        }
        Ok(table)
    }

    /// Sets the time of an event, returning the previous value.
    pub fn insert(&mut self, name: EventName, time: ClockTime) -> Option<ClockTime> {
        self.events.insert(name, time)
    }

    /// Adds an event that must not already be present.
    pub fn try_insert(&mut self, name: EventName, time: ClockTime) -> Result<(), EngineError> {
        match self.events.entry(name) {
            Entry::Occupied(entry) => Err(EngineError::DuplicateEvent {
                name: entry.key().to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(time);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<ClockTime> {
        self.events.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over events in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&EventName, ClockTime)> {
        self.events.iter().map(|(name, time)| (name, *time))
    }

    /// Finds the first event in `order` strictly after `after`.
    ///
    /// An event at exactly `after` has already started and is skipped. Names
    /// in `order` that the table lacks are passed over. When nothing remains
    /// today, the first name in `order` is reported as tomorrow's occurrence
    /// and must be present in the table.
    pub fn next_event(
        &self,
        after: ClockTime,
        order: &[EventName],
    ) -> Result<NextEvent, EngineError> {
        let after_minutes = after.minutes_since_midnight();

        let today = order.iter().find_map(|name| {
            self.events
                .get(name)
                .filter(|time| **time > after)
                .map(|time| (name, *time))
        });

        if let Some((name, time)) = today {
            return Ok(NextEvent {
                name: name.clone(),
                time,
                minutes_until: time.minutes_since_midnight() - after_minutes,
                is_tomorrow: false,
            });
        }

        let first = order.first().ok_or(EngineError::EmptyEventOrder)?;
        let time = self
            .events
            .get(first)
            .copied()
            .ok_or_else(|| EngineError::MissingWraparoundEvent {
                name: first.to_string(),
            })?;

        Ok(NextEvent {
            name: first.clone(),
            time,
            minutes_until: (MINUTES_PER_DAY - after_minutes) + time.minutes_since_midnight(),
            is_tomorrow: true,
        })
    }
}

impl<'de> Deserialize<'de> for EventTimeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = EventTimeTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of event names to HH:MM times")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut table = EventTimeTable::new();
                while let Some((name, time)) = map.next_entry::<EventName, ClockTime>()? {
                    table.try_insert(name, time).map_err(de::Error::custom)?;
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Collects trusted entries. A repeated name keeps the last time; use
/// [`EventTimeTable::from_entries`] for input that may repeat names.
impl FromIterator<(EventName, ClockTime)> for EventTimeTable {
    fn from_iter<I: IntoIterator<Item = (EventName, ClockTime)>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
