//! Response shapes handed to presentation layers.

use serde::Serialize;

use crate::clock::ClockTime;
use crate::error::EngineError;
use crate::geo::{self, Bearing, CardinalLabel, Coordinate};
use crate::iqama::RuleSet;
use crate::timetable::{EventName, EventTimeTable, NextEvent};

/// Direction and distance from an observer to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionReport {
    pub observer: Coordinate,
    pub target: Coordinate,
    pub bearing: Bearing,
    pub cardinal: CardinalLabel,
    pub distance_km: f64,
}

impl DirectionReport {
    /// Direction from `observer` to the Kaaba.
    pub fn for_observer(observer: Coordinate) -> Self {
        Self::between(observer, Coordinate::KAABA)
    }

    pub fn between(observer: Coordinate, target: Coordinate) -> Self {
        let bearing = geo::bearing(observer, target);
        Self {
            observer,
            target,
            bearing,
            cardinal: geo::cardinal(bearing),
            distance_km: geo::distance_km(observer, target),
        }
    }
}

/// One row of the day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub name: EventName,
    pub adhan: ClockTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iqama: Option<ClockTime>,
}

/// A day's events annotated with iqama times and the next upcoming event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub entries: Vec<ScheduleEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jumuah: Option<ClockTime>,
    pub is_summer: bool,
    pub next: NextEvent,
}

impl DaySchedule {
    /// Builds the schedule view for `now`.
    ///
    /// Rows follow `order`; names the table lacks are left out. Fails only
    /// when next-event resolution fails.
    pub fn build(
        table: &EventTimeTable,
        rules: &RuleSet,
        order: &[EventName],
        now: ClockTime,
        is_summer: bool,
    ) -> Result<Self, EngineError> {
        let next = table.next_event(now, order)?;

        let entries = order
            .iter()
            .filter_map(|name| {
                table.get(name.as_str()).map(|adhan| ScheduleEntry {
                    name: name.clone(),
                    adhan,
                    iqama: rules.derive_for(name.as_str(), table, is_summer),
                })
            })
            .collect();

        Ok(Self {
            entries,
            jumuah: rules.derive_jumuah(table, is_summer),
            is_summer,
            next,
        })
    }

    pub fn entry(&self, name: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| entry.name.as_str() == name)
    }
}
