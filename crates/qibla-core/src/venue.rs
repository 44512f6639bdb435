//! Venue records: a named location with its iqama rules.

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::EngineError;
use crate::geo::Coordinate;
use crate::iqama::RuleSet;
use crate::schedule::{DaySchedule, DirectionReport};
use crate::timetable::{EventName, EventTimeTable};

/// A mosque or prayer hall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub location: Coordinate,
    #[serde(default)]
    pub rules: RuleSet,
}

impl Venue {
    pub fn direction(&self) -> DirectionReport {
        DirectionReport::for_observer(self.location)
    }

    pub fn schedule(
        &self,
        table: &EventTimeTable,
        order: &[EventName],
        now: ClockTime,
        is_summer: bool,
    ) -> Result<DaySchedule, EngineError> {
        DaySchedule::build(table, &self.rules, order, now, is_summer)
    }
}

/// Looks up a venue by name, ignoring ASCII case.
pub fn find_venue<'a>(venues: &'a [Venue], name: &str) -> Option<&'a Venue> {
    venues
        .iter()
        .find(|venue| venue.name.eq_ignore_ascii_case(name.trim()))
}
