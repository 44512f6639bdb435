//! Qibla direction and prayer-time engine.
//!
//! This crate contains the pure computations behind the app:
//! - Geo: great-circle bearing and Haversine distance to the Kaaba
//! - Timetable: a day's named events and next-event resolution with rollover
//! - Iqama: secondary times derived from adhan times under venue rules
//! - Alignment: heading-relative delta for the live compass
//!
//! Nothing here performs I/O or reads the clock; callers pass "now" and the
//! season in explicitly.

pub mod alignment;
pub mod clock;
mod error;
pub mod geo;
pub mod iqama;
pub mod schedule;
pub mod season;
pub mod timetable;
pub mod venue;

pub use alignment::{AlignmentState, DEFAULT_TOLERANCE_DEGREES};
pub use clock::ClockTime;
pub use error::EngineError;
pub use geo::{Bearing, CardinalLabel, Coordinate};
pub use iqama::{RuleSet, SeasonalBranch, SeasonalRule, SecondaryTimeRule};
pub use schedule::{DaySchedule, DirectionReport, ScheduleEntry};
pub use season::SeasonPolicy;
pub use timetable::{EventName, EventTimeTable, NextEvent, STANDARD_ORDER};
pub use venue::{Venue, find_venue};
