//! Validation errors raised by the engine.

use thiserror::Error;

/// Errors returned by engine operations.
///
/// Every variant is a deterministic validation failure. Nothing here is
/// transient, so callers should surface these rather than retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Latitude or longitude outside the valid range, or not finite.
    #[error("invalid coordinate ({latitude}, {longitude}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// A sensor heading outside `[0, 360)` or not finite.
    #[error("invalid heading {value}: must be a finite value in [0, 360)")]
    InvalidHeading { value: f64 },

    /// Alignment tolerance that is negative or not finite.
    #[error("invalid alignment tolerance {value}: must be finite and non-negative")]
    InvalidTolerance { value: f64 },

    /// The event used for next-day rollover is missing from the timetable.
    #[error("timetable has no `{name}` entry to roll over to")]
    MissingWraparoundEvent { name: String },

    /// The event order used for scanning was empty.
    #[error("event order is empty")]
    EmptyEventOrder,

    /// A secondary-time rule that cannot be evaluated.
    #[error("malformed secondary rule: {reason}")]
    MalformedSecondaryRule { reason: String },

    /// Hour or minute out of range.
    #[error("invalid clock time {hour:02}:{minute:02}")]
    InvalidClockTime { hour: u32, minute: u32 },

    /// Text that does not parse as `HH:MM`.
    #[error("cannot parse `{input}` as a clock time, expected HH:MM")]
    UnparsableClockTime { input: String },

    /// Season month outside 1..=12.
    #[error("invalid season month {month}: must be in 1..=12")]
    InvalidSeasonMonth { month: u32 },

    /// Two timetable entries that name the same event.
    #[error("event `{name}` appears more than once in the timetable")]
    DuplicateEvent { name: String },

    /// An event name that was empty.
    #[error("event name cannot be empty")]
    EmptyEventName,
}
