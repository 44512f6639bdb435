//! Heading-relative alignment against a target bearing.
//!
//! Each sensor sample produces a fresh [`AlignmentState`]. Nothing is kept
//! between calls, so samples may arrive irregularly or from several threads.
//! Smoothing the needle between snapshots is left to the renderer.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::EngineError;
use crate::geo::Bearing;

/// Default half-width of the "aligned" window, in degrees.
pub const DEFAULT_TOLERANCE_DEGREES: f64 = 5.0;

/// Alignment snapshot for one heading sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentState {
    pub target_bearing: Bearing,
    pub current_heading: Bearing,
    /// Signed shortest turn from the heading to the target, in `[-180, 180]`.
    /// Positive means turn clockwise.
    pub delta_degrees: f64,
    pub is_aligned: bool,
}

impl AlignmentState {
    /// Angle at which to draw the target on a dial that rotates with the device.
    pub fn needle_rotation(&self) -> Bearing {
        Bearing::normalized(self.target_bearing.degrees() - self.current_heading.degrees())
    }
}

/// Signed shortest angular difference from `current` to `target`.
pub fn signed_delta(target: Bearing, current: Bearing) -> f64 {
    (target.degrees() - current.degrees() + 540.0).rem_euclid(360.0) - 180.0
}

/// Validates an alignment tolerance: finite and non-negative.
pub fn check_tolerance(tolerance_degrees: f64) -> Result<f64, EngineError> {
    if !tolerance_degrees.is_finite() || tolerance_degrees < 0.0 {
        return Err(EngineError::InvalidTolerance {
            value: tolerance_degrees,
        });
    }
    Ok(tolerance_degrees)
}

/// Computes the alignment snapshot for a single heading sample.
///
/// `current_heading` is a raw sensor value and must be finite and in
/// `[0, 360)`.
pub fn update(
    target_bearing: Bearing,
    current_heading: f64,
    tolerance_degrees: f64,
) -> Result<AlignmentState, EngineError> {
    let tolerance_degrees = check_tolerance(tolerance_degrees)?;
    let current_heading = Bearing::new(current_heading)?;
    let delta_degrees = signed_delta(target_bearing, current_heading);

    Ok(AlignmentState {
        target_bearing,
        current_heading,
        delta_degrees,
        is_aligned: delta_degrees.abs() < tolerance_degrees,
    })
}

/// Applies [`update`] to a batch of samples in parallel.
///
/// Output order matches input order. A bad sample only fails its own slot.
pub fn track(
    target_bearing: Bearing,
    samples: &[f64],
    tolerance_degrees: f64,
) -> Vec<Result<AlignmentState, EngineError>> {
    samples
        .par_iter()
        .map(|&heading| update(target_bearing, heading, tolerance_degrees))
        .collect()
}
