//! Great-circle bearing and distance.
//!
//! All angles are degrees. Latitude is north-positive, longitude east-positive,
//! bearings are measured clockwise from true north.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Mean Earth radius used for Haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// The Kaaba in Mecca, the fixed target for direction finding.
    pub const KAABA: Self = Self {
        latitude: 21.4225,
        longitude: 39.8262,
    };

    /// Creates a coordinate after range validation.
    ///
    /// NaN fails the range checks and is rejected the same way.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, EngineError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(EngineError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = EngineError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A compass bearing in `[0, 360)` degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Bearing(f64);

impl Bearing {
    /// Validates a bearing that must already lie in `[0, 360)`.
    ///
    /// Use this for values coming from outside the engine, such as sensor
    /// headings. Non-finite values are rejected.
    pub fn new(degrees: f64) -> Result<Self, EngineError> {
        if !degrees.is_finite() || !(0.0..360.0).contains(&degrees) {
            return Err(EngineError::InvalidHeading { value: degrees });
        }
        Ok(Self(degrees))
    }

    /// Reduces any finite angle into `[0, 360)`.
    #[must_use]
    pub fn normalized(degrees: f64) -> Self {
        let reduced = degrees.rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360.0
        if reduced >= 360.0 {
            Self(0.0)
        } else {
            Self(reduced)
        }
    }

    #[must_use]
    pub const fn degrees(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Bearing {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Bearing> for f64 {
    fn from(bearing: Bearing) -> Self {
        bearing.0
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// One of the eight compass octants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardinalLabel {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalLabel {
    /// Octants in clockwise order starting at north.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for CardinalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial great-circle bearing from `from` towards `to`.
pub fn bearing(from: Coordinate, to: Coordinate) -> Bearing {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let x = lat2.cos() * delta_lon.sin();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    Bearing::normalized(x.atan2(y).to_degrees() + 360.0)
}

/// Haversine distance between two coordinates in kilometres.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for near-antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Eight-way compass label for a bearing.
///
/// Sectors are 45° wide and centred on the compass points. A bearing lying
/// exactly on a sector edge belongs to the sector that edge closes, so 22.5°
/// is N and 337.5° is NW.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "sector index is reduced into 0..8"
)]
pub fn cardinal(bearing: Bearing) -> CardinalLabel {
    let sector = ((bearing.degrees() - 22.5) / 45.0).ceil() as i64;
    CardinalLabel::ALL[sector.rem_euclid(8) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auckland() -> Coordinate {
        Coordinate::new(-36.85, 174.76).unwrap()
    }

    fn sample_points() -> Vec<Coordinate> {
        [
            (51.5074, -0.1278),
            (40.7128, -74.006),
            (-33.8688, 151.2093),
            (0.0, 0.0),
            (89.9, 10.0),
            (-89.9, -170.0),
            (21.4225, -140.1738),
            (-36.85, 174.76),
            (35.6762, 139.6503),
        ]
        .into_iter()
        .map(|(lat, lon)| Coordinate::new(lat, lon).unwrap())
        .collect()
    }

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(-90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn test_coordinate_serde_validates() {
        let parsed: Coordinate =
            serde_json::from_str(r#"{"latitude": -36.85, "longitude": 174.76}"#).unwrap();
        assert_eq!(parsed, auckland());

        let result: Result<Coordinate, _> =
            serde_json::from_str(r#"{"latitude": 91.0, "longitude": 0.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bearing_is_always_in_range() {
        let points = sample_points();
        for a in &points {
            for b in &points {
                let deg = bearing(*a, *b).degrees();
                assert!((0.0..360.0).contains(&deg), "{a} -> {b} gave {deg}");
            }
        }
    }

    #[test]
    fn test_distance_is_symmetric_but_bearing_is_not() {
        let london = Coordinate::new(51.5074, -0.1278).unwrap();
        let there = distance_km(london, Coordinate::KAABA);
        let back = distance_km(Coordinate::KAABA, london);
        assert!((there - back).abs() < 1e-9);

        let out = bearing(london, Coordinate::KAABA).degrees();
        let home = bearing(Coordinate::KAABA, london).degrees();
        assert!((out - home).abs() > 1.0);
        // Initial bearings along a great circle are not reciprocal
        assert!(((out - home).abs() - 180.0).abs() > 1.0);
    }

    #[test]
    #[expect(
        clippy::float_cmp,
        reason = "exact zero expected for identical inputs"
    )]
    fn distance_to_self_is_zero() {
        for point in sample_points() {
            assert_eq!(distance_km(point, point), 0.0);
        }
    }

    #[test]
    fn test_auckland_to_kaaba() {
        let b = bearing(auckland(), Coordinate::KAABA);
        assert!((260.5..262.0).contains(&b.degrees()), "bearing {b}");
        assert_eq!(cardinal(b), CardinalLabel::W);

        let d = distance_km(auckland(), Coordinate::KAABA);
        assert!((15_300.0..15_450.0).contains(&d), "distance {d}");
    }

    #[test]
    fn test_london_to_kaaba() {
        let london = Coordinate::new(51.5074, -0.1278).unwrap();
        let b = bearing(london, Coordinate::KAABA);
        assert!((118.0..120.0).contains(&b.degrees()));
        assert_eq!(cardinal(b), CardinalLabel::SE);
        let d = distance_km(london, Coordinate::KAABA);
        assert!((4_750.0..4_850.0).contains(&d));
    }

    #[test]
    fn test_due_north_and_due_east() {
        let origin = Coordinate::new(0.0, 0.0).unwrap();
        let north = Coordinate::new(10.0, 0.0).unwrap();
        let east = Coordinate::new(0.0, 10.0).unwrap();
        assert!(bearing(origin, north).degrees().abs() < 1e-9);
        assert!((bearing(origin, east).degrees() - 90.0).abs() < 1e-9);
        assert!((bearing(north, origin).degrees() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_cardinal_boundaries() {
        let label = |deg: f64| cardinal(Bearing::new(deg).unwrap());
        assert_eq!(label(0.0), CardinalLabel::N);
        assert_eq!(label(22.5), CardinalLabel::N);
        assert_eq!(label(22.6), CardinalLabel::NE);
        assert_eq!(label(44.9), CardinalLabel::NE);
        assert_eq!(label(67.5), CardinalLabel::NE);
        assert_eq!(label(90.0), CardinalLabel::E);
        assert_eq!(label(135.0), CardinalLabel::SE);
        assert_eq!(label(180.0), CardinalLabel::S);
        assert_eq!(label(225.0), CardinalLabel::SW);
        assert_eq!(label(270.0), CardinalLabel::W);
        assert_eq!(label(315.0), CardinalLabel::NW);
        assert_eq!(label(337.5), CardinalLabel::NW);
        assert_eq!(label(337.6), CardinalLabel::N);
        assert_eq!(label(359.9), CardinalLabel::N);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "normalization results are exact")]
    fn bearing_normalization() {
        assert_eq!(Bearing::normalized(-90.0).degrees(), 270.0);
        assert_eq!(Bearing::normalized(720.0).degrees(), 0.0);
        assert_eq!(Bearing::normalized(-1e-20).degrees(), 0.0);
        assert_eq!(Bearing::normalized(450.0).degrees(), 90.0);
    }

    #[test]
    fn test_bearing_new_rejects_out_of_range() {
        assert!(Bearing::new(360.0).is_err());
        assert!(Bearing::new(-0.5).is_err());
        assert!(Bearing::new(f64::NAN).is_err());
        assert!(Bearing::new(f64::INFINITY).is_err());
        assert!(Bearing::new(359.99).is_ok());
    }

    #[test]
    fn test_cardinal_serializes_uppercase() {
        let json = serde_json::to_string(&CardinalLabel::NW).unwrap();
        assert_eq!(json, "\"NW\"");
    }
}
