//! Core data models: geodetic positions and UAS telemetry samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::spatial;

/// A validated WGS84 position with altitude in feet MSL.
///
/// Fields are private so every instance has passed range checks; both
/// [`GeodeticPosition::new`] and deserialization go through the same
/// validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct GeodeticPosition {
    latitude: f64,
    longitude: f64,
    altitude_msl: f64,
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
    #[serde(default, alias = "alt")]
    altitude_msl: f64,
}

impl TryFrom<RawPosition> for GeodeticPosition {
    type Error = GeoError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude, raw.altitude_msl)
    }
}

impl GeodeticPosition {
    /// Create a position, rejecting out-of-range coordinates and non-finite altitude.
    pub fn new(latitude: f64, longitude: f64, altitude_msl: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        if !altitude_msl.is_finite() {
            return Err(GeoError::NonFiniteAltitude(altitude_msl));
        }
        Ok(Self {
            latitude,
            longitude,
            altitude_msl,
        })
    }

    /// Position on the ground plane (altitude 0 ft MSL).
    pub fn ground(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        Self::new(latitude, longitude, 0.0)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Altitude in feet above mean sea level.
    pub fn altitude_msl(&self) -> f64 {
        self.altitude_msl
    }

    /// 3D distance in feet (great-circle horizontal combined with altitude delta).
    pub fn distance_to(&self, other: &GeodeticPosition) -> f64 {
        spatial::distance_ft(self, other)
    }

    /// Great-circle distance in feet, altitude ignored.
    pub fn horizontal_distance_to(&self, other: &GeodeticPosition) -> f64 {
        spatial::horizontal_distance_ft(self, other)
    }

    /// Linear blend toward `other`; `ratio` 0 yields `self`, 1 yields `other`.
    ///
    /// Works in degree space, which is fine at field scale but does not
    /// handle the antimeridian.
    pub fn lerp(&self, other: &GeodeticPosition, ratio: f64) -> GeodeticPosition {
        let blend = |a: f64, b: f64| a + (b - a) * ratio;
        GeodeticPosition {
            latitude: blend(self.latitude, other.latitude).clamp(-90.0, 90.0),
            longitude: blend(self.longitude, other.longitude).clamp(-180.0, 180.0),
            altitude_msl: blend(self.altitude_msl, other.altitude_msl),
        }
    }
}

/// A single telemetry report from the UAS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTelemetrySample")]
pub struct TelemetrySample {
    #[serde(flatten)]
    position: GeodeticPosition,
    timestamp: DateTime<Utc>,
    /// True north heading in degrees
    heading: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawTelemetrySample {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
    #[serde(alias = "alt")]
    altitude_msl: f64,
    timestamp: DateTime<Utc>,
    #[serde(default, alias = "uas_heading")]
    heading: Option<f64>,
}

impl TryFrom<RawTelemetrySample> for TelemetrySample {
    type Error = GeoError;

    fn try_from(raw: RawTelemetrySample) -> Result<Self, Self::Error> {
        let position = GeodeticPosition::new(raw.latitude, raw.longitude, raw.altitude_msl)?;
        let sample = Self::new(position, raw.timestamp);
        match raw.heading {
            Some(heading) => sample.with_heading(heading),
            None => Ok(sample),
        }
    }
}

impl TelemetrySample {
    /// Create a sample without heading.
    pub fn new(position: GeodeticPosition, timestamp: DateTime<Utc>) -> Self {
        Self {
            position,
            timestamp,
            heading: None,
        }
    }

    /// Attach a heading, which must lie in [0, 360] degrees.
    pub fn with_heading(mut self, heading_deg: f64) -> Result<Self, GeoError> {
        if !(0.0..=360.0).contains(&heading_deg) {
            return Err(GeoError::InvalidHeading(heading_deg));
        }
        self.heading = Some(heading_deg);
        Ok(self)
    }

    pub fn position(&self) -> &GeodeticPosition {
        &self.position
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    /// Same reported position and heading, regardless of timestamp.
    ///
    /// Autopilots rarely emit bit-identical readings twice, so an exact
    /// repeat is treated as a resent report rather than a new one.
    pub fn duplicate(&self, other: &TelemetrySample) -> bool {
        self.position == other.position && self.heading == other.heading
    }
}
