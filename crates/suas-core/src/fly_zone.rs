//! Fly zone model: an approved 3D flight volume.

use serde::{Deserialize, Serialize};

use crate::containment::{RayCasting, RingTest};
use crate::error::GeoError;
use crate::models::GeodeticPosition;

/// An approved area for UAS flight. The UAS shall be in at least one zone.
///
/// A polygon boundary (ring closed implicitly) extruded between two MSL
/// altitudes. Zones with fewer than 3 boundary points are valid but empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFlyZone")]
pub struct FlyZone {
    boundary: Vec<GeodeticPosition>,
    /// Minimum altitude of the zone (MSL) in feet
    altitude_msl_min: f64,
    /// Maximum altitude of the zone (MSL) in feet
    altitude_msl_max: f64,
}

#[derive(Debug, Deserialize)]
struct RawFlyZone {
    #[serde(default, alias = "boundary_pts")]
    boundary: Vec<GeodeticPosition>,
    altitude_msl_min: f64,
    altitude_msl_max: f64,
}

impl TryFrom<RawFlyZone> for FlyZone {
    type Error = GeoError;

    fn try_from(raw: RawFlyZone) -> Result<Self, Self::Error> {
        Self::new(raw.boundary, raw.altitude_msl_min, raw.altitude_msl_max)
    }
}

impl FlyZone {
    /// Create a zone. Rejects non-finite or inverted altitude bounds.
    pub fn new(
        boundary: Vec<GeodeticPosition>,
        altitude_msl_min: f64,
        altitude_msl_max: f64,
    ) -> Result<Self, GeoError> {
        if !altitude_msl_min.is_finite() || !altitude_msl_max.is_finite() {
            return Err(GeoError::NonFiniteAltitudeBand {
                min: altitude_msl_min,
                max: altitude_msl_max,
            });
        }
        if altitude_msl_min > altitude_msl_max {
            return Err(GeoError::InvertedAltitudeBand {
                min: altitude_msl_min,
                max: altitude_msl_max,
            });
        }
        Ok(Self {
            boundary,
            altitude_msl_min,
            altitude_msl_max,
        })
    }

    pub fn boundary(&self) -> &[GeodeticPosition] {
        &self.boundary
    }

    pub fn altitude_msl_min(&self) -> f64 {
        self.altitude_msl_min
    }

    pub fn altitude_msl_max(&self) -> f64 {
        self.altitude_msl_max
    }

    /// Fewer than 3 boundary points: the zone can never contain a position.
    pub fn is_degenerate(&self) -> bool {
        self.boundary.len() < 3
    }

    /// Inclusive altitude band check.
    pub fn altitude_contains(&self, altitude_msl: f64) -> bool {
        altitude_msl >= self.altitude_msl_min && altitude_msl <= self.altitude_msl_max
    }

    /// Whether the given position is inside the zone.
    pub fn contains(&self, pos: &GeodeticPosition) -> bool {
        self.contains_with(&RayCasting, pos)
    }

    /// [`FlyZone::contains`] with an explicit ring backend.
    pub fn contains_with<R: RingTest + ?Sized>(&self, ring_test: &R, pos: &GeodeticPosition) -> bool {
        !self.is_degenerate()
            && self.altitude_contains(pos.altitude_msl())
            && ring_test.ring_contains(&self.boundary, pos.latitude(), pos.longitude())
    }

    /// Evaluates many positions; same result as calling `contains` per position.
    pub fn contains_batch<'a, I>(&self, positions: I) -> Vec<bool>
    where
        I: IntoIterator<Item = &'a GeodeticPosition>,
    {
        self.contains_batch_with(&RayCasting, positions)
    }

    /// Batched containment with an explicit ring backend.
    ///
    /// Altitude is checked for every position first; the ring test only
    /// runs on positions inside the band.
    pub fn contains_batch_with<'a, R, I>(&self, ring_test: &R, positions: I) -> Vec<bool>
    where
        R: RingTest + ?Sized,
        I: IntoIterator<Item = &'a GeodeticPosition>,
    {
        let positions: Vec<&GeodeticPosition> = positions.into_iter().collect();
        if self.is_degenerate() {
            return vec![false; positions.len()];
        }

        let mut results: Vec<bool> = positions
            .iter()
            .map(|pos| self.altitude_contains(pos.altitude_msl()))
            .collect();

        for (pos, result) in positions.iter().zip(results.iter_mut()) {
            if *result {
                *result = ring_test.ring_contains(&self.boundary, pos.latitude(), pos.longitude());
            }
        }

        results
    }
}
