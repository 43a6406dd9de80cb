//! Stationary obstacles: ground-based cylinders the UAS must avoid.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::models::{GeodeticPosition, TelemetrySample};
use crate::projection::UtmProjection;
use crate::rules::EvaluationRules;
use crate::telemetry;
use crate::units::feet_to_meters;

pub const STATIONARY_OBSTACLE_RADIUS_FT_MIN: f64 = 30.0;
pub const STATIONARY_OBSTACLE_RADIUS_FT_MAX: f64 = 300.0;

/// A cylinder rising from the ground (height in feet MSL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObstacle", into = "RawObstacle")]
pub struct StationaryObstacle {
    center: GeodeticPosition,
    cylinder_radius_ft: f64,
    cylinder_height_ft: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawObstacle {
    latitude: f64,
    longitude: f64,
    #[serde(alias = "cylinder_radius")]
    cylinder_radius_ft: f64,
    #[serde(alias = "cylinder_height")]
    cylinder_height_ft: f64,
}

impl TryFrom<RawObstacle> for StationaryObstacle {
    type Error = GeoError;

    fn try_from(raw: RawObstacle) -> Result<Self, Self::Error> {
        Self::new(
            raw.latitude,
            raw.longitude,
            raw.cylinder_radius_ft,
            raw.cylinder_height_ft,
        )
    }
}

impl From<StationaryObstacle> for RawObstacle {
    fn from(obstacle: StationaryObstacle) -> Self {
        Self {
            latitude: obstacle.center.latitude(),
            longitude: obstacle.center.longitude(),
            cylinder_radius_ft: obstacle.cylinder_radius_ft,
            cylinder_height_ft: obstacle.cylinder_height_ft,
        }
    }
}

impl StationaryObstacle {
    pub fn new(
        latitude: f64,
        longitude: f64,
        cylinder_radius_ft: f64,
        cylinder_height_ft: f64,
    ) -> Result<Self, GeoError> {
        let center = GeodeticPosition::ground(latitude, longitude)?;
        if !(STATIONARY_OBSTACLE_RADIUS_FT_MIN..=STATIONARY_OBSTACLE_RADIUS_FT_MAX)
            .contains(&cylinder_radius_ft)
        {
            return Err(GeoError::InvalidObstacleRadius {
                radius_ft: cylinder_radius_ft,
                min_ft: STATIONARY_OBSTACLE_RADIUS_FT_MIN,
                max_ft: STATIONARY_OBSTACLE_RADIUS_FT_MAX,
            });
        }
        if !cylinder_height_ft.is_finite() || cylinder_height_ft < 0.0 {
            return Err(GeoError::InvalidObstacleHeight(cylinder_height_ft));
        }
        Ok(Self {
            center,
            cylinder_radius_ft,
            cylinder_height_ft,
        })
    }

    pub fn center(&self) -> &GeodeticPosition {
        &self.center
    }

    pub fn cylinder_radius_ft(&self) -> f64 {
        self.cylinder_radius_ft
    }

    pub fn cylinder_height_ft(&self) -> f64 {
        self.cylinder_height_ft
    }

    /// Whether the position is inside the cylinder. Anything at or below the
    /// top counts, including negative altitudes.
    pub fn contains(&self, pos: &GeodeticPosition) -> bool {
        pos.altitude_msl() <= self.cylinder_height_ft
            && self.center.horizontal_distance_to(pos) <= self.cylinder_radius_ft
    }

    /// Whether the telemetry (interpolated per `rules`) passes through the
    /// cylinder at any point.
    pub fn evaluate_collision(&self, samples: &[TelemetrySample], rules: &EvaluationRules) -> bool {
        let hit = telemetry::interpolate_with_rules(samples, rules)
            .find(|sample| self.contains(sample.position()));
        if let Some(sample) = hit {
            tracing::debug!(
                timestamp = %sample.timestamp(),
                lat = sample.position().latitude(),
                lon = sample.position().longitude(),
                "obstacle collision"
            );
        }
        hit.is_some()
    }

    /// Points on the cylinder's top edge, evenly spaced from 0 to 2π
    /// inclusive (so the ring is explicitly closed), at the cylinder height.
    pub fn outline(&self, num_points: usize) -> Result<Vec<GeodeticPosition>, GeoError> {
        let projection = UtmProjection::for_position(self.center.latitude(), self.center.longitude());
        let (cx, cy) = projection.forward(self.center.latitude(), self.center.longitude());
        let radius_m = feet_to_meters(self.cylinder_radius_ft);

        let step = if num_points > 1 {
            std::f64::consts::TAU / (num_points - 1) as f64
        } else {
            0.0
        };

        (0..num_points)
            .map(|k| {
                let angle = step * k as f64;
                let (lat, lon) =
                    projection.inverse(cx + radius_m * angle.cos(), cy + radius_m * angle.sin());
                GeodeticPosition::new(lat, lon, self.cylinder_height_ft)
            })
            .collect()
    }
}
