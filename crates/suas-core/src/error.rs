//! Validation and evaluation errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rejected input at construction time (positions, zones, obstacles).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("altitude must be finite, got {0}")]
    NonFiniteAltitude(f64),

    #[error("heading {0} outside [0, 360]")]
    InvalidHeading(f64),

    #[error("zone altitude bounds must be finite (min {min}, max {max})")]
    NonFiniteAltitudeBand { min: f64, max: f64 },

    /// Altitude min must not exceed altitude max.
    #[error("zone altitude min ({min}) exceeds max ({max})")]
    InvertedAltitudeBand { min: f64, max: f64 },

    #[error("obstacle radius {radius_ft} ft outside [{min_ft}, {max_ft}]")]
    InvalidObstacleRadius {
        radius_ft: f64,
        min_ft: f64,
        max_ft: f64,
    },

    #[error("obstacle height must be finite and non-negative, got {0}")]
    InvalidObstacleHeight(f64),
}

/// Errors raised while evaluating a telemetry sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplianceError {
    /// Telemetry must arrive sorted by timestamp; the engine never sorts.
    #[error("telemetry out of order at index {index}: {current} is earlier than {previous}")]
    UnorderedTelemetry {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}
