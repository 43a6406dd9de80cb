//! Evaluation thresholds for fly zone and obstacle checks.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for telemetry evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationRules {
    /// Window in seconds within which a UAS cannot be counted out of bounds
    /// twice; measured from the violation onset.
    pub out_of_bounds_debounce_secs: f64,
    /// Positions with both |lat| and |lon| at or below this are GPS noise
    pub bad_telemetry_threshold_deg: f64,
    /// Interpolation step between consecutive telemetry (seconds)
    pub interpolation_step_secs: f64,
    /// Gaps longer than this are not interpolated (seconds)
    pub interpolation_max_gap_secs: f64,
}

impl Default for EvaluationRules {
    fn default() -> Self {
        Self {
            out_of_bounds_debounce_secs: 10.0,
            bad_telemetry_threshold_deg: 0.1,
            interpolation_step_secs: 0.1,
            interpolation_max_gap_secs: 5.0,
        }
    }
}

impl EvaluationRules {
    pub fn out_of_bounds_debounce(&self) -> Duration {
        secs_to_duration(self.out_of_bounds_debounce_secs)
    }

    pub fn interpolation_step(&self) -> Duration {
        secs_to_duration(self.interpolation_step_secs)
    }

    pub fn interpolation_max_gap(&self) -> Duration {
        secs_to_duration(self.interpolation_max_gap_secs)
    }
}

/// Fractional seconds to a duration, at microsecond resolution.
pub fn secs_to_duration(secs: f64) -> Duration {
    Duration::microseconds((secs * 1_000_000.0).round() as i64)
}

/// Duration to fractional seconds.
pub fn duration_to_secs(duration: Duration) -> f64 {
    match duration.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => duration.num_milliseconds() as f64 / 1000.0,
    }
}
