//! CLI configuration from environment.

use std::env;

use suas_core::EvaluationRules;

#[derive(Debug, Clone)]
pub struct Config {
    pub rules: EvaluationRules,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing or unparsable values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EvaluationRules::default();
        let secs = |key: &str, default: f64| {
            lookup(key)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(default)
        };

        Self {
            rules: EvaluationRules {
                out_of_bounds_debounce_secs: secs(
                    "SUAS_DEBOUNCE_SECS",
                    defaults.out_of_bounds_debounce_secs,
                ),
                bad_telemetry_threshold_deg: secs(
                    "SUAS_BAD_TELEMETRY_DEG",
                    defaults.bad_telemetry_threshold_deg,
                ),
                interpolation_step_secs: secs(
                    "SUAS_INTERP_STEP_SECS",
                    defaults.interpolation_step_secs,
                ),
                interpolation_max_gap_secs: secs(
                    "SUAS_INTERP_MAX_GAP_SECS",
                    defaults.interpolation_max_gap_secs,
                ),
            },
            log_json: lookup("SUAS_LOG_JSON")
                .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}
