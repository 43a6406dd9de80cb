//! Fly zone compliance: zone union and the debounced out-of-bounds sweep.
//!
//! A position is in bounds when at least one zone contains it. The sweep
//! turns per-sample readings into a violation count and time spent out of
//! bounds, with recovery debounced so a track that straddles a boundary
//! counts as one excursion.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

use crate::containment::{RayCasting, RingTest};
use crate::error::ComplianceError;
use crate::fly_zone::FlyZone;
use crate::models::{GeodeticPosition, TelemetrySample};
use crate::rules::{duration_to_secs, EvaluationRules};

/// Outcome of one out-of-bounds evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    /// Number of debounced boundary violations
    pub violations: u32,
    /// Total time spent out of bounds
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub out_of_bounds_time: Duration,
}

impl ComplianceResult {
    pub fn out_of_bounds_secs(&self) -> f64 {
        duration_to_secs(self.out_of_bounds_time)
    }
}

impl Default for ComplianceResult {
    fn default() -> Self {
        Self {
            violations: 0,
            out_of_bounds_time: Duration::zero(),
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration_to_secs(*duration))
}

/// Sweep state. Recovery is measured from `onset`, the first out-of-bounds
/// reading of the current excursion, not from the latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundsState {
    InBounds,
    OutOfBounds { onset: DateTime<Utc> },
}

impl BoundsState {
    fn is_out(&self) -> bool {
        matches!(self, BoundsState::OutOfBounds { .. })
    }
}

/// Evaluates telemetry against a set of fly zones.
#[derive(Debug, Clone)]
pub struct ComplianceTracker<R = RayCasting> {
    debounce: Duration,
    ring_test: R,
}

impl Default for ComplianceTracker<RayCasting> {
    fn default() -> Self {
        Self::new(&EvaluationRules::default())
    }
}

impl ComplianceTracker<RayCasting> {
    pub fn new(rules: &EvaluationRules) -> Self {
        Self::with_ring_test(rules, RayCasting)
    }
}

impl<R: RingTest> ComplianceTracker<R> {
    /// Tracker using a specific ring containment backend.
    pub fn with_ring_test(rules: &EvaluationRules, ring_test: R) -> Self {
        Self {
            debounce: rules.out_of_bounds_debounce(),
            ring_test,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Whether any zone contains the position.
    pub fn in_bounds(&self, zones: &[FlyZone], pos: &GeodeticPosition) -> bool {
        zones
            .iter()
            .any(|zone| zone.contains_with(&self.ring_test, pos))
    }

    /// Per-sample out-of-bounds readings, indexed like `samples`.
    ///
    /// Zones are evaluated in turn, each only over samples no earlier zone
    /// has claimed. Candidates are tracked by their original index so a
    /// shrinking candidate list never shifts which sample a result belongs to.
    pub fn out_of_bounds_readings(&self, zones: &[FlyZone], samples: &[TelemetrySample]) -> Vec<bool> {
        let mut remaining: Vec<usize> = (0..samples.len()).collect();

        for (zone_idx, zone) in zones.iter().enumerate() {
            if remaining.is_empty() {
                break;
            }
            let satisfied = zone.contains_batch_with(
                &self.ring_test,
                remaining.iter().map(|&idx| samples[idx].position()),
            );
            remaining = remaining
                .into_iter()
                .zip(satisfied)
                .filter_map(|(idx, inside)| (!inside).then_some(idx))
                .collect();
            tracing::trace!(zone = zone_idx, remaining = remaining.len(), "fly zone evaluated");
        }

        let mut readings = vec![false; samples.len()];
        for idx in remaining {
            readings[idx] = true;
        }
        readings
    }

    /// Count violations and total time out of bounds.
    ///
    /// `samples` must be sorted by timestamp (equal timestamps allowed); a
    /// decreasing timestamp is rejected rather than sorted.
    pub fn out_of_bounds(
        &self,
        zones: &[FlyZone],
        samples: &[TelemetrySample],
    ) -> Result<ComplianceResult, ComplianceError> {
        check_ordering(samples)?;
        if samples.is_empty() {
            return Ok(ComplianceResult::default());
        }

        let readings = self.out_of_bounds_readings(zones, samples);

        let mut state = BoundsState::InBounds;
        let mut violations = 0u32;
        let mut out_of_bounds_time = Duration::zero();

        for (idx, (sample, &reading_out)) in samples.iter().zip(&readings).enumerate() {
            let timestamp = sample.timestamp();
            let was_out = state.is_out();

            state = match state {
                BoundsState::InBounds if reading_out => {
                    violations += 1;
                    tracing::debug!(index = idx, %timestamp, violations, "fly zone violation");
                    BoundsState::OutOfBounds { onset: timestamp }
                }
                BoundsState::OutOfBounds { onset }
                    if !reading_out && timestamp - onset >= self.debounce =>
                {
                    tracing::debug!(index = idx, %timestamp, %onset, "back in bounds");
                    BoundsState::InBounds
                }
                unchanged => unchanged,
            };

            // The gap ending at this sample counts if the UAS was out of
            // bounds at either end of it.
            if idx > 0 && (was_out || state.is_out()) {
                out_of_bounds_time = out_of_bounds_time + (timestamp - samples[idx - 1].timestamp());
            }
        }

        Ok(ComplianceResult {
            violations,
            out_of_bounds_time,
        })
    }
}

/// Whether any zone contains the position.
pub fn in_bounds(zones: &[FlyZone], pos: &GeodeticPosition) -> bool {
    ComplianceTracker::default().in_bounds(zones, pos)
}

/// Out-of-bounds evaluation with the default rules (10 s debounce).
pub fn out_of_bounds(
    zones: &[FlyZone],
    samples: &[TelemetrySample],
) -> Result<ComplianceResult, ComplianceError> {
    ComplianceTracker::default().out_of_bounds(zones, samples)
}

fn check_ordering(samples: &[TelemetrySample]) -> Result<(), ComplianceError> {
    for (idx, pair) in samples.windows(2).enumerate() {
        let (previous, current) = (pair[0].timestamp(), pair[1].timestamp());
        if current < previous {
            tracing::warn!(index = idx + 1, %previous, %current, "telemetry out of order");
            return Err(ComplianceError::UnorderedTelemetry {
                index: idx + 1,
                previous,
                current,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containment::WindingNumber;
    use chrono::TimeZone;

    fn pos(lat: f64, lon: f64, alt: f64) -> GeodeticPosition {
        GeodeticPosition::new(lat, lon, alt).unwrap()
    }

    fn square(lat0: f64, lon0: f64, size: f64) -> FlyZone {
        FlyZone::new(
            vec![
                pos(lat0, lon0, 0.0),
                pos(lat0, lon0 + size, 0.0),
                pos(lat0 + size, lon0 + size, 0.0),
                pos(lat0 + size, lon0, 0.0),
            ],
            0.0,
            1000.0,
        )
        .unwrap()
    }

    fn at(secs: f64, position: GeodeticPosition) -> TelemetrySample {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        TelemetrySample::new(position, base + crate::rules::secs_to_duration(secs))
    }

    fn inside() -> GeodeticPosition {
        pos(0.5, 0.5, 500.0)
    }

    fn outside() -> GeodeticPosition {
        pos(2.0, 2.0, 500.0)
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(out_of_bounds(&[], &[]).unwrap(), ComplianceResult::default());
        let empty_zone = FlyZone::new(Vec::new(), 0.0, 100.0).unwrap();
        assert_eq!(
            out_of_bounds(&[empty_zone], &[]).unwrap(),
            ComplianceResult::default()
        );
    }

    #[test]
    fn all_in_bounds() {
        let zones = [square(0.0, 0.0, 1.0)];
        let samples: Vec<_> = (0..5).map(|t| at(t as f64, inside())).collect();
        assert_eq!(out_of_bounds(&zones, &samples).unwrap(), ComplianceResult::default());
    }

    #[test]
    fn debounced_recovery() {
        let zones = [square(0.0, 0.0, 1.0)];
        let samples = vec![
            at(0.0, outside()),
            at(1.0, outside()),
            at(5.0, inside()),
            at(12.0, inside()),
        ];
        let result = out_of_bounds(&zones, &samples).unwrap();
        assert_eq!(result.violations, 1);
        assert_eq!(result.out_of_bounds_time, Duration::seconds(12));
    }

    #[test]
    fn flapping_counts_once() {
        let zones = [square(0.0, 0.0, 1.0)];
        let samples: Vec<_> = (0..9)
            .map(|t| at(t as f64, if t % 2 == 0 { outside() } else { inside() }))
            .collect();
        let result = out_of_bounds(&zones, &samples).unwrap();
        assert_eq!(result.violations, 1);
        assert_eq!(result.out_of_bounds_time, Duration::seconds(8));
    }

    #[test]
    fn separate_excursions_count_separately() {
        let zones = [square(0.0, 0.0, 1.0)];
        let samples = vec![
            at(0.0, inside()),
            at(1.0, outside()),
            at(11.0, inside()),
            at(20.0, inside()),
            at(21.0, outside()),
            at(40.0, inside()),
        ];
        let result = out_of_bounds(&zones, &samples).unwrap();
        assert_eq!(result.violations, 2);
        // 0->1 (entering), 1->11 (recovered), 20->21 (entering), 21->40 (recovered)
        assert_eq!(result.out_of_bounds_time, Duration::seconds(1 + 10 + 1 + 19));
    }

    #[test]
    fn recovery_clock_starts_at_onset() {
        let zones = [square(0.0, 0.0, 1.0)];
        let samples = vec![
            at(0.0, outside()),
            at(9.0, outside()),
            at(10.0, inside()),
        ];
        let result = out_of_bounds(&zones, &samples).unwrap();
        assert_eq!(result.violations, 1);
        assert_eq!(result.out_of_bounds_time, Duration::seconds(10));

        // A later in-bounds reading after an unconfirmed one still recovers.
        let samples = vec![
            at(0.0, outside()),
            at(3.0, inside()),
            at(4.0, outside()),
            at(10.5, inside()),
            at(11.0, inside()),
        ];
        let result = out_of_bounds(&zones, &samples).unwrap();
        assert_eq!(result.violations, 1);
        assert_eq!(result.out_of_bounds_time, Duration::milliseconds(10_500));
    }

    #[test]
    fn no_zones_means_always_out() {
        let samples = vec![at(0.0, inside()), at(3.0, inside()), at(7.5, inside())];
        let result = out_of_bounds(&[], &samples).unwrap();
        assert_eq!(result.violations, 1);
        assert_eq!(result.out_of_bounds_time, Duration::milliseconds(7500));

        let degenerate = FlyZone::new(vec![pos(0.0, 0.0, 0.0), pos(1.0, 1.0, 0.0)], 0.0, 1000.0).unwrap();
        let result = out_of_bounds(&[degenerate], &samples).unwrap();
        assert_eq!(result.violations, 1);
    }

    #[test]
    fn single_sample_out() {
        let result = out_of_bounds(&[square(0.0, 0.0, 1.0)], &[at(0.0, outside())]).unwrap();
        assert_eq!(result.violations, 1);
        assert_eq!(result.out_of_bounds_time, Duration::zero());
    }

    #[test]
    fn union_of_disjoint_zones() {
        let zones = [square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)];
        let in_b = pos(10.5, 10.5, 200.0);
        assert!(in_bounds(&zones, &inside()));
        assert!(in_bounds(&zones, &in_b));
        assert!(!in_bounds(&zones, &outside()));

        let samples = vec![
            at(0.0, inside()),
            at(1.0, in_b),
            at(2.0, outside()),
            at(3.0, in_b),
        ];
        let tracker = ComplianceTracker::default();
        assert_eq!(
            tracker.out_of_bounds_readings(&zones, &samples),
            vec![false, false, true, false]
        );
        // Reversed zone order changes only the work done.
        let reversed = [zones[1].clone(), zones[0].clone()];
        assert_eq!(
            tracker.out_of_bounds_readings(&reversed, &samples),
            vec![false, false, true, false]
        );
    }

    #[test]
    fn elimination_keeps_original_indices() {
        // First zone claims only the first sample, so later zones see a
        // shortened candidate list.
        let zones = [square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)];
        let samples = vec![
            at(0.0, inside()),
            at(1.0, outside()),
            at(2.0, pos(10.5, 10.5, 100.0)),
            at(3.0, outside()),
        ];
        let readings = ComplianceTracker::default().out_of_bounds_readings(&zones, &samples);
        assert_eq!(readings, vec![false, true, false, true]);
    }

    #[test]
    fn rejects_unordered_telemetry() {
        let zones = [square(0.0, 0.0, 1.0)];
        let samples = vec![at(0.0, inside()), at(5.0, inside()), at(4.0, inside())];
        let err = out_of_bounds(&zones, &samples).unwrap_err();
        assert!(matches!(err, ComplianceError::UnorderedTelemetry { index: 2, .. }));
    }

    #[test]
    fn equal_timestamps_are_ordered() {
        let zones = [square(0.0, 0.0, 1.0)];
        let samples = vec![at(0.0, inside()), at(0.0, outside()), at(0.0, inside())];
        let result = out_of_bounds(&zones, &samples).unwrap();
        assert_eq!(result.violations, 1);
        assert_eq!(result.out_of_bounds_time, Duration::zero());
    }

    #[test]
    fn custom_debounce() {
        let rules = EvaluationRules {
            out_of_bounds_debounce_secs: 2.0,
            ..EvaluationRules::default()
        };
        let tracker = ComplianceTracker::new(&rules);
        let zones = [square(0.0, 0.0, 1.0)];
        let samples = vec![
            at(0.0, outside()),
            at(2.0, inside()),
            at(3.0, outside()),
            at(6.0, inside()),
        ];
        let result = tracker.out_of_bounds(&zones, &samples).unwrap();
        assert_eq!(result.violations, 2);
        assert_eq!(result.out_of_bounds_time, Duration::seconds(6));
    }

    #[test]
    fn winding_backend_agrees() {
        let zones = [square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)];
        let samples = vec![
            at(0.0, outside()),
            at(1.0, outside()),
            at(5.0, inside()),
            at(12.0, inside()),
        ];
        let default = ComplianceTracker::default().out_of_bounds(&zones, &samples).unwrap();
        let winding = ComplianceTracker::with_ring_test(&EvaluationRules::default(), WindingNumber)
            .out_of_bounds(&zones, &samples)
            .unwrap();
        assert_eq!(default, winding);
    }

    #[test]
    fn serializes_duration_as_seconds() {
        let result = ComplianceResult {
            violations: 2,
            out_of_bounds_time: Duration::milliseconds(12_500),
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["violations"], 2);
        assert_eq!(json["duration_secs"], 12.5);
    }
}
