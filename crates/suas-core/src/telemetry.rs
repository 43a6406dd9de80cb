//! Telemetry hygiene: dedupe, noise filtering and interpolation.
//!
//! All functions take a time-ordered slice and preserve its order.

use chrono::{DateTime, Duration, Utc};

use crate::models::TelemetrySample;
use crate::rules::{duration_to_secs, EvaluationRules};

/// Drop each sample that repeats the previously kept one.
///
/// Duplicates are judged on position and heading only; see
/// [`TelemetrySample::duplicate`].
pub fn dedupe(samples: &[TelemetrySample]) -> Vec<TelemetrySample> {
    let mut kept: Vec<TelemetrySample> = Vec::with_capacity(samples.len());
    for sample in samples {
        match kept.last() {
            Some(prev) if prev.duplicate(sample) => {}
            _ => kept.push(*sample),
        }
    }
    kept
}

/// Drop samples near (0, 0), which are typically a GPS or autopilot
/// reporting no fix.
pub fn filter_bad(samples: &[TelemetrySample], threshold_deg: f64) -> Vec<TelemetrySample> {
    samples
        .iter()
        .filter(|sample| {
            let pos = sample.position();
            pos.latitude().abs().max(pos.longitude().abs()) > threshold_deg
        })
        .copied()
        .collect()
}

/// Filter noise then dedupe, using the thresholds in `rules`.
pub fn clean(samples: &[TelemetrySample], rules: &EvaluationRules) -> Vec<TelemetrySample> {
    let filtered = filter_bad(samples, rules.bad_telemetry_threshold_deg);
    let cleaned = dedupe(&filtered);
    if cleaned.len() != samples.len() {
        tracing::debug!(
            received = samples.len(),
            kept = cleaned.len(),
            "dropped noisy or duplicate telemetry"
        );
    }
    cleaned
}

/// Iterate the samples plus linear interpolations every `step` between
/// consecutive samples.
///
/// Gaps longer than `max_gap`, or non-positive gaps, are not filled.
/// Interpolated samples fall strictly between their neighbours.
pub fn interpolate(samples: &[TelemetrySample], step: Duration, max_gap: Duration) -> Interpolate<'_> {
    Interpolate {
        samples,
        step,
        max_gap,
        index: 0,
        cursor: None,
    }
}

/// [`interpolate`] with the step and gap from `rules`.
pub fn interpolate_with_rules<'a>(
    samples: &'a [TelemetrySample],
    rules: &EvaluationRules,
) -> Interpolate<'a> {
    interpolate(samples, rules.interpolation_step(), rules.interpolation_max_gap())
}

/// Iterator returned by [`interpolate`].
#[derive(Debug, Clone)]
pub struct Interpolate<'a> {
    samples: &'a [TelemetrySample],
    step: Duration,
    max_gap: Duration,
    /// Sample most recently yielded
    index: usize,
    /// Next interpolation time between `index` and `index + 1`
    cursor: Option<DateTime<Utc>>,
}

impl Interpolate<'_> {
    fn fills_gap(&self, from: &TelemetrySample, to: &TelemetrySample) -> bool {
        let gap = to.timestamp() - from.timestamp();
        self.step > Duration::zero() && gap > Duration::zero() && gap <= self.max_gap
    }
}

impl Iterator for Interpolate<'_> {
    type Item = TelemetrySample;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(t) = self.cursor {
            let prev = &self.samples[self.index];
            let next = &self.samples[self.index + 1];
            if t < next.timestamp() {
                self.cursor = Some(t + self.step);
                return Some(blend(prev, next, t));
            }
            self.cursor = None;
            self.index += 1;
        }

        let sample = *self.samples.get(self.index)?;
        match self.samples.get(self.index + 1) {
            Some(next) if self.fills_gap(&sample, next) => {
                self.cursor = Some(sample.timestamp() + self.step);
            }
            _ => self.index += 1,
        }
        Some(sample)
    }
}

fn blend(prev: &TelemetrySample, next: &TelemetrySample, t: DateTime<Utc>) -> TelemetrySample {
    let span = duration_to_secs(next.timestamp() - prev.timestamp());
    let ratio = duration_to_secs(t - prev.timestamp()) / span;

    let position = prev.position().lerp(next.position(), ratio);
    let sample = TelemetrySample::new(position, t);

    match (prev.heading(), next.heading()) {
        (Some(from), Some(to)) => sample
            .with_heading(blend_heading(from, to, ratio))
            .unwrap_or(sample),
        _ => sample,
    }
}

/// Interpolate along the shorter arc, e.g. 350° -> 10° passes through 0°.
fn blend_heading(from: f64, to: f64, ratio: f64) -> f64 {
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    (from + delta * ratio).rem_euclid(360.0)
}
