//! Mission files and flight reports.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use suas_core::telemetry;
use suas_core::{
    ComplianceResult, ComplianceTracker, EvaluationRules, FlyZone, StationaryObstacle,
    TelemetrySample,
};

/// Everything needed to judge one flight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionFile {
    #[serde(default)]
    pub fly_zones: Vec<FlyZone>,
    #[serde(default)]
    pub stationary_obstacles: Vec<StationaryObstacle>,
    /// Time-ordered telemetry for the flight
    #[serde(default)]
    pub telemetry: Vec<TelemetrySample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleReport {
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub hit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightReport {
    pub telemetry_received: usize,
    pub telemetry_evaluated: usize,
    pub out_of_bounds: ComplianceResult,
    pub stationary_obstacles: Vec<ObstacleReport>,
}

pub fn load_mission(path: &Path) -> Result<MissionFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read mission file {}", path.display()))?;
    parse_mission(&text).with_context(|| format!("Invalid mission file {}", path.display()))
}

pub fn parse_mission(text: &str) -> Result<MissionFile> {
    serde_json::from_str(text).context("Failed to parse mission JSON")
}

/// Evaluate fly zone compliance and obstacle collisions.
///
/// With `clean` set, null-island and duplicate telemetry is dropped first.
pub fn evaluate_mission(
    mission: &MissionFile,
    rules: &EvaluationRules,
    clean: bool,
) -> Result<FlightReport> {
    let samples = if clean {
        telemetry::clean(&mission.telemetry, rules)
    } else {
        mission.telemetry.clone()
    };

    let out_of_bounds = ComplianceTracker::new(rules)
        .out_of_bounds(&mission.fly_zones, &samples)
        .context("Out-of-bounds evaluation failed")?;

    let stationary_obstacles = mission
        .stationary_obstacles
        .iter()
        .enumerate()
        .map(|(index, obstacle)| ObstacleReport {
            index,
            latitude: obstacle.center().latitude(),
            longitude: obstacle.center().longitude(),
            hit: obstacle.evaluate_collision(&samples, rules),
        })
        .collect::<Vec<_>>();

    tracing::info!(
        zones = mission.fly_zones.len(),
        samples = samples.len(),
        violations = out_of_bounds.violations,
        out_of_bounds_secs = out_of_bounds.out_of_bounds_secs(),
        obstacle_hits = stationary_obstacles.iter().filter(|o| o.hit).count(),
        "Mission evaluated"
    );

    Ok(FlightReport {
        telemetry_received: mission.telemetry.len(),
        telemetry_evaluated: samples.len(),
        out_of_bounds,
        stationary_obstacles,
    })
}
