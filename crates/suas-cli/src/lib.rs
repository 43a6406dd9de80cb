//! SUAS CLI - Command line evaluation of recorded UAS flights.
//!
//! This crate provides the `suas-eval` binary:
//! - evaluate: fly zone compliance and obstacle collisions for a mission file
//! - distance: horizontal and 3D distance between two positions
//! - utm: UTM zone and coordinates of a position

pub mod config;
pub mod mission;

pub use config::Config;
pub use mission::{evaluate_mission, load_mission, FlightReport, MissionFile, ObstacleReport};
