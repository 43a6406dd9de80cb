//! Evaluate recorded UAS flights against fly zones and stationary obstacles.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use suas_cli::{evaluate_mission, load_mission, Config};
use suas_core::{GeodeticPosition, UtmProjection};

/// Fly zone compliance and obstacle collision checks for UAS telemetry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a mission file and print a JSON flight report
    Evaluate {
        /// Mission JSON with fly_zones, stationary_obstacles and telemetry
        mission: PathBuf,

        /// Skip dropping null-island and duplicate telemetry
        #[arg(long)]
        raw: bool,

        /// Override the out-of-bounds debounce (seconds)
        #[arg(long)]
        debounce_secs: Option<f64>,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Distance in feet between two positions
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        /// Altitude in feet MSL
        #[arg(allow_negative_numbers = true)]
        alt1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
        /// Altitude in feet MSL
        #[arg(allow_negative_numbers = true)]
        alt2: f64,
    },

    /// UTM zone, easting and northing of a position
    Utm {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();

    // Logs go to stderr so stdout stays machine-readable
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("suas_cli=debug".parse()?);
    if config.log_json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    match cli.command {
        Commands::Evaluate {
            mission,
            raw,
            debounce_secs,
            pretty,
        } => {
            if let Some(secs) = debounce_secs {
                anyhow::ensure!(
                    secs.is_finite() && secs >= 0.0,
                    "Debounce must be a non-negative number of seconds, got {}",
                    secs
                );
                config.rules.out_of_bounds_debounce_secs = secs;
            }

            tracing::debug!(path = %mission.display(), rules = ?config.rules, "Evaluating mission");
            let mission = load_mission(&mission)?;
            let report = evaluate_mission(&mission, &config.rules, !raw)?;

            let out = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", out);
        }

        Commands::Distance {
            lat1,
            lon1,
            alt1,
            lat2,
            lon2,
            alt2,
        } => {
            let a = GeodeticPosition::new(lat1, lon1, alt1)?;
            let b = GeodeticPosition::new(lat2, lon2, alt2)?;
            let report = serde_json::json!({
                "horizontal_ft": a.horizontal_distance_to(&b),
                "distance_ft": a.distance_to(&b),
            });
            println!("{}", report);
        }

        Commands::Utm { lat, lon } => {
            let pos = GeodeticPosition::ground(lat, lon)?;
            let projection = UtmProjection::for_position(pos.latitude(), pos.longitude());
            let zone = projection.zone();
            let (easting, northing) = projection.forward(pos.latitude(), pos.longitude());
            let report = serde_json::json!({
                "zone": zone.number,
                "north": zone.north,
                "easting_m": easting,
                "northing_m": northing,
            });
            println!("{}", report);
        }
    }

    Ok(())
}
