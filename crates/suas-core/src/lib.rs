pub mod compliance;
pub mod containment;
pub mod error;
pub mod fly_zone;
pub mod models;
pub mod obstacle;
pub mod projection;
pub mod rules;
pub mod spatial;
pub mod telemetry;
pub mod units;

pub use compliance::{in_bounds, out_of_bounds, ComplianceResult, ComplianceTracker};
pub use containment::{RayCasting, RingTest, WindingNumber};
pub use error::{ComplianceError, GeoError};
pub use fly_zone::FlyZone;
pub use models::{GeodeticPosition, TelemetrySample};
pub use obstacle::StationaryObstacle;
pub use projection::{utm_zone, UtmProjection, UtmZone};
pub use rules::EvaluationRules;
pub use spatial::{distance_ft, haversine_km, horizontal_distance_ft};
