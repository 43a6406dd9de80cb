//! Length unit conversions. Altitudes and radii are carried in feet, the
//! projection works in meters and great-circle distances come out in km.

/// Exact international foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters / METERS_PER_FOOT
}

pub fn kilometers_to_feet(kilometers: f64) -> f64 {
    meters_to_feet(kilometers * 1000.0)
}

pub fn feet_to_kilometers(feet: f64) -> f64 {
    feet_to_meters(feet) / 1000.0
}
