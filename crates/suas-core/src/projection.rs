//! UTM zone selection and a transverse Mercator projector (WGS84).
//!
//! Containment does not use this; it exists for consumers that need local
//! metric coordinates, e.g. drawing an obstacle cylinder as a ring of
//! geodetic points.

use serde::{Deserialize, Serialize};

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const UTM_SCALE: f64 = 0.9996;
const FALSE_EASTING_M: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH_M: f64 = 10_000_000.0;

/// A 6°-wide UTM zone plus hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtmZone {
    pub number: u8,
    pub north: bool,
}

impl UtmZone {
    /// Longitude of the zone's central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.number) * 6.0 - 183.0
    }
}

/// Select the UTM zone for a position, including the Norway and Svalbard
/// exceptions. The equator itself counts as southern hemisphere.
pub fn utm_zone(lat: f64, lon: f64) -> UtmZone {
    let mut number = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60);

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        number = 32;
    }
    if (72.0..84.0).contains(&lat) {
        if (0.0..9.0).contains(&lon) {
            number = 31;
        } else if (9.0..21.0).contains(&lon) {
            number = 33;
        } else if (21.0..33.0).contains(&lon) {
            number = 35;
        } else if (33.0..42.0).contains(&lon) {
            number = 37;
        }
    }

    UtmZone {
        number: number as u8,
        north: lat > 0.0,
    }
}

/// Krüger series coefficients, 4th order in the third flattening.
#[derive(Debug, Clone, Copy)]
struct KruegerSeries {
    /// Rectifying radius scaled by k0
    k0_a: f64,
    eccentricity: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 4],
}

impl KruegerSeries {
    fn wgs84() -> Self {
        let n = WGS84_F / (2.0 - WGS84_F);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let rectifying_radius = WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        Self {
            k0_a: UTM_SCALE * rectifying_radius,
            eccentricity: 2.0 * n.sqrt() / (1.0 + n),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
                61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
                49561.0 * n4 / 161_280.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
                n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
                17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
                4397.0 * n4 / 161_280.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
                56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
                4279.0 * n4 / 630.0,
            ],
        }
    }
}

/// Bidirectional projector between degrees and UTM meters for one zone.
#[derive(Debug, Clone, Copy)]
pub struct UtmProjection {
    zone: UtmZone,
    series: KruegerSeries,
}

impl UtmProjection {
    pub fn new(zone: UtmZone) -> Self {
        Self {
            zone,
            series: KruegerSeries::wgs84(),
        }
    }

    /// Projector for the zone containing the given position.
    pub fn for_position(lat: f64, lon: f64) -> Self {
        Self::new(utm_zone(lat, lon))
    }

    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    fn false_northing(&self) -> f64 {
        if self.zone.north {
            0.0
        } else {
            FALSE_NORTHING_SOUTH_M
        }
    }

    /// Project degrees to `(easting_m, northing_m)`.
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let s = &self.series;
        let phi = lat.to_radians();
        let dlambda = (lon - self.zone.central_meridian()).to_radians();

        let e = s.eccentricity;
        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - e * (e * sin_phi).atanh()).sinh();

        let xi_p = t.atan2(dlambda.cos());
        let eta_p = (dlambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in s.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let easting = FALSE_EASTING_M + s.k0_a * eta;
        let northing = self.false_northing() + s.k0_a * xi;
        (easting, northing)
    }

    /// Unproject `(easting_m, northing_m)` to `(lat, lon)` degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let s = &self.series;
        let xi = (northing - self.false_northing()) / s.k0_a;
        let eta = (easting - FALSE_EASTING_M) / s.k0_a;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in s.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).clamp(-1.0, 1.0).asin();
        let mut phi = chi;
        for (j, delta) in s.delta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            phi += delta * (k * chi).sin();
        }

        let lambda = eta_p.sinh().atan2(xi_p.cos());
        (phi.to_degrees(), self.zone.central_meridian() + lambda.to_degrees())
    }
}
