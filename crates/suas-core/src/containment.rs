//! Planar point-in-ring tests.
//!
//! Rings are boundary vertices in degrees, treated as plane coordinates
//! (x = longitude, y = latitude). The ring closes implicitly from the last
//! vertex back to the first; vertex altitude is ignored.

use crate::models::GeodeticPosition;

/// A 2D ring containment backend.
pub trait RingTest {
    /// Whether `(latitude, longitude)` lies inside the ring. Rings with
    /// fewer than 3 vertices contain nothing.
    fn ring_contains(&self, ring: &[GeodeticPosition], latitude: f64, longitude: f64) -> bool;
}

impl<T: RingTest + ?Sized> RingTest for &T {
    fn ring_contains(&self, ring: &[GeodeticPosition], latitude: f64, longitude: f64) -> bool {
        (**self).ring_contains(ring, latitude, longitude)
    }
}

/// Crossing-number (even-odd) test.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayCasting;

impl RingTest for RayCasting {
    fn ring_contains(&self, ring: &[GeodeticPosition], latitude: f64, longitude: f64) -> bool {
        let n = ring.len();
        if n < 3 {
            return false;
        }

        // Ray casting: count intersections with polygon edges
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let yi = ring[i].latitude();
            let xi = ring[i].longitude();
            let yj = ring[j].latitude();
            let xj = ring[j].longitude();

            if ((yi > latitude) != (yj > latitude))
                && (longitude < (xj - xi) * (latitude - yi) / (yj - yi) + xi)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

/// Non-zero winding number test.
///
/// Agrees with [`RayCasting`] for simple rings away from the boundary;
/// differs on self-intersecting rings, where overlapping lobes count as inside.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindingNumber;

impl RingTest for WindingNumber {
    fn ring_contains(&self, ring: &[GeodeticPosition], latitude: f64, longitude: f64) -> bool {
        let n = ring.len();
        if n < 3 {
            return false;
        }

        // > 0 when (x, y) is left of the directed edge a -> b
        let is_left = |a: &GeodeticPosition, b: &GeodeticPosition| {
            (b.longitude() - a.longitude()) * (latitude - a.latitude())
                - (longitude - a.longitude()) * (b.latitude() - a.latitude())
        };

        let mut winding = 0i32;
        for i in 0..n {
            let a = &ring[i];
            let b = &ring[(i + 1) % n];
            if a.latitude() <= latitude {
                if b.latitude() > latitude && is_left(a, b) > 0.0 {
                    winding += 1;
                }
            } else if b.latitude() <= latitude && is_left(a, b) < 0.0 {
                winding -= 1;
            }
        }

        winding != 0
    }
}
