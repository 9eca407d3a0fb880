//! Geographic positions and their projection onto the clustering plane.

use crate::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of the projected plane, `[-1, 1]` on both axes.
pub const MAP_POINT_WIDTH: f64 = 2.0;

/// Latitude where the square Mercator plane ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Maps positions onto the plane the index works in. Owned by the rendering side, injected
/// into the algorithms.
pub trait Projection {
    fn project(&self, position: LatLng) -> Point;
    fn unproject(&self, point: Point) -> LatLng;
}

/// Spherical Mercator scaled to `[-1, 1] x [-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mercator;

impl Projection for Mercator {
    fn project(&self, position: LatLng) -> Point {
        let lng = wrap_longitude(position.lng);
        let lat = position.lat.max(-MAX_LATITUDE).min(MAX_LATITUDE);
        let y = (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln() / PI;
        Point::new(lng / 180.0, y.max(-1.0).min(1.0))
    }

    fn unproject(&self, point: Point) -> LatLng {
        let lat = 2.0 * (point.y * PI).exp().atan() - FRAC_PI_2;
        LatLng::new(lat.to_degrees(), point.x * 180.0)
    }
}

/// Wrap into `[-180, 180]`. Exactly `180` is kept so the east edge stays reachable.
fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        return lng;
    }
    (lng + 180.0).rem_euclid(360.0) - 180.0
}
