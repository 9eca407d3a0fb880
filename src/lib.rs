//! Point Quadtree and distance based point clustering.
//! # Contracts:
//! - Points live on a projected plane, canonically `[-1, 1] x [-1, 1]`
//! - Bounds are inclusive on all four edges
//! - None of the containers are synchronized, callers serialize access
//!
pub mod cluster;
pub mod config;
pub mod error;
pub mod projection;
pub mod quadtree;

pub use cluster::{
    Cluster, ClusterAlgorithm, ClusterItem, DistanceBasedAlgorithm, GridBasedAlgorithm, ItemId,
    SimpleAlgorithm,
};
pub use config::ClusterConfig;
pub use error::Error;
pub use projection::{LatLng, Mercator, Projection};
pub use quadtree::{QuadTree, QuadTreeItem};

use std::ops::{Add, AddAssign, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl AddAssign for Point {
    fn add_assign(&mut self, p: Self) {
        self.x += p.x;
        self.y += p.y;
    }
}

impl Add for Point {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance.
    pub fn dist_sq(&self, rhs: &Self) -> f64 {
        let d = *self - *rhs;
        d.x * d.x + d.y * d.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis aligned rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNIT
    }
}

impl Bounds {
    /// The projected plane every geographic position maps into.
    pub const UNIT: Bounds = Bounds {
        min_x: -1.0,
        min_y: -1.0,
        max_x: 1.0,
        max_y: 1.0,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        debug_assert!(min_x <= max_x, "{} > {}", min_x, max_x);
        debug_assert!(min_y <= max_y, "{} > {}", min_y, max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Checked constructor, rejects inverted or non-finite rectangles.
    pub fn try_new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, Error> {
        let bounds = Self {
            min_x,
            min_y,
            max_x,
            max_y,
        };
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(bounds)
    }

    /// Finite corners, min not above max. Only valid bounds can be subdivided.
    pub fn is_valid(&self) -> bool {
        Point::new(self.min_x, self.min_y).is_finite()
            && Point::new(self.max_x, self.max_y).is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    /// Square of half-width `radius` centered on `center`.
    pub fn around(center: Point, radius: f64) -> Self {
        Self {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
        }
    }

    /// Return wether point is within the bounds, edges included.
    /// NaN coordinates are never contained.
    pub fn contains(&self, point: &Point) -> bool {
        point.x <= self.max_x
            && point.x >= self.min_x
            && point.y <= self.max_y
            && point.y >= self.min_y
    }

    /// Non-strict overlap test, touching edges count as intersecting.
    pub fn intersects(&self, other: &Bounds) -> bool {
        if self.max_y < other.min_y || other.max_y < self.min_y {
            return false;
        }
        if self.max_x < other.min_x || other.max_x < self.min_x {
            return false;
        }
        true
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn top_right(&self) -> Self {
        let mid = self.midpoint();
        Self::new(mid.x, mid.y, self.max_x, self.max_y)
    }

    pub fn top_left(&self) -> Self {
        let mid = self.midpoint();
        Self::new(self.min_x, mid.y, mid.x, self.max_y)
    }

    pub fn bottom_right(&self) -> Self {
        let mid = self.midpoint();
        Self::new(mid.x, self.min_y, self.max_x, mid.y)
    }

    pub fn bottom_left(&self) -> Self {
        let mid = self.midpoint();
        Self::new(self.min_x, self.min_y, mid.x, mid.y)
    }
}
