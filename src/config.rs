//! Clustering configuration.

use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables shared by the clustering algorithms. Distances are in screen points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterConfig {
    /// Radius of the neighborhood a distance based cluster absorbs.
    #[cfg_attr(feature = "serde", serde(default = "default_cluster_distance_points"))]
    pub cluster_distance_points: u32,
    /// Side of a grid cell of the grid based algorithm.
    #[cfg_attr(feature = "serde", serde(default = "default_grid_cell_size_points"))]
    pub grid_cell_size_points: f64,
    /// Number of clusters the simple algorithm deals items into.
    #[cfg_attr(feature = "serde", serde(default = "default_simple_cluster_count"))]
    pub simple_cluster_count: usize,
}

fn default_cluster_distance_points() -> u32 {
    100
}

fn default_grid_cell_size_points() -> f64 {
    100.0
}

fn default_simple_cluster_count() -> usize {
    10
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_distance_points: default_cluster_distance_points(),
            grid_cell_size_points: default_grid_cell_size_points(),
            simple_cluster_count: default_simple_cluster_count(),
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.cluster_distance_points == 0 {
            return Err(Error::InvalidConfig {
                field: "cluster_distance_points",
                reason: "must be positive",
            });
        }
        if !(self.grid_cell_size_points.is_finite() && self.grid_cell_size_points > 0.0) {
            return Err(Error::InvalidConfig {
                field: "grid_cell_size_points",
                reason: "must be positive and finite",
            });
        }
        if self.simple_cluster_count == 0 {
            return Err(Error::InvalidConfig {
                field: "simple_cluster_count",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
