//! Grid based clustering: the plane is cut into square cells of a fixed on-screen size and
//! every occupied cell becomes one cluster, positioned at the cell center.
//!
//! The center is the geometric one, `(col + 0.5) * 2 / n - 1`, not a `n - 1` spacing that
//! would push the last cells off the plane. Coordinates on the far edge clamp into the last
//! cell, so every item is in exactly one cluster, and clusters come out in (row, col) order.

use super::store::ItemStore;
use super::{Cluster, ClusterAlgorithm, ClusterItem, ItemId};
use crate::projection::{Mercator, Projection};
use crate::{ClusterConfig, Error, Point};
use std::collections::BTreeMap;
use tracing::debug;

/// Size of a map tile at zoom 0, in screen points.
const TILE_SIZE_POINTS: f64 = 256.0;

#[derive(Debug, Clone)]
pub struct GridBasedAlgorithm<T, P = Mercator> {
    items: ItemStore<(Point, T)>,
    grid_cell_size_points: f64,
    projection: P,
}

impl<T: ClusterItem> Default for GridBasedAlgorithm<T, Mercator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ClusterItem> GridBasedAlgorithm<T, Mercator> {
    pub fn new() -> Self {
        Self {
            items: ItemStore::default(),
            grid_cell_size_points: ClusterConfig::default().grid_cell_size_points,
            projection: Mercator,
        }
    }

    pub fn with_config(config: &ClusterConfig) -> Result<Self, Error> {
        Self::with_projection(config, Mercator)
    }
}

impl<T: ClusterItem, P: Projection> GridBasedAlgorithm<T, P> {
    pub fn with_projection(config: &ClusterConfig, projection: P) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            items: ItemStore::default(),
            grid_cell_size_points: config.grid_cell_size_points,
            projection,
        })
    }

    /// Number of cells along each axis at `zoom`, at least 1.
    pub fn cells_per_axis(&self, zoom: f32) -> u64 {
        let cells = (TILE_SIZE_POINTS * 2f64.powf(f64::from(zoom)) / self.grid_cell_size_points).ceil();
        // saturating float to int cast
        (cells as u64).max(1)
    }

    fn cell_center(&self, num_cells: u64, col: u64, row: u64) -> Point {
        let n = num_cells as f64;
        Point::new(
            (col as f64 + 0.5) * 2.0 / n - 1.0,
            (row as f64 + 0.5) * 2.0 / n - 1.0,
        )
    }
}

/// Column (or row) of the cell holding coordinate `v`, clamped to the grid.
fn cell_coord(num_cells: u64, v: f64) -> u64 {
    let n = num_cells as f64;
    let c = (n * (1.0 + v) / 2.0).floor();
    // NaN falls to the first cell
    c.max(0.0).min(n - 1.0) as u64
}

impl<T: ClusterItem, P: Projection> ClusterAlgorithm<T> for GridBasedAlgorithm<T, P> {
    fn add_item(&mut self, item: T) -> ItemId {
        let point = self.projection.project(item.position());
        self.items.push((point, item))
    }

    fn remove_item(&mut self, id: ItemId) -> Option<T> {
        self.items.remove(id).map(|(_, item)| item)
    }

    fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Clusters come out ordered by row, then column.
    fn clusters(&self, zoom: f32) -> Vec<Cluster> {
        let num_cells = self.cells_per_axis(zoom);
        let mut cells: BTreeMap<(u64, u64), Cluster> = BTreeMap::new();

        for (id, (point, _)) in self.items.iter() {
            let col = cell_coord(num_cells, point.x);
            let row = cell_coord(num_cells, point.y);
            cells
                .entry((row, col))
                .or_insert_with(|| {
                    let center = self.cell_center(num_cells, col, row);
                    Cluster::new(self.projection.unproject(center))
                })
                .add_item(id);
        }

        debug!(
            zoom,
            num_cells,
            items = self.items.len(),
            clusters = cells.len(),
            "computed grid based clusters"
        );
        cells.into_iter().map(|(_, cluster)| cluster).collect()
    }

    fn item(&self, id: ItemId) -> Option<&T> {
        self.items.get(id).map(|(_, item)| item)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
