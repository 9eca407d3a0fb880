//! Non-hierarchical distance based clustering.
//!
//! Items are visited in insertion order. Every item not yet claimed seeds a new cluster at its
//! own position and claims everything within a square of `cluster_distance_points` screen
//! points around it. An item already claimed only moves to the new cluster if it is at least
//! as close to the new seed as to its current one. Note the tie: equal distances move the
//! item, the later seed wins.
//!
//! A pass runs one bounded range query per seed, O(n log n) overall.

use super::store::ItemStore;
use super::{Cluster, ClusterAlgorithm, ClusterItem, ItemId};
use crate::projection::{Mercator, Projection, MAP_POINT_WIDTH};
use crate::quadtree::{QuadTree, QuadTreeItem};
use crate::{Bounds, ClusterConfig, Error, Point};
use std::collections::HashMap;
use tracing::debug;

/// Entry of the spatial index. Equality includes the id, so removal is by identity.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QuadItem {
    id: ItemId,
    point: Point,
}

impl QuadTreeItem for QuadItem {
    fn point(&self) -> Point {
        self.point
    }
}

#[derive(Debug, Clone)]
struct Projected<T> {
    point: Point,
    item: T,
}

#[derive(Debug, Clone, Copy)]
struct Assignment {
    cluster: usize,
    distance_sq: f64,
}

#[derive(Debug, Clone)]
pub struct DistanceBasedAlgorithm<T, P = Mercator> {
    items: ItemStore<Projected<T>>,
    tree: QuadTree<QuadItem>,
    cluster_distance_points: u32,
    projection: P,
}

impl<T: ClusterItem> Default for DistanceBasedAlgorithm<T, Mercator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ClusterItem> DistanceBasedAlgorithm<T, Mercator> {
    pub fn new() -> Self {
        Self::with_parts(ClusterConfig::default().cluster_distance_points, Mercator)
    }

    pub fn with_config(config: &ClusterConfig) -> Result<Self, Error> {
        Self::with_projection(config, Mercator)
    }
}

impl<T: ClusterItem, P: Projection> DistanceBasedAlgorithm<T, P> {
    pub fn with_projection(config: &ClusterConfig, projection: P) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::with_parts(config.cluster_distance_points, projection))
    }

    fn with_parts(cluster_distance_points: u32, projection: P) -> Self {
        Self {
            items: ItemStore::default(),
            tree: QuadTree::new(Bounds::UNIT),
            cluster_distance_points,
            projection,
        }
    }

    pub fn cluster_distance_points(&self) -> u32 {
        self.cluster_distance_points
    }

    /// Half side of the query square on the plane. Each zoom level halves it.
    pub fn radius(&self, zoom: f32) -> f64 {
        f64::from(self.cluster_distance_points) * MAP_POINT_WIDTH
            / 2f64.powf(f64::from(zoom) + 8.0)
    }

    fn compute_clusters(&self, zoom: f32) -> Vec<Cluster> {
        let radius = self.radius(zoom);
        let mut clusters: Vec<Cluster> = Vec::new();
        // an item is processed once it has an assignment
        let mut assignments: HashMap<ItemId, Assignment> = HashMap::with_capacity(self.items.len());
        let mut nearby = Vec::new();

        for (id, entry) in self.items.iter() {
            if assignments.contains_key(&id) {
                continue;
            }
            let index = clusters.len();
            let seed = entry.point;
            let mut cluster = Cluster::new(entry.item.position());

            nearby.clear();
            self.tree.search_into(&Bounds::around(seed, radius), &mut nearby);

            for quad in nearby.iter() {
                let distance_sq = seed.dist_sq(&quad.point);
                if let Some(existing) = assignments.get(&quad.id) {
                    if existing.distance_sq < distance_sq {
                        continue;
                    }
                    clusters[existing.cluster].remove_item(quad.id);
                }
                assignments.insert(
                    quad.id,
                    Assignment {
                        cluster: index,
                        distance_sq,
                    },
                );
                cluster.add_item(quad.id);
            }

            // seeds off the plane are not indexed, their query can't find them
            if !assignments.contains_key(&id) {
                assignments.insert(
                    id,
                    Assignment {
                        cluster: index,
                        distance_sq: 0.0,
                    },
                );
                cluster.add_item(id);
            }

            clusters.push(cluster);
        }

        debug_assert_eq!(
            assignments.len(),
            self.items.len(),
            "every item is assigned to exactly one cluster"
        );
        debug_assert_eq!(
            clusters.iter().map(Cluster::count).sum::<usize>(),
            self.items.len()
        );
        debug!(
            zoom,
            radius,
            items = self.items.len(),
            clusters = clusters.len(),
            "computed distance based clusters"
        );
        clusters
    }
}

#[cfg(feature = "parallel")]
impl<T, P> DistanceBasedAlgorithm<T, P>
where
    T: ClusterItem + Sync,
    P: Projection + Sync,
{
    /// Independent passes for several zoom levels, computed in parallel. Same result as
    /// calling `clusters` for each zoom in turn.
    pub fn clusters_at_zooms(&self, zooms: &[f32]) -> Vec<Vec<Cluster>> {
        use rayon::prelude::*;

        zooms
            .par_iter()
            .map(|&zoom| self.compute_clusters(zoom))
            .collect()
    }
}

impl<T: ClusterItem, P: Projection> ClusterAlgorithm<T> for DistanceBasedAlgorithm<T, P> {
    fn add_item(&mut self, item: T) -> ItemId {
        let point = self.projection.project(item.position());
        let id = self.items.push(Projected { point, item });
        if !self.tree.add(QuadItem { id, point }) {
            debug!(?id, x = point.x, y = point.y, "item is off the plane, not indexed");
        }
        id
    }

    fn remove_item(&mut self, id: ItemId) -> Option<T> {
        let Projected { point, item } = self.items.remove(id)?;
        self.tree.remove(&QuadItem { id, point });
        Some(item)
    }

    fn clear_items(&mut self) {
        self.items.clear();
        self.tree.clear();
    }

    fn clusters(&self, zoom: f32) -> Vec<Cluster> {
        self.compute_clusters(zoom)
    }

    fn item(&self, id: ItemId) -> Option<&T> {
        self.items.get(id).map(|e| &e.item)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
