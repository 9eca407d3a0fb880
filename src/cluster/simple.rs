//! Deals items round-robin into a fixed number of clusters, ignoring positions and zoom.
//! Handy as a baseline and for exercising renderers.

use super::store::ItemStore;
use super::{Cluster, ClusterAlgorithm, ClusterItem, ItemId};
use crate::{ClusterConfig, Error};

#[derive(Debug, Clone)]
pub struct SimpleAlgorithm<T> {
    items: ItemStore<T>,
    cluster_count: usize,
}

impl<T: ClusterItem> Default for SimpleAlgorithm<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ClusterItem> SimpleAlgorithm<T> {
    pub fn new() -> Self {
        Self {
            items: ItemStore::default(),
            cluster_count: ClusterConfig::default().simple_cluster_count,
        }
    }

    pub fn with_config(config: &ClusterConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            items: ItemStore::default(),
            cluster_count: config.simple_cluster_count,
        })
    }
}

impl<T: ClusterItem> ClusterAlgorithm<T> for SimpleAlgorithm<T> {
    fn add_item(&mut self, item: T) -> ItemId {
        self.items.push(item)
    }

    fn remove_item(&mut self, id: ItemId) -> Option<T> {
        self.items.remove(id)
    }

    fn clear_items(&mut self) {
        self.items.clear();
    }

    /// The first `cluster_count` items seed the clusters, item `i` joins cluster
    /// `i % cluster_count`.
    ///
    /// Seeds are members of their own cluster. Dealing starts at item 0, not after the seeds,
    /// so every item is in exactly one cluster.
    fn clusters(&self, _zoom: f32) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = self
            .items
            .iter()
            .take(self.cluster_count)
            .map(|(_, item)| Cluster::new(item.position()))
            .collect();

        for (i, (id, _)) in self.items.iter().enumerate() {
            clusters[i % self.cluster_count].add_item(id);
        }
        clusters
    }

    fn item(&self, id: ItemId) -> Option<&T> {
        self.items.get(id)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
