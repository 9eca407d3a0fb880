//! Point clustering on top of the quadtree.
//!
//! Algorithms own their items. Every insertion mints a fresh [`ItemId`] and clusters refer to
//! members through those ids, so two items with the same position (or the same value added
//! twice) are always distinct entries.
//!
//! Clusters are rebuilt from scratch on every `clusters` call and handed to the caller.
mod distance;
mod grid;
mod simple;
mod store;

pub use distance::DistanceBasedAlgorithm;
pub use grid::GridBasedAlgorithm;
pub use simple::SimpleAlgorithm;

use crate::LatLng;
use std::rc::Rc;
use std::sync::Arc;

/// Anything with a geographic position that can be clustered.
pub trait ClusterItem {
    fn position(&self) -> LatLng;

    fn title(&self) -> Option<&str> {
        None
    }

    fn snippet(&self) -> Option<&str> {
        None
    }
}

impl ClusterItem for LatLng {
    fn position(&self) -> LatLng {
        *self
    }
}

macro_rules! impl_cluster_item_ptr {
    ($($ptr: ty),*) => {
        $(
            impl<T: ClusterItem + ?Sized> ClusterItem for $ptr {
                fn position(&self) -> LatLng {
                    (**self).position()
                }

                fn title(&self) -> Option<&str> {
                    (**self).title()
                }

                fn snippet(&self) -> Option<&str> {
                    (**self).snippet()
                }
            }
        )*
    };
}

impl_cluster_item_ptr!(&T, Box<T>, Rc<T>, Arc<T>);

/// Handle of an item inside an algorithm. Never reused by the algorithm that minted it.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A group of items rendered at one position.
///
/// The position is fixed at creation, it is never moved to the centroid of the members.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    position: LatLng,
    items: Vec<ItemId>,
}

impl Cluster {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            items: Vec::new(),
        }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Members in the order they were added.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add_item(&mut self, id: ItemId) {
        self.items.push(id);
    }

    /// Remove the first occurence of `id`. Removing a non-member is a no-op.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        match self.items.iter().position(|i| *i == id) {
            Some(ind) => {
                self.items.remove(ind);
                true
            }
            None => false,
        }
    }
}

/// Common interface of the clustering algorithms, so the rendering side can swap them.
///
/// Implementations are not synchronized; callers serialize access. `clusters` only needs
/// shared access and keeps no state between calls.
pub trait ClusterAlgorithm<T: ClusterItem> {
    fn add_item(&mut self, item: T) -> ItemId;

    /// Append items in order, return their ids in the same order.
    fn add_items(&mut self, items: Vec<T>) -> Vec<ItemId> {
        items.into_iter().map(|item| self.add_item(item)).collect()
    }

    /// Remove the item and hand it back, `None` if the id is unknown.
    fn remove_item(&mut self, id: ItemId) -> Option<T>;

    fn clear_items(&mut self);

    /// Group the current items for the given zoom level.
    fn clusters(&self, zoom: f32) -> Vec<Cluster>;

    fn item(&self, id: ItemId) -> Option<&T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
