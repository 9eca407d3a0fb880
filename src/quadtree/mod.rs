//! Point Quadtree.
//!
//! Leaves hold up to [`MAX_ELEMENTS`] items before they are split into four quadrants, down to
//! [`MAX_DEPTH`] levels. Once split a node never reverts to a leaf, removal only shrinks leaves.
//!
//! Items are matched by `PartialEq`. To get reference identity, as the clustering algorithms
//! do, give each entry a unique handle and compare on that.
//!
//! The tree is not synchronized. Mutation and queries need exclusive access, serialize them
//! outside.
mod node;
#[cfg(test)]
mod tests;

pub use node::{MAX_DEPTH, MAX_ELEMENTS};

use crate::{Bounds, Error, Point};
use node::Node;
use tracing::trace;

/// Anything with a position on the plane.
pub trait QuadTreeItem {
    fn point(&self) -> Point;
}

impl QuadTreeItem for Point {
    fn point(&self) -> Point {
        *self
    }
}

impl<T: QuadTreeItem + ?Sized> QuadTreeItem for &T {
    fn point(&self) -> Point {
        (**self).point()
    }
}

#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    bounds: Bounds,
    root: Node<T>,
    count: usize,
}

impl<T: QuadTreeItem> Default for QuadTree<T> {
    fn default() -> Self {
        Self::new(Bounds::UNIT)
    }
}

impl<T: QuadTreeItem> QuadTree<T> {
    /// `bounds` are fixed for the lifetime of the tree.
    ///
    /// # Panics
    /// If `bounds` are inverted or not finite, see [`Bounds::is_valid`].
    pub fn new(bounds: Bounds) -> Self {
        assert!(bounds.is_valid(), "invalid quadtree bounds {:?}", bounds);
        Self {
            bounds,
            root: Node::default(),
            count: 0,
        }
    }

    pub fn try_new(bounds: Bounds) -> Result<Self, Error> {
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds {
                min_x: bounds.min_x,
                min_y: bounds.min_y,
                max_x: bounds.max_x,
                max_y: bounds.max_y,
            });
        }
        Ok(Self::new(bounds))
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn clear(&mut self) {
        self.root = Node::default();
        self.count = 0;
    }

    /// Return if the insertion was successful. Items outside of the bounds are rejected.
    pub fn add(&mut self, item: T) -> bool {
        let point = item.point();
        if !self.bounds.contains(&point) {
            trace!(x = point.x, y = point.y, "rejected out of bounds item");
            return false;
        }
        self.root.add(item, &self.bounds, 0);
        self.count += 1;
        true
    }

    /// Insert every item, return how many were accepted.
    pub fn extend<It>(&mut self, it: It) -> usize
    where
        It: IntoIterator<Item = T>,
    {
        let mut added = 0;
        for item in it {
            if self.add(item) {
                added += 1;
            }
        }
        added
    }

    /// Remove the first item equal to `item`. Return wether one was found.
    pub fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        let point = item.point();
        if !self.bounds.contains(&point) {
            trace!(x = point.x, y = point.y, "ignored out of bounds removal");
            return false;
        }
        let removed = self.root.remove(item, &self.bounds);
        if removed {
            self.count -= 1;
        }
        removed
    }

    /// Items whose point lies within `bounds`, edges included.
    ///
    /// The order follows the tree layout: stable for the same tree, but not meaningful.
    pub fn search(&self, bounds: &Bounds) -> Vec<&T> {
        let mut res = Vec::new();
        self.search_into(bounds, &mut res);
        res
    }

    /// Same as `search` but appends to `out`, so the buffer can be reused between queries.
    pub fn search_into<'a>(&'a self, bounds: &Bounds, out: &mut Vec<&'a T>) {
        if !self.bounds.intersects(bounds) {
            return;
        }
        self.root.search(&self.bounds, bounds, out);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of levels below the root, 0 while the root is still a leaf.
    pub fn height(&self) -> usize {
        self.root.height()
    }
}
