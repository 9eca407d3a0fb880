use super::QuadTreeItem;
use crate::{Bounds, Point};
use arrayvec::ArrayVec;
use std::mem;
use tracing::trace;

/// Split a leaf once it holds this many items...
pub const MAX_ELEMENTS: usize = 64;
/// ...unless it is this deep already.
pub const MAX_DEPTH: usize = 30;

// Searching pops one branch and pushes its 4 children, leaving at most 3 pending siblings per
// level above it.
const SEARCH_STACK_LEN: usize = 128;
const _: () = assert!(3 * MAX_DEPTH + 4 <= SEARCH_STACK_LEN);

pub(super) const TOP_RIGHT: usize = 0;
pub(super) const TOP_LEFT: usize = 1;
pub(super) const BOTTOM_RIGHT: usize = 2;
pub(super) const BOTTOM_LEFT: usize = 3;

type Children<T> = Box<[Node<T>; 4]>;

/// Nodes do not store their bounds, parents derive them while descending.
#[derive(Debug, Clone)]
pub enum Node<T> {
    Leaf(Vec<T>),
    /// Children in the order: top-right, top-left, bottom-right, bottom-left.
    Branch(Children<T>),
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node::Leaf(Vec::new())
    }
}

/// Which child `point` belongs to. Ties on the midpoint go bottom / left.
fn quadrant(bounds: &Bounds, point: &Point) -> (usize, Bounds) {
    let mid = bounds.midpoint();
    let top = point.y > mid.y;
    let right = point.x > mid.x;
    match (top, right) {
        (true, true) => (TOP_RIGHT, bounds.top_right()),
        (true, false) => (TOP_LEFT, bounds.top_left()),
        (false, true) => (BOTTOM_RIGHT, bounds.bottom_right()),
        (false, false) => (BOTTOM_LEFT, bounds.bottom_left()),
    }
}

fn child_bounds(bounds: &Bounds) -> [Bounds; 4] {
    [
        bounds.top_right(),
        bounds.top_left(),
        bounds.bottom_right(),
        bounds.bottom_left(),
    ]
}

impl<T: QuadTreeItem> Node<T> {
    /// Caller guarantees that `item` is within `bounds`.
    pub fn add(&mut self, item: T, bounds: &Bounds, depth: usize) {
        if self.should_split(depth) {
            self.split(bounds, depth);
        }

        match self {
            Node::Branch(children) => {
                let (q, child) = quadrant(bounds, &item.point());
                children[q].add(item, &child, depth + 1);
            }
            Node::Leaf(items) => items.push(item),
        }
    }

    fn should_split(&self, depth: usize) -> bool {
        match self {
            Node::Leaf(items) => items.len() >= MAX_ELEMENTS && depth < MAX_DEPTH,
            Node::Branch(_) => false,
        }
    }

    fn split(&mut self, bounds: &Bounds, depth: usize) {
        let children = Box::new([
            Node::default(),
            Node::default(),
            Node::default(),
            Node::default(),
        ]);
        let items = match mem::replace(self, Node::Branch(children)) {
            Node::Leaf(items) => items,
            Node::Branch(_) => unreachable!("split called on a branch"),
        };
        trace!(depth, items = items.len(), "splitting quadtree node");

        for item in items {
            self.add(item, bounds, depth);
        }
    }

    /// Descend the same path `add` would take and remove the first equal item.
    pub fn remove(&mut self, item: &T, bounds: &Bounds) -> bool
    where
        T: PartialEq,
    {
        match self {
            Node::Branch(children) => {
                let (q, child) = quadrant(bounds, &item.point());
                children[q].remove(item, &child)
            }
            Node::Leaf(items) => match items.iter().position(|i| i == item) {
                Some(ind) => {
                    items.remove(ind);
                    true
                }
                None => false,
            },
        }
    }

    /// Visits children top-right, top-left, bottom-right, bottom-left and leaf items in list
    /// order, so the output order is stable for a given tree.
    pub fn search<'a>(&'a self, own_bounds: &Bounds, search_bounds: &Bounds, out: &mut Vec<&'a T>) {
        let mut stack = ArrayVec::<[(&'a Node<T>, Bounds); SEARCH_STACK_LEN]>::new();
        stack.push((self, *own_bounds));

        while let Some((node, bounds)) = stack.pop() {
            match node {
                Node::Branch(children) => {
                    let bounds = child_bounds(&bounds);
                    // reversed, so that the top-right child is popped first
                    for q in (0..4).rev() {
                        if bounds[q].intersects(search_bounds) {
                            stack.push((&children[q], bounds[q]));
                        }
                    }
                }
                Node::Leaf(items) => {
                    out.extend(items.iter().filter(|i| search_bounds.contains(&i.point())));
                }
            }
        }
    }
}

impl<T> Node<T> {
    /// Depth of the deepest leaf, 0 for a lone leaf.
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Branch(children) => 1 + children.iter().map(Node::height).max().unwrap_or(0),
        }
    }
}
