use super::node::{BOTTOM_LEFT, TOP_RIGHT};
use super::*;
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Item {
    id: u32,
    pos: Point,
}

impl QuadTreeItem for Item {
    fn point(&self) -> Point {
        self.pos
    }
}

fn item(id: u32, x: f64, y: f64) -> Item {
    Item {
        id,
        pos: Point::new(x, y),
    }
}

fn get_rand() -> SmallRng {
    SmallRng::seed_from_u64(0xdeadbeef)
}

/// Random items strictly inside `bounds`, ids starting at `first_id`.
fn items_inside(rng: &mut impl Rng, bounds: &Bounds, first_id: u32, count: u32) -> Vec<Item> {
    let eps = 1e-9;
    (first_id..first_id + count)
        .map(|id| {
            item(
                id,
                rng.gen_range(bounds.min_x + eps, bounds.max_x - eps),
                rng.gen_range(bounds.min_y + eps, bounds.max_y - eps),
            )
        })
        .collect()
}

fn ids<'a>(items: impl IntoIterator<Item = &'a Item>) -> HashSet<u32> {
    items.into_iter().map(|i| i.id).collect()
}

#[test]
fn insertions() {
    let mut tree = QuadTree::default();

    assert!(tree.add(item(0, 0.5, 0.5)));
    assert_eq!(tree.count(), 1);
    assert!(!tree.is_empty());
}

#[test]
fn add_on_the_edge_is_accepted() {
    let mut tree = QuadTree::default();

    assert!(tree.add(item(0, 1.0, 1.0)));
    assert!(tree.add(item(1, -1.0, -1.0)));
    assert!(tree.add(item(2, -1.0, 1.0)));
    assert_eq!(tree.count(), 3);
}

#[test]
fn add_outside_item_ignored() {
    let mut tree = QuadTree::new(Bounds::new(-0.2, -0.2, 0.2, 0.2));

    assert!(!tree.add(item(0, 0.5, 0.5)));
    assert!(!tree.add(item(1, 0.0, -0.21)));
    assert!(!tree.add(item(2, f64::NAN, 0.0)));
    assert_eq!(tree.count(), 0);
}

#[test]
fn remove_added_item_removed() {
    let mut tree = QuadTree::default();
    let it = item(0, 0.5, 0.5);
    tree.add(it);

    assert!(tree.remove(&it));
    assert_eq!(tree.count(), 0);
    assert!(!tree.remove(&it), "removing twice must fail");
    assert_eq!(tree.count(), 0);
}

#[test]
fn remove_non_existing_item_ignored() {
    let mut tree = QuadTree::default();
    tree.add(item(0, 0.5, 0.5));

    // same position, different identity
    assert!(!tree.remove(&item(1, 0.5, 0.5)));
    assert_eq!(tree.count(), 1);
}

#[test]
fn remove_outside_item_ignored() {
    let mut tree = QuadTree::<Item>::default();

    assert!(!tree.remove(&item(0, 1.5, 1.5)));
    assert_eq!(tree.count(), 0);
}

#[test]
fn identical_positions_are_tracked_independently() {
    let mut tree = QuadTree::default();
    let a = item(0, 0.25, 0.25);
    let b = item(1, 0.25, 0.25);
    tree.add(a);
    tree.add(b);

    assert!(tree.remove(&a));

    let found = tree.search(&Bounds::UNIT);
    assert_eq!(found, vec![&b]);
    assert_eq!(tree.count(), 1);
}

#[test]
fn clear() {
    let mut tree = QuadTree::default();
    tree.add(item(0, 0.5, 0.5));
    tree.add(item(1, 1.0, 1.0));
    assert_eq!(tree.count(), 2);

    tree.clear();

    assert_eq!(tree.count(), 0);
    assert!(tree.search(&Bounds::UNIT).is_empty());
    assert_eq!(tree.height(), 0);
}

#[test]
fn search_with_bounds() {
    let mut tree = QuadTree::default();
    tree.add(item(0, 0.5, 0.5));
    tree.add(item(1, -0.5, 0.5));
    tree.add(item(2, -0.5, -0.5));
    tree.add(item(3, -0.5, -0.5));

    assert_eq!(tree.search(&Bounds::new(-1.0, -1.0, 1.0, 1.0)).len(), 4);
    assert_eq!(tree.search(&Bounds::new(-1.0, -1.0, -0.6, -0.6)).len(), 0);
    assert_eq!(tree.search(&Bounds::new(0.6, 0.6, 1.0, 1.0)).len(), 0);
    assert_eq!(tree.search(&Bounds::new(0.0, 0.0, 0.6, 0.6)).len(), 1);
    assert_eq!(tree.search(&Bounds::new(-1.0, -1.0, 1.0, 0.0)).len(), 2);
}

#[test]
fn search_outside_the_tree_is_empty() {
    let mut tree = QuadTree::default();
    tree.add(item(0, 1.0, 1.0));

    assert!(tree.search(&Bounds::new(1.5, 1.5, 2.0, 2.0)).is_empty());
    // touching the corner is enough
    assert_eq!(tree.search(&Bounds::new(1.0, 1.0, 2.0, 2.0)).len(), 1);
}

#[test]
fn search_with_bounds_randomized_items() {
    let mut rng = get_rand();
    let mut tree = QuadTree::default();

    let quadrants = [
        (Bounds::new(-1.0, -1.0, 0.0, 0.0), 10),
        (Bounds::new(-1.0, 0.0, 0.0, 1.0), 20),
        (Bounds::new(0.0, 0.0, 1.0, 1.0), 30),
        (Bounds::new(0.0, -1.0, 1.0, 0.0), 40),
    ];
    let mut next_id = 0;
    for (bounds, count) in quadrants.iter() {
        tree.extend(items_inside(&mut rng, bounds, next_id, *count));
        next_id += count;
    }

    assert_eq!(tree.search(&Bounds::UNIT).len(), 100);
    for (bounds, count) in quadrants.iter() {
        assert_eq!(tree.search(bounds).len(), *count as usize);
    }
}

#[test]
fn search_matches_brute_force() {
    let mut rng = get_rand();
    let mut tree = QuadTree::default();

    let mut items = items_inside(&mut rng, &Bounds::UNIT, 0, 2000);
    // a dense cluster to force deep splits
    items.extend(items_inside(
        &mut rng,
        &Bounds::new(0.1, 0.1, 0.1001, 0.1001),
        2000,
        500,
    ));
    assert_eq!(tree.extend(items.iter().copied()), items.len());
    assert!(tree.height() > 1);

    // drop every third item
    let mut live = Vec::new();
    for (i, it) in items.iter().enumerate() {
        if i % 3 == 0 {
            assert!(tree.remove(it));
        } else {
            live.push(*it);
        }
    }
    assert_eq!(tree.count(), live.len());

    for _ in 0..200 {
        let x = rng.gen_range(-1.2, 1.2);
        let y = rng.gen_range(-1.2, 1.2);
        let w = rng.gen_range(0.0, 0.8);
        let h = rng.gen_range(0.0, 0.8);
        let query = Bounds::new(x, y, x + w, y + h);

        let expected = ids(live.iter().filter(|i| query.contains(&i.pos)));
        let res = tree.search(&query);

        assert_eq!(res.len(), expected.len(), "duplicates in the output");
        assert_eq!(ids(res), expected, "{:?}", query);
    }
}

#[test]
fn split_is_transparent() {
    let mut rng = get_rand();
    let mut tree = QuadTree::default();
    let region = Bounds::new(0.2, 0.2, 0.4, 0.4);

    let items = items_inside(&mut rng, &region, 0, MAX_ELEMENTS as u32 + 1);
    tree.extend(items[..MAX_ELEMENTS].iter().copied());
    assert_eq!(tree.height(), 0, "a full leaf is not split yet");

    let queries = [Bounds::UNIT, region, Bounds::new(0.25, 0.25, 0.3, 0.35)];
    let before: Vec<_> = queries.iter().map(|q| ids(tree.search(q))).collect();

    let last = items[MAX_ELEMENTS];
    tree.add(last);
    assert!(tree.height() >= 1);

    for (q, mut expected) in queries.iter().zip(before) {
        if q.contains(&last.pos) {
            expected.insert(last.id);
        }
        assert_eq!(ids(tree.search(q)), expected);
    }
}

#[test]
fn midpoint_ties_go_bottom_left() {
    let mut tree = QuadTree::default();
    // fill with top-right items until the root splits
    tree.extend((0..MAX_ELEMENTS as u32).map(|i| item(i, 0.5, 0.5)));
    let center = item(1000, 0.0, 0.0);
    let on_x_axis = item(1001, 0.5, 0.0);
    tree.add(center);
    tree.add(on_x_axis);

    match &tree.root {
        Node::Branch(children) => {
            let mut bottom_left = Vec::new();
            children[BOTTOM_LEFT].search(&Bounds::UNIT.bottom_left(), &Bounds::UNIT, &mut bottom_left);
            assert_eq!(bottom_left, vec![&center]);

            let mut top_right = Vec::new();
            children[TOP_RIGHT].search(&Bounds::UNIT.top_right(), &Bounds::UNIT, &mut top_right);
            assert_eq!(top_right.len(), MAX_ELEMENTS);
        }
        Node::Leaf(_) => panic!("root should have been split"),
    }
    assert!(tree.remove(&center));
    assert!(tree.remove(&on_x_axis));
}

#[test]
fn depth_is_capped() {
    let mut tree = QuadTree::default();
    let count = MAX_ELEMENTS as u32 * 2;
    tree.extend((0..count).map(|i| item(i, 0.3, 0.3)));

    assert_eq!(tree.height(), MAX_DEPTH);
    assert_eq!(tree.search(&Bounds::around(Point::new(0.3, 0.3), 0.0)).len(), count as usize);
    assert!(tree.remove(&item(7, 0.3, 0.3)));
    assert_eq!(tree.count(), count as usize - 1);
}

#[test]
fn infinite_bounds_are_rejected() {
    let infinite = Bounds::new(
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::INFINITY,
    );
    assert!(matches!(
        QuadTree::<Item>::try_new(infinite),
        Err(Error::InvalidBounds { .. })
    ));

    let tree = QuadTree::<Item>::try_new(Bounds::new(-1e300, -1e300, 1e300, 1e300));
    assert!(tree.is_ok());
}

#[test]
#[should_panic(expected = "invalid quadtree bounds")]
fn new_panics_on_infinite_bounds() {
    QuadTree::<Item>::new(Bounds::new(0.0, 0.0, f64::INFINITY, 1.0));
}

#[test]
fn wide_bounds_split() {
    let bounds = Bounds::new(-1e300, -1e300, 1e300, 1e300);
    let mut tree = QuadTree::new(bounds);
    let count = MAX_ELEMENTS as u32 + 1;
    tree.extend((0..count).map(|i| item(i, 0.1, 0.1)));

    assert_eq!(tree.bounds(), &bounds);
    assert_eq!(tree.count(), count as usize);
    assert!(tree.height() >= 1);
    assert_eq!(tree.search(&Bounds::around(Point::new(0.1, 0.1), 0.0)).len(), count as usize);
}

#[test]
fn search_order_is_reproducible() {
    let mut rng = get_rand();
    let mut tree = QuadTree::default();
    tree.extend(items_inside(&mut rng, &Bounds::UNIT, 0, 500));

    let query = Bounds::new(-0.5, -0.5, 0.5, 0.5);
    let a: Vec<u32> = tree.search(&query).into_iter().map(|i| i.id).collect();
    let b: Vec<u32> = tree.search(&query).into_iter().map(|i| i.id).collect();
    assert_eq!(a, b);

    let mut buf = Vec::new();
    tree.search_into(&query, &mut buf);
    tree.search_into(&query, &mut buf);
    assert_eq!(buf.len(), a.len() * 2);
}

#[test]
fn rejected_items_do_not_count() {
    let mut tree = QuadTree::default();
    let added = tree.extend(vec![
        item(0, 0.0, 0.0),
        item(1, 2.0, 0.0),
        item(2, 0.0, -3.0),
        item(3, 0.9, 0.9),
    ]);

    assert_eq!(added, 2);
    assert_eq!(tree.count(), 2);
}

#[test]
fn points_are_items() {
    let mut tree = QuadTree::default();
    tree.add(Point::new(0.1, 0.1));
    tree.add(Point::new(0.1, 0.1));

    assert_eq!(tree.search(&Bounds::UNIT).len(), 2);
    assert!(tree.remove(&Point::new(0.1, 0.1)));
    assert_eq!(tree.count(), 1);
}
