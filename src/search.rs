//! Branch-and-bound searches over a subtree.
use std::cmp::{Ord, Ordering, PartialOrd};
use std::collections::BinaryHeap;

use crate::criteria::{accepts, SearchCriteria};
use crate::geo::{BoundingBox, GeospatialPoint};
use crate::metric::{cmp_distance, MetricItem, Scalar};
use crate::node::VPNode;

/// A point found by a search, with its distance from the query.
pub(crate) struct HeapElem<'a, F, T> {
    pub dist: F,
    pub item: &'a T,
}

impl<'a, F: Scalar, T> HeapElem<'a, F, T> {
    fn new(dist: F, item: &'a T) -> Self {
        HeapElem { dist, item }
    }
}

impl<'a, F: Scalar, T> PartialOrd for HeapElem<'a, F, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, F: Scalar, T> PartialEq for HeapElem<'a, F, T> {
    fn eq(&self, other: &Self) -> bool {
        self.dist.eq(&other.dist)
    }
}

impl<'a, F: Scalar, T> Eq for HeapElem<'a, F, T> {}

impl<'a, F: Scalar, T> Ord for HeapElem<'a, F, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_distance(&self.dist, &other.dist)
    }
}

/// Shared state of a k-nearest-neighbor search.
pub(crate) struct Neighbors<'a, 'c, F, T> {
    k: usize,
    max_distance: F,
    criteria: Option<&'c dyn SearchCriteria<T>>,
    heap: BinaryHeap<HeapElem<'a, F, T>>,
}

impl<'a, 'c, F: Scalar, T: MetricItem<F>> Neighbors<'a, 'c, F, T> {
    pub fn new(k: usize, max_distance: F, criteria: Option<&'c dyn SearchCriteria<T>>) -> Self {
        Neighbors { k, max_distance, criteria, heap: BinaryHeap::with_capacity(k) }
    }

    /// Distance a point must beat to enter the result set.
    fn bound(&self) -> F {
        match self.heap.peek() {
            Some(furthest) if self.heap.len() >= self.k => furthest.dist.min(self.max_distance),
            _ => self.max_distance,
        }
    }

    fn offer(&mut self, dist: F, item: &'a T) {
        if self.k == 0 || !(dist < self.bound()) || !accepts(self.criteria, item) {
            return;
        }
        if self.heap.len() >= self.k {
            self.heap.pop();
        }
        self.heap.push(HeapElem::new(dist, item));
    }

    /// The neighbors found, closest first.
    pub fn into_sorted_vec(self) -> Vec<&'a T> {
        self.heap.into_sorted_vec().into_iter().map(|e| e.item).collect()
    }
}

impl<F: Scalar, T: MetricItem<F>> VPNode<F, T> {
    /// Push the nearest neighbors of `query` in this subtree into
    /// `neighbors`, replacing further-away elements as necessary.
    pub(crate) fn nearest_neighbors<'a>(&'a self, query: &T, neighbors: &mut Neighbors<'a, '_, F, T>) {
        match self {
            VPNode::Leaf(points) => {
                for p in points {
                    neighbors.offer(query.distance(p), p);
                }
            }
            VPNode::Internal { vantage_point, threshold, near, far, .. } => {
                let d = query.distance(vantage_point);
                neighbors.offer(d, vantage_point);

                // Traverse the far node first if we're outside the ring.
                let mut nodes = [(near, true), (far, false)];
                if d > *threshold {
                    nodes.swap(0, 1);
                }

                for (node, is_near) in nodes {
                    let gap = if is_near { d - *threshold } else { *threshold - d };
                    if !(gap > neighbors.bound()) {
                        node.nearest_neighbors(query, neighbors);
                    }
                }
            }
        }
    }

    /// Collect every point strictly closer to `query` than `max_distance`.
    pub(crate) fn within_distance<'a>(
        &'a self,
        query: &T,
        max_distance: F,
        criteria: Option<&dyn SearchCriteria<T>>,
        found: &mut Vec<HeapElem<'a, F, T>>,
    ) {
        let mut offer = |dist: F, item: &'a T| {
            if dist < max_distance && accepts(criteria, item) {
                found.push(HeapElem::new(dist, item));
            }
        };

        match self {
            VPNode::Leaf(points) => {
                for p in points {
                    offer(query.distance(p), p);
                }
            }
            VPNode::Internal { vantage_point, threshold, near, far, .. } => {
                let d = query.distance(vantage_point);
                offer(d, vantage_point);

                if !(d - *threshold > max_distance) {
                    near.within_distance(query, max_distance, criteria, found);
                }
                if !(*threshold - d > max_distance) {
                    far.within_distance(query, max_distance, criteria, found);
                }
            }
        }
    }
}

impl<T: GeospatialPoint> VPNode<f64, T> {
    /// Collect every point inside `bbox`.
    ///
    /// Distance rings say nothing about latitude and longitude ranges, so
    /// both children are always visited.
    pub(crate) fn in_bounding_box<'a>(
        &'a self,
        bbox: &BoundingBox,
        criteria: Option<&dyn SearchCriteria<T>>,
        found: &mut Vec<&'a T>,
    ) {
        let mut offer = |item: &'a T| {
            if bbox.contains(item) && accepts(criteria, item) {
                found.push(item);
            }
        };

        match self {
            VPNode::Leaf(points) => points.iter().for_each(offer),
            VPNode::Internal { vantage_point, near, far, .. } => {
                offer(vantage_point);
                near.in_bounding_box(bbox, criteria, found);
                far.in_bounding_box(bbox, criteria, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HeapElem, Neighbors};
    use crate::criteria::SearchCriteria;
    use crate::metric::MetricItem;
    use crate::node::VPNode;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct P(f64);

    impl MetricItem<f64> for P {
        fn distance(&self, other: &Self) -> f64 {
            (self.0 - other.0).abs()
        }
    }

    fn tree(n: usize, capacity: usize) -> VPNode<f64, P> {
        VPNode::build((0..n).map(|i| P(i as f64)).collect(), capacity)
    }

    #[test]
    fn test_heap_elem_order() {
        let (a, b) = (P(0.0), P(1.0));
        assert!(HeapElem::new(1.0, &a) < HeapElem::new(2.0, &b));
    }

    #[test]
    fn test_nearest_neighbors() {
        let node = tree(100, 3);
        let mut neighbors = Neighbors::new(3, f64::INFINITY, None);
        node.nearest_neighbors(&P(41.8), &mut neighbors);
        assert_eq!(neighbors.into_sorted_vec(), vec![&P(42.0), &P(41.0), &P(43.0)]);
    }

    #[test]
    fn test_nearest_neighbors_bounded() {
        let node = tree(100, 3);
        let mut neighbors = Neighbors::new(10, 1.5, None);
        node.nearest_neighbors(&P(41.8), &mut neighbors);
        assert_eq!(neighbors.into_sorted_vec(), vec![&P(42.0), &P(41.0), &P(43.0)]);
    }

    #[test]
    fn test_nearest_neighbors_filtered() {
        let node = tree(100, 3);
        let odd = |p: &P| p.0 as i64 % 2 == 1;
        let mut neighbors = Neighbors::new(2, f64::INFINITY, Some(&odd as &dyn SearchCriteria<P>));
        node.nearest_neighbors(&P(41.8), &mut neighbors);
        assert_eq!(neighbors.into_sorted_vec(), vec![&P(41.0), &P(43.0)]);
    }

    #[test]
    fn test_within_distance() {
        let node = tree(100, 3);
        let mut found = Vec::new();
        node.within_distance(&P(10.0), 2.0, None, &mut found);
        let mut values: Vec<f64> = found.iter().map(|e| e.item.0).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        // the bound is strict, so 8 and 12 are excluded
        assert_eq!(values, vec![9.0, 10.0, 11.0]);
    }
}
