//! Tree nodes and their structural operations: bulk partitioning, insertion,
//! removal and collapsing sparse subtrees back into leaves.
use std::cmp::Ordering;
use std::mem;

use crate::metric::{MetricItem, Scalar};
use crate::partition::{select_vantage_point, split_at_median, Split};

/// A node of a vantage point tree.
///
/// Internal nodes own their vantage point outright; it is not repeated in
/// either child. Every point under `near` is within `threshold` of the
/// vantage point and every point under `far` is at least `threshold` away.
/// Points exactly at `threshold` may sit on either side.
#[derive(Debug)]
pub(crate) enum VPNode<F, T> {
    Leaf(Vec<T>),
    Internal {
        vantage_point: T,
        threshold: F,
        near: Box<VPNode<F, T>>,
        far: Box<VPNode<F, T>>,
        len: usize,
    },
}

impl<F, T> Default for VPNode<F, T> {
    fn default() -> Self {
        VPNode::Leaf(Vec::new())
    }
}

impl<F, T> VPNode<F, T> {
    /// Number of points in this subtree.
    pub fn len(&self) -> usize {
        match self {
            VPNode::Leaf(points) => points.len(),
            VPNode::Internal { len, .. } => *len,
        }
    }

    /// Take every point out of this subtree, visiting each leaf once. Points
    /// come out in the order `TreeIterator` yields them.
    pub fn into_points(self) -> Vec<T> {
        let mut points = Vec::with_capacity(self.len());
        let mut pending = vec![self];

        while let Some(node) = pending.pop() {
            match node {
                VPNode::Leaf(mut leaf_points) => points.append(&mut leaf_points),
                VPNode::Internal { vantage_point, near, far, .. } => {
                    points.push(vantage_point);
                    pending.push(*far);
                    pending.push(*near);
                }
            }
        }

        points
    }

    /// Demote this node to a leaf if its subtree fits in one.
    fn collapse_if_small(&mut self, capacity: usize) {
        if let VPNode::Internal { len, .. } = self {
            if *len <= capacity {
                log::trace!("collapsing {} points into a leaf", len);
                let points = mem::take(self).into_points();
                *self = VPNode::Leaf(points);
            }
        }
    }
}

impl<F: Scalar, T: MetricItem<F>> VPNode<F, T> {
    /// Build a subtree over `points`, partitioning until every leaf holds at
    /// most `capacity` points.
    pub fn build(mut points: Vec<T>, capacity: usize) -> Self {
        if points.len() <= capacity {
            return VPNode::Leaf(points);
        }

        let len = points.len();
        let vantage_index = select_vantage_point(&points);
        let vantage_point = points.swap_remove(vantage_index);
        let Split { threshold, near, far } = split_at_median(&vantage_point, points);

        VPNode::Internal {
            vantage_point,
            threshold,
            near: Box::new(VPNode::build(near, capacity)),
            far: Box::new(VPNode::build(far, capacity)),
            len,
        }
    }

    pub fn add(&mut self, point: T, capacity: usize) {
        match self {
            VPNode::Leaf(points) => {
                points.push(point);
                if points.len() > capacity {
                    log::trace!("splitting leaf of {} points", points.len());
                    let points = mem::take(points);
                    *self = VPNode::build(points, capacity);
                }
            }
            VPNode::Internal { vantage_point, threshold, near, far, len } => {
                *len += 1;
                if point.distance(vantage_point) <= *threshold {
                    near.add(point, capacity);
                } else {
                    far.add(point, capacity);
                }
            }
        }
    }

    /// Add a batch of points, routing it down the tree in pieces rather than
    /// one point at a time.
    pub fn add_all(&mut self, points: Vec<T>, capacity: usize) {
        if points.is_empty() {
            return;
        }

        match self {
            VPNode::Leaf(existing) => {
                existing.extend(points);
                if existing.len() > capacity {
                    let points = mem::take(existing);
                    *self = VPNode::build(points, capacity);
                }
            }
            VPNode::Internal { vantage_point, threshold, near, far, len } => {
                *len += points.len();
                let vantage_point: &T = vantage_point;
                let threshold = *threshold;
                let (near_points, far_points): (Vec<T>, Vec<T>) = points
                    .into_iter()
                    .partition(|p| p.distance(vantage_point) <= threshold);
                near.add_all(near_points, capacity);
                far.add_all(far_points, capacity);
            }
        }
    }
}

impl<F: Scalar, T: MetricItem<F> + PartialEq> VPNode<F, T> {
    pub fn contains(&self, point: &T) -> bool {
        match self {
            VPNode::Leaf(points) => points.contains(point),
            VPNode::Internal { vantage_point, threshold, near, far, .. } => {
                if vantage_point == point {
                    return true;
                }
                match point.distance(vantage_point).partial_cmp(threshold) {
                    Some(Ordering::Less) => near.contains(point),
                    Some(Ordering::Greater) => far.contains(point),
                    _ => near.contains(point) || far.contains(point),
                }
            }
        }
    }

    /// Remove one occurrence of `point`. Returns whether anything was removed.
    pub fn remove(&mut self, point: &T, capacity: usize) -> bool {
        let removed = match self {
            VPNode::Leaf(points) => {
                return match points.iter().position(|p| p == point) {
                    Some(i) => {
                        points.swap_remove(i);
                        true
                    }
                    None => false,
                };
            }
            VPNode::Internal { vantage_point, threshold, near, far, .. } => {
                let in_children = match point.distance(vantage_point).partial_cmp(threshold) {
                    Some(Ordering::Less) => near.remove(point, capacity),
                    Some(Ordering::Greater) => far.remove(point, capacity),
                    _ => near.remove(point, capacity) || far.remove(point, capacity),
                };
                // an equal copy below spares the vantage point and the rebuild
                if !in_children && &*vantage_point == point {
                    None
                } else {
                    Some(in_children)
                }
            }
        };

        match removed {
            None => {
                self.rebuild_without_vantage_point(capacity);
                true
            }
            Some(true) => {
                if let VPNode::Internal { len, .. } = self {
                    *len -= 1;
                }
                self.collapse_if_small(capacity);
                true
            }
            Some(false) => false,
        }
    }

    fn rebuild_without_vantage_point(&mut self, capacity: usize) {
        *self = match mem::take(self) {
            VPNode::Internal { near, far, .. } => {
                let mut points = (*near).into_points();
                points.append(&mut (*far).into_points());
                log::trace!("vantage point removed, rebuilding {} points", points.len());
                VPNode::build(points, capacity)
            }
            leaf => leaf,
        };
    }
}
