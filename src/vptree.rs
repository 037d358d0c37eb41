//! Vantage-Point Trees are a data structure for fast
//! k-nearest-neighbor searches.
use std::fmt;
use std::mem;

use crate::criteria::SearchCriteria;
use crate::error::{VPTreeError, VPTreeResult};
use crate::geo::{compare_by_distance, BoundingBox, GeospatialPoint};
use crate::iter::TreeIterator;
use crate::metric::{cmp_distance, MetricItem, Scalar};
use crate::node::VPNode;
use crate::search::Neighbors;

/// Leaf capacity used when none is given.
pub const DEFAULT_NODE_CAPACITY: usize = 20;

/// A vantage point tree over a collection of points.
///
/// Equal points may be added more than once; each copy counts towards `len`.
/// The tree does no locking of its own, see `LockingVPTree` for sharing
/// between threads.
///
/// ```
/// use geo_vptree::{SimpleGeospatialPoint, VPTree};
///
/// let boston = SimpleGeospatialPoint::new(42.338947, -70.919635);
/// let new_york = SimpleGeospatialPoint::new(40.780751, -73.977182);
/// let tree = VPTree::<f64, SimpleGeospatialPoint>::from_points(vec![boston, new_york], 20).unwrap();
///
/// let somerville = SimpleGeospatialPoint::new(42.387597, -71.099497);
/// assert_eq!(tree.nearest_neighbor(&somerville), Some(&boston));
/// ```
pub struct VPTree<F, T> {
    root: VPNode<F, T>,
    node_capacity: usize,
}

fn check_capacity(node_capacity: usize) -> VPTreeResult<usize> {
    if node_capacity == 0 {
        return Err(VPTreeError::InvalidNodeCapacity(node_capacity));
    }
    Ok(node_capacity)
}

impl<F, T> VPTree<F, T> {
    /// Construct an empty tree with the default node capacity.
    pub fn new() -> Self {
        VPTree { root: VPNode::default(), node_capacity: DEFAULT_NODE_CAPACITY }
    }

    /// Construct an empty tree whose leaves hold at most `node_capacity` points.
    pub fn with_node_capacity(node_capacity: usize) -> VPTreeResult<Self> {
        Ok(VPTree { root: VPNode::default(), node_capacity: check_capacity(node_capacity)? })
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.root = VPNode::default();
    }

    pub fn iter(&self) -> TreeIterator<'_, F, T> {
        TreeIterator::new(&self.root)
    }

    /// Copy every point out of the tree.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Consume the tree, returning its points.
    pub fn into_points(self) -> Vec<T> {
        self.root.into_points()
    }
}

impl<F: Scalar, T: MetricItem<F>> VPTree<F, T> {
    /// Construct a new vantage point tree from a set of elements,
    /// partitioning them directly rather than inserting one at a time.
    pub fn from_points(points: Vec<T>, node_capacity: usize) -> VPTreeResult<Self> {
        let node_capacity = check_capacity(node_capacity)?;
        log::debug!("building vp-tree over {} points, node capacity {}", points.len(), node_capacity);
        Ok(VPTree { root: VPNode::build(points, node_capacity), node_capacity })
    }

    /// Add a point. Always returns `true`; equal points are stored again.
    pub fn add(&mut self, point: T) -> bool {
        self.root.add(point, self.node_capacity);
        true
    }

    /// Add a batch of points. An empty tree is built from the batch in one
    /// pass; otherwise the batch is routed down the existing tree.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, points: I) -> bool {
        let points: Vec<T> = points.into_iter().collect();
        if points.is_empty() {
            return false;
        }

        if self.is_empty() {
            log::debug!("building vp-tree over {} points", points.len());
            self.root = VPNode::build(points, self.node_capacity);
        } else {
            self.root.add_all(points, self.node_capacity);
        }
        true
    }

    /// Keep only the points for which `keep` returns `true`, rebuilding the
    /// tree if anything was dropped. Returns whether the tree changed.
    ///
    /// `keep` runs over the tree in place before anything is moved, so a
    /// panic inside it leaves the tree untouched.
    pub fn retain<P: FnMut(&T) -> bool>(&mut self, mut keep: P) -> bool {
        let verdicts: Vec<bool> = self.iter().map(|p| keep(p)).collect();
        let dropped = verdicts.iter().filter(|kept| !**kept).count();
        if dropped == 0 {
            return false;
        }

        let before = self.len();
        log::debug!("rebuilding vp-tree after dropping {} of {} points", dropped, before);

        // into_points walks the tree in the same order as iter
        let points: Vec<T> = mem::take(&mut self.root)
            .into_points()
            .into_iter()
            .zip(verdicts)
            .filter_map(|(p, kept)| if kept { Some(p) } else { None })
            .collect();
        self.root = VPNode::build(points, self.node_capacity);
        true
    }

    /// The closest point to `query`, if the tree isn't empty.
    pub fn nearest_neighbor(&self, query: &T) -> Option<&T> {
        self.nearest_neighbor_filtered(query, None, None)
    }

    /// The closest point strictly within `max_distance` of `query`.
    pub fn nearest_neighbor_within(&self, query: &T, max_distance: F) -> Option<&T> {
        self.nearest_neighbor_filtered(query, Some(max_distance), None)
    }

    /// The closest point to `query` that matches `criteria`.
    pub fn nearest_neighbor_matching<C: SearchCriteria<T>>(&self, query: &T, criteria: &C) -> Option<&T> {
        self.nearest_neighbor_filtered(query, None, Some(criteria as &dyn SearchCriteria<T>))
    }

    /// The closest point to `query`, optionally bounded by a distance and
    /// restricted to points matching `criteria`.
    pub fn nearest_neighbor_filtered(
        &self,
        query: &T,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Option<&T> {
        self.nearest_neighbors_filtered(query, 1, max_distance, criteria).pop()
    }

    /// Find the `k` nearest neighbors, closest first.
    pub fn nearest_neighbors(&self, query: &T, k: usize) -> Vec<&T> {
        self.nearest_neighbors_filtered(query, k, None, None)
    }

    pub fn nearest_neighbors_within(&self, query: &T, k: usize, max_distance: F) -> Vec<&T> {
        self.nearest_neighbors_filtered(query, k, Some(max_distance), None)
    }

    pub fn nearest_neighbors_matching<C: SearchCriteria<T>>(&self, query: &T, k: usize, criteria: &C) -> Vec<&T> {
        self.nearest_neighbors_filtered(query, k, None, Some(criteria as &dyn SearchCriteria<T>))
    }

    /// Find up to `k` nearest neighbors strictly within `max_distance` that
    /// match `criteria`, closest first.
    pub fn nearest_neighbors_filtered(
        &self,
        query: &T,
        k: usize,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<&T> {
        if k == 0 || self.is_empty() {
            return Vec::new();
        }

        let mut neighbors = Neighbors::new(k, max_distance.unwrap_or_else(F::infinity), criteria);
        self.root.nearest_neighbors(query, &mut neighbors);
        neighbors.into_sorted_vec()
    }

    /// Every point strictly within `max_distance` of `query`, closest first.
    pub fn all_within_distance(&self, query: &T, max_distance: F) -> Vec<&T> {
        self.all_within_distance_filtered(query, max_distance, None)
    }

    pub fn all_within_distance_matching<C: SearchCriteria<T>>(
        &self,
        query: &T,
        max_distance: F,
        criteria: &C,
    ) -> Vec<&T> {
        self.all_within_distance_filtered(query, max_distance, Some(criteria as &dyn SearchCriteria<T>))
    }

    pub fn all_within_distance_filtered(
        &self,
        query: &T,
        max_distance: F,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<&T> {
        let mut found = Vec::new();
        if max_distance > F::zero() {
            self.root.within_distance(query, max_distance, criteria, &mut found);
        }

        found.sort_by(|a, b| cmp_distance(&a.dist, &b.dist));
        found.into_iter().map(|e| e.item).collect()
    }
}

impl<F: Scalar, T: MetricItem<F> + PartialEq> VPTree<F, T> {
    /// Remove one copy of `point`. Returns `false` if it wasn't present.
    pub fn remove(&mut self, point: &T) -> bool {
        self.root.remove(point, self.node_capacity)
    }

    pub fn contains(&self, point: &T) -> bool {
        self.root.contains(point)
    }

    pub fn contains_all<'p, I>(&self, points: I) -> bool
    where
        I: IntoIterator<Item = &'p T>,
        T: 'p,
    {
        points.into_iter().all(|p| self.contains(p))
    }

    /// Remove every copy of every point in `points`. Returns whether the
    /// tree changed.
    pub fn remove_all(&mut self, points: &[T]) -> bool {
        if !points.iter().any(|p| self.contains(p)) {
            return false;
        }
        self.retain(|p| !points.contains(p))
    }

    /// Remove every point not in `points`. Returns whether the tree changed.
    pub fn retain_all(&mut self, points: &[T]) -> bool {
        self.retain(|p| points.contains(p))
    }
}

impl<T: GeospatialPoint> VPTree<f64, T> {
    /// Every point inside `bbox`.
    pub fn points_in_bounding_box(&self, bbox: &BoundingBox) -> Vec<&T> {
        self.points_in_bounding_box_filtered(bbox, None, None)
    }

    pub fn points_in_bounding_box_matching<C: SearchCriteria<T>>(&self, bbox: &BoundingBox, criteria: &C) -> Vec<&T> {
        self.points_in_bounding_box_filtered(bbox, None, Some(criteria as &dyn SearchCriteria<T>))
    }

    /// Every point inside `bbox`, closest to `origin` first.
    pub fn points_in_bounding_box_sorted(&self, bbox: &BoundingBox, origin: &T) -> Vec<&T> {
        self.points_in_bounding_box_filtered(bbox, Some(origin), None)
    }

    /// Every point inside `bbox` matching `criteria`. When `origin` is given
    /// the points are sorted by their distance from it.
    pub fn points_in_bounding_box_filtered(
        &self,
        bbox: &BoundingBox,
        origin: Option<&T>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<&T> {
        let mut found = Vec::new();
        self.root.in_bounding_box(bbox, criteria, &mut found);

        if let Some(origin) = origin {
            let by_distance = compare_by_distance(origin);
            found.sort_by(|a, b| by_distance(*a, *b));
        }
        found
    }
}

impl<F, T> Default for VPTree<F, T> {
    fn default() -> Self {
        VPTree::new()
    }
}

impl<F: fmt::Debug, T: fmt::Debug> fmt::Debug for VPTree<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VPTree")
            .field("len", &self.len())
            .field("node_capacity", &self.node_capacity)
            .field("root", &self.root)
            .finish()
    }
}

impl<'a, F, T> IntoIterator for &'a VPTree<F, T> {
    type Item = &'a T;
    type IntoIter = TreeIterator<'a, F, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<F: Scalar, T: MetricItem<F>> Extend<T> for VPTree<F, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<F: Scalar, T: MetricItem<F>> FromIterator<T> for VPTree<F, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = VPTree::new();
        tree.add_all(iter);
        tree
    }
}
