use parking_lot::RwLock;

use crate::criteria::SearchCriteria;
use crate::error::VPTreeResult;
use crate::geo::{BoundingBox, GeospatialPoint};
use crate::metric::{MetricItem, Scalar};
use crate::vptree::VPTree;

/// A `VPTree` behind a single reader/writer lock.
///
/// Mutations take the write lock for their whole duration, bulk operations
/// included; queries take the read lock and return owned copies of the
/// points they find. Iteration copies the points out under the read lock
/// up front, so an iterator never sees a half-applied change.
pub struct LockingVPTree<F, T> {
    tree: RwLock<VPTree<F, T>>,
}

impl<F, T> LockingVPTree<F, T> {
    pub fn new() -> Self {
        LockingVPTree { tree: RwLock::new(VPTree::new()) }
    }

    pub fn with_node_capacity(node_capacity: usize) -> VPTreeResult<Self> {
        Ok(LockingVPTree::from(VPTree::with_node_capacity(node_capacity)?))
    }

    pub fn into_inner(self) -> VPTree<F, T> {
        self.tree.into_inner()
    }

    /// The wrapped tree, reached without locking since `&mut self` already
    /// rules out other users.
    pub fn get_mut(&mut self) -> &mut VPTree<F, T> {
        self.tree.get_mut()
    }

    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    pub fn clear(&self) {
        self.tree.write().clear();
    }

    /// A snapshot of every point in the tree.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.tree.read().to_vec()
    }

    /// Iterate over a snapshot of the tree taken now.
    pub fn iter(&self) -> std::vec::IntoIter<T>
    where
        T: Clone,
    {
        self.to_vec().into_iter()
    }
}

impl<F: Scalar, T: MetricItem<F>> LockingVPTree<F, T> {
    pub fn from_points(points: Vec<T>, node_capacity: usize) -> VPTreeResult<Self> {
        Ok(LockingVPTree::from(VPTree::from_points(points, node_capacity)?))
    }

    pub fn add(&self, point: T) -> bool {
        self.tree.write().add(point)
    }

    pub fn add_all<I: IntoIterator<Item = T>>(&self, points: I) -> bool {
        // collect before locking so the write lock isn't held while a lazy
        // iterator runs
        let points: Vec<T> = points.into_iter().collect();
        self.tree.write().add_all(points)
    }

    pub fn retain<P: FnMut(&T) -> bool>(&self, keep: P) -> bool {
        self.tree.write().retain(keep)
    }
}

impl<F: Scalar, T: MetricItem<F> + PartialEq> LockingVPTree<F, T> {
    pub fn remove(&self, point: &T) -> bool {
        self.tree.write().remove(point)
    }

    pub fn remove_all(&self, points: &[T]) -> bool {
        self.tree.write().remove_all(points)
    }

    pub fn retain_all(&self, points: &[T]) -> bool {
        self.tree.write().retain_all(points)
    }

    pub fn contains(&self, point: &T) -> bool {
        self.tree.read().contains(point)
    }

    pub fn contains_all<'p, I>(&self, points: I) -> bool
    where
        I: IntoIterator<Item = &'p T>,
        T: 'p,
    {
        self.tree.read().contains_all(points)
    }
}

impl<F: Scalar, T: MetricItem<F> + Clone> LockingVPTree<F, T> {
    pub fn nearest_neighbor(&self, query: &T) -> Option<T> {
        self.nearest_neighbor_filtered(query, None, None)
    }

    pub fn nearest_neighbor_within(&self, query: &T, max_distance: F) -> Option<T> {
        self.nearest_neighbor_filtered(query, Some(max_distance), None)
    }

    pub fn nearest_neighbor_matching<C: SearchCriteria<T>>(&self, query: &T, criteria: &C) -> Option<T> {
        self.nearest_neighbor_filtered(query, None, Some(criteria as &dyn SearchCriteria<T>))
    }

    pub fn nearest_neighbor_filtered(
        &self,
        query: &T,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Option<T> {
        self.tree.read().nearest_neighbor_filtered(query, max_distance, criteria).cloned()
    }

    pub fn nearest_neighbors(&self, query: &T, k: usize) -> Vec<T> {
        self.nearest_neighbors_filtered(query, k, None, None)
    }

    pub fn nearest_neighbors_within(&self, query: &T, k: usize, max_distance: F) -> Vec<T> {
        self.nearest_neighbors_filtered(query, k, Some(max_distance), None)
    }

    pub fn nearest_neighbors_matching<C: SearchCriteria<T>>(&self, query: &T, k: usize, criteria: &C) -> Vec<T> {
        self.nearest_neighbors_filtered(query, k, None, Some(criteria as &dyn SearchCriteria<T>))
    }

    pub fn nearest_neighbors_filtered(
        &self,
        query: &T,
        k: usize,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        let tree = self.tree.read();
        tree.nearest_neighbors_filtered(query, k, max_distance, criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn all_within_distance(&self, query: &T, max_distance: F) -> Vec<T> {
        self.all_within_distance_filtered(query, max_distance, None)
    }

    pub fn all_within_distance_matching<C: SearchCriteria<T>>(
        &self,
        query: &T,
        max_distance: F,
        criteria: &C,
    ) -> Vec<T> {
        self.all_within_distance_filtered(query, max_distance, Some(criteria as &dyn SearchCriteria<T>))
    }

    pub fn all_within_distance_filtered(
        &self,
        query: &T,
        max_distance: F,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        let tree = self.tree.read();
        tree.all_within_distance_filtered(query, max_distance, criteria)
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<T: GeospatialPoint + Clone> LockingVPTree<f64, T> {
    pub fn points_in_bounding_box(&self, bbox: &BoundingBox) -> Vec<T> {
        self.points_in_bounding_box_filtered(bbox, None, None)
    }

    pub fn points_in_bounding_box_matching<C: SearchCriteria<T>>(&self, bbox: &BoundingBox, criteria: &C) -> Vec<T> {
        self.points_in_bounding_box_filtered(bbox, None, Some(criteria as &dyn SearchCriteria<T>))
    }

    /// Every point inside `bbox`, closest to `origin` first.
    pub fn points_in_bounding_box_sorted(&self, bbox: &BoundingBox, origin: &T) -> Vec<T> {
        self.points_in_bounding_box_filtered(bbox, Some(origin), None)
    }

    pub fn points_in_bounding_box_filtered(
        &self,
        bbox: &BoundingBox,
        origin: Option<&T>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        let tree = self.tree.read();
        tree.points_in_bounding_box_filtered(bbox, origin, criteria)
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<F, T> From<VPTree<F, T>> for LockingVPTree<F, T> {
    fn from(tree: VPTree<F, T>) -> Self {
        LockingVPTree { tree: RwLock::new(tree) }
    }
}

impl<F, T> Default for LockingVPTree<F, T> {
    fn default() -> Self {
        LockingVPTree::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::LockingVPTree;
    use crate::metric::MetricItem;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct P(f64);

    impl MetricItem<f64> for P {
        fn distance(&self, other: &Self) -> f64 {
            (self.0 - other.0).abs()
        }
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<LockingVPTree<f64, P>>();
    }

    #[test]
    fn test_snapshot_iteration() {
        let tree = LockingVPTree::<f64, P>::from_points((0..10).map(|i| P(i as f64)).collect(), 3).unwrap();
        let snapshot = tree.iter();
        tree.clear();
        assert_eq!(snapshot.count(), 10);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let tree = Arc::new(LockingVPTree::<f64, P>::with_node_capacity(4).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let tree = Arc::clone(&tree);
                thread::spawn(move || {
                    for i in 0..250 {
                        tree.add(P((t * 1000 + i) as f64));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tree.len(), 1000);
        assert_eq!(tree.iter().count(), 1000);
        assert_eq!(tree.nearest_neighbor(&P(2100.4)), Some(P(2100.0)));
    }
}
