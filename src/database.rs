//! The capabilities shared by `VPTree` and `LockingVPTree`, so code can be
//! written once against either.
//!
//! Method names follow the inherent methods of both trees. Writes come in two
//! flavors: `PointDatabaseMut` for an exclusively owned database, and
//! `SharedPointDatabase` for one shared between threads behind an `Arc`.
use crate::criteria::SearchCriteria;
use crate::geo::{BoundingBox, GeospatialPoint};
use crate::locking::LockingVPTree;
use crate::metric::{MetricItem, Scalar};
use crate::vptree::VPTree;

/// Read access to a collection of points that answers proximity queries.
///
/// Results are owned copies so that implementations guarded by a lock can
/// release it before returning.
pub trait PointDatabase<F: Scalar, T: MetricItem<F> + PartialEq + Clone> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, point: &T) -> bool;
    fn to_vec(&self) -> Vec<T>;

    fn nearest_neighbor_filtered(
        &self,
        query: &T,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Option<T>;

    fn nearest_neighbors_filtered(
        &self,
        query: &T,
        k: usize,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T>;

    fn all_within_distance_filtered(
        &self,
        query: &T,
        max_distance: F,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T>;
}

/// Writes through exclusive access.
pub trait PointDatabaseMut<F: Scalar, T: MetricItem<F> + PartialEq + Clone>: PointDatabase<F, T> {
    fn add(&mut self, point: T) -> bool;
    fn add_all(&mut self, points: Vec<T>) -> bool;
    fn remove(&mut self, point: &T) -> bool;
    fn remove_all(&mut self, points: &[T]) -> bool;
    fn retain_all(&mut self, points: &[T]) -> bool;
    fn clear(&mut self);
}

/// Writes through a shared reference, for databases that synchronize
/// internally and can be handed to several threads at once.
pub trait SharedPointDatabase<F: Scalar, T: MetricItem<F> + PartialEq + Clone>:
    PointDatabase<F, T> + Send + Sync
{
    fn add(&self, point: T) -> bool;
    fn add_all(&self, points: Vec<T>) -> bool;
    fn remove(&self, point: &T) -> bool;
    fn remove_all(&self, points: &[T]) -> bool;
    fn retain_all(&self, points: &[T]) -> bool;
    fn clear(&self);
}

/// A `PointDatabase` of points on the Earth, adding bounding-box search.
pub trait GeospatialPointDatabase<T: GeospatialPoint + PartialEq + Clone>: PointDatabase<f64, T> {
    fn points_in_bounding_box_filtered(
        &self,
        bbox: &BoundingBox,
        origin: Option<&T>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T>;
}

impl<F: Scalar, T: MetricItem<F> + PartialEq + Clone> PointDatabase<F, T> for VPTree<F, T> {
    fn len(&self) -> usize {
        VPTree::len(self)
    }

    fn contains(&self, point: &T) -> bool {
        VPTree::contains(self, point)
    }

    fn to_vec(&self) -> Vec<T> {
        VPTree::to_vec(self)
    }

    fn nearest_neighbor_filtered(
        &self,
        query: &T,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Option<T> {
        VPTree::nearest_neighbor_filtered(self, query, max_distance, criteria).cloned()
    }

    fn nearest_neighbors_filtered(
        &self,
        query: &T,
        k: usize,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        VPTree::nearest_neighbors_filtered(self, query, k, max_distance, criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    fn all_within_distance_filtered(
        &self,
        query: &T,
        max_distance: F,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        VPTree::all_within_distance_filtered(self, query, max_distance, criteria)
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<F: Scalar, T: MetricItem<F> + PartialEq + Clone> PointDatabaseMut<F, T> for VPTree<F, T> {
    fn add(&mut self, point: T) -> bool {
        VPTree::add(self, point)
    }

    fn add_all(&mut self, points: Vec<T>) -> bool {
        VPTree::add_all(self, points)
    }

    fn remove(&mut self, point: &T) -> bool {
        VPTree::remove(self, point)
    }

    fn remove_all(&mut self, points: &[T]) -> bool {
        VPTree::remove_all(self, points)
    }

    fn retain_all(&mut self, points: &[T]) -> bool {
        VPTree::retain_all(self, points)
    }

    fn clear(&mut self) {
        VPTree::clear(self)
    }
}

impl<T: GeospatialPoint + PartialEq + Clone> GeospatialPointDatabase<T> for VPTree<f64, T> {
    fn points_in_bounding_box_filtered(
        &self,
        bbox: &BoundingBox,
        origin: Option<&T>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        VPTree::points_in_bounding_box_filtered(self, bbox, origin, criteria)
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<F: Scalar, T: MetricItem<F> + PartialEq + Clone> PointDatabase<F, T> for LockingVPTree<F, T> {
    fn len(&self) -> usize {
        LockingVPTree::len(self)
    }

    fn contains(&self, point: &T) -> bool {
        LockingVPTree::contains(self, point)
    }

    fn to_vec(&self) -> Vec<T> {
        LockingVPTree::to_vec(self)
    }

    fn nearest_neighbor_filtered(
        &self,
        query: &T,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Option<T> {
        LockingVPTree::nearest_neighbor_filtered(self, query, max_distance, criteria)
    }

    fn nearest_neighbors_filtered(
        &self,
        query: &T,
        k: usize,
        max_distance: Option<F>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        LockingVPTree::nearest_neighbors_filtered(self, query, k, max_distance, criteria)
    }

    fn all_within_distance_filtered(
        &self,
        query: &T,
        max_distance: F,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        LockingVPTree::all_within_distance_filtered(self, query, max_distance, criteria)
    }
}

// Exclusive access needs no lock.
impl<F: Scalar, T: MetricItem<F> + PartialEq + Clone> PointDatabaseMut<F, T> for LockingVPTree<F, T> {
    fn add(&mut self, point: T) -> bool {
        VPTree::add(self.get_mut(), point)
    }

    fn add_all(&mut self, points: Vec<T>) -> bool {
        VPTree::add_all(self.get_mut(), points)
    }

    fn remove(&mut self, point: &T) -> bool {
        VPTree::remove(self.get_mut(), point)
    }

    fn remove_all(&mut self, points: &[T]) -> bool {
        VPTree::remove_all(self.get_mut(), points)
    }

    fn retain_all(&mut self, points: &[T]) -> bool {
        VPTree::retain_all(self.get_mut(), points)
    }

    fn clear(&mut self) {
        VPTree::clear(self.get_mut())
    }
}

impl<F, T> SharedPointDatabase<F, T> for LockingVPTree<F, T>
where
    F: Scalar + Send + Sync,
    T: MetricItem<F> + PartialEq + Clone + Send + Sync,
{
    fn add(&self, point: T) -> bool {
        LockingVPTree::add(self, point)
    }

    fn add_all(&self, points: Vec<T>) -> bool {
        LockingVPTree::add_all(self, points)
    }

    fn remove(&self, point: &T) -> bool {
        LockingVPTree::remove(self, point)
    }

    fn remove_all(&self, points: &[T]) -> bool {
        LockingVPTree::remove_all(self, points)
    }

    fn retain_all(&self, points: &[T]) -> bool {
        LockingVPTree::retain_all(self, points)
    }

    fn clear(&self) {
        LockingVPTree::clear(self)
    }
}

impl<T: GeospatialPoint + PartialEq + Clone> GeospatialPointDatabase<T> for LockingVPTree<f64, T> {
    fn points_in_bounding_box_filtered(
        &self,
        bbox: &BoundingBox,
        origin: Option<&T>,
        criteria: Option<&dyn SearchCriteria<T>>,
    ) -> Vec<T> {
        LockingVPTree::points_in_bounding_box_filtered(self, bbox, origin, criteria)
    }
}
