//! A vantage point tree index for points on a sphere, or for anything else
//! with a distance function that obeys the triangle inequality.
//!
//! The tree answers nearest-neighbor, k-nearest-neighbor, radius and
//! bounding-box queries, each optionally filtered by a [`SearchCriteria`].
//! [`VPTree`] is for single-threaded use; [`LockingVPTree`] wraps one in a
//! reader/writer lock.
//!
//! ```
//! use geo_vptree::{BoundingBox, SimpleGeospatialPoint, VPTree};
//!
//! let cities = vec![
//!     SimpleGeospatialPoint::new(42.338947, -70.919635), // Boston
//!     SimpleGeospatialPoint::new(41.904667, -87.62504),  // Chicago
//!     SimpleGeospatialPoint::new(32.787629, -96.79941),  // Dallas
//! ];
//! let tree = VPTree::<f64, SimpleGeospatialPoint>::from_points(cities.clone(), 20).unwrap();
//!
//! let in_box = tree.points_in_bounding_box(&BoundingBox::new(-90.0, -70.0, 43.0, 40.0));
//! assert_eq!(in_box.len(), 2);
//! ```

pub mod criteria;
pub mod database;
pub mod error;
pub mod geo;
pub mod iter;
pub mod locking;
pub mod metric;
mod node;
mod partition;
mod search;
pub mod vptree;

pub use criteria::SearchCriteria;
pub use database::{GeospatialPointDatabase, PointDatabase, PointDatabaseMut, SharedPointDatabase};
pub use error::{VPTreeError, VPTreeResult};
pub use geo::{compare_by_distance, haversine_distance, BoundingBox, GeospatialPoint, SimpleGeospatialPoint};
pub use iter::TreeIterator;
pub use locking::LockingVPTree;
pub use metric::{Float, MetricItem, Scalar};
pub use vptree::{VPTree, DEFAULT_NODE_CAPACITY};
