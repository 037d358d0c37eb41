use std::fmt::{Debug, Display};
pub use num::Float;

pub trait Scalar: Float + Debug + Display {}
impl<T: Float + Debug + Display> Scalar for T {}

/// Anything that lives in a metric space.
///
/// `distance` must be non-negative, symmetric and obey the triangle
/// inequality; the tree's pruning is only correct under those rules.
pub trait MetricItem<F: Scalar> {
    fn distance(&self, other: &Self) -> F;
}

/// Total order over distances. NaN compares equal to everything.
pub(crate) fn cmp_distance<F: Scalar>(a: &F, b: &F) -> std::cmp::Ordering {
    a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
}
