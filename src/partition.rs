//! Vantage point selection and the median split used whenever a set of
//! points is turned into an internal node.
use rand::Rng;

use crate::metric::{cmp_distance, MetricItem, Scalar};

/// Randomly select a point, and choose the point furthest from it.
///
/// Panics when `items` is empty.
pub(crate) fn select_vantage_point<F: Scalar, T: MetricItem<F>>(items: &[T]) -> usize {
    let mut rng = rand::thread_rng();
    let random_item = &items[rng.gen_range(0..items.len())];

    items
        .iter()
        .enumerate()
        .map(|(i, y)| (random_item.distance(y), i))
        .fold((F::zero(), 0), |acc, (d, i)| if d > acc.0 { (d, i) } else { acc })
        .1
}

/// The two halves of a set of points split around a vantage point.
///
/// Every point in `near` is within `threshold` of the vantage point and every
/// point in `far` is at least `threshold` away.
pub(crate) struct Split<F, T> {
    pub threshold: F,
    pub near: Vec<T>,
    pub far: Vec<T>,
}

/// Split `items` at the median of their distances to `vantage_point`.
///
/// Points at most the median distance away go near, the rest go far. If no
/// point lies beyond the median (all remaining distances tie at the top), the
/// points are split by position instead so that both halves make progress.
pub(crate) fn split_at_median<F: Scalar, T: MetricItem<F>>(vantage_point: &T, items: Vec<T>) -> Split<F, T> {
    if items.is_empty() {
        return Split { threshold: F::zero(), near: items, far: Vec::new() };
    }

    let mut tagged: Vec<(F, T)> = items
        .into_iter()
        .map(|item| (item.distance(vantage_point), item))
        .collect();

    let mid = (tagged.len() - 1) / 2;
    let threshold = order_stat::kth_by(&mut tagged, mid, |a, b| cmp_distance(&a.0, &b.0)).0;

    let (near, far): (Vec<(F, T)>, Vec<(F, T)>) = if tagged.iter().any(|(d, _)| *d > threshold) {
        tagged.into_iter().partition(|(d, _)| *d <= threshold)
    } else {
        // kth_by left every position up to `mid` no further than the median
        let far = tagged.split_off(mid + 1);
        (tagged, far)
    };

    Split {
        threshold,
        near: near.into_iter().map(|(_, item)| item).collect(),
        far: far.into_iter().map(|(_, item)| item).collect(),
    }
}
