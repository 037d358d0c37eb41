/// A filter applied to candidate points during a search.
///
/// Implementations should be pure; a search calls `matches` at most once per
/// candidate.
pub trait SearchCriteria<T> {
    fn matches(&self, point: &T) -> bool;
}

impl<T, C> SearchCriteria<T> for C
where
    C: Fn(&T) -> bool,
{
    fn matches(&self, point: &T) -> bool {
        self(point)
    }
}

pub(crate) fn accepts<T>(criteria: Option<&dyn SearchCriteria<T>>, point: &T) -> bool {
    criteria.map_or(true, |c| c.matches(point))
}
