use std::iter::FusedIterator;
use std::slice;

use crate::error::{VPTreeError, VPTreeResult};
use crate::node::VPNode;

/// A lazy depth-first walk over the points of a subtree.
///
/// The walk keeps an explicit stack of subtrees still to visit, so each
/// call to `next` does only the work needed to produce one point. An
/// iterator is single-use; build a new one to walk the tree again. The
/// iterator borrows the tree, so the tree cannot change underneath it.
pub struct TreeIterator<'a, F, T> {
    pending: Vec<&'a VPNode<F, T>>,
    leaf: slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, F, T> TreeIterator<'a, F, T> {
    pub(crate) fn new(root: &'a VPNode<F, T>) -> Self {
        TreeIterator { pending: vec![root], leaf: Default::default(), remaining: root.len() }
    }

    pub fn has_next(&self) -> bool {
        self.remaining > 0
    }

    /// Like `next`, but fails with `IteratorExhausted` once every point has
    /// been produced.
    pub fn next_point(&mut self) -> VPTreeResult<&'a T> {
        self.next().ok_or(VPTreeError::IteratorExhausted)
    }

    /// Points can't be removed through an iterator; this always fails with
    /// `UnsupportedOperation`.
    pub fn remove(&mut self) -> VPTreeResult<()> {
        Err(VPTreeError::UnsupportedOperation("remove through a tree iterator"))
    }
}

impl<'a, F, T> Iterator for TreeIterator<'a, F, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(point) = self.leaf.next() {
                self.remaining -= 1;
                return Some(point);
            }

            match self.pending.pop()? {
                VPNode::Leaf(points) => self.leaf = points.iter(),
                VPNode::Internal { vantage_point, near, far, .. } => {
                    self.pending.push(far);
                    self.pending.push(near);
                    self.remaining -= 1;
                    return Some(vantage_point);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, F, T> ExactSizeIterator for TreeIterator<'a, F, T> {}

impl<'a, F, T> FusedIterator for TreeIterator<'a, F, T> {}
