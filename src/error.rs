use thiserror::Error;

/// Errors raised by tree construction and traversal.
///
/// Removing a point that isn't in the tree is not an error; the removal
/// methods report it through their `bool` return value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VPTreeError {
    #[error("node capacity must be positive, got {0}")]
    InvalidNodeCapacity(usize),

    #[error("iterator has no more points")]
    IteratorExhausted,

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

pub type VPTreeResult<T> = Result<T, VPTreeError>;
