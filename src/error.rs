//! Error type for statistics, diff and sensitivity operations.

use std::error::Error as StdError;

/// Error type for statistics operations.
///
/// Every variant aborts the requested statistic only; results already cached
/// by a [`crate::RnaHypergraphStats`] stay valid.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Compared hypergraphs describe sequences of different length.
    #[error("Hypergraphs have a different number of nodes: {this} vs {other}")]
    SizeMismatch {
        /// Node count of the receiving hypergraph.
        this: usize,
        /// Node count of the compared hypergraph.
        other: usize,
    },
    /// Partition index outside `[0, len)`.
    #[error("Partition index {index} out of range (partitions: {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of partitions.
        len: usize,
    },
    /// The subset's internal degree sum is zero.
    #[error("Conductance is undefined: subset has zero internal degree")]
    UndefinedConductance,
    /// A parameter outside its domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Failure surfaced by an algorithms collaborator or temperature provider.
    #[error("Delegate failure: {0}")]
    Delegate(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl StatsError {
    /// Wrap a collaborator error without altering it.
    pub fn from_delegate<E>(e: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Delegate(Box::new(e))
    }

    /// Check whether this error came from a collaborator.
    pub fn is_delegate(&self) -> bool {
        matches!(self, Self::Delegate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("backend exploded")]
    struct Backend;

    #[test]
    fn test_delegate_keeps_source() {
        let err = StatsError::from_delegate(Backend);
        assert!(err.is_delegate());
        assert_eq!(err.to_string(), "Delegate failure: backend exploded");
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<Backend>().is_some());
    }
}
