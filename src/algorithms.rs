//! Contract for the external hypergraph-algorithms collaborator.
//!
//! Community detection, modularity and s-betweenness centrality are not
//! computed by this crate. A backend (native binding, subprocess, or results
//! precomputed by another tool) implements [`HypergraphAlgorithms`] and the
//! statistics façade consumes it as a black box.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::conductance::subset_conductance;
use crate::error::StatsError;
use crate::types::{Hypergraph, NodeId, Partition, Partitioning};

/// Mapping from node to centrality score.
pub type Centrality = BTreeMap<NodeId, f64>;

/// External hypergraph algorithms.
///
/// Implementations must be deterministic: the façade caches the first
/// successful result of each call and never asks again.
pub trait HypergraphAlgorithms {
    /// Error type for backend failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Detect communities. The result must cover every node with pairwise
    /// disjoint partitions; callers trust this without re-checking.
    fn detect_partitions(&self, hypergraph: &Hypergraph) -> Result<Partitioning, Self::Error>;

    /// Modularity of a partitioning.
    fn modularity(&self, hypergraph: &Hypergraph, partitioning: &[Partition])
        -> Result<f64, Self::Error>;

    /// s-betweenness centrality with connectedness requirement `s`.
    fn s_betweenness(&self, hypergraph: &Hypergraph, s: u32) -> Result<Centrality, Self::Error>;

    /// Conductance of a subset.
    ///
    /// Backends overriding this must agree with
    /// [`crate::conductance::subset_conductance`].
    fn conductance(
        &self,
        hypergraph: &Hypergraph,
        subset: &BTreeSet<NodeId>,
    ) -> Result<f64, StatsError> {
        subset_conductance(hypergraph, subset)
    }
}

/// Error type for [`PrecomputedAlgorithms`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrecomputedError {
    /// No partitioning was supplied.
    #[error("No precomputed partitioning available")]
    MissingPartitions,
    /// No modularity value was supplied.
    #[error("No precomputed modularity available")]
    MissingModularity,
    /// No centrality for the requested `s`.
    #[error("No precomputed {0}-betweenness centrality available")]
    MissingCentrality(u32),
    /// Results were computed for a different hypergraph.
    #[error("Precomputed results belong to hypergraph {expected}, got {actual}")]
    FingerprintMismatch {
        /// Fingerprint recorded with the results.
        expected: String,
        /// Fingerprint of the queried hypergraph.
        actual: String,
    },
}

/// Algorithm results produced ahead of time by an external tool.
///
/// Typically deserialized from JSON emitted by a hypergraph-analysis script.
/// When `fingerprint` is set, queries against any other hypergraph fail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecomputedAlgorithms {
    /// Fingerprint of the hypergraph the results belong to.
    #[serde(default)]
    pub fingerprint: Option<String>,
    /// Community partitioning.
    #[serde(default)]
    pub partitions: Option<Partitioning>,
    /// Modularity of `partitions`.
    #[serde(default)]
    pub modularity: Option<f64>,
    /// Centrality keyed by connectedness requirement `s`.
    #[serde(default)]
    pub centrality: BTreeMap<u32, Centrality>,
}

impl PrecomputedAlgorithms {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the results to a hypergraph.
    pub fn for_hypergraph(mut self, hypergraph: &Hypergraph) -> Self {
        self.fingerprint = Some(hypergraph.fingerprint().as_str().to_string());
        self
    }

    /// Set the partitioning.
    pub fn with_partitions(mut self, partitions: Partitioning) -> Self {
        self.partitions = Some(partitions);
        self
    }

    /// Set the modularity.
    pub fn with_modularity(mut self, modularity: f64) -> Self {
        self.modularity = Some(modularity);
        self
    }

    /// Add a centrality table for `s`.
    pub fn with_centrality(mut self, s: u32, centrality: Centrality) -> Self {
        self.centrality.insert(s, centrality);
        self
    }

    fn check(&self, hypergraph: &Hypergraph) -> Result<(), PrecomputedError> {
        match &self.fingerprint {
            Some(expected) if expected != hypergraph.fingerprint().as_str() => {
                Err(PrecomputedError::FingerprintMismatch {
                    expected: expected.clone(),
                    actual: hypergraph.fingerprint().as_str().to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl HypergraphAlgorithms for PrecomputedAlgorithms {
    type Error = PrecomputedError;

    fn detect_partitions(&self, hypergraph: &Hypergraph) -> Result<Partitioning, Self::Error> {
        self.check(hypergraph)?;
        self.partitions.clone().ok_or(PrecomputedError::MissingPartitions)
    }

    fn modularity(
        &self,
        hypergraph: &Hypergraph,
        _partitioning: &[Partition],
    ) -> Result<f64, Self::Error> {
        self.check(hypergraph)?;
        self.modularity.ok_or(PrecomputedError::MissingModularity)
    }

    fn s_betweenness(&self, hypergraph: &Hypergraph, s: u32) -> Result<Centrality, Self::Error> {
        self.check(hypergraph)?;
        self.centrality
            .get(&s)
            .cloned()
            .ok_or(PrecomputedError::MissingCentrality(s))
    }
}
