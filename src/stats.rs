//! Statistics façade over one RNA hypergraph.
//!
//! [`RnaHypergraphStats`] memoizes the results of the external algorithms
//! (partitions, modularity, centrality) and exposes conductance and
//! structural diffs built on this crate's own logic.
//!
//! ## Caching
//!
//! Every cache is populated on the first successful call and never
//! invalidated. A failing call leaves existing caches untouched, so a
//! modularity failure does not cost the already-detected partitions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::algorithms::{Centrality, HypergraphAlgorithms};
use crate::conductance;
use crate::diff::{self, StructuralDiff};
use crate::error::StatsError;
use crate::types::{Hyperedge, Hypergraph, MotifType, NodeId, Partition, Partitioning};

/// Default connectedness requirement for s-betweenness centrality.
pub const DEFAULT_CENTRALITY_S: u32 = 1;

/// Serializable overview of the statistics computed so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Fingerprint of the analyzed hypergraph.
    pub fingerprint: String,
    /// Number of nucleotides.
    pub num_nodes: usize,
    /// Number of hyperedges of any kind.
    pub num_edges: usize,
    /// Secondary-structure hyperedges by motif type.
    pub motif_counts: BTreeMap<MotifType, usize>,
    /// Number of partitions.
    pub num_partitions: usize,
    /// Modularity of the partitioning.
    pub modularity: f64,
    /// Conductance per partition, in partition order.
    pub partitions_conductance: Vec<f64>,
}

/// Statistics over a single RNA hypergraph.
///
/// The hypergraph is shared, not owned: the caller creates it and may hand
/// the same `Arc` to other components.
pub struct RnaHypergraphStats<A: HypergraphAlgorithms> {
    hypergraph: Arc<Hypergraph>,
    algorithms: A,
    partitions: Option<Partitioning>,
    modularity: Option<f64>,
    partitions_conductance: Option<Vec<f64>>,
    centrality: BTreeMap<u32, Centrality>,
}

impl<A: HypergraphAlgorithms> RnaHypergraphStats<A> {
    /// Create a façade over `hypergraph` backed by `algorithms`.
    pub fn new(hypergraph: Arc<Hypergraph>, algorithms: A) -> Self {
        Self {
            hypergraph,
            algorithms,
            partitions: None,
            modularity: None,
            partitions_conductance: None,
            centrality: BTreeMap::new(),
        }
    }

    /// The analyzed hypergraph.
    pub fn hypergraph(&self) -> &Hypergraph {
        &self.hypergraph
    }

    /// The algorithms backend.
    pub fn algorithms(&self) -> &A {
        &self.algorithms
    }

    fn ensure_partitions(&mut self) -> Result<&Partitioning, StatsError> {
        if self.partitions.is_none() {
            let partitions = self
                .algorithms
                .detect_partitions(&self.hypergraph)
                .map_err(StatsError::from_delegate)?;
            tracing::debug!(
                fingerprint = %self.hypergraph.fingerprint(),
                partitions = partitions.len(),
                "detected partitions"
            );
            self.partitions = Some(partitions);
        }
        Ok(self.partitions.get_or_insert_with(Vec::new))
    }

    /// Community partitions of the hypergraph.
    pub fn partitions(&mut self) -> Result<&Partitioning, StatsError> {
        self.ensure_partitions()
    }

    /// The `n`-th partition.
    pub fn partition(&mut self, n: usize) -> Result<&Partition, StatsError> {
        let partitions = self.ensure_partitions()?;
        let len = partitions.len();
        partitions
            .get(n)
            .ok_or(StatsError::IndexOutOfRange { index: n, len })
    }

    /// Modularity of the cached partitioning.
    pub fn modularity(&mut self) -> Result<f64, StatsError> {
        if let Some(modularity) = self.modularity {
            return Ok(modularity);
        }
        self.ensure_partitions()?;
        let partitions = self.partitions.as_deref().unwrap_or_default();
        let modularity = self
            .algorithms
            .modularity(&self.hypergraph, partitions)
            .map_err(StatsError::from_delegate)?;
        tracing::debug!(modularity, "computed modularity");
        self.modularity = Some(modularity);
        Ok(modularity)
    }

    /// Conductance of an arbitrary node subset.
    pub fn subset_conductance(&self, subset: &BTreeSet<NodeId>) -> Result<f64, StatsError> {
        self.algorithms.conductance(&self.hypergraph, subset)
    }

    /// Conductance of each partition, in partition order.
    pub fn partitions_conductance(&mut self) -> Result<&[f64], StatsError> {
        if self.partitions_conductance.is_none() {
            self.ensure_partitions()?;
            let partitions = self.partitions.as_deref().unwrap_or_default();
            let values = partitions
                .iter()
                .map(|p| self.algorithms.conductance(&self.hypergraph, p))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::debug!(partitions = values.len(), "computed partition conductance");
            self.partitions_conductance = Some(values);
        }
        Ok(self.partitions_conductance.as_deref().unwrap_or_default())
    }

    /// Conductance of each partition, tagged with its index.
    pub fn indexed_partitions_conductance(
        &mut self,
    ) -> Result<Vec<conductance::PartitionConductance>, StatsError> {
        Ok(self
            .partitions_conductance()?
            .iter()
            .enumerate()
            .map(|(index, &conductance)| conductance::PartitionConductance { index, conductance })
            .collect())
    }

    /// s-betweenness centrality of every node. `s` must be at least 1.
    pub fn s_between_centrality(&mut self, s: u32) -> Result<&Centrality, StatsError> {
        if s == 0 {
            return Err(StatsError::InvalidParameter(
                "connectedness requirement s must be at least 1".to_string(),
            ));
        }
        if !self.centrality.contains_key(&s) {
            let centrality = self
                .algorithms
                .s_betweenness(&self.hypergraph, s)
                .map_err(StatsError::from_delegate)?;
            tracing::debug!(s, nodes = centrality.len(), "computed s-betweenness centrality");
            self.centrality.insert(s, centrality);
        }
        Ok(self.centrality.entry(s).or_default())
    }

    /// Secondary-structure hyperedges in id order.
    pub fn secondary_structures(&self) -> Vec<&Hyperedge> {
        self.hypergraph.secondary_structures().collect()
    }

    /// Per-motif count deltas against `other`.
    pub fn structure_differences(
        &self,
        other: &Hypergraph,
    ) -> Result<BTreeMap<MotifType, i64>, StatsError> {
        diff::structure_differences(&self.hypergraph, other)
    }

    /// Nucleotides that left a shared secondary structure in `other`.
    pub fn nodes_changed_structure(&self, other: &Hypergraph) -> Result<Vec<NodeId>, StatsError> {
        diff::nodes_changed_structure(&self.hypergraph, other)
    }

    /// Full structural comparison against `other`.
    pub fn structural_diff(&self, other: &Hypergraph) -> Result<StructuralDiff, StatsError> {
        StructuralDiff::compute(&self.hypergraph, other)
    }

    /// Compute (or reuse) partitions, modularity and conductance and summarize them.
    pub fn summary(&mut self) -> Result<StatsSummary, StatsError> {
        let modularity = self.modularity()?;
        let partitions_conductance = self.partitions_conductance()?.to_vec();

        Ok(StatsSummary {
            fingerprint: self.hypergraph.fingerprint().as_str().to_string(),
            num_nodes: self.hypergraph.num_nodes(),
            num_edges: self.hypergraph.num_edges(),
            motif_counts: diff::motif_counts(&self.hypergraph),
            num_partitions: partitions_conductance.len(),
            modularity,
            partitions_conductance,
        })
    }
}
