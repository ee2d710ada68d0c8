//! Structural diff between two foldings of the same sequence.
//!
//! Both operations compare only secondary-structure hyperedges and require
//! the two hypergraphs to have the same number of nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StatsError;
use crate::types::{Hypergraph, MotifType, NodeId};

fn ensure_same_size(this: &Hypergraph, other: &Hypergraph) -> Result<(), StatsError> {
    if this.num_nodes() != other.num_nodes() {
        return Err(StatsError::SizeMismatch {
            this: this.num_nodes(),
            other: other.num_nodes(),
        });
    }
    Ok(())
}

/// Count secondary-structure hyperedges by motif type.
pub fn motif_counts(hypergraph: &Hypergraph) -> BTreeMap<MotifType, usize> {
    let mut counts: BTreeMap<MotifType, usize> = BTreeMap::new();
    for edge in hypergraph.secondary_structures() {
        *counts.entry(edge.motif()).or_default() += 1;
    }
    counts
}

/// Per-motif count deltas `count(this) - count(other)`.
///
/// Only motif types present on both sides with differing counts are
/// reported. A motif type that appears on one side only is left out.
pub fn structure_differences(
    this: &Hypergraph,
    other: &Hypergraph,
) -> Result<BTreeMap<MotifType, i64>, StatsError> {
    ensure_same_size(this, other)?;

    let this_counts = motif_counts(this);
    let other_counts = motif_counts(other);

    Ok(this_counts
        .iter()
        .filter_map(|(motif, &n)| {
            let m = *other_counts.get(motif)?;
            (n != m).then(|| (*motif, n as i64 - m as i64))
        })
        .collect())
}

/// Nucleotides that left a secondary structure between `this` and `other`.
///
/// For every secondary-structure hyperedge id present in both hypergraphs,
/// appends the nodes of `this`'s edge missing from `other`'s edge. Edges are
/// visited in id order and nodes in ascending order; a node dropped from
/// several edges is reported once per edge. Ids present on one side only
/// contribute nothing.
pub fn nodes_changed_structure(
    this: &Hypergraph,
    other: &Hypergraph,
) -> Result<Vec<NodeId>, StatsError> {
    ensure_same_size(this, other)?;

    let mut changed = Vec::new();
    for edge in this.secondary_structures() {
        let Some(counterpart) = other.edge(edge.id()) else {
            continue;
        };
        changed.extend(
            edge.nodes()
                .iter()
                .filter(|n| !counterpart.contains(n))
                .cloned(),
        );
    }

    tracing::trace!(
        this = %this.fingerprint(),
        other = %other.fingerprint(),
        changed = changed.len(),
        "compared secondary structures"
    );

    Ok(changed)
}

/// Full structural comparison of two foldings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralDiff {
    /// Per-motif count deltas (see [`structure_differences`]).
    pub motif_deltas: BTreeMap<MotifType, i64>,
    /// Nodes that left a shared structure (see [`nodes_changed_structure`]).
    pub changed_nodes: Vec<NodeId>,
    /// Secondary-structure ids present only in the compared hypergraph.
    pub added: Vec<String>,
    /// Secondary-structure ids present only in the receiving hypergraph.
    pub removed: Vec<String>,
}

impl StructuralDiff {
    /// Compare `this` against `other`.
    pub fn compute(this: &Hypergraph, other: &Hypergraph) -> Result<Self, StatsError> {
        let motif_deltas = structure_differences(this, other)?;
        let changed_nodes = nodes_changed_structure(this, other)?;

        let added = other
            .secondary_structures()
            .filter(|e| this.edge(e.id()).is_none())
            .map(|e| e.id().to_string())
            .collect();
        let removed = this
            .secondary_structures()
            .filter(|e| other.edge(e.id()).is_none())
            .map(|e| e.id().to_string())
            .collect();

        Ok(Self {
            motif_deltas,
            changed_nodes,
            added,
            removed,
        })
    }

    /// Check whether the two foldings share every secondary structure unchanged.
    pub fn is_empty(&self) -> bool {
        self.motif_deltas.is_empty()
            && self.changed_nodes.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}
