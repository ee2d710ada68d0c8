//! Partition-cut conductance computed from hyperedge incidence.
//!
//! For a subset `S` of the nodes of `H` with complement `C`:
//!
//! ```text
//! ws  = Σ_{v ∈ S} deg(v)                      (hyperedge memberships inside S)
//! was = Σ_{e : e ∩ S ≠ ∅ ∧ e ∩ C ≠ ∅} |e|     (full arity of every cut edge)
//! conductance(S) = was / ws
//! ```
//!
//! `was` counts every node of a cut hyperedge, not only the nodes on the far
//! side of the cut, so values above 1 are normal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::StatsError;
use crate::types::{Hypergraph, NodeId, Partition};

/// Conductance of one partition, tagged with its index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionConductance {
    /// Index of the partition in the partitioning.
    pub index: usize,
    /// Conductance value.
    pub conductance: f64,
}

/// Internal degree sum `ws` of a subset.
pub fn internal_degree(hypergraph: &Hypergraph, subset: &BTreeSet<NodeId>) -> usize {
    subset.iter().map(|node| hypergraph.degree(node)).sum()
}

/// Cut weight `was` of a subset: summed arity of hyperedges crossing the cut.
pub fn cut_weight(hypergraph: &Hypergraph, subset: &BTreeSet<NodeId>) -> usize {
    hypergraph
        .edges()
        .filter(|edge| {
            // edge nodes are always hypergraph nodes, so "not in subset" means "in complement"
            let inside = edge.nodes().iter().any(|n| subset.contains(n));
            let outside = edge.nodes().iter().any(|n| !subset.contains(n));
            inside && outside
        })
        .map(|edge| edge.arity())
        .sum()
}

/// Conductance of `subset` against the rest of `hypergraph`.
///
/// Returns [`StatsError::UndefinedConductance`] when the subset is empty or
/// none of its nodes belongs to a hyperedge.
pub fn subset_conductance(
    hypergraph: &Hypergraph,
    subset: &BTreeSet<NodeId>,
) -> Result<f64, StatsError> {
    let ws = internal_degree(hypergraph, subset);
    if ws == 0 {
        return Err(StatsError::UndefinedConductance);
    }
    let was = cut_weight(hypergraph, subset);
    Ok(was as f64 / ws as f64)
}

/// Conductance of every partition, in partitioning order.
pub fn partitions_conductance(
    hypergraph: &Hypergraph,
    partitioning: &[Partition],
) -> Result<Vec<f64>, StatsError> {
    partitioning
        .iter()
        .map(|partition| subset_conductance(hypergraph, partition))
        .collect()
}

/// Conductance of every partition, tagged with the partition index.
pub fn indexed_partitions_conductance(
    hypergraph: &Hypergraph,
    partitioning: &[Partition],
) -> Result<Vec<PartitionConductance>, StatsError> {
    partitioning
        .iter()
        .enumerate()
        .map(|(index, partition)| {
            subset_conductance(hypergraph, partition)
                .map(|conductance| PartitionConductance { index, conductance })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ns: &[i64]) -> BTreeSet<NodeId> {
        ns.iter().copied().map(NodeId::Int).collect()
    }

    fn graph(edges: &[(&str, &[i64])]) -> Hypergraph {
        Hypergraph::from_incidence(
            edges
                .iter()
                .map(|(id, ns)| (id.to_string(), ids(ns))),
        )
        .unwrap()
    }

    #[test]
    fn test_full_arity_of_cut_edges() {
        // ws = 1 (node1 in e1) + 2 (node2 in e1, e2) = 3
        // was = |e1| + |e2| = 3 + 2 = 5
        let h = graph(&[("e1", &[1, 2, 3]), ("e2", &[2, 4])]);
        let c = subset_conductance(&h, &ids(&[1, 2])).unwrap();
        assert!((c - 5.0 / 3.0).abs() < 1e-12);
        assert!(c > 1.0);
    }

    #[test]
    fn test_empty_subset_is_undefined() {
        let h = graph(&[("e1", &[1, 2])]);
        let err = subset_conductance(&h, &BTreeSet::new()).unwrap_err();
        assert!(matches!(err, StatsError::UndefinedConductance));
    }

    #[test]
    fn test_isolated_subset_is_undefined() {
        let h = Hypergraph::with_nodes(ids(&[1, 2, 3]), [("s1".to_string(), ids(&[1, 2]))])
            .unwrap();
        let err = subset_conductance(&h, &ids(&[3])).unwrap_err();
        assert!(matches!(err, StatsError::UndefinedConductance));
    }

    #[test]
    fn test_whole_graph_has_zero_conductance() {
        let h = graph(&[("e1", &[1, 2, 3]), ("e2", &[3, 4])]);
        let c = subset_conductance(&h, h.nodes()).unwrap();
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_edges_inside_subset_do_not_count() {
        // e2 lies entirely inside the subset, e3 entirely outside
        let h = graph(&[("e1", &[1, 5]), ("e2", &[1, 2]), ("e3", &[5, 6])]);
        // ws = deg(1) + deg(2) = 2 + 1 = 3, was = |e1| = 2
        let c = subset_conductance(&h, &ids(&[1, 2])).unwrap();
        assert!((c - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_partitions_in_order() {
        let h = graph(&[("e1", &[1, 2, 3]), ("e2", &[2, 4])]);
        let partitioning = vec![ids(&[1, 2]), ids(&[3, 4])];

        let values = partitions_conductance(&h, &partitioning).unwrap();
        assert_eq!(values.len(), 2);
        assert!((values[0] - 5.0 / 3.0).abs() < 1e-12);
        // ws = deg(3) + deg(4) = 2, was = 3 + 2
        assert!((values[1] - 5.0 / 2.0).abs() < 1e-12);

        let indexed = indexed_partitions_conductance(&h, &partitioning).unwrap();
        assert_eq!(indexed[1].index, 1);
        assert_eq!(indexed[1].conductance, values[1]);
    }

    #[test]
    fn test_partitions_fail_on_undefined_member() {
        let h = Hypergraph::with_nodes(ids(&[1, 2, 3]), [("s1".to_string(), ids(&[1, 2]))])
            .unwrap();
        let err = partitions_conductance(&h, &[ids(&[1, 2]), ids(&[3])]).unwrap_err();
        assert!(matches!(err, StatsError::UndefinedConductance));
    }
}
