//! Immutable RNA hypergraph.
//!
//! Nucleotide positions are nodes; structural motifs are hyperedges. Built
//! once from an incidence mapping (`edge id -> nodes`) produced by an external
//! parser and never mutated afterwards.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::canonical::canonical_hash_hex;
use super::hyperedge::Hyperedge;
use super::node::NodeId;

/// Incidence mapping as produced by structure parsers: edge id to spanned nodes.
pub type IncidenceDict = BTreeMap<String, Vec<NodeId>>;

/// Error type for hypergraph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HypergraphError {
    /// A hyperedge references a node outside the node set.
    #[error("Hyperedge {edge} references unknown node {node}")]
    UnknownNode {
        /// Offending hyperedge id.
        edge: String,
        /// Node missing from the node set.
        node: NodeId,
    },
    /// A hyperedge was given an empty id.
    #[error("Hyperedge id must not be empty")]
    EmptyEdgeId,
}

/// Deterministic content digest of a hypergraph (xxh64 of canonical JSON).
///
/// Equal node sets with equal incidence always give equal fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HypergraphFingerprint(String);

impl HypergraphFingerprint {
    /// Get the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HypergraphFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An RNA secondary-structure hypergraph.
///
/// Uses BTreeMap/BTreeSet so hyperedges iterate in ascending id order and
/// nodes in ascending [`NodeId`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hypergraph {
    nodes: BTreeSet<NodeId>,
    edges: BTreeMap<String, Hyperedge>,
    fingerprint: HypergraphFingerprint,
}

impl Hypergraph {
    /// Build a hypergraph whose node set is the union of all hyperedges.
    pub fn from_incidence<I, N>(incidence: I) -> Result<Self, HypergraphError>
    where
        I: IntoIterator<Item = (String, N)>,
        N: IntoIterator<Item = NodeId>,
    {
        let edges = collect_edges(incidence)?;
        let nodes = edges
            .values()
            .flat_map(|e| e.nodes().iter().cloned())
            .collect();
        Ok(Self::assemble(nodes, edges))
    }

    /// Build a hypergraph over an explicit node set.
    ///
    /// The node set may contain nodes no hyperedge spans. Every node a
    /// hyperedge references must be a member of `nodes`.
    pub fn with_nodes<I, N>(
        nodes: impl IntoIterator<Item = NodeId>,
        incidence: I,
    ) -> Result<Self, HypergraphError>
    where
        I: IntoIterator<Item = (String, N)>,
        N: IntoIterator<Item = NodeId>,
    {
        let nodes: BTreeSet<NodeId> = nodes.into_iter().collect();
        let edges = collect_edges(incidence)?;

        for edge in edges.values() {
            if let Some(missing) = edge.nodes().iter().find(|n| !nodes.contains(*n)) {
                return Err(HypergraphError::UnknownNode {
                    edge: edge.id().to_string(),
                    node: missing.clone(),
                });
            }
        }

        Ok(Self::assemble(nodes, edges))
    }

    fn assemble(nodes: BTreeSet<NodeId>, edges: BTreeMap<String, Hyperedge>) -> Self {
        let incidence: BTreeMap<&str, &BTreeSet<NodeId>> = edges
            .iter()
            .map(|(id, e)| (id.as_str(), e.nodes()))
            .collect();
        let fingerprint = HypergraphFingerprint(canonical_hash_hex(&(&nodes, &incidence)));

        Self {
            nodes,
            edges,
            fingerprint,
        }
    }

    /// All nodes.
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of hyperedges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Iterate all hyperedges in id order.
    pub fn edges(&self) -> impl Iterator<Item = &Hyperedge> {
        self.edges.values()
    }

    /// Look up a hyperedge by id.
    pub fn edge(&self, id: &str) -> Option<&Hyperedge> {
        self.edges.get(id)
    }

    /// Iterate the secondary-structure hyperedges in id order.
    pub fn secondary_structures(&self) -> impl Iterator<Item = &Hyperedge> {
        self.edges.values().filter(|e| e.is_secondary_structure())
    }

    /// Hyperedges containing `node`, in id order.
    pub fn incident_edges<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Hyperedge> {
        self.edges.values().filter(move |e| e.contains(node))
    }

    /// Number of hyperedges containing `node`.
    pub fn degree(&self, node: &NodeId) -> usize {
        self.incident_edges(node).count()
    }

    /// Check membership of a node.
    pub fn contains_node(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }

    /// Content fingerprint.
    pub fn fingerprint(&self) -> &HypergraphFingerprint {
        &self.fingerprint
    }

    /// Export the incidence mapping.
    pub fn incidence_dict(&self) -> IncidenceDict {
        self.edges
            .iter()
            .map(|(id, e)| (id.clone(), e.nodes().iter().cloned().collect()))
            .collect()
    }
}

fn collect_edges<I, N>(incidence: I) -> Result<BTreeMap<String, Hyperedge>, HypergraphError>
where
    I: IntoIterator<Item = (String, N)>,
    N: IntoIterator<Item = NodeId>,
{
    incidence
        .into_iter()
        .map(|(id, nodes)| {
            let edge = Hyperedge::new(id, nodes)?;
            Ok((edge.id().to_string(), edge))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ns: &[i64]) -> Vec<NodeId> {
        ns.iter().copied().map(NodeId::Int).collect()
    }

    fn sample() -> Hypergraph {
        Hypergraph::from_incidence([
            ("s1".to_string(), ids(&[1, 2, 3])),
            ("l0".to_string(), ids(&[3, 4])),
            ("db1".to_string(), ids(&[2, 4])),
            ("h0".to_string(), ids(&[4, 5])),
        ])
        .unwrap()
    }

    #[test]
    fn test_nodes_are_union_of_edges() {
        let h = sample();
        assert_eq!(h.num_nodes(), 5);
        assert_eq!(h.num_edges(), 4);
    }

    #[test]
    fn test_secondary_structures_in_id_order() {
        let h = sample();
        let names: Vec<&str> = h.secondary_structures().map(|e| e.id()).collect();
        assert_eq!(names, vec!["h0", "s1"]);
    }

    #[test]
    fn test_degree_counts_memberships() {
        let h = sample();
        assert_eq!(h.degree(&NodeId::Int(4)), 3);
        assert_eq!(h.degree(&NodeId::Int(1)), 1);
        assert_eq!(h.degree(&NodeId::Int(99)), 0);
    }

    #[test]
    fn test_with_nodes_allows_isolated_nodes() {
        let h = Hypergraph::with_nodes(ids(&[1, 2, 3, 4]), [("s1".to_string(), ids(&[1, 2]))])
            .unwrap();
        assert_eq!(h.num_nodes(), 4);
        assert_eq!(h.degree(&NodeId::Int(4)), 0);
    }

    #[test]
    fn test_with_nodes_rejects_unknown_node() {
        let err = Hypergraph::with_nodes(ids(&[1, 2]), [("s1".to_string(), ids(&[1, 7]))])
            .unwrap_err();
        assert_eq!(
            err,
            HypergraphError::UnknownNode {
                edge: "s1".to_string(),
                node: NodeId::Int(7),
            }
        );
    }

    #[test]
    fn test_fingerprint_is_order_independent() {
        let a = Hypergraph::from_incidence([
            ("s1".to_string(), ids(&[3, 1, 2])),
            ("h0".to_string(), ids(&[4, 5])),
        ])
        .unwrap();
        let b = Hypergraph::from_incidence([
            ("h0".to_string(), ids(&[5, 4])),
            ("s1".to_string(), ids(&[1, 2, 3])),
        ])
        .unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), sample().fingerprint());
    }

    #[test]
    fn test_incidence_dict_roundtrip() {
        let h = sample();
        let rebuilt = Hypergraph::from_incidence(h.incidence_dict()).unwrap();
        assert_eq!(h, rebuilt);
    }
}
