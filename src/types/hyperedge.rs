//! Hyperedges: structural motifs spanning a set of nucleotides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::hypergraph::HypergraphError;
use super::node::NodeId;

/// Id prefix reserved for backbone/linker edges.
pub const LINKER_PREFIX: &str = "l";

/// Id prefix reserved for dot-bracket helper edges.
pub const DOT_BRACKET_PREFIX: &str = "db";

/// Motif type of a hyperedge (stem, hairpin, interior loop, ...).
///
/// Encoded by the first character of the hyperedge id, so `"s1"` and `"s7"`
/// are both of type `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotifType(char);

impl MotifType {
    /// Create a motif type from its code character.
    pub fn new(code: char) -> Self {
        Self(code)
    }

    /// Derive the motif type from a hyperedge id.
    pub fn from_edge_id(id: &str) -> Option<Self> {
        id.chars().next().map(Self)
    }

    /// Get the code character.
    pub fn code(&self) -> char {
        self.0
    }
}

impl fmt::Display for MotifType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<char> for MotifType {
    fn from(code: char) -> Self {
        Self(code)
    }
}

/// Whether an edge id names a secondary-structure motif.
///
/// Everything except linker (`l…`) and dot-bracket helper (`db…`) edges.
pub fn is_secondary_structure_id(id: &str) -> bool {
    !id.starts_with(LINKER_PREFIX) && !id.starts_with(DOT_BRACKET_PREFIX)
}

/// A hyperedge of an RNA hypergraph.
///
/// The motif type and the secondary-structure flag are derived from the id
/// once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hyperedge {
    id: String,
    nodes: BTreeSet<NodeId>,
    motif: MotifType,
    secondary: bool,
}

impl Hyperedge {
    /// Create a hyperedge. Fails on an empty id.
    pub fn new(
        id: impl Into<String>,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<Self, HypergraphError> {
        let id = id.into();
        let motif = MotifType::from_edge_id(&id).ok_or(HypergraphError::EmptyEdgeId)?;
        let secondary = is_secondary_structure_id(&id);
        Ok(Self {
            id,
            nodes: nodes.into_iter().collect(),
            motif,
            secondary,
        })
    }

    /// Hyperedge id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Nodes spanned by this hyperedge.
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    /// Motif type (first character of the id).
    pub fn motif(&self) -> MotifType {
        self.motif
    }

    /// Whether this is a secondary-structure motif.
    pub fn is_secondary_structure(&self) -> bool {
        self.secondary
    }

    /// Number of nodes spanned.
    pub fn arity(&self) -> usize {
        self.nodes.len()
    }

    /// Check membership of a node.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: &str) -> Hyperedge {
        Hyperedge::new(id, [NodeId::Int(1), NodeId::Int(2)]).unwrap()
    }

    #[test]
    fn test_reserved_prefixes() {
        assert!(edge("s1").is_secondary_structure());
        assert!(edge("h0").is_secondary_structure());
        assert!(edge("i3").is_secondary_structure());
        assert!(!edge("l12").is_secondary_structure());
        assert!(!edge("db4").is_secondary_structure());
        // only the exact "db" prefix is reserved
        assert!(edge("d1").is_secondary_structure());
    }

    #[test]
    fn test_motif_from_first_char() {
        assert_eq!(edge("s12").motif(), MotifType::new('s'));
        assert_eq!(edge("m0").motif().code(), 'm');
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = Hyperedge::new("", [NodeId::Int(1)]).unwrap_err();
        assert!(matches!(err, HypergraphError::EmptyEdgeId));
    }

    #[test]
    fn test_duplicate_nodes_collapse() {
        let e = Hyperedge::new("s1", [NodeId::Int(1), NodeId::Int(1), NodeId::Int(2)]).unwrap();
        assert_eq!(e.arity(), 2);
    }
}
