//! Core types for RNA hypergraphs.

pub mod node;
pub mod hyperedge;
pub mod hypergraph;

pub use node::NodeId;
pub use hyperedge::{
    Hyperedge, MotifType, is_secondary_structure_id, DOT_BRACKET_PREFIX, LINKER_PREFIX,
};
pub use hypergraph::{Hypergraph, HypergraphError, HypergraphFingerprint, IncidenceDict};

/// A set of nodes forming one community.
pub type Partition = std::collections::BTreeSet<NodeId>;

/// Community-detection output: disjoint partitions covering every node.
pub type Partitioning = Vec<Partition>;
