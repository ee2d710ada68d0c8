//! # rna-hyperstats
//!
//! Statistics over RNA secondary-structure hypergraphs.
//!
//! A folding is modelled as a hypergraph: nucleotides are nodes and each
//! structural motif (stem, hairpin, interior loop, multiloop, ...) is a
//! hyperedge whose id starts with its motif code.
//!
//! ## Core Contract
//!
//! 1. Conductance of node subsets and detected partitions
//! 2. Structural diff between two foldings of the same sequence
//! 3. Per-nucleotide sensitivity to structural change across a temperature sweep
//!
//! ## Architecture
//!
//! ```text
//! IncidenceDict → Hypergraph ──→ RnaHypergraphStats ──→ HypergraphAlgorithms
//!                     │                │                 (partitions, modularity,
//!                     │                ├─ conductance      s-betweenness)
//!                     │                └─ diff
//!                     ↓
//!          TemperatureProvider → TemperatureFoldingStats → SensitivityReport
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Edges iterate in ascending id order, nodes in ascending [`NodeId`] order
//! - Same folding content → same [`HypergraphFingerprint`]
//! - Same sweep → same `report_hash`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod error;
pub mod conductance;
pub mod diff;
pub mod algorithms;
pub mod stats;
pub mod temporal;
pub mod config;

// Re-exports
pub use types::{
    Hyperedge, Hypergraph, HypergraphError, HypergraphFingerprint, IncidenceDict,
    MotifType, NodeId, Partition, Partitioning,
};
pub use error::StatsError;
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use conductance::{PartitionConductance, subset_conductance};
pub use diff::{StructuralDiff, nodes_changed_structure, structure_differences};
pub use algorithms::{Centrality, HypergraphAlgorithms, PrecomputedAlgorithms, PrecomputedError};
pub use stats::{RnaHypergraphStats, StatsSummary};
pub use temporal::{
    CachedFoldingProvider, InMemoryTemperatureProvider, ProviderCacheConfig, ProviderError,
    SensitivityCounts, SensitivityReport, SweepInput, TemperatureFoldingStats,
    TemperatureProvider, TemperatureSnapshot,
};
pub use config::{AnalysisConfig, ConfigError};

/// Version of the serialized report and sweep formats.
pub const RNA_HYPERSTATS_SCHEMA_VERSION: &str = "1.0.0";
