//! Temperature sweeps: foldings indexed by temperature and the
//! per-nucleotide sensitivity computed across them.
//!
//! ## Architecture
//!
//! ```text
//! TemperatureProvider → snapshots(t, t+1) → revision check → nodes_changed_structure → counts
//! ```

pub mod provider;
pub mod sensitivity;

pub use provider::{
    CacheStats, CachedFoldingProvider, InMemoryTemperatureProvider, ProviderCacheConfig,
    ProviderError, SweepInput, TemperatureProvider, TemperatureSnapshot,
};
pub use sensitivity::{
    sensitivity, sensitivity_report, SensitivityCounts, SensitivityReport,
    TemperatureFoldingStats,
};
