//! Temperature-indexed hypergraph providers.
//!
//! A provider yields the folding hypergraph valid at each integer
//! temperature. Every snapshot carries a `revision`: two snapshots with the
//! same revision are structurally identical, which lets the sensitivity sweep
//! skip comparisons across steps where the folding did not change.
//!
//! Both providers here derive revisions from [`HypergraphFingerprint`]s, so
//! equal structures share a revision even when they are distinct instances.

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::types::{Hypergraph, HypergraphError, HypergraphFingerprint, IncidenceDict, NodeId};

/// Hypergraph valid at one temperature.
#[derive(Debug, Clone)]
pub struct TemperatureSnapshot {
    /// Temperature of the folding.
    pub temperature: i32,
    /// Structural revision. Equal revisions imply identical structure.
    pub revision: u64,
    /// The folding hypergraph.
    pub hypergraph: Arc<Hypergraph>,
}

impl TemperatureSnapshot {
    /// Whether `other` carries the same structural revision.
    pub fn same_structure(&self, other: &TemperatureSnapshot) -> bool {
        self.revision == other.revision
    }
}

/// Source of temperature-indexed foldings.
///
/// ## Contract
///
/// Snapshots returned with equal `revision` must be structurally identical.
/// A provider that reuses a revision across a real structural change makes
/// the sensitivity sweep undercount silently.
pub trait TemperatureProvider {
    /// Error type for provider operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prepare the foldings for `[start, end]`. Called once before a sweep.
    fn prime(&self, start: i32, end: i32) -> Result<(), Self::Error>;

    /// Fetch the folding at `temperature`.
    fn hypergraph(&self, temperature: i32) -> Result<TemperatureSnapshot, Self::Error>;
}

/// Error type for the bundled providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No folding is known for this temperature.
    #[error("No folding available at temperature {0}")]
    MissingTemperature(i32),
    /// The folding function failed.
    #[error("Folding failed at temperature {temperature}: {source}")]
    Folding {
        /// Temperature being folded.
        temperature: i32,
        /// Error reported by the folding function.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// A folding produced an invalid hypergraph.
    #[error("Invalid folding hypergraph: {0}")]
    Hypergraph(#[from] HypergraphError),
}

/// Assigns revisions by structural fingerprint.
#[derive(Debug, Default)]
struct RevisionRegistry {
    revisions: BTreeMap<HypergraphFingerprint, u64>,
}

impl RevisionRegistry {
    fn revision_for(&mut self, hypergraph: &Hypergraph) -> u64 {
        let next = self.revisions.len() as u64;
        *self
            .revisions
            .entry(hypergraph.fingerprint().clone())
            .or_insert(next)
    }

    fn len(&self) -> usize {
        self.revisions.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory provider
// ─────────────────────────────────────────────────────────────────────────────

/// Provider over foldings supplied up front.
///
/// Structurally identical foldings inserted at different temperatures share
/// one `Arc<Hypergraph>` and one revision.
#[derive(Debug, Default)]
pub struct InMemoryTemperatureProvider {
    snapshots: BTreeMap<i32, TemperatureSnapshot>,
    registry: RevisionRegistry,
    shared: BTreeMap<u64, Arc<Hypergraph>>,
}

/// Serialized temperature sweep: one incidence mapping per temperature.
///
/// ```json
/// { "sequence_length": 6, "foldings": { "37": { "s1": [1, 2, 3], "l0": [3, 4] } } }
/// ```
///
/// With `sequence_length` set, every folding spans nodes `1..=sequence_length`
/// (unpaired nucleotides included); otherwise each folding's nodes are the
/// union of its hyperedges.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SweepInput {
    /// Number of nucleotides, numbered from 1.
    #[serde(default)]
    pub sequence_length: Option<usize>,
    /// Incidence mapping per temperature.
    pub foldings: BTreeMap<i32, IncidenceDict>,
}

impl InMemoryTemperatureProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from a serialized sweep.
    pub fn from_sweep(input: SweepInput) -> Result<Self, ProviderError> {
        let mut provider = Self::new();
        for (temperature, incidence) in input.foldings {
            let hypergraph = match input.sequence_length {
                Some(len) => Hypergraph::with_nodes((1..=len as i64).map(NodeId::Int), incidence)?,
                None => Hypergraph::from_incidence(incidence)?,
            };
            provider.insert(temperature, hypergraph);
        }
        Ok(provider)
    }

    /// Register the folding at `temperature`, replacing any previous one.
    ///
    /// Returns the revision assigned to it.
    pub fn insert(&mut self, temperature: i32, hypergraph: Hypergraph) -> u64 {
        let revision = self.registry.revision_for(&hypergraph);
        let hypergraph = self
            .shared
            .entry(revision)
            .or_insert_with(|| Arc::new(hypergraph))
            .clone();

        self.snapshots.insert(
            temperature,
            TemperatureSnapshot {
                temperature,
                revision,
                hypergraph,
            },
        );
        revision
    }

    /// Temperatures with a registered folding, ascending.
    pub fn temperatures(&self) -> Vec<i32> {
        self.snapshots.keys().copied().collect()
    }

    /// Number of distinct structures registered.
    pub fn num_revisions(&self) -> usize {
        self.registry.len()
    }
}

impl TemperatureProvider for InMemoryTemperatureProvider {
    type Error = ProviderError;

    fn prime(&self, start: i32, end: i32) -> Result<(), Self::Error> {
        match (start..=end).find(|t| !self.snapshots.contains_key(t)) {
            Some(missing) => Err(ProviderError::MissingTemperature(missing)),
            None => Ok(()),
        }
    }

    fn hypergraph(&self, temperature: i32) -> Result<TemperatureSnapshot, Self::Error> {
        self.snapshots
            .get(&temperature)
            .cloned()
            .ok_or(ProviderError::MissingTemperature(temperature))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cached folding provider
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the folding snapshot cache.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProviderCacheConfig {
    /// Maximum number of temperatures kept materialized.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for ProviderCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            enabled: true,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}

/// Provider that folds on demand and keeps recent snapshots in an LRU cache.
///
/// Revisions are assigned by fingerprint and survive eviction: re-folding an
/// evicted temperature yields the same revision as before.
///
/// Thread-safe; lookups through `&self` take the cache lock briefly.
pub struct CachedFoldingProvider<F> {
    fold: F,
    cache: Option<Arc<RwLock<LruCache<i32, TemperatureSnapshot>>>>,
    registry: Mutex<RevisionRegistry>,
    folded: Mutex<BTreeSet<i32>>,
    fold_count: AtomicUsize,
}

impl<F, E> CachedFoldingProvider<F>
where
    F: Fn(i32) -> Result<Hypergraph, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Create a provider around a folding function.
    pub fn new(fold: F, config: ProviderCacheConfig) -> Self {
        let cache = if config.enabled {
            let size = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
            Some(Arc::new(RwLock::new(LruCache::new(size))))
        } else {
            None
        };

        Self {
            fold,
            cache,
            registry: Mutex::new(RevisionRegistry::default()),
            folded: Mutex::new(BTreeSet::new()),
            fold_count: AtomicUsize::new(0),
        }
    }

    fn materialize(&self, temperature: i32) -> Result<TemperatureSnapshot, ProviderError> {
        if let Some(cache) = &self.cache {
            if let Some(snapshot) = cache.read().peek(&temperature) {
                return Ok(snapshot.clone());
            }
        }

        if !self.folded.lock().insert(temperature) && self.cache.is_some() {
            tracing::warn!(temperature, "re-folding evicted temperature snapshot");
        }

        let hypergraph = (self.fold)(temperature).map_err(|e| ProviderError::Folding {
            temperature,
            source: Box::new(e),
        })?;
        self.fold_count.fetch_add(1, Ordering::Relaxed);

        let revision = self.registry.lock().revision_for(&hypergraph);
        let snapshot = TemperatureSnapshot {
            temperature,
            revision,
            hypergraph: Arc::new(hypergraph),
        };

        if let Some(cache) = &self.cache {
            cache.write().put(temperature, snapshot.clone());
        }
        Ok(snapshot)
    }

    /// Number of times the folding function has run.
    pub fn fold_count(&self) -> usize {
        self.fold_count.load(Ordering::Relaxed)
    }

    /// Get cache statistics.
    ///
    /// Returns `None` if caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| {
            let cache = cache.read();
            CacheStats {
                len: cache.len(),
                cap: cache.cap().get(),
            }
        })
    }

    /// Drop all cached snapshots. Revisions are kept.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.write().clear();
        }
    }
}

impl<F, E> TemperatureProvider for CachedFoldingProvider<F>
where
    F: Fn(i32) -> Result<Hypergraph, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = ProviderError;

    fn prime(&self, start: i32, end: i32) -> Result<(), Self::Error> {
        for temperature in start..=end {
            self.materialize(temperature)?;
        }
        tracing::debug!(start, end, folds = self.fold_count(), "primed temperature range");
        Ok(())
    }

    fn hypergraph(&self, temperature: i32) -> Result<TemperatureSnapshot, Self::Error> {
        self.materialize(temperature)
    }
}
