//! Per-nucleotide sensitivity to structural change across a temperature sweep.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canonical::canonical_hash_hex;
use crate::diff::nodes_changed_structure;
use crate::error::StatsError;
use crate::types::NodeId;
use super::provider::TemperatureProvider;

/// Number of temperature steps in which each nucleotide changed structure.
///
/// Nucleotides that never changed are absent rather than mapped to zero.
pub type SensitivityCounts = BTreeMap<NodeId, u32>;

/// Result of a sensitivity sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    /// First temperature of the sweep.
    pub start_temp: i32,
    /// Last temperature of the sweep (inclusive).
    pub end_temp: i32,
    /// Number of `t -> t+1` steps visited.
    pub steps: usize,
    /// Steps whose revisions differed and were compared.
    pub changed_steps: usize,
    /// Per-nucleotide change counts.
    pub counts: SensitivityCounts,
    /// Content hash for integrity verification.
    pub report_hash: String,
}

impl SensitivityReport {
    fn new(
        start_temp: i32,
        end_temp: i32,
        steps: usize,
        changed_steps: usize,
        counts: SensitivityCounts,
    ) -> Self {
        let report_hash = canonical_hash_hex(&(start_temp, end_temp, &counts));
        Self {
            start_temp,
            end_temp,
            steps,
            changed_steps,
            counts,
            report_hash,
        }
    }

    /// Change count of a nucleotide (zero if it never changed).
    pub fn count(&self, node: &NodeId) -> u32 {
        self.counts.get(node).copied().unwrap_or(0)
    }

    /// Counts in ascending nucleotide order.
    pub fn sorted_counts(&self) -> Vec<(NodeId, u32)> {
        self.counts.iter().map(|(n, &c)| (n.clone(), c)).collect()
    }

    /// The `n` most sensitive nucleotides, highest count first, ties by node order.
    pub fn top_sensitive(&self, n: usize) -> Vec<(&NodeId, u32)> {
        let mut sorted: Vec<_> = self.counts.iter().map(|(node, &c)| (node, c)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted.truncate(n);
        sorted
    }
}

/// Sweep `[start_temp, end_temp]` and build a [`SensitivityReport`].
///
/// ## Algorithm
///
/// 1. Prime the provider for the whole range
/// 2. For each `t` in `[start_temp, end_temp)` fetch the snapshots at `t` and `t + 1`
/// 3. Equal revisions: no structural change, skip the step
/// 4. Otherwise add one to every node returned by [`nodes_changed_structure`]
///
/// A node dropped from several structures in one step is counted once per
/// structure. `start_temp > end_temp` yields an empty report without
/// touching the provider.
pub fn sensitivity_report<P>(
    provider: &P,
    start_temp: i32,
    end_temp: i32,
) -> Result<SensitivityReport, StatsError>
where
    P: TemperatureProvider + ?Sized,
{
    if start_temp > end_temp {
        return Ok(SensitivityReport::new(start_temp, end_temp, 0, 0, BTreeMap::new()));
    }

    provider
        .prime(start_temp, end_temp)
        .map_err(StatsError::from_delegate)?;

    let mut counts = SensitivityCounts::new();
    let mut steps = 0;
    let mut changed_steps = 0;

    for t in start_temp..end_temp {
        steps += 1;
        let current = provider.hypergraph(t).map_err(StatsError::from_delegate)?;
        let next = provider.hypergraph(t + 1).map_err(StatsError::from_delegate)?;

        if current.same_structure(&next) {
            tracing::trace!(temperature = t, revision = current.revision, "no structural change");
            continue;
        }

        changed_steps += 1;
        for node in nodes_changed_structure(&current.hypergraph, &next.hypergraph)? {
            *counts.entry(node).or_default() += 1;
        }
    }

    tracing::info!(
        start_temp,
        end_temp,
        steps,
        changed_steps,
        sensitive_nodes = counts.len(),
        "sensitivity sweep complete"
    );

    Ok(SensitivityReport::new(start_temp, end_temp, steps, changed_steps, counts))
}

/// Per-nucleotide change counts over `[start_temp, end_temp]`.
pub fn sensitivity<P>(
    provider: &P,
    start_temp: i32,
    end_temp: i32,
) -> Result<SensitivityCounts, StatsError>
where
    P: TemperatureProvider + ?Sized,
{
    sensitivity_report(provider, start_temp, end_temp).map(|report| report.counts)
}

/// Temperature-sweep statistics over a provider.
pub struct TemperatureFoldingStats<P: TemperatureProvider> {
    provider: P,
}

impl<P: TemperatureProvider> TemperatureFoldingStats<P> {
    /// Create stats over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Per-nucleotide sensitivity to structural change in `[start_temp, end_temp]`.
    pub fn nucleotide_sensitivity(
        &self,
        start_temp: i32,
        end_temp: i32,
    ) -> Result<SensitivityCounts, StatsError> {
        sensitivity(&self.provider, start_temp, end_temp)
    }

    /// Full sweep report for `[start_temp, end_temp]`.
    pub fn sensitivity_report(
        &self,
        start_temp: i32,
        end_temp: i32,
    ) -> Result<SensitivityReport, StatsError> {
        sensitivity_report(&self.provider, start_temp, end_temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::provider::InMemoryTemperatureProvider;
    use crate::types::Hypergraph;

    fn folding(edges: &[(&str, &[i64])]) -> Hypergraph {
        Hypergraph::with_nodes(
            (1..=6).map(NodeId::Int),
            edges
                .iter()
                .map(|(id, ns)| (id.to_string(), ns.iter().copied().map(NodeId::Int))),
        )
        .unwrap()
    }

    fn provider() -> InMemoryTemperatureProvider {
        let mut provider = InMemoryTemperatureProvider::new();
        provider.insert(37, folding(&[("s1", &[1, 2, 3]), ("s2", &[4, 5])]));
        provider.insert(38, folding(&[("s1", &[1, 2, 3]), ("s2", &[4, 5])]));
        provider.insert(39, folding(&[("s1", &[1, 2]), ("s2", &[4, 5, 6])]));
        provider.insert(40, folding(&[("s1", &[1]), ("s2", &[4, 5, 6])]));
        provider
    }

    #[test]
    fn test_zero_width_range_is_empty() {
        let provider = provider();
        assert!(sensitivity(&provider, 38, 38).unwrap().is_empty());
    }

    #[test]
    fn test_counts_accumulate_across_steps() {
        let report = sensitivity_report(&provider(), 37, 40).unwrap();

        assert_eq!(report.steps, 3);
        assert_eq!(report.changed_steps, 2);
        // 38 -> 39 drops node 3 from s1, 39 -> 40 drops node 2 from s1
        assert_eq!(report.count(&NodeId::Int(3)), 1);
        assert_eq!(report.count(&NodeId::Int(2)), 1);
        assert_eq!(report.counts.len(), 2);
        assert!(!report.counts.contains_key(&NodeId::Int(1)));
    }

    #[test]
    fn test_unchanged_steps_skipped() {
        let stats = TemperatureFoldingStats::new(provider());
        let report = stats.sensitivity_report(37, 38).unwrap();
        assert_eq!(report.steps, 1);
        assert_eq!(report.changed_steps, 0);
        assert!(report.counts.is_empty());
    }

    #[test]
    fn test_missing_temperature_is_delegate_failure() {
        let stats = TemperatureFoldingStats::new(provider());
        let err = stats.nucleotide_sensitivity(39, 41).unwrap_err();
        assert!(err.is_delegate());
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let report = sensitivity_report(&provider(), 40, 37).unwrap();
        assert_eq!(report.steps, 0);
        assert!(report.counts.is_empty());
    }

    #[test]
    fn test_top_sensitive_ordering() {
        let mut counts = SensitivityCounts::new();
        counts.insert(NodeId::Int(5), 1);
        counts.insert(NodeId::Int(2), 3);
        counts.insert(NodeId::Int(9), 3);
        let report = SensitivityReport::new(0, 1, 1, 1, counts);

        let top = report.top_sensitive(2);
        assert_eq!(top, vec![(&NodeId::Int(2), 3), (&NodeId::Int(9), 3)]);
        assert_eq!(report.sorted_counts()[0], (NodeId::Int(2), 3));
    }
}
