use crate::models::Incident;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Two same-label alerts close enough in time to be scored.
///
/// `first < second` always holds; both are indices into the analysed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePair {
    pub first: usize,
    pub second: usize,

    /// Label shared by both alerts
    pub label: String,

    /// Absolute time between the two alerts
    pub time_delta: TimeDelta,

    /// Timestamp of the earlier alert
    pub earliest: DateTime<Utc>,

    /// Source of the alert at `first`
    pub first_source: String,

    /// Source of the alert at `second`
    pub second_source: String,

    /// Text handed to the correlation model
    pub description: String,
}

impl CandidatePair {
    /// Check whether both alerts share a source identity
    pub fn same_source(&self) -> bool {
        self.first_source == self.second_source
    }

    /// Whole minutes between the two alerts
    pub fn minutes_apart(&self) -> i64 {
        self.time_delta.num_minutes()
    }
}

/// Build the model-readable description of a pair
pub fn describe_pair(label: &str, first_source: &str, second_source: &str, delta: TimeDelta) -> String {
    format!(
        "Threat {} between {} and {}. Time difference {} minutes.",
        label,
        first_source,
        second_source,
        delta.num_minutes()
    )
}

/// A scored candidate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub first: usize,
    pub second: usize,
    pub score: f64,
}

/// A connected component of accepted pairs; becomes one incident
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Resolved union-find root
    pub root: usize,

    /// Member indices, ascending; never empty
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }
}

/// Counters describing one correlation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStats {
    /// Alerts in the batch
    pub total_alerts: usize,

    /// Alerts that were not "normal"
    pub threat_alerts: usize,

    /// Label groups seen
    pub label_groups: usize,

    /// Pairs produced by the generator
    pub candidate_pairs: usize,

    /// Pairs at or above the threshold
    pub accepted_pairs: usize,

    /// Clusters formed
    pub clusters: usize,

    /// Wall-clock time of the run
    pub processing_time_ms: u64,
}

impl CorrelationStats {
    /// Threat alerts per cluster
    pub fn reduction_ratio(&self) -> f64 {
        if self.clusters == 0 {
            0.0
        } else {
            self.threat_alerts as f64 / self.clusters as f64
        }
    }
}

/// Output of one correlation run
#[derive(Debug, Clone, Default)]
pub struct CorrelationResult {
    /// Clusters in order of their smallest member
    pub clusters: Vec<Cluster>,

    /// Incidents ranked by severity, then size
    pub incidents: Vec<Incident>,

    pub stats: CorrelationStats,
}

impl CorrelationResult {
    pub fn empty(stats: CorrelationStats) -> Self {
        Self {
            stats,
            ..Default::default()
        }
    }
}
