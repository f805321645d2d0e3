/// Alert correlation: turns a batch of classified alerts into incidents
///
/// This module provides:
/// - Candidate pair generation within a time window, per label
/// - Pluggable pair scorers (heuristic, time bucket, HTTP model)
/// - Union-find clustering of accepted pairs
/// - Incident aggregation and ranking

pub mod aggregation;
pub mod candidates;
pub mod clustering;
pub mod engine;
pub mod http_scorer;
pub mod models;
pub mod scorer;

pub use aggregation::IncidentAggregator;
pub use candidates::CandidatePairGenerator;
pub use clustering::{ClusteringEngine, DisjointSet};
pub use engine::CorrelationEngine;
pub use http_scorer::HttpCorrelationScorer;
pub use models::{
    describe_pair, CandidatePair, Cluster, CorrelationResult, CorrelationStats, ScoredPair,
};
pub use scorer::{build_scorer, CorrelationScorer, HeuristicScorer, TimeBucketScorer};
