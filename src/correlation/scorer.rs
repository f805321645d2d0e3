use crate::config::{Config, ScorerKind};
use crate::correlation::http_scorer::HttpCorrelationScorer;
use crate::correlation::models::CandidatePair;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DurationRound, TimeDelta};
use std::sync::Arc;

/// Estimates how likely two alerts belong to the same incident.
///
/// Implementations must be pure and deterministic: the same pairs always yield the
/// same scores, one per pair, in order, each within `[0, 1]`. An error fails the
/// whole correlation run.
#[async_trait]
pub trait CorrelationScorer: Send + Sync {
    /// Score a batch of candidate pairs
    async fn score_batch(&self, pairs: &[CandidatePair]) -> Result<Vec<f64>>;

    /// Get scorer name
    fn name(&self) -> &str;
}

/// Mirrors the labelling rule the correlation model is trained on:
/// same source and at most five minutes apart.
pub struct HeuristicScorer {
    max_gap: TimeDelta,
}

impl HeuristicScorer {
    pub const CORRELATED: f64 = 0.95;
    pub const UNCORRELATED: f64 = 0.05;

    pub fn new() -> Self {
        Self {
            max_gap: TimeDelta::minutes(5),
        }
    }

    pub fn with_max_gap(max_gap: TimeDelta) -> Self {
        Self { max_gap }
    }

    fn score_pair(&self, pair: &CandidatePair) -> f64 {
        if pair.same_source() && pair.time_delta <= self.max_gap {
            Self::CORRELATED
        } else {
            Self::UNCORRELATED
        }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CorrelationScorer for HeuristicScorer {
    async fn score_batch(&self, pairs: &[CandidatePair]) -> Result<Vec<f64>> {
        Ok(pairs.iter().map(|pair| self.score_pair(pair)).collect())
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Fixed time-bucket grouping expressed as a scorer.
///
/// Scores 1.0 when both alerts share a source and fall into the same
/// `floor(timestamp, bucket)` bucket, 0.0 otherwise.
pub struct TimeBucketScorer {
    bucket: TimeDelta,
}

impl TimeBucketScorer {
    pub fn new(bucket: TimeDelta) -> Result<Self> {
        if bucket <= TimeDelta::zero() {
            return Err(AppError::Validation(
                "Time bucket must be a positive duration".to_string(),
            ));
        }
        Ok(Self { bucket })
    }

    fn score_pair(&self, pair: &CandidatePair) -> Result<f64> {
        if !pair.same_source() {
            return Ok(0.0);
        }

        let later = pair.earliest + pair.time_delta;
        let first_bucket = pair
            .earliest
            .duration_trunc(self.bucket)
            .map_err(|e| AppError::scorer(self.name(), e.to_string()))?;
        let second_bucket = later
            .duration_trunc(self.bucket)
            .map_err(|e| AppError::scorer(self.name(), e.to_string()))?;

        Ok(if first_bucket == second_bucket { 1.0 } else { 0.0 })
    }
}

#[async_trait]
impl CorrelationScorer for TimeBucketScorer {
    async fn score_batch(&self, pairs: &[CandidatePair]) -> Result<Vec<f64>> {
        pairs.iter().map(|pair| self.score_pair(pair)).collect()
    }

    fn name(&self) -> &str {
        "time_bucket"
    }
}

/// Build the scorer selected in configuration
pub fn build_scorer(config: &Config) -> Result<Arc<dyn CorrelationScorer>> {
    let scorer: Arc<dyn CorrelationScorer> = match config.scorer.kind {
        ScorerKind::Heuristic => Arc::new(HeuristicScorer::new()),
        ScorerKind::TimeBucket => Arc::new(TimeBucketScorer::new(config.correlation.time_window()?)?),
        ScorerKind::Http => {
            let endpoint = config.scorer.endpoint.clone().ok_or_else(|| {
                AppError::Configuration("scorer.endpoint is required for the http scorer".to_string())
            })?;
            Arc::new(HttpCorrelationScorer::new(endpoint, config.scorer.timeout_secs)?)
        }
    };

    tracing::info!(scorer = scorer.name(), "Correlation scorer configured");
    Ok(scorer)
}
