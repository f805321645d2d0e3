use crate::config::CorrelationConfig;
use crate::correlation::aggregation::IncidentAggregator;
use crate::correlation::candidates::CandidatePairGenerator;
use crate::correlation::clustering::ClusteringEngine;
use crate::correlation::models::{CandidatePair, CorrelationResult, CorrelationStats, ScoredPair};
use crate::correlation::scorer::CorrelationScorer;
use crate::error::{AppError, Result};
use crate::metrics::{
    ACCEPTED_PAIRS_TOTAL, ALERTS_PROCESSED_TOTAL, CANDIDATE_PAIRS_TOTAL, INCIDENTS_FORMED_TOTAL,
    SCORER_BATCH_DURATION_SECONDS, SCORER_FAILURES_TOTAL,
};
use crate::models::{threat_count, Alert};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use validator::Validate;

/// Correlates a batch of classified alerts into ranked incidents.
///
/// A run is a pure function of the batch, the configuration and the scorer:
/// generate candidate pairs, score them, keep pairs at or above the threshold,
/// take connected components and aggregate each one into an incident.
pub struct CorrelationEngine {
    config: CorrelationConfig,
    scorer: Arc<dyn CorrelationScorer>,
    generator: CandidatePairGenerator,
    aggregator: IncidentAggregator,
}

impl CorrelationEngine {
    /// Create a new correlation engine
    pub fn new(config: CorrelationConfig, scorer: Arc<dyn CorrelationScorer>) -> Result<Self> {
        config.validate()?;

        let window = config.time_window()?;
        Ok(Self {
            generator: CandidatePairGenerator::new(window),
            aggregator: IncidentAggregator::new(window),
            config,
            scorer,
        })
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Run correlation over one batch
    pub async fn correlate(&self, alerts: &[Alert]) -> Result<CorrelationResult> {
        let start = Instant::now();
        let threat_alerts = threat_count(alerts);

        ALERTS_PROCESSED_TOTAL
            .with_label_values(&["threat"])
            .inc_by(threat_alerts as f64);
        ALERTS_PROCESSED_TOTAL
            .with_label_values(&["normal"])
            .inc_by((alerts.len() - threat_alerts) as f64);

        let mut stats = CorrelationStats {
            total_alerts: alerts.len(),
            threat_alerts,
            ..Default::default()
        };

        // Nothing to correlate: skip the scorer entirely
        if threat_alerts == 0 {
            info!(total_alerts = alerts.len(), "No threat alerts in batch");
            stats.processing_time_ms = start.elapsed().as_millis() as u64;
            return Ok(CorrelationResult::empty(stats));
        }

        stats.label_groups = CandidatePairGenerator::label_groups(alerts).len();

        let pairs = self.generator.generate(alerts);
        stats.candidate_pairs = pairs.len();
        CANDIDATE_PAIRS_TOTAL.inc_by(pairs.len() as f64);

        let threshold = self.config.correlation_threshold;
        let accepted: Vec<ScoredPair> = self
            .score_pairs(&pairs)
            .await?
            .into_iter()
            .filter(|pair| pair.score >= threshold)
            .collect();
        stats.accepted_pairs = accepted.len();
        ACCEPTED_PAIRS_TOTAL.inc_by(accepted.len() as f64);

        let clusters = ClusteringEngine::cluster(alerts, &accepted)?;
        let incidents = self.aggregator.aggregate(alerts, &clusters);
        stats.clusters = clusters.len();
        stats.processing_time_ms = start.elapsed().as_millis() as u64;

        for incident in &incidents {
            INCIDENTS_FORMED_TOTAL
                .with_label_values(&[incident.severity.to_string().as_str()])
                .inc();
        }

        info!(
            total_alerts = stats.total_alerts,
            threat_alerts = stats.threat_alerts,
            candidate_pairs = stats.candidate_pairs,
            accepted_pairs = stats.accepted_pairs,
            incidents = incidents.len(),
            duration_ms = stats.processing_time_ms,
            "Correlation completed"
        );

        Ok(CorrelationResult {
            clusters,
            incidents,
            stats,
        })
    }

    /// Score candidate pairs in bounded, order-preserving batches.
    ///
    /// Any scorer failure, short response or out-of-range score fails the whole call.
    pub async fn score_pairs(&self, pairs: &[CandidatePair]) -> Result<Vec<ScoredPair>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let scorer = &self.scorer;
        let batches: Vec<Vec<f64>> = stream::iter(pairs.chunks(self.config.scorer_batch_size).enumerate())
            .map(|(batch, chunk)| async move {
                let timer = Instant::now();
                let result = scorer
                    .score_batch(chunk)
                    .await
                    .map_err(|e| into_scorer_error(scorer.name(), e))
                    .and_then(|scores| validate_scores(scorer.name(), chunk.len(), scores));

                SCORER_BATCH_DURATION_SECONDS
                    .with_label_values(&[scorer.name()])
                    .observe(timer.elapsed().as_secs_f64());

                if let Err(e) = &result {
                    SCORER_FAILURES_TOTAL.with_label_values(&[scorer.name()]).inc();
                    error!(batch = batch, pairs = chunk.len(), error = %e, "Scorer batch failed");
                } else {
                    debug!(batch = batch, pairs = chunk.len(), "Scorer batch completed");
                }
                result
            })
            .buffered(self.config.max_concurrent_batches)
            .try_collect()
            .await?;

        Ok(pairs
            .iter()
            .zip(batches.into_iter().flatten())
            .map(|(pair, score)| ScoredPair {
                first: pair.first,
                second: pair.second,
                score,
            })
            .collect())
    }
}

fn into_scorer_error(scorer: &str, err: AppError) -> AppError {
    match err {
        AppError::Scorer { .. } => err,
        other => AppError::scorer(scorer, other.to_string()),
    }
}

fn validate_scores(scorer: &str, expected: usize, scores: Vec<f64>) -> Result<Vec<f64>> {
    if scores.len() != expected {
        return Err(AppError::scorer(
            scorer,
            format!("expected {} scores, got {}", expected, scores.len()),
        ));
    }
    if let Some(bad) = scores.iter().find(|s| !(0.0..=1.0).contains(*s)) {
        return Err(AppError::scorer(
            scorer,
            format!("score {} is outside [0, 1]", bad),
        ));
    }
    Ok(scores)
}
