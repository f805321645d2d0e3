//! Common test utilities for correlation and triage tests
//!
//! Alert builders plus scripted scorers so tests can control exactly which
//! candidate pairs are accepted.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use soc_incident_engine::{
    correlation::{CandidatePair, CorrelationScorer},
    models::{Alert, Severity},
    severity::SeverityPolicy,
    AppError, Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed batch start so results do not depend on the wall clock
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 4, 10, 0, 0).unwrap()
}

/// Build an alert whose severity comes from the default policy
pub fn create_test_alert(
    offset_secs: i64,
    actor: &str,
    source: &str,
    label: &str,
    confidence: f64,
) -> Alert {
    let severity = SeverityPolicy::default().assign(label, confidence);
    create_test_alert_with_severity(offset_secs, actor, source, label, confidence, severity)
}

pub fn create_test_alert_with_severity(
    offset_secs: i64,
    actor: &str,
    source: &str,
    label: &str,
    confidence: f64,
    severity: Severity,
) -> Alert {
    Alert::new(
        base_time() + TimeDelta::seconds(offset_secs),
        actor.to_string(),
        source.to_string(),
        label.to_string(),
        confidence,
        severity,
    )
}

/// Scores each pair with a plain function of the pair
pub struct FnScorer {
    score: fn(&CandidatePair) -> f64,
    pub calls: AtomicUsize,
}

impl FnScorer {
    pub fn new(score: fn(&CandidatePair) -> f64) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    /// Accept every candidate pair
    pub fn accept_all() -> Self {
        Self::new(|_| 1.0)
    }

    /// Reject every candidate pair
    pub fn reject_all() -> Self {
        Self::new(|_| 0.0)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CorrelationScorer for FnScorer {
    async fn score_batch(&self, pairs: &[CandidatePair]) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(pairs.iter().map(|pair| (self.score)(pair)).collect())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always fails, like an unreachable model
pub struct FailingScorer;

#[async_trait]
impl CorrelationScorer for FailingScorer {
    async fn score_batch(&self, _pairs: &[CandidatePair]) -> Result<Vec<f64>> {
        Err(AppError::Network("connection refused".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Returns one score too few
pub struct ShortScorer;

#[async_trait]
impl CorrelationScorer for ShortScorer {
    async fn score_batch(&self, pairs: &[CandidatePair]) -> Result<Vec<f64>> {
        Ok(vec![1.0; pairs.len().saturating_sub(1)])
    }

    fn name(&self) -> &str {
        "short"
    }
}
