//! Maps a classifier verdict `(label, confidence)` to a severity tier.

use crate::config::SeverityConfig;
use crate::models::Severity;
use std::collections::HashSet;

/// Confidence strictly above which a risky label is promoted one tier
pub const CONFIDENCE_PROMOTION_THRESHOLD: f64 = 0.7;

/// Static label partition used to derive severity
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityPolicy {
    high_risk_labels: HashSet<String>,
    medium_risk_labels: HashSet<String>,
}

impl SeverityPolicy {
    pub fn new<H, M>(high_risk_labels: H, medium_risk_labels: M) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            high_risk_labels: high_risk_labels.into_iter().map(Into::into).collect(),
            medium_risk_labels: medium_risk_labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &SeverityConfig) -> Self {
        Self::new(
            config.high_risk_labels.iter().cloned(),
            config.medium_risk_labels.iter().cloned(),
        )
    }

    /// Assign a severity tier.
    ///
    /// High-risk labels land on HIGH or MEDIUM, medium-risk labels on MEDIUM or LOW,
    /// everything else (the "normal" sentinel, unknown labels) on LOW. For a fixed
    /// label the result never gets less severe as confidence grows.
    pub fn assign(&self, label: &str, confidence: f64) -> Severity {
        let confident = confidence > CONFIDENCE_PROMOTION_THRESHOLD;

        if self.high_risk_labels.contains(label) {
            if confident {
                Severity::High
            } else {
                Severity::Medium
            }
        } else if self.medium_risk_labels.contains(label) {
            if confident {
                Severity::Medium
            } else {
                Severity::Low
            }
        } else {
            Severity::Low
        }
    }

    pub fn is_high_risk(&self, label: &str) -> bool {
        self.high_risk_labels.contains(label)
    }

    pub fn is_medium_risk(&self, label: &str) -> bool {
        self.medium_risk_labels.contains(label)
    }
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self::from_config(&SeverityConfig::default())
    }
}
