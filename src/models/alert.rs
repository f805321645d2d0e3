use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::incident::Severity;

/// Reserved label meaning "no incident"
pub const NORMAL_LABEL: &str = "normal";

/// Threat labels produced by the upstream classifier
pub mod labels {
    pub const RANSOMWARE: &str = "ransomware";
    pub const MALWARE: &str = "malware";
    pub const DATA_EXFIL: &str = "data_exfil";
    pub const INSIDER_THREAT: &str = "insider_threat";
    pub const BRUTE_FORCE: &str = "brute_force";
    pub const PHISHING: &str = "phishing";
    pub const DDOS: &str = "ddos";
    pub const NORMAL: &str = super::NORMAL_LABEL;
}

/// A classified security event.
///
/// Alerts are produced once by the ingestion boundary and never mutated. Within a
/// batch an alert is identified by its position in the slice handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    /// User the event is attributed to
    pub actor: String,

    /// Source address (IP or equivalent)
    pub source_identity: String,

    /// Threat category assigned by the classifier
    pub label: String,

    /// Classifier confidence in [0, 1]
    pub confidence: f64,

    /// Severity tier, assigned once at ingestion
    pub severity: Severity,
}

impl Alert {
    /// Create a new alert
    pub fn new(
        timestamp: DateTime<Utc>,
        actor: String,
        source_identity: String,
        label: String,
        confidence: f64,
        severity: Severity,
    ) -> Self {
        Self {
            timestamp,
            actor,
            source_identity,
            label,
            confidence,
            severity,
        }
    }

    /// Check if the alert carries the "normal" sentinel
    pub fn is_normal(&self) -> bool {
        self.label == NORMAL_LABEL
    }

    /// Check if the alert is eligible for correlation
    pub fn is_threat(&self) -> bool {
        !self.is_normal()
    }
}

/// Count alerts that take part in correlation
pub fn threat_count(alerts: &[Alert]) -> usize {
    alerts.iter().filter(|a| a.is_threat()).count()
}
