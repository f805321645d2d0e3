use crate::error::{AppError, Result};
use crate::models::Alert;
use crate::severity::SeverityPolicy;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Naive timestamp layouts accepted in addition to RFC 3339; read as UTC
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Classified alert as delivered by upstream producers.
///
/// Field names vary by producer; the aliases cover the known spellings.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RawAlert {
    #[validate(required, length(min = 1))]
    pub timestamp: Option<String>,

    #[serde(alias = "user")]
    #[validate(required, length(min = 1))]
    pub actor: Option<String>,

    #[serde(alias = "ip", alias = "source_ip")]
    #[validate(required, length(min = 1))]
    pub source_identity: Option<String>,

    #[serde(alias = "bert_class", alias = "threat_type")]
    #[validate(required, length(min = 1))]
    pub label: Option<String>,

    #[serde(alias = "bert_confidence")]
    #[validate(required, range(min = 0.0, max = 1.0))]
    pub confidence: Option<f64>,
}

/// A record the normalizer refused, with its position in the input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedAlert {
    pub index: usize,
    pub reason: String,
}

/// Result of normalizing a batch: accepted alerts keep their relative order
#[derive(Debug, Clone, Default)]
pub struct IngestionOutcome {
    pub alerts: Vec<Alert>,
    pub rejected: Vec<RejectedAlert>,
}

impl IngestionOutcome {
    pub fn total(&self) -> usize {
        self.alerts.len() + self.rejected.len()
    }
}

/// Validates raw records and turns them into canonical alerts with severity
#[derive(Debug, Clone, Default)]
pub struct AlertNormalizer {
    policy: SeverityPolicy,
}

impl AlertNormalizer {
    pub fn new(policy: SeverityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SeverityPolicy {
        &self.policy
    }

    /// Normalize a single record
    pub fn normalize(&self, raw: RawAlert) -> Result<Alert> {
        raw.validate()?;

        let missing = |field: &str| AppError::Validation(format!("{} is required", field));

        let timestamp = parse_timestamp(raw.timestamp.as_deref().ok_or_else(|| missing("timestamp"))?)?;
        let label = raw
            .label
            .ok_or_else(|| missing("label"))?
            .trim()
            .to_lowercase();
        if label.is_empty() {
            return Err(AppError::Validation("label must not be blank".to_string()));
        }
        let confidence = raw.confidence.ok_or_else(|| missing("confidence"))?;
        let severity = self.policy.assign(&label, confidence);

        Ok(Alert::new(
            timestamp,
            raw.actor.ok_or_else(|| missing("actor"))?.trim().to_string(),
            raw.source_identity
                .ok_or_else(|| missing("source_identity"))?
                .trim()
                .to_string(),
            label,
            confidence,
            severity,
        ))
    }

    /// Normalize a batch, keeping good records and reporting bad ones
    pub fn normalize_batch(&self, records: Vec<RawAlert>) -> IngestionOutcome {
        let mut outcome = IngestionOutcome::default();

        for (index, raw) in records.into_iter().enumerate() {
            match self.normalize(raw) {
                Ok(alert) => outcome.alerts.push(alert),
                Err(e) => {
                    warn!(index = index, error = %e, "Rejected malformed alert");
                    outcome.rejected.push(RejectedAlert {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            accepted = outcome.alerts.len(),
            rejected = outcome.rejected.len(),
            "Alert batch normalized"
        );
        outcome
    }

    /// Normalize a JSON array of alert records.
    ///
    /// Each element is decoded on its own, so one bad record does not sink the batch.
    /// Input that is not a JSON array is an error.
    pub fn parse_json(&self, input: &str) -> Result<IngestionOutcome> {
        let values: Vec<serde_json::Value> = serde_json::from_str(input)?;

        let mut outcome = IngestionOutcome::default();
        let mut decoded = Vec::with_capacity(values.len());
        let mut positions = Vec::with_capacity(values.len());

        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<RawAlert>(value) {
                Ok(raw) => {
                    decoded.push(raw);
                    positions.push(index);
                }
                Err(e) => {
                    warn!(index = index, error = %e, "Rejected undecodable alert");
                    outcome.rejected.push(RejectedAlert {
                        index,
                        reason: AppError::from(e).to_string(),
                    });
                }
            }
        }

        let normalized = self.normalize_batch(decoded);
        outcome.alerts = normalized.alerts;
        outcome.rejected.extend(normalized.rejected.into_iter().map(|r| RejectedAlert {
            index: positions[r.index],
            reason: r.reason,
        }));
        outcome.rejected.sort_by_key(|r| r.index);

        Ok(outcome)
    }
}

/// Parse an RFC 3339 timestamp, or a naive one taken as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::Validation(format!("unrecognised timestamp '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use chrono::TimeZone;

    fn raw(label: &str, confidence: f64) -> RawAlert {
        RawAlert {
            timestamp: Some("2026-01-04 10:00:00".to_string()),
            actor: Some("admin".to_string()),
            source_identity: Some("192.168.1.10".to_string()),
            label: Some(label.to_string()),
            confidence: Some(confidence),
        }
    }

    #[test]
    fn test_normalize_assigns_severity() {
        let normalizer = AlertNormalizer::default();
        let alert = normalizer.normalize(raw("ransomware", 0.99)).unwrap();
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.timestamp, Utc.with_ymd_and_hms(2026, 1, 4, 10, 0, 0).unwrap());

        let quiet = normalizer.normalize(raw("brute_force", 0.5)).unwrap();
        assert_eq!(quiet.severity, Severity::Low);
    }

    #[test]
    fn test_label_is_canonicalised() {
        let alert = AlertNormalizer::default()
            .normalize(raw("  Brute_Force ", 0.9))
            .unwrap();
        assert_eq!(alert.label, "brute_force");
        assert_eq!(alert.severity, Severity::Medium);
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut record = raw("malware", 0.9);
        record.source_identity = None;
        let err = AlertNormalizer::default().normalize(record).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        assert!(AlertNormalizer::default().normalize(raw("malware", 1.2)).is_err());
        assert!(AlertNormalizer::default().normalize(raw("malware", -0.1)).is_err());
    }

    #[test]
    fn test_empty_label_rejected() {
        assert!(AlertNormalizer::default().normalize(raw("", 0.9)).is_err());
        assert!(AlertNormalizer::default().normalize(raw("   ", 0.9)).is_err());
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2026, 1, 4, 10, 5, 0).unwrap();
        assert_eq!(parse_timestamp("2026-01-04T10:05:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-01-04T12:05:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-01-04 10:05:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_json_with_aliases_and_rejections() {
        let input = r#"[
            {"timestamp": "2026-01-04 10:00:00", "user": "admin", "ip": "10.0.0.1",
             "bert_class": "brute_force", "bert_confidence": 0.98},
            {"timestamp": "2026-01-04 10:01:00", "user": "root", "source_ip": "10.0.0.1",
             "threat_type": "brute_force", "confidence": 1.7},
            {"timestamp": "2026-01-04 10:02:00", "actor": "svc", "source_identity": "10.0.0.2",
             "label": "phishing", "confidence": "high"},
            {"timestamp": "2026-01-04T10:03:00Z", "actor": "svc", "source_identity": "10.0.0.3",
             "label": "normal", "confidence": 0.4}
        ]"#;

        let outcome = AlertNormalizer::default().parse_json(input).unwrap();
        assert_eq!(outcome.total(), 4);
        assert_eq!(outcome.alerts.len(), 2);
        assert_eq!(outcome.alerts[0].source_identity, "10.0.0.1");
        assert_eq!(outcome.alerts[0].actor, "admin");
        assert_eq!(outcome.alerts[1].label, "normal");

        let rejected: Vec<usize> = outcome.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 2]);
    }

    #[test]
    fn test_parse_json_requires_array() {
        assert!(AlertNormalizer::default().parse_json("{\"alerts\": 3}").is_err());
    }
}
