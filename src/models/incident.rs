use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use strum::{Display, EnumIter, EnumString};

/// Severity tier of an alert or incident
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    EnumIter,
    Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Get numeric rank (lower is more severe)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }

    /// Check if severity requires immediate attention
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::High)
    }
}

/// A cluster of correlated alerts reduced to one actionable unit.
///
/// The engine assigns no identifier; `member_indices` refers back to the positions
/// of the contributing alerts in the analysed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Most frequent source among members
    pub source_identity: String,

    /// Earliest member timestamp floored to the correlation window
    pub time_window_start: DateTime<Utc>,

    /// Threat label shared by all members
    pub label: String,

    /// Number of member alerts (never zero)
    pub alert_count: usize,

    /// Mean member confidence
    pub avg_confidence: f64,

    /// Most frequent member severity
    pub severity: Severity,

    /// Distinct actors, in order of first appearance
    pub users: Vec<String>,

    /// Batch indices of the member alerts, ascending
    pub member_indices: Vec<usize>,
}

impl Incident {
    /// Sort key: severity rank ascending, then alert count descending
    pub fn rank_key(&self) -> (u8, Reverse<usize>) {
        (self.severity.rank(), Reverse(self.alert_count))
    }

    /// Number of distinct users involved
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Check if incident is critical
    pub fn is_critical(&self) -> bool {
        self.severity.is_urgent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn incident(severity: Severity, alert_count: usize) -> Incident {
        Incident {
            source_identity: "192.168.1.10".to_string(),
            time_window_start: Utc::now(),
            label: "brute_force".to_string(),
            alert_count,
            avg_confidence: 0.9,
            severity,
            users: vec!["admin".to_string(), "root".to_string()],
            member_indices: (0..alert_count).collect(),
        }
    }

    #[test]
    fn test_severity_rank() {
        assert_eq!(Severity::High.rank(), 0);
        assert_eq!(Severity::Medium.rank(), 1);
        assert_eq!(Severity::Low.rank(), 2);
        assert!(Severity::High < Severity::Low);
        assert!(Severity::High.is_urgent());
        assert!(!Severity::Medium.is_urgent());
    }

    #[test]
    fn test_severity_string_forms() {
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Severity::from_str("MEDIUM").unwrap(), Severity::Medium);
        assert_eq!(Severity::from_str("low").unwrap(), Severity::Low);
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn test_rank_key_orders_by_severity_then_count() {
        let high_small = incident(Severity::High, 2);
        let high_large = incident(Severity::High, 9);
        let medium_huge = incident(Severity::Medium, 50);

        assert!(high_large.rank_key() < high_small.rank_key());
        assert!(high_small.rank_key() < medium_huge.rank_key());
    }

    #[test]
    fn test_user_count() {
        let inc = incident(Severity::Low, 3);
        assert_eq!(inc.user_count(), 2);
        assert!(!inc.is_critical());
    }
}
