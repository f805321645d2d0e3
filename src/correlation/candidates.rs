use crate::correlation::models::{describe_pair, CandidatePair};
use crate::models::Alert;
use chrono::TimeDelta;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Produces the same-label alert pairs that fall inside the correlation window
#[derive(Debug, Clone)]
pub struct CandidatePairGenerator {
    window: TimeDelta,
}

impl CandidatePairGenerator {
    pub fn new(window: TimeDelta) -> Self {
        Self { window }
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Group the indices of non-"normal" alerts by label, in label order
    pub fn label_groups(alerts: &[Alert]) -> BTreeMap<&str, Vec<usize>> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, alert) in alerts.iter().enumerate() {
            if alert.is_threat() {
                groups.entry(alert.label.as_str()).or_default().push(index);
            }
        }
        groups
    }

    /// Generate all candidate pairs for a batch.
    ///
    /// Equivalent to filtering every same-label pair by `delta <= window`, but each
    /// group is scanned in time order and the inner scan stops at the first alert
    /// beyond the window. Groups are independent and processed in parallel; output
    /// is ordered by label, then by scan order within the group.
    pub fn generate(&self, alerts: &[Alert]) -> Vec<CandidatePair> {
        let groups: Vec<(&str, Vec<usize>)> = Self::label_groups(alerts).into_iter().collect();

        let per_group: Vec<Vec<CandidatePair>> = groups
            .par_iter()
            .map(|(label, members)| self.pairs_for_group(alerts, label, members))
            .collect();

        per_group.into_iter().flatten().collect()
    }

    fn pairs_for_group(&self, alerts: &[Alert], label: &str, members: &[usize]) -> Vec<CandidatePair> {
        let mut ordered = members.to_vec();
        ordered.sort_by_key(|&index| (alerts[index].timestamp, index));

        let mut pairs = Vec::new();
        for (position, &i) in ordered.iter().enumerate() {
            for &j in &ordered[position + 1..] {
                let delta = alerts[j].timestamp - alerts[i].timestamp;
                // Sorted by time: everything after j is even farther away
                if delta > self.window {
                    break;
                }

                let (first, second) = if i < j { (i, j) } else { (j, i) };
                let first_source = alerts[first].source_identity.clone();
                let second_source = alerts[second].source_identity.clone();

                pairs.push(CandidatePair {
                    first,
                    second,
                    label: label.to_string(),
                    time_delta: delta,
                    earliest: alerts[i].timestamp,
                    description: describe_pair(label, &first_source, &second_source, delta),
                    first_source,
                    second_source,
                });
            }
        }

        debug!(
            label = label,
            members = members.len(),
            pairs = pairs.len(),
            "Generated candidate pairs for label group"
        );

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{labels, Severity};
    use chrono::{DateTime, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 4, 10, 0, 0).unwrap()
    }

    fn alert_at(offset_secs: i64, label: &str, source: &str) -> Alert {
        Alert::new(
            base_time() + TimeDelta::seconds(offset_secs),
            "admin".to_string(),
            source.to_string(),
            label.to_string(),
            0.9,
            Severity::Medium,
        )
    }

    fn five_minutes() -> CandidatePairGenerator {
        CandidatePairGenerator::new(TimeDelta::minutes(5))
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let alerts = vec![
            alert_at(0, labels::BRUTE_FORCE, "10.0.0.1"),
            alert_at(300, labels::BRUTE_FORCE, "10.0.0.1"),
        ];
        let pairs = five_minutes().generate(&alerts);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].time_delta, TimeDelta::minutes(5));
    }

    #[test]
    fn test_window_boundary_exclusive_past_window() {
        let alerts = vec![
            alert_at(0, labels::BRUTE_FORCE, "10.0.0.1"),
            alert_at(301, labels::BRUTE_FORCE, "10.0.0.1"),
        ];
        assert!(five_minutes().generate(&alerts).is_empty());
    }

    #[test]
    fn test_normal_alerts_never_paired() {
        let alerts = vec![
            alert_at(0, labels::NORMAL, "10.0.0.1"),
            alert_at(10, labels::NORMAL, "10.0.0.1"),
            alert_at(20, labels::MALWARE, "10.0.0.1"),
        ];
        assert!(five_minutes().generate(&alerts).is_empty());
        assert_eq!(CandidatePairGenerator::label_groups(&alerts).len(), 1);
    }

    #[test]
    fn test_labels_are_never_mixed() {
        let alerts = vec![
            alert_at(0, labels::MALWARE, "10.0.0.1"),
            alert_at(5, labels::PHISHING, "10.0.0.1"),
            alert_at(10, labels::MALWARE, "10.0.0.1"),
        ];
        let pairs = five_minutes().generate(&alerts);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].first, pairs[0].second), (0, 2));
        assert_eq!(pairs[0].label, labels::MALWARE);
    }

    #[test]
    fn test_indices_ordered_when_timestamps_are_not() {
        let alerts = vec![
            alert_at(120, labels::DDOS, "10.0.0.9"),
            alert_at(0, labels::DDOS, "10.0.0.1"),
        ];
        let pairs = five_minutes().generate(&alerts);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].first, pairs[0].second), (0, 1));
        assert_eq!(pairs[0].earliest, base_time());
        assert_eq!(pairs[0].first_source, "10.0.0.9");
        assert_eq!(
            pairs[0].description,
            "Threat ddos between 10.0.0.9 and 10.0.0.1. Time difference 2 minutes."
        );
    }

    #[test]
    fn test_matches_exhaustive_filtering() {
        // Irregular spacing across two labels, with duplicate timestamps
        let offsets = [0, 40, 40, 250, 299, 300, 610, 611, 900, 1300, 1301, 1500];
        let alerts: Vec<Alert> = offsets
            .iter()
            .enumerate()
            .map(|(n, &offset)| {
                let label = if n % 3 == 0 { labels::PHISHING } else { labels::BRUTE_FORCE };
                alert_at(offset, label, "10.0.0.1")
            })
            .collect();

        let window = TimeDelta::minutes(5);
        let mut expected = Vec::new();
        for i in 0..alerts.len() {
            for j in (i + 1)..alerts.len() {
                let delta = (alerts[j].timestamp - alerts[i].timestamp).abs();
                if alerts[i].label == alerts[j].label && delta <= window {
                    expected.push((i, j));
                }
            }
        }

        let mut generated: Vec<(usize, usize)> = CandidatePairGenerator::new(window)
            .generate(&alerts)
            .iter()
            .map(|p| (p.first, p.second))
            .collect();
        generated.sort();
        expected.sort();

        assert_eq!(generated, expected);
    }

    #[test]
    fn test_output_is_deterministic() {
        let alerts: Vec<Alert> = (0..40)
            .map(|n| {
                let label = [labels::MALWARE, labels::DDOS, labels::PHISHING][n % 3];
                alert_at((n as i64 * 37) % 600, label, &format!("10.0.0.{}", n % 4))
            })
            .collect();

        let generator = five_minutes();
        assert_eq!(generator.generate(&alerts), generator.generate(&alerts));
    }

    #[test]
    fn test_empty_batch() {
        assert!(five_minutes().generate(&[]).is_empty());
    }
}
