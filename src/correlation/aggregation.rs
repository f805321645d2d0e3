use crate::correlation::models::Cluster;
use crate::models::{Alert, Incident};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Reduces clusters of alerts to ranked incidents
#[derive(Debug, Clone)]
pub struct IncidentAggregator {
    window: TimeDelta,
}

impl IncidentAggregator {
    pub fn new(window: TimeDelta) -> Self {
        Self { window }
    }

    /// Build one incident per cluster, ordered by severity then descending size.
    ///
    /// The sort is stable, so incidents that tie keep cluster order.
    pub fn aggregate(&self, alerts: &[Alert], clusters: &[Cluster]) -> Vec<Incident> {
        let mut incidents: Vec<Incident> = clusters
            .iter()
            .filter_map(|cluster| self.build_incident(alerts, cluster))
            .collect();

        incidents.sort_by_key(Incident::rank_key);
        incidents
    }

    fn build_incident(&self, alerts: &[Alert], cluster: &Cluster) -> Option<Incident> {
        let members: Vec<&Alert> = cluster
            .members
            .iter()
            .filter_map(|&index| alerts.get(index))
            .collect();
        let first = members.first()?;

        let source_identity = mode(members.iter().map(|a| a.source_identity.as_str()))?.to_string();
        let severity = mode(members.iter().map(|a| a.severity))?;

        let earliest = members.iter().map(|a| a.timestamp).min()?;
        let avg_confidence =
            members.iter().map(|a| a.confidence).sum::<f64>() / members.len() as f64;

        let mut seen = HashSet::new();
        let users: Vec<String> = members
            .iter()
            .filter(|a| seen.insert(a.actor.as_str()))
            .map(|a| a.actor.clone())
            .collect();

        Some(Incident {
            source_identity,
            time_window_start: self.window_start(earliest),
            label: first.label.clone(),
            alert_count: members.len(),
            avg_confidence,
            severity,
            users,
            member_indices: cluster.members.clone(),
        })
    }

    /// Floor a timestamp to the start of its epoch-aligned window
    pub fn window_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        // Truncation only fails past the nanosecond-representable range
        timestamp.duration_trunc(self.window).unwrap_or(timestamp)
    }
}

/// Most frequent value; ties go to the value seen first
fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}
