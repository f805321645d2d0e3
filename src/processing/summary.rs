use crate::models::Severity;
use crate::processing::models::{AnalysisReport, TriagedIncident};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Aggregate figures for one analysed batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentSummary {
    pub total_alerts: usize,
    pub total_incidents: usize,

    pub high_severity: usize,
    pub medium_severity: usize,
    pub low_severity: usize,

    /// Incidents per label
    pub threat_breakdown: BTreeMap<String, usize>,

    pub avg_alerts_per_incident: f64,
    pub max_alerts_in_incident: usize,

    /// Input alerts per incident; 0 when there are no incidents
    pub reduction_ratio: f64,

    /// Incidents whose primary action has priority 1, 2 and 3
    pub critical_actions: usize,
    pub high_priority_actions: usize,
    pub routine_actions: usize,
}

impl IncidentSummary {
    pub fn from_incidents(incidents: &[TriagedIncident], total_alerts: usize) -> Self {
        let mut summary = IncidentSummary {
            total_alerts,
            total_incidents: incidents.len(),
            ..Default::default()
        };

        if incidents.is_empty() {
            return summary;
        }

        let mut alert_total = 0usize;
        for triaged in incidents {
            let incident = &triaged.incident;
            match incident.severity {
                Severity::High => summary.high_severity += 1,
                Severity::Medium => summary.medium_severity += 1,
                Severity::Low => summary.low_severity += 1,
            }
            *summary
                .threat_breakdown
                .entry(incident.label.clone())
                .or_insert(0) += 1;

            alert_total += incident.alert_count;
            summary.max_alerts_in_incident = summary.max_alerts_in_incident.max(incident.alert_count);

            match triaged.response.action_priority {
                1 => summary.critical_actions += 1,
                2 => summary.high_priority_actions += 1,
                _ => summary.routine_actions += 1,
            }
        }

        summary.avg_alerts_per_incident = alert_total as f64 / incidents.len() as f64;
        summary.reduction_ratio = total_alerts as f64 / incidents.len() as f64;
        summary
    }
}

const RULE_WIDTH: usize = 100;

/// Render an analysis as a plain-text report
pub fn render_report(report: &AnalysisReport) -> String {
    report.to_string()
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(f, "{}", heavy)?;
        writeln!(f, "SECURITY INCIDENTS REPORT")?;
        writeln!(f, "{}", heavy)?;

        if self.incidents.is_empty() {
            writeln!(f, "No incidents detected")?;
        } else {
            writeln!(
                f,
                "{:<16} {:<20} {:<6} {:<15} {:<7} {:<11} {:<9} {:<16} {}",
                "Source", "Time Window", "Users", "Threat Type", "Alerts", "Confidence", "Severity", "Primary", "Secondary"
            )?;
            writeln!(f, "{}", light)?;

            for triaged in &self.incidents {
                let incident = &triaged.incident;
                writeln!(
                    f,
                    "{:<16} {:<20} {:<6} {:<15} {:<7} {:<11.3} {:<9} {:<16} {}",
                    incident.source_identity,
                    incident.time_window_start.format("%Y-%m-%d %H:%M:%S").to_string(),
                    incident.user_count(),
                    incident.label,
                    incident.alert_count,
                    incident.avg_confidence,
                    incident.severity.to_string(),
                    triaged.response.primary_action.to_string(),
                    triaged.response.secondary_action,
                )?;
            }

            let with_intel: Vec<&TriagedIncident> = self
                .incidents
                .iter()
                .filter(|t| t.threat_intel.is_some())
                .collect();
            if !with_intel.is_empty() {
                writeln!(f, "\nTHREAT INTELLIGENCE")?;
                for (n, triaged) in with_intel.iter().enumerate() {
                    if let Some(intel) = &triaged.threat_intel {
                        writeln!(f, "{}", light)?;
                        writeln!(
                            f,
                            "#{} {} from {}",
                            n + 1,
                            triaged.incident.label.to_uppercase(),
                            triaged.incident.source_identity
                        )?;
                        writeln!(f, "  Category:    {}", intel.category)?;
                        writeln!(f, "  Risk Level:  {}", intel.risk_level)?;
                        writeln!(f, "  Description: {}", intel.description)?;
                        writeln!(f, "  Impact:      {}", intel.typical_impact)?;
                        writeln!(f, "  Mitigation:  {}", intel.mitigation)?;
                        writeln!(
                            f,
                            "  Response:    {} (priority {}, {})",
                            triaged.response.action_description,
                            triaged.response.action_priority,
                            triaged.response.automation_tier
                        )?;
                    }
                }
            }
        }

        let summary = &self.summary;
        writeln!(f, "\n{}", heavy)?;
        writeln!(f, "PIPELINE SUMMARY")?;
        writeln!(f, "{}", heavy)?;
        writeln!(f, "Total Alerts Processed:    {}", summary.total_alerts)?;
        writeln!(f, "Total Incidents Detected:  {}", summary.total_incidents)?;
        writeln!(f, "Incident Reduction Ratio:  {:.1}x", summary.reduction_ratio)?;
        writeln!(f, "Candidate Pairs Scored:    {}", self.stats.candidate_pairs)?;
        writeln!(f, "Pairs Accepted:            {}", self.stats.accepted_pairs)?;

        if !summary.threat_breakdown.is_empty() {
            let mut breakdown: Vec<(&String, &usize)> = summary.threat_breakdown.iter().collect();
            breakdown.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            writeln!(f, "\nIncidents by Threat Type:")?;
            for (label, count) in breakdown {
                writeln!(f, "  {:<15} {} incident(s)", label, count)?;
            }
        }

        writeln!(f, "\nIncidents by Severity:")?;
        writeln!(f, "  {:<15} {} incident(s)", "HIGH", summary.high_severity)?;
        writeln!(f, "  {:<15} {} incident(s)", "MEDIUM", summary.medium_severity)?;
        writeln!(f, "  {:<15} {} incident(s)", "LOW", summary.low_severity)?;

        writeln!(f, "\nActions by Priority:")?;
        writeln!(f, "  {:<15} {}", "Critical (1)", summary.critical_actions)?;
        writeln!(f, "  {:<15} {}", "High (2)", summary.high_priority_actions)?;
        writeln!(f, "  {:<15} {}", "Routine (3)", summary.routine_actions)?;
        writeln!(f, "{}", heavy)?;

        Ok(())
    }
}
