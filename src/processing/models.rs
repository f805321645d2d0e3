use crate::correlation::CorrelationStats;
use crate::enrichment::ThreatIntel;
use crate::models::{Incident, ResponseDecision};
use crate::processing::summary::IncidentSummary;
use serde::{Deserialize, Serialize};

/// An incident together with its recommended response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriagedIncident {
    #[serde(flatten)]
    pub incident: Incident,

    #[serde(flatten)]
    pub response: ResponseDecision,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_intel: Option<ThreatIntel>,
}

/// Everything produced for one alert batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Incidents in severity/size order
    pub incidents: Vec<TriagedIncident>,
    pub summary: IncidentSummary,
    pub stats: CorrelationStats,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Incidents whose primary action is priority 1
    pub fn critical(&self) -> impl Iterator<Item = &TriagedIncident> {
        self.incidents
            .iter()
            .filter(|t| t.response.action_priority == 1)
    }
}
