use crate::config::{Config, CorrelationConfig};
use crate::correlation::{build_scorer, CorrelationEngine, CorrelationScorer};
use crate::enrichment::ThreatIntelCatalog;
use crate::error::Result;
use crate::metrics::PIPELINE_DURATION_SECONDS;
use crate::models::Alert;
use crate::processing::models::{AnalysisReport, TriagedIncident};
use crate::processing::summary::IncidentSummary;
use crate::response::ResponseDecisionEngine;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Correlates a batch of alerts and attaches a response to every incident
pub struct TriagePipeline {
    correlation: CorrelationEngine,
    response: ResponseDecisionEngine,
    threat_intel: Option<ThreatIntelCatalog>,
}

impl TriagePipeline {
    pub fn new(config: CorrelationConfig, scorer: Arc<dyn CorrelationScorer>) -> Result<Self> {
        Ok(Self {
            correlation: CorrelationEngine::new(config, scorer)?,
            response: ResponseDecisionEngine::new(),
            threat_intel: None,
        })
    }

    /// Build the pipeline described by the application config, with threat intel
    pub fn from_config(config: &Config) -> Result<Self> {
        let scorer = build_scorer(config)?;
        Ok(Self::new(config.correlation.clone(), scorer)?.with_threat_intel(ThreatIntelCatalog::builtin()))
    }

    pub fn with_threat_intel(mut self, catalog: ThreatIntelCatalog) -> Self {
        self.threat_intel = Some(catalog);
        self
    }

    pub fn with_response_engine(mut self, engine: ResponseDecisionEngine) -> Self {
        self.response = engine;
        self
    }

    pub fn correlation_engine(&self) -> &CorrelationEngine {
        &self.correlation
    }

    /// Analyse one batch.
    ///
    /// Incidents keep the correlation order (severity, then size). A scorer failure
    /// fails the whole batch and no partial report is produced.
    pub async fn analyze(&self, alerts: &[Alert]) -> Result<AnalysisReport> {
        let timer = Instant::now();

        let correlation = self.correlation.correlate(alerts).await?;

        let incidents: Vec<TriagedIncident> = correlation
            .incidents
            .into_iter()
            .map(|incident| {
                let response = self.response.decide(&incident);
                let threat_intel = self.threat_intel.as_ref().map(|catalog| catalog.enrich(&incident));
                TriagedIncident {
                    incident,
                    response,
                    threat_intel,
                }
            })
            .collect();

        let summary = IncidentSummary::from_incidents(&incidents, alerts.len());
        PIPELINE_DURATION_SECONDS.observe(timer.elapsed().as_secs_f64());

        info!(
            alerts = alerts.len(),
            incidents = incidents.len(),
            critical_actions = summary.critical_actions,
            "Batch triaged"
        );

        Ok(AnalysisReport {
            incidents,
            summary,
            stats: correlation.stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::HeuristicScorer;
    use crate::models::{labels, ResponseAction, Severity};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn alert(offset_secs: i64, label: &str, source: &str, severity: Severity) -> Alert {
        Alert::new(
            Utc.with_ymd_and_hms(2026, 1, 4, 10, 0, 0).unwrap() + TimeDelta::seconds(offset_secs),
            "admin".to_string(),
            source.to_string(),
            label.to_string(),
            0.99,
            severity,
        )
    }

    #[tokio::test]
    async fn test_analyze_attaches_responses_and_intel() {
        let pipeline = TriagePipeline::from_config(&Config::default()).unwrap();
        let alerts = vec![
            alert(0, labels::RANSOMWARE, "10.0.0.5", Severity::High),
            alert(30, labels::PHISHING, "10.0.0.6", Severity::Medium),
            alert(40, labels::NORMAL, "10.0.0.6", Severity::Low),
        ];

        let report = pipeline.analyze(&alerts).await.unwrap();
        assert_eq!(report.incidents.len(), 2);
        assert_eq!(report.incidents[0].response.primary_action, ResponseAction::IsolateHost);
        assert_eq!(report.incidents[1].response.primary_action, ResponseAction::BlockUrl);
        assert_eq!(
            report.incidents[0].threat_intel.as_ref().unwrap().category,
            "Extortion Malware"
        );
        assert_eq!(report.summary.total_alerts, 3);
        assert_eq!(report.stats.threat_alerts, 2);
    }

    #[tokio::test]
    async fn test_threat_intel_is_optional() {
        let pipeline = TriagePipeline::new(CorrelationConfig::default(), Arc::new(HeuristicScorer::new())).unwrap();
        let report = pipeline
            .analyze(&[alert(0, labels::DDOS, "10.0.0.1", Severity::Medium)])
            .await
            .unwrap();
        assert!(report.incidents[0].threat_intel.is_none());
    }
}
