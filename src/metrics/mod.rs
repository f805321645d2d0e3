//! Prometheus metrics for the correlation and response pipeline.
//!
//! Metrics are always recorded; they only become visible once [`init_metrics`]
//! registers them with [`PROMETHEUS_REGISTRY`].
//!
//! # Example
//! ```no_run
//! use soc_incident_engine::metrics::{init_metrics, gather_metrics, INCIDENTS_FORMED_TOTAL};
//!
//! init_metrics().expect("metrics registered once");
//! INCIDENTS_FORMED_TOTAL.with_label_values(&["HIGH"]).inc();
//! println!("{}", gather_metrics());
//! ```

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "soc_incident_engine";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Correlation Metrics
    // ============================================================================

    /// Alerts entering correlation
    ///
    /// Labels: kind (threat, normal)
    pub static ref ALERTS_PROCESSED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("alerts_processed_total", "Total number of alerts analysed")
            .namespace(NAMESPACE),
        &["kind"]
    ).expect("Failed to create ALERTS_PROCESSED_TOTAL metric");

    /// Candidate pairs produced by the pair generator
    pub static ref CANDIDATE_PAIRS_TOTAL: Counter = Counter::with_opts(
        Opts::new("candidate_pairs_total", "Total number of candidate pairs generated")
            .namespace(NAMESPACE)
    ).expect("Failed to create CANDIDATE_PAIRS_TOTAL metric");

    /// Pairs scored at or above the correlation threshold
    pub static ref ACCEPTED_PAIRS_TOTAL: Counter = Counter::with_opts(
        Opts::new("accepted_pairs_total", "Total number of pairs accepted by the scorer")
            .namespace(NAMESPACE)
    ).expect("Failed to create ACCEPTED_PAIRS_TOTAL metric");

    /// Incidents formed
    ///
    /// Labels: severity
    pub static ref INCIDENTS_FORMED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("incidents_formed_total", "Total number of incidents formed")
            .namespace(NAMESPACE),
        &["severity"]
    ).expect("Failed to create INCIDENTS_FORMED_TOTAL metric");

    // ============================================================================
    // Scorer Metrics
    // ============================================================================

    /// Scorer batch latency in seconds
    ///
    /// Labels: scorer
    pub static ref SCORER_BATCH_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "scorer_batch_duration_seconds",
            "Time to score one batch of candidate pairs"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["scorer"]
    ).expect("Failed to create SCORER_BATCH_DURATION_SECONDS metric");

    /// Scorer failures (each one aborts a correlation run)
    ///
    /// Labels: scorer
    pub static ref SCORER_FAILURES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("scorer_failures_total", "Total number of failed scorer batches")
            .namespace(NAMESPACE),
        &["scorer"]
    ).expect("Failed to create SCORER_FAILURES_TOTAL metric");

    // ============================================================================
    // Response Metrics
    // ============================================================================

    /// Primary actions recommended
    ///
    /// Labels: action, priority
    pub static ref RESPONSE_ACTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("response_actions_total", "Total number of primary actions recommended")
            .namespace(NAMESPACE),
        &["action", "priority"]
    ).expect("Failed to create RESPONSE_ACTIONS_TOTAL metric");

    /// End-to-end batch analysis duration in seconds
    pub static ref PIPELINE_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pipeline_duration_seconds",
            "Time to correlate and triage one alert batch"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0])
    ).expect("Failed to create PIPELINE_DURATION_SECONDS metric");
}

/// Register all metrics with the global registry; call once at startup
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(ALERTS_PROCESSED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(CANDIDATE_PAIRS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ACCEPTED_PAIRS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(INCIDENTS_FORMED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SCORER_BATCH_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SCORER_FAILURES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(RESPONSE_ACTIONS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(PIPELINE_DURATION_SECONDS.clone()))?;

    tracing::info!("Prometheus metrics registered");
    Ok(())
}

/// Encode the registry in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration_and_export() {
        init_metrics().unwrap();
        // A second registration is rejected rather than duplicated
        assert!(init_metrics().is_err());

        ALERTS_PROCESSED_TOTAL.with_label_values(&["threat"]).inc();
        RESPONSE_ACTIONS_TOTAL.with_label_values(&["BLOCK_IP", "1"]).inc();

        let exported = gather_metrics();
        assert!(exported.contains("soc_incident_engine_alerts_processed_total"));
        assert!(exported.contains("soc_incident_engine_response_actions_total"));
    }
}
