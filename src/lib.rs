//! Security alert correlation and response decision engine.
//!
//! Takes a batch of classified alerts, groups related ones into incidents and
//! recommends a response for each incident.
//!
//! ```no_run
//! use soc_incident_engine::{config::Config, ingestion::AlertNormalizer, processing::TriagePipeline};
//!
//! # async fn run(input: &str) -> soc_incident_engine::Result<()> {
//! let config = Config::load(None)?;
//! let normalizer = AlertNormalizer::new(soc_incident_engine::severity::SeverityPolicy::from_config(&config.severity));
//! let alerts = normalizer.parse_json(input)?.alerts;
//!
//! let report = TriagePipeline::from_config(&config)?.analyze(&alerts).await?;
//! for triaged in &report.incidents {
//!     println!("{} -> {}", triaged.incident.label, triaged.response.primary_action);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod correlation;
pub mod enrichment;
pub mod error;
pub mod ingestion;
pub mod metrics;
pub mod models;
pub mod processing;
pub mod response;
pub mod severity;

pub use error::{AppError, Result};
