/// Batch triage: correlation, response decisions, enrichment and reporting

pub mod models;
pub mod pipeline;
pub mod summary;

pub use models::{AnalysisReport, TriagedIncident};
pub use pipeline::TriagePipeline;
pub use summary::{render_report, IncidentSummary};
