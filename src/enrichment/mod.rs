/// Threat-intelligence enrichment for incidents
///
/// Attaches static context (category, risk level, typical impact, mitigation)
/// to each incident by label.

pub mod threat_intel;

pub use threat_intel::{ThreatIntel, ThreatIntelCatalog};
