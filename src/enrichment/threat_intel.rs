use crate::models::{labels, Incident};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static threat-intelligence context for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatIntel {
    pub category: String,
    pub description: String,
    pub indicators: Vec<String>,

    /// HIGH, MEDIUM, LOW or UNKNOWN
    pub risk_level: String,

    pub typical_impact: String,
    pub mitigation: String,
}

impl ThreatIntel {
    fn new(
        category: &str,
        description: &str,
        indicators: &[&str],
        risk_level: &str,
        typical_impact: &str,
        mitigation: &str,
    ) -> Self {
        Self {
            category: category.to_string(),
            description: description.to_string(),
            indicators: indicators.iter().map(|i| i.to_string()).collect(),
            risk_level: risk_level.to_string(),
            typical_impact: typical_impact.to_string(),
            mitigation: mitigation.to_string(),
        }
    }

    /// Context for labels the catalog does not know
    pub fn unknown() -> Self {
        Self::new(
            "Unknown",
            "No threat intelligence available",
            &[],
            "UNKNOWN",
            "Unknown",
            "Manual investigation required",
        )
    }

    pub fn is_known(&self) -> bool {
        self.risk_level != "UNKNOWN"
    }
}

static BUILTIN_INTEL: Lazy<BTreeMap<String, ThreatIntel>> = Lazy::new(|| {
    BTreeMap::from([
        (
            labels::BRUTE_FORCE.to_string(),
            ThreatIntel::new(
                "Authentication Attack",
                "Multiple failed login attempts indicating password guessing or credential stuffing",
                &["Failed authentication", "Invalid credentials", "Account lockout"],
                "MEDIUM",
                "Account compromise, unauthorized access",
                "Implement account lockout policies, enable MFA, monitor failed login patterns",
            ),
        ),
        (
            labels::MALWARE.to_string(),
            ThreatIntel::new(
                "Malicious Software",
                "Detected malware activity including trojans, viruses, or malicious code execution",
                &["Malware signature match", "Suspicious process execution", "File hash match"],
                "HIGH",
                "System compromise, data theft, ransomware deployment",
                "Isolate affected systems, run full antivirus scan, analyze malware sample",
            ),
        ),
        (
            labels::PHISHING.to_string(),
            ThreatIntel::new(
                "Social Engineering",
                "Phishing attempt detected - fraudulent communication to steal credentials or data",
                &["Suspicious email links", "Credential harvesting page", "Domain spoofing"],
                "MEDIUM",
                "Credential theft, business email compromise, financial fraud",
                "Block malicious URLs, user security awareness training, email filtering",
            ),
        ),
        (
            labels::DDOS.to_string(),
            ThreatIntel::new(
                "Denial of Service",
                "Distributed denial of service attack - flood of traffic to overwhelm services",
                &["Abnormal traffic volume", "Service degradation", "Multiple source IPs"],
                "MEDIUM",
                "Service unavailability, business disruption, revenue loss",
                "Enable DDoS protection, rate limiting, traffic filtering, CDN deployment",
            ),
        ),
        (
            labels::RANSOMWARE.to_string(),
            ThreatIntel::new(
                "Extortion Malware",
                "Ransomware detected - malware that encrypts files and demands payment",
                &["File encryption activity", "Ransom note detected", "Mass file modification"],
                "HIGH",
                "Data encryption, business operations halt, financial extortion",
                "IMMEDIATE ISOLATION, restore from backups, do not pay ransom, contact authorities",
            ),
        ),
        (
            labels::DATA_EXFIL.to_string(),
            ThreatIntel::new(
                "Data Breach",
                "Unauthorized data exfiltration - sensitive data being transmitted to external location",
                &["Large data transfers", "Unusual network traffic", "External connections"],
                "HIGH",
                "Data breach, intellectual property theft, regulatory violations",
                "Block external connections, review DLP policies, investigate data access logs",
            ),
        ),
        (
            labels::INSIDER_THREAT.to_string(),
            ThreatIntel::new(
                "Insider Activity",
                "Suspicious insider activity - authorized user acting maliciously or negligently",
                &["Privilege escalation", "After-hours access", "Data hoarding"],
                "HIGH",
                "Data theft, sabotage, privilege abuse, competitive intelligence loss",
                "Review user permissions, investigate user activity, disable account if needed",
            ),
        ),
        (
            labels::NORMAL.to_string(),
            ThreatIntel::new(
                "Normal Activity",
                "Standard system or user activity with no security concerns",
                &["Normal login", "Standard operations", "Expected behavior"],
                "LOW",
                "None",
                "No action required - continue monitoring",
            ),
        ),
    ])
});

/// Label-keyed threat-intelligence lookup
#[derive(Debug, Clone)]
pub struct ThreatIntelCatalog {
    entries: BTreeMap<String, ThreatIntel>,
}

impl ThreatIntelCatalog {
    /// Catalog with the built-in entries for every known label
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_INTEL.clone(),
        }
    }

    /// Add or replace the entry for a label
    pub fn with_entry(mut self, label: impl Into<String>, intel: ThreatIntel) -> Self {
        self.entries.insert(label.into(), intel);
        self
    }

    pub fn lookup(&self, label: &str) -> ThreatIntel {
        self.entries
            .get(label)
            .cloned()
            .unwrap_or_else(ThreatIntel::unknown)
    }

    pub fn enrich(&self, incident: &Incident) -> ThreatIntel {
        self.lookup(&incident.label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ThreatIntelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
