use crate::models::{labels, Incident, ResponseAction, Severity};

/// Minimum average confidence treated as a confident classification
pub const HIGH_CONFIDENCE: f64 = 0.95;

/// Brute-force volume that warrants blocking the source
pub const BRUTE_FORCE_BLOCK_COUNT: usize = 20;

/// Brute-force volume that warrants a password reset
pub const BRUTE_FORCE_RESET_COUNT: usize = 10;

/// Medium-severity volume that warrants an analyst
pub const MEDIUM_ESCALATION_COUNT: usize = 15;

pub type IncidentPredicate = fn(&Incident) -> bool;

/// One entry of the primary decision table; the first matching rule wins
#[derive(Debug, Clone, Copy)]
pub struct PrimaryRule {
    pub name: &'static str,
    pub predicate: IncidentPredicate,
    pub action: ResponseAction,
}

impl PrimaryRule {
    pub fn matches(&self, incident: &Incident) -> bool {
        (self.predicate)(incident)
    }
}

/// One entry of the secondary table; derives a follow-up from the primary action
#[derive(Debug, Clone, Copy)]
pub struct SecondaryRule {
    pub name: &'static str,
    pub applies: IncidentPredicate,
    pub derive: fn(ResponseAction) -> ResponseAction,
}

impl SecondaryRule {
    pub fn matches(&self, incident: &Incident) -> bool {
        (self.applies)(incident)
    }
}

fn is(incident: &Incident, label: &str) -> bool {
    incident.label == label
}

fn confident(incident: &Incident) -> bool {
    incident.avg_confidence >= HIGH_CONFIDENCE
}

/// Label rules first, then severity fallbacks, then the catch-all
pub fn default_primary_rules() -> Vec<PrimaryRule> {
    use ResponseAction::*;

    vec![
        PrimaryRule {
            name: "ransomware",
            predicate: |i| is(i, labels::RANSOMWARE),
            action: IsolateHost,
        },
        PrimaryRule {
            name: "malware_confident",
            predicate: |i| is(i, labels::MALWARE) && confident(i),
            action: IsolateHost,
        },
        PrimaryRule {
            name: "malware",
            predicate: |i| is(i, labels::MALWARE),
            action: ScanSystem,
        },
        PrimaryRule {
            name: "brute_force_sustained",
            predicate: |i| is(i, labels::BRUTE_FORCE) && i.alert_count >= BRUTE_FORCE_BLOCK_COUNT,
            action: BlockIp,
        },
        PrimaryRule {
            name: "brute_force_repeated",
            predicate: |i| is(i, labels::BRUTE_FORCE) && i.alert_count >= BRUTE_FORCE_RESET_COUNT,
            action: ResetPassword,
        },
        PrimaryRule {
            name: "brute_force",
            predicate: |i| is(i, labels::BRUTE_FORCE),
            action: Monitor,
        },
        PrimaryRule {
            name: "phishing",
            predicate: |i| is(i, labels::PHISHING),
            action: BlockUrl,
        },
        PrimaryRule {
            name: "data_exfil",
            predicate: |i| is(i, labels::DATA_EXFIL),
            action: BlockIp,
        },
        PrimaryRule {
            name: "insider_threat_confident",
            predicate: |i| is(i, labels::INSIDER_THREAT) && confident(i),
            action: DisableAccount,
        },
        PrimaryRule {
            name: "insider_threat",
            predicate: |i| is(i, labels::INSIDER_THREAT),
            action: Escalate,
        },
        PrimaryRule {
            name: "ddos",
            predicate: |i| is(i, labels::DDOS),
            action: BlockIp,
        },
        PrimaryRule {
            name: "high_severity_confident",
            predicate: |i| i.severity == Severity::High && confident(i),
            action: BlockIp,
        },
        PrimaryRule {
            name: "high_severity",
            predicate: |i| i.severity == Severity::High,
            action: Escalate,
        },
        PrimaryRule {
            name: "medium_severity_volume",
            predicate: |i| i.severity == Severity::Medium && i.alert_count >= MEDIUM_ESCALATION_COUNT,
            action: Escalate,
        },
        PrimaryRule {
            name: "medium_severity",
            predicate: |i| i.severity == Severity::Medium,
            action: Monitor,
        },
        PrimaryRule {
            name: "default",
            predicate: |_| true,
            action: Monitor,
        },
    ]
}

/// Follow-up actions, evaluated after the primary action is fixed
pub fn default_secondary_rules() -> Vec<SecondaryRule> {
    use ResponseAction::*;

    vec![
        SecondaryRule {
            name: "ransomware",
            applies: |i| is(i, labels::RANSOMWARE),
            derive: |p| if p != NotifyLegal { NotifyLegal } else { RestoreBackup },
        },
        SecondaryRule {
            name: "data_exfil",
            applies: |i| is(i, labels::DATA_EXFIL),
            derive: |p| if p != Escalate { Escalate } else { NotifyLegal },
        },
        SecondaryRule {
            name: "malware",
            applies: |i| is(i, labels::MALWARE),
            derive: |p| if p != ScanSystem { ScanSystem } else { Escalate },
        },
        SecondaryRule {
            name: "brute_force_repeated",
            applies: |i| is(i, labels::BRUTE_FORCE) && i.alert_count >= BRUTE_FORCE_RESET_COUNT,
            derive: |p| if p != ResetPassword { ResetPassword } else { Monitor },
        },
        SecondaryRule {
            name: "insider_threat",
            applies: |i| is(i, labels::INSIDER_THREAT),
            derive: |_| Escalate,
        },
        SecondaryRule {
            name: "high_severity",
            applies: |i| i.severity == Severity::High,
            derive: |p| if p != Escalate { Escalate } else { Monitor },
        },
        SecondaryRule {
            name: "default",
            applies: |_| true,
            derive: |_| Monitor,
        },
    ]
}
