use crate::models::{ActionDetails, AutomationTier, ResponseAction};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;

fn entry(
    action: ResponseAction,
    priority: u8,
    automation: AutomationTier,
    description: &str,
    tools: &[&str],
) -> (ResponseAction, ActionDetails) {
    (
        action,
        ActionDetails {
            name: action.to_string(),
            priority,
            description: description.to_string(),
            automation,
            tools: tools.iter().map(|t| t.to_string()).collect(),
        },
    )
}

/// Static descriptors for every known response action
pub static ACTION_TABLE: Lazy<HashMap<ResponseAction, ActionDetails>> = Lazy::new(|| {
    use AutomationTier::*;
    use ResponseAction::*;

    HashMap::from([
        entry(
            BlockIp,
            1,
            Automated,
            "Block source IP address at firewall",
            &["Firewall", "IPS", "WAF"],
        ),
        entry(
            IsolateHost,
            1,
            Automated,
            "Quarantine infected host from network",
            &["NAC", "EDR", "Network segmentation"],
        ),
        entry(
            Escalate,
            2,
            SemiAutomated,
            "Escalate to senior SOC analyst or incident response team",
            &["SOAR", "Ticketing system", "PagerDuty"],
        ),
        entry(
            ResetPassword,
            2,
            Automated,
            "Force password reset for affected accounts",
            &["Active Directory", "IAM"],
        ),
        entry(
            DisableAccount,
            1,
            Automated,
            "Disable compromised user accounts",
            &["Active Directory", "IAM"],
        ),
        entry(
            Monitor,
            3,
            Automated,
            "Continue monitoring - no immediate action required",
            &["SIEM", "Log monitoring"],
        ),
        entry(
            ScanSystem,
            2,
            Automated,
            "Run full antivirus/EDR scan on affected systems",
            &["Antivirus", "EDR platform"],
        ),
        entry(
            BlockUrl,
            2,
            Automated,
            "Block malicious URLs/domains",
            &["Web proxy", "DNS filtering"],
        ),
        entry(
            RestoreBackup,
            1,
            Manual,
            "Restore systems from clean backup",
            &["Backup system", "Recovery tools"],
        ),
        entry(
            NotifyLegal,
            1,
            Manual,
            "Notify legal/compliance team for data breach",
            &["Email", "Incident management"],
        ),
    ])
});

/// Look up an action by name; unknown names get a routine placeholder
pub fn action_details(name: &str) -> ActionDetails {
    ResponseAction::from_str(name)
        .ok()
        .and_then(|action| ACTION_TABLE.get(&action).cloned())
        .unwrap_or_else(|| ActionDetails::unknown(name))
}

pub fn details_for(action: ResponseAction) -> ActionDetails {
    action_details(action.as_ref())
}

/// All known actions, most urgent first
pub fn all_actions() -> Vec<ActionDetails> {
    let mut actions: Vec<ActionDetails> = ACTION_TABLE.values().cloned().collect();
    actions.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
    actions
}
