use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Named response actions the decision engine can recommend
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseAction {
    BlockIp,
    IsolateHost,
    Escalate,
    ResetPassword,
    DisableAccount,
    Monitor,
    ScanSystem,
    BlockUrl,
    RestoreBackup,
    NotifyLegal,
}

/// How far an action can be carried out without an analyst
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AutomationTier {
    Manual,
    SemiAutomated,
    Automated,
    Unknown,
}

/// Static descriptor of a response action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDetails {
    pub name: String,

    /// 1 = critical, 2 = high, 3 = routine
    pub priority: u8,

    pub description: String,

    pub automation: AutomationTier,

    /// Tooling typically used to carry the action out
    pub tools: Vec<String>,
}

impl ActionDetails {
    /// Descriptor returned for names missing from the action table
    pub fn unknown(name: &str) -> Self {
        Self {
            name: name.to_string(),
            priority: 3,
            description: "Unknown action".to_string(),
            automation: AutomationTier::Unknown,
            tools: Vec::new(),
        }
    }

    /// Check if the action is priority 1
    pub fn is_critical(&self) -> bool {
        self.priority == 1
    }
}

/// Recommended response for one incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDecision {
    pub primary_action: ResponseAction,
    pub secondary_action: ResponseAction,
    pub action_priority: u8,
    pub automation_tier: AutomationTier,
    pub action_description: String,

    /// Name of the primary rule that fired
    pub matched_rule: String,
}
