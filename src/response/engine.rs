use crate::metrics::RESPONSE_ACTIONS_TOTAL;
use crate::models::{Incident, ResponseAction, ResponseDecision};
use crate::response::actions::action_details;
use crate::response::rules::{default_primary_rules, default_secondary_rules, PrimaryRule, SecondaryRule};
use tracing::debug;

/// Rule name reported when no primary rule matches
const FALLBACK_RULE: &str = "fallback";

/// Maps incidents to recommended response actions.
///
/// Stateless: each decision depends only on the incident and the rule tables.
#[derive(Debug, Clone)]
pub struct ResponseDecisionEngine {
    primary_rules: Vec<PrimaryRule>,
    secondary_rules: Vec<SecondaryRule>,
}

impl ResponseDecisionEngine {
    pub fn new() -> Self {
        Self::with_rules(default_primary_rules(), default_secondary_rules())
    }

    pub fn with_rules(primary_rules: Vec<PrimaryRule>, secondary_rules: Vec<SecondaryRule>) -> Self {
        Self {
            primary_rules,
            secondary_rules,
        }
    }

    pub fn primary_rules(&self) -> &[PrimaryRule] {
        &self.primary_rules
    }

    /// First matching primary rule, with its name
    pub fn primary_action(&self, incident: &Incident) -> (ResponseAction, &'static str) {
        self.primary_rules
            .iter()
            .find(|rule| rule.matches(incident))
            .map(|rule| (rule.action, rule.name))
            .unwrap_or((ResponseAction::Monitor, FALLBACK_RULE))
    }

    pub fn secondary_action(&self, incident: &Incident, primary: ResponseAction) -> ResponseAction {
        self.secondary_rules
            .iter()
            .find(|rule| rule.matches(incident))
            .map(|rule| (rule.derive)(primary))
            .unwrap_or(ResponseAction::Monitor)
    }

    /// Decide the response for one incident
    pub fn decide(&self, incident: &Incident) -> ResponseDecision {
        let (primary, rule) = self.primary_action(incident);
        let secondary = self.secondary_action(incident, primary);
        let details = action_details(primary.as_ref());

        RESPONSE_ACTIONS_TOTAL
            .with_label_values(&[primary.as_ref(), details.priority.to_string().as_str()])
            .inc();

        debug!(
            label = %incident.label,
            severity = %incident.severity,
            alert_count = incident.alert_count,
            rule = rule,
            primary = %primary,
            secondary = %secondary,
            "Response decided"
        );

        ResponseDecision {
            primary_action: primary,
            secondary_action: secondary,
            action_priority: details.priority,
            automation_tier: details.automation,
            action_description: details.description,
            matched_rule: rule.to_string(),
        }
    }

    /// Decide for every incident, preserving order
    pub fn decide_all(&self, incidents: &[Incident]) -> Vec<ResponseDecision> {
        incidents.iter().map(|incident| self.decide(incident)).collect()
    }
}

impl Default for ResponseDecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}
