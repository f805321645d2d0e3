/// Response decisions: rule tables mapping incidents to recommended actions

pub mod actions;
pub mod engine;
pub mod rules;

pub use actions::{action_details, all_actions, details_for, ACTION_TABLE};
pub use engine::ResponseDecisionEngine;
pub use rules::{default_primary_rules, default_secondary_rules, PrimaryRule, SecondaryRule};
