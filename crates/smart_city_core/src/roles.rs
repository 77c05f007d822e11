//! crates/smart_city_core/src/roles.rs
//!
//! The roles a dashboard user can pick and the views each role may open.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Citizen,
    CityPlanner,
    Administrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    PolicySummarizer,
    TrafficAnalysis,
    WasteManagement,
    EnergyConsumption,
    ChatAssistant,
    CitizenFeedback,
    FeedbackReview,
}

const CITIZEN_VIEWS: &[View] = &[
    View::Home,
    View::PolicySummarizer,
    View::TrafficAnalysis,
    View::WasteManagement,
    View::EnergyConsumption,
    View::ChatAssistant,
    View::CitizenFeedback,
];

const PLANNER_VIEWS: &[View] = CITIZEN_VIEWS;

const ADMINISTRATOR_VIEWS: &[View] = &[
    View::Home,
    View::PolicySummarizer,
    View::TrafficAnalysis,
    View::WasteManagement,
    View::EnergyConsumption,
    View::ChatAssistant,
    View::CitizenFeedback,
    View::FeedbackReview,
];

impl Role {
    pub const ALL: [Role; 3] = [Role::Citizen, Role::CityPlanner, Role::Administrator];

    /// The views this role may open, in navigation order.
    pub fn views(&self) -> &'static [View] {
        match self {
            Role::Citizen => CITIZEN_VIEWS,
            Role::CityPlanner => PLANNER_VIEWS,
            Role::Administrator => ADMINISTRATOR_VIEWS,
        }
    }

    pub fn can(&self, view: View) -> bool {
        self.views().contains(&view)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Citizen => "Citizen",
            Role::CityPlanner => "City Planner",
            Role::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "citizen" => Ok(Role::Citizen),
            "city planner" | "planner" => Ok(Role::CityPlanner),
            "administrator" | "admin" => Ok(Role::Administrator),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl View {
    pub fn slug(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::PolicySummarizer => "policy_summarizer",
            View::TrafficAnalysis => "traffic_analysis",
            View::WasteManagement => "waste_management",
            View::EnergyConsumption => "energy_consumption",
            View::ChatAssistant => "chat_assistant",
            View::CitizenFeedback => "citizen_feedback",
            View::FeedbackReview => "feedback_review",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_aliases() {
        assert_eq!("Citizen".parse::<Role>().unwrap(), Role::Citizen);
        assert_eq!("City Planner".parse::<Role>().unwrap(), Role::CityPlanner);
        assert_eq!("city_planner".parse::<Role>().unwrap(), Role::CityPlanner);
        assert_eq!(" ADMIN ".parse::<Role>().unwrap(), Role::Administrator);
        assert!("mayor".parse::<Role>().is_err());
        for role in Role::ALL {
            assert_eq!(role.label().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn only_administrators_review_feedback() {
        assert!(Role::Administrator.can(View::FeedbackReview));
        assert!(!Role::Citizen.can(View::FeedbackReview));
        assert!(!Role::CityPlanner.can(View::FeedbackReview));
    }

    #[test]
    fn every_role_gets_the_shared_views() {
        for role in Role::ALL {
            for view in [View::Home, View::PolicySummarizer, View::ChatAssistant, View::CitizenFeedback] {
                assert!(role.can(view), "{role} should see {view:?}");
            }
        }
    }
}
