use serde::{Deserialize, Serialize};

use crate::definition::scenario::{
    Category, Difficulty, PopoverSide, ScenarioDefinition, ScenarioStep, DEFAULT_STEP_DELAY_MS,
};

/// One stop on a tour: spotlight and explain, nothing scripted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourStep {
    pub target: String,
    pub title: String,
    pub content: String,

    #[serde(default)]
    pub placement: PopoverSide,

    #[serde(default)]
    pub route: Option<String>,
}

/// A single-pass onboarding walkthrough. Structurally a scenario whose
/// steps carry no actions, validation, or auto-fill, and it is run as one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<TourStep>,
}

impl TourDefinition {
    /// View the tour as a restricted scenario so the registry, runner,
    /// and overlay are implemented once.
    pub fn as_scenario(&self) -> ScenarioDefinition {
        let steps = self
            .steps
            .iter()
            .map(|step| ScenarioStep {
                target: step.target.clone(),
                title: step.title.clone(),
                content: step.content.clone(),
                placement: step.placement,
                route: step.route.clone(),
                action: None,
                action_target: None,
                action_value: None,
                auto_fill: Default::default(),
                delay_ms: DEFAULT_STEP_DELAY_MS,
                validation: None,
                hint: None,
            })
            .collect();

        ScenarioDefinition {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: Category::Onboarding,
            difficulty: Difficulty::Beginner,
            estimated_minutes: 0,
            prerequisites: Vec::new(),
            steps,
        }
    }
}
