use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Milliseconds waited after a step's action before auto-advancing,
/// when the step does not specify its own delay.
pub const DEFAULT_STEP_DELAY_MS: u64 = 2500;

/// Which area of the application a scenario teaches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Settings,
    Calculations,
    DetectionModels,
    UseCases,
    Entities,
    Investigation,
    Admin,
    Onboarding,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Where the step popover prefers to sit relative to its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PopoverSide {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl PopoverSide {
    pub fn opposite(self) -> PopoverSide {
        match self {
            PopoverSide::Top => PopoverSide::Bottom,
            PopoverSide::Bottom => PopoverSide::Top,
            PopoverSide::Left => PopoverSide::Right,
            PopoverSide::Right => PopoverSide::Left,
        }
    }
}

/// Scripted interaction performed in automatic playback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Click,
    Type,
    Select,
    Navigate,
    Wait,
}

/// One unit of guided interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioStep {
    /// Selector of the element to spotlight
    pub target: String,

    pub title: String,
    pub content: String,

    /// Popover placement hint, defaults to bottom
    #[serde(default)]
    pub placement: PopoverSide,

    /// Route to visit before resolving the target
    #[serde(default)]
    pub route: Option<String>,

    /// Scripted action; absent means a display-only step
    #[serde(default)]
    pub action: Option<StepAction>,

    /// Selector the action applies to, defaults to `target`
    #[serde(default)]
    pub action_target: Option<String>,

    /// Payload for type/select/navigate actions
    #[serde(default)]
    pub action_value: Option<String>,

    /// Selector → value pairs applied before the primary action
    #[serde(default)]
    pub auto_fill: BTreeMap<String, String>,

    /// Wait after the action before auto-advancing (automatic mode)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Selector whose appearance marks the step satisfied (guided mode)
    #[serde(default)]
    pub validation: Option<String>,

    /// Revealed on demand in guided mode
    #[serde(default)]
    pub hint: Option<String>,
}

fn default_delay_ms() -> u64 {
    DEFAULT_STEP_DELAY_MS
}

impl ScenarioStep {
    /// Minimal display-only step; the usual constructor in tests and
    /// tour conversion.
    pub fn display(target: &str, title: &str, content: &str) -> ScenarioStep {
        ScenarioStep {
            target: target.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            placement: PopoverSide::default(),
            route: None,
            action: None,
            action_target: None,
            action_value: None,
            auto_fill: BTreeMap::new(),
            delay_ms: DEFAULT_STEP_DELAY_MS,
            validation: None,
            hint: None,
        }
    }

    /// Selector the scripted action acts on.
    pub fn action_selector(&self) -> &str {
        self.action_target.as_deref().unwrap_or(&self.target)
    }
}

/// A guided multi-step workflow, registered once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDefinition {
    pub id: String,
    pub name: String,
    pub description: String,

    pub category: Category,
    pub difficulty: Difficulty,

    /// Display only
    #[serde(default)]
    pub estimated_minutes: u32,

    /// Soft dependency hint, not enforced
    #[serde(default)]
    pub prerequisites: Vec<String>,

    pub steps: Vec<ScenarioStep>,
}

/// Static lint pass over a definition. Returns human-readable issues;
/// an empty result means the definition is startable and coherent.
pub fn check_definition(def: &ScenarioDefinition, known_ids: &[&str]) -> Vec<String> {
    let mut issues = Vec::new();

    if def.steps.is_empty() {
        issues.push(format!("scenario '{}' has no steps", def.id));
    }

    for (i, step) in def.steps.iter().enumerate() {
        if step.target.trim().is_empty() {
            issues.push(format!("scenario '{}' step {} has an empty target", def.id, i));
        }

        let needs_value = matches!(
            step.action,
            Some(StepAction::Type) | Some(StepAction::Select) | Some(StepAction::Navigate)
        );
        if needs_value && step.action_value.is_none() {
            issues.push(format!(
                "scenario '{}' step {} action {:?} has no action_value",
                def.id, i, step.action
            ));
        }
    }

    for prereq in &def.prerequisites {
        if !known_ids.contains(&prereq.as_str()) {
            issues.push(format!(
                "scenario '{}' lists unknown prerequisite '{}'",
                def.id, prereq
            ));
        }
    }

    issues
}
