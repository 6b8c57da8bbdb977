use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::definition::scenario::{ScenarioDefinition, ScenarioStep};
use crate::definition::tour::TourDefinition;
use crate::store::persist::{KeyValueStore, COMPLETED_SCENARIOS_KEY, ONBOARDING_SEEN_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Plays itself: scripted actions, timer-driven advancement
    Automatic,
    /// Shows hints, gates advancement on a validation condition
    Guided,
}

/// Cheap copy of the observable session fields, for revision-based
/// change detection by the runner and overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub active_scenario_id: Option<String>,
    pub current_step_index: usize,
    pub mode: PlaybackMode,
    pub auto_playing: bool,
    pub revision: u64,
}

/// Owns the definition registry and the single mutable playback session.
/// Everything else reads it; only the closed set of operations below
/// mutates it.
pub struct SessionStore {
    scenarios: HashMap<String, ScenarioDefinition>,
    tour_ids: BTreeSet<String>,

    active_scenario_id: Option<String>,
    current_step_index: usize,
    mode: PlaybackMode,
    auto_playing: bool,

    completed: BTreeSet<String>,
    onboarding_seen: bool,

    revision: u64,
    persistence: Box<dyn KeyValueStore>,
}

impl SessionStore {
    /// Restore completion history and the onboarding flag from durable
    /// storage; malformed payloads read as empty with a warning.
    pub fn new(persistence: Box<dyn KeyValueStore>) -> SessionStore {
        let completed = match persistence.get(COMPLETED_SCENARIOS_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    eprintln!("Warning: persisted completion history is malformed: {}", e);
                    BTreeSet::new()
                }
            },
            None => BTreeSet::new(),
        };

        let onboarding_seen = persistence
            .get(ONBOARDING_SEEN_KEY)
            .map(|v| v == "true")
            .unwrap_or(false);

        SessionStore {
            scenarios: HashMap::new(),
            tour_ids: BTreeSet::new(),
            active_scenario_id: None,
            current_step_index: 0,
            mode: PlaybackMode::Automatic,
            auto_playing: true,
            completed,
            onboarding_seen,
            revision: 0,
            persistence,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Merge definitions into the registry, keyed by id. Last write wins;
    /// re-registering unchanged definitions is a no-op in effect.
    pub fn register_scenarios(&mut self, defs: Vec<ScenarioDefinition>) {
        for def in defs {
            self.scenarios.insert(def.id.clone(), def);
        }
    }

    /// Tours register as restricted scenarios sharing the same runner and
    /// overlay; the id is remembered so completion also marks onboarding.
    pub fn register_tours(&mut self, tours: Vec<TourDefinition>) {
        for tour in tours {
            self.tour_ids.insert(tour.id.clone());
            let def = tour.as_scenario();
            self.scenarios.insert(def.id.clone(), def);
        }
    }

    // ------------------------------------------------------------------
    // Session operations
    // ------------------------------------------------------------------

    /// Activate a scenario at step 0. Unknown ids and definitions with no
    /// steps are a warned no-op: prior session state is left untouched.
    pub fn start_scenario(&mut self, id: &str) {
        match self.scenarios.get(id) {
            Some(def) if !def.steps.is_empty() => {
                self.active_scenario_id = Some(id.to_string());
                self.current_step_index = 0;
                self.touch();
            }
            Some(_) => {
                eprintln!("Warning: scenario '{}' has no steps, not starting", id);
            }
            None => {
                eprintln!("Warning: unknown scenario id '{}', not starting", id);
            }
        }
    }

    /// Tours run through the same session; the distinction only matters
    /// at completion time.
    pub fn start_tour(&mut self, id: &str) {
        if self.tour_ids.contains(id) {
            self.start_scenario(id);
        } else {
            eprintln!("Warning: unknown tour id '{}', not starting", id);
        }
    }

    /// Move to the next step, or finalize the run when already on the
    /// last one. No-op while idle.
    pub fn advance_step(&mut self) {
        let Some(id) = self.active_scenario_id.clone() else {
            return;
        };

        let step_count = self
            .scenarios
            .get(&id)
            .map(|def| def.steps.len())
            .unwrap_or(0);

        if self.current_step_index + 1 >= step_count {
            self.complete(&id);
        } else {
            self.current_step_index += 1;
            self.touch();
        }
    }

    /// Step back one, floored at 0.
    pub fn retreat_step(&mut self) {
        if self.active_scenario_id.is_some() && self.current_step_index > 0 {
            self.current_step_index -= 1;
            self.touch();
        }
    }

    /// Abandon the run without marking completion.
    pub fn exit_scenario(&mut self) {
        if self.active_scenario_id.is_some() {
            self.active_scenario_id = None;
            self.current_step_index = 0;
            self.touch();
        }
    }

    /// Guided mode must never auto-advance, so the auto-play flag is
    /// forced on every switch regardless of its prior value.
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
        self.auto_playing = mode == PlaybackMode::Automatic;
        self.touch();
    }

    pub fn toggle_auto_play(&mut self) {
        self.auto_playing = !self.auto_playing;
        self.touch();
    }

    pub fn mark_onboarding_seen(&mut self) {
        if !self.onboarding_seen {
            self.onboarding_seen = true;
            self.persistence.set(ONBOARDING_SEEN_KEY, "true");
            self.touch();
        }
    }

    /// Natural completion: union the id into the persisted set exactly
    /// once, then clear the active run.
    fn complete(&mut self, id: &str) {
        if self.completed.insert(id.to_string()) {
            self.persist_completed();
        }

        if self.tour_ids.contains(id) {
            self.mark_onboarding_seen();
        }

        self.active_scenario_id = None;
        self.current_step_index = 0;
        self.touch();
    }

    fn persist_completed(&mut self) {
        let ids: Vec<&str> = self.completed.iter().map(|s| s.as_str()).collect();
        match serde_json::to_string(&ids) {
            Ok(json) => self.persistence.set(COMPLETED_SCENARIOS_KEY, &json),
            Err(e) => eprintln!("Warning: failed to serialize completion history: {}", e),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active_scenario_id: self.active_scenario_id.clone(),
            current_step_index: self.current_step_index,
            mode: self.mode,
            auto_playing: self.auto_playing,
            revision: self.revision,
        }
    }

    /// Bumped by every state change; readers compare it instead of
    /// diffing fields.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_active(&self) -> bool {
        self.active_scenario_id.is_some()
    }

    pub fn active_scenario_id(&self) -> Option<&str> {
        self.active_scenario_id.as_deref()
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn auto_playing(&self) -> bool {
        self.auto_playing
    }

    pub fn active_definition(&self) -> Option<&ScenarioDefinition> {
        self.active_scenario_id
            .as_deref()
            .and_then(|id| self.scenarios.get(id))
    }

    pub fn current_step(&self) -> Option<&ScenarioStep> {
        self.active_definition()
            .and_then(|def| def.steps.get(self.current_step_index))
    }

    pub fn definition(&self, id: &str) -> Option<&ScenarioDefinition> {
        self.scenarios.get(id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ScenarioDefinition> {
        self.scenarios.values()
    }

    pub fn is_tour(&self, id: &str) -> bool {
        self.tour_ids.contains(id)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn onboarding_seen(&self) -> bool {
        self.onboarding_seen
    }
}
