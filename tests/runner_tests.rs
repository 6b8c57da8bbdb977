use scenario_guide::definition::scenario::{
    Category, Difficulty, ScenarioDefinition, ScenarioStep, StepAction,
};
use scenario_guide::host::fixture::FixtureSurface;
use scenario_guide::host::{Rect, UiSurface};
use scenario_guide::run_to_completion;
use scenario_guide::runner::runner::{
    ScenarioRunner, PRE_ACTION_PAUSE_MS, RESOLVE_RETRY_MS, VALIDATION_TIMEOUT_MS,
};
use scenario_guide::store::persist::MemoryStore;
use scenario_guide::store::session::{PlaybackMode, SessionStore};
use scenario_guide::trace::logger::TraceLogger;

// =========================================================================
// Helpers
// =========================================================================

fn definition(id: &str, steps: Vec<ScenarioStep>) -> ScenarioDefinition {
    ScenarioDefinition {
        id: id.to_string(),
        name: id.to_string(),
        description: "test".into(),
        category: Category::UseCases,
        difficulty: Difficulty::Beginner,
        estimated_minutes: 1,
        prerequisites: vec![],
        steps,
    }
}

fn click_step(target: &str) -> ScenarioStep {
    let mut step = ScenarioStep::display(target, "Click it", "...");
    step.action = Some(StepAction::Click);
    step
}

fn rect() -> Rect {
    Rect::new(100.0, 100.0, 200.0, 40.0)
}

/// Store + runner + a fixture with "#a" and "#b" on the start route.
fn harness(def: ScenarioDefinition) -> (SessionStore, ScenarioRunner, FixtureSurface) {
    let mut store = SessionStore::new(Box::new(MemoryStore::new()));
    store.register_scenarios(vec![def]);

    let runner = ScenarioRunner::new(TraceLogger::disabled());

    let mut surface = FixtureSurface::blank();
    surface.insert_element("/", "#a", rect());
    surface.insert_element("/", "#b", Rect::new(400.0, 300.0, 120.0, 32.0));

    (store, runner, surface)
}

// =========================================================================
// Automatic playback timeline
// =========================================================================

#[test]
fn automatic_two_step_scenario_clicks_then_completes() {
    let def = definition(
        "auto-run",
        vec![click_step("#a"), ScenarioStep::display("#b", "Done", "...")],
    );
    let (mut store, mut runner, mut surface) = harness(def);

    store.start_scenario("auto-run");
    runner.tick(&mut store, &mut surface, 0);

    assert!(surface.clicks().is_empty(), "Nothing fires before the pre-action pause");

    // Pre-action pause elapses: the synthetic click lands.
    runner.tick(&mut store, &mut surface, PRE_ACTION_PAUSE_MS);
    assert_eq!(surface.clicks(), &["#a".to_string()]);
    assert_eq!(store.current_step_index(), 0, "Still on step 0 until the delay");

    // Default delay after the action: advance to step 1.
    runner.tick(&mut store, &mut surface, PRE_ACTION_PAUSE_MS + 2500);
    assert_eq!(store.current_step_index(), 1);
    assert!(store.is_active());

    // Step 1 is display-only: pre-action pause is a no-op, then advance.
    let t1 = PRE_ACTION_PAUSE_MS + 2500;
    runner.tick(&mut store, &mut surface, t1 + PRE_ACTION_PAUSE_MS);
    assert_eq!(surface.clicks().len(), 1, "Display-only step clicks nothing");

    runner.tick(&mut store, &mut surface, t1 + PRE_ACTION_PAUSE_MS + 2500);
    assert!(!store.is_active(), "After the last step the session is idle");
    assert!(store.is_completed("auto-run"));
}

#[test]
fn pausing_cancels_pending_progression() {
    let def = definition("pausable", vec![click_step("#a"), click_step("#b")]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.start_scenario("pausable");
    runner.tick(&mut store, &mut surface, 0);

    store.toggle_auto_play();
    runner.tick(&mut store, &mut surface, 100);

    // Left alone well past every deadline: nothing may fire while paused.
    runner.tick(&mut store, &mut surface, 20_000);
    assert!(surface.clicks().is_empty());
    assert_eq!(store.current_step_index(), 0);

    // Resume: the action path restarts with a fresh pre-action pause.
    store.toggle_auto_play();
    runner.tick(&mut store, &mut surface, 20_100);
    runner.tick(&mut store, &mut surface, 20_100 + PRE_ACTION_PAUSE_MS);
    assert_eq!(surface.clicks(), &["#a".to_string()]);
}

#[test]
fn manual_advance_cancels_stale_timers() {
    let def = definition(
        "manual",
        vec![click_step("#a"), ScenarioStep::display("#b", "End", "...")],
    );
    let (mut store, mut runner, mut surface) = harness(def);

    store.start_scenario("manual");
    runner.tick(&mut store, &mut surface, 0);

    // User clicks Next before any timer fires.
    assert!(runner.request_advance(&mut store));
    assert_eq!(store.current_step_index(), 1);
    runner.tick(&mut store, &mut surface, 100);

    // Step 0's advance timer was due at 2900; it must not fire against
    // step 1.
    runner.tick(&mut store, &mut surface, 2900);
    assert_eq!(store.current_step_index(), 1, "Stale timer must not advance the new step");
    assert!(store.is_active());

    // Step 1's own schedule (entered at 100) still runs to completion.
    runner.tick(&mut store, &mut surface, 2900 + 2500);
    assert!(!store.is_active());
    assert!(store.is_completed("manual"));
}

#[test]
fn auto_fill_applies_before_the_primary_action() {
    let mut step = ScenarioStep::display("#a", "Fill the form", "...");
    step.action = Some(StepAction::Type);
    step.action_target = Some("#comment".to_string());
    step.action_value = Some("looks fine".to_string());
    step.auto_fill.insert("#owner".into(), "desk-3".into());
    step.auto_fill.insert("#severity".into(), "high".into());

    let (mut store, mut runner, mut surface) = harness(definition("fill", vec![step]));
    surface.insert_element("/", "#owner", rect());
    surface.insert_element("/", "#severity", rect());
    surface.insert_element("/", "#comment", rect());

    store.start_scenario("fill");
    runner.tick(&mut store, &mut surface, 0);
    runner.tick(&mut store, &mut surface, PRE_ACTION_PAUSE_MS);

    assert_eq!(surface.value_of("#owner"), Some("desk-3"));
    assert_eq!(surface.value_of("#severity"), Some("high"));
    assert_eq!(surface.value_of("#comment"), Some("looks fine"));
}

#[test]
fn missing_action_target_is_skipped_not_fatal() {
    let def = definition(
        "missing",
        vec![click_step("#ghost"), ScenarioStep::display("#b", "End", "...")],
    );
    let (mut store, mut runner, mut surface) = harness(def);

    store.start_scenario("missing");
    runner.tick(&mut store, &mut surface, 0);
    runner.tick(&mut store, &mut surface, PRE_ACTION_PAUSE_MS);

    assert!(surface.clicks().is_empty(), "Unresolvable action is a no-op");

    // Playback continues past the failed action.
    runner.tick(&mut store, &mut surface, PRE_ACTION_PAUSE_MS + 2500);
    assert_eq!(store.current_step_index(), 1);
}

// =========================================================================
// Navigation and target resolution
// =========================================================================

#[test]
fn step_route_triggers_navigation_before_resolution() {
    let mut step = ScenarioStep::display("#panel", "Settings", "...");
    step.route = Some("/settings".to_string());

    let (mut store, mut runner, mut surface) = harness(definition("nav", vec![step]));
    surface.insert_element("/settings", "#panel", rect());

    store.start_scenario("nav");
    runner.tick(&mut store, &mut surface, 0);

    assert_eq!(surface.current_path(), "/settings");
    assert!(runner.target_rect().is_some(), "Target resolves after navigation");
}

#[test]
fn target_resolution_retries_once_after_delay() {
    let mut surface = FixtureSurface::blank();
    surface.insert_hidden("/", "#late", rect());

    let mut store = SessionStore::new(Box::new(MemoryStore::new()));
    store.register_scenarios(vec![definition(
        "late",
        vec![ScenarioStep::display("#late", "Late", "...")],
    )]);
    let mut runner = ScenarioRunner::new(TraceLogger::disabled());

    store.start_scenario("late");
    runner.tick(&mut store, &mut surface, 0);
    assert!(runner.target_rect().is_none());

    // Renders in between; the retry picks it up.
    surface.reveal("#late");
    runner.tick(&mut store, &mut surface, RESOLVE_RETRY_MS);
    assert!(runner.target_rect().is_some());
}

#[test]
fn absent_target_never_blocks_playback() {
    let def = definition(
        "dimmed",
        vec![ScenarioStep::display("#nowhere", "Missing", "...")],
    );
    let (mut store, mut runner, mut surface) = harness(def);

    store.start_scenario("dimmed");
    runner.tick(&mut store, &mut surface, 0);
    runner.tick(&mut store, &mut surface, RESOLVE_RETRY_MS);
    assert!(runner.target_rect().is_none(), "Spotlight is simply omitted");

    runner.tick(&mut store, &mut surface, PRE_ACTION_PAUSE_MS);
    runner.tick(&mut store, &mut surface, PRE_ACTION_PAUSE_MS + 2500);
    assert!(!store.is_active(), "The run still completes");
}

#[test]
fn spotlight_tracks_layout_changes_while_displayed() {
    let def = definition("track", vec![ScenarioStep::display("#a", "Watch", "...")]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.toggle_auto_play(); // hold the step open
    store.start_scenario("track");
    runner.tick(&mut store, &mut surface, 0);
    assert_eq!(runner.target_rect(), Some(rect()));

    let moved = Rect::new(10.0, 600.0, 200.0, 40.0);
    surface.move_element("#a", moved);
    runner.tick(&mut store, &mut surface, 50);
    assert_eq!(runner.target_rect(), Some(moved), "Geometry re-resolves every tick");
}

// =========================================================================
// Guided mode
// =========================================================================

fn validated_step(target: &str, validation: &str) -> ScenarioStep {
    let mut step = ScenarioStep::display(target, "Do it yourself", "...");
    step.validation = Some(validation.to_string());
    step.hint = Some("Try the toolbar".to_string());
    step
}

#[test]
fn guided_step_gates_advance_on_validation() {
    let def = definition("guided", vec![validated_step("#a", "#done")]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.set_mode(PlaybackMode::Guided);
    store.start_scenario("guided");
    runner.tick(&mut store, &mut surface, 0);

    assert!(!runner.step_advanceable(), "Next is disabled until validated");
    assert!(!runner.request_advance(&mut store), "Blocked advance is refused");
    assert_eq!(store.current_step_index(), 0);

    // First poll: condition not met yet.
    runner.tick(&mut store, &mut surface, 500);
    assert!(!runner.step_advanceable());

    // The user performs the step; the validation element appears.
    surface.insert_element("/", "#done", rect());
    runner.tick(&mut store, &mut surface, 1000);
    assert!(runner.step_advanceable());

    assert!(runner.request_advance(&mut store));
    assert!(!store.is_active());
    assert!(store.is_completed("guided"));
}

#[test]
fn validation_fails_open_after_timeout() {
    let def = definition("stuck", vec![validated_step("#a", "#never")]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.set_mode(PlaybackMode::Guided);
    store.start_scenario("stuck");
    runner.tick(&mut store, &mut surface, 0);
    assert!(!runner.step_advanceable());

    runner.tick(&mut store, &mut surface, VALIDATION_TIMEOUT_MS);
    assert!(runner.step_advanceable(), "Fail-open: the user is never stuck");

    // The polling cycle ended with the timeout; nothing remains pending.
    assert_eq!(runner.next_due(), None);
}

#[test]
fn steps_without_validation_are_immediately_advanceable() {
    let def = definition(
        "free",
        vec![ScenarioStep::display("#a", "Look", "..."), validated_step("#b", "#done")],
    );
    let (mut store, mut runner, mut surface) = harness(def);

    store.set_mode(PlaybackMode::Guided);
    store.start_scenario("free");
    runner.tick(&mut store, &mut surface, 0);

    assert!(runner.step_advanceable());
    assert!(runner.request_advance(&mut store));
    runner.tick(&mut store, &mut surface, 10);
    assert!(!runner.step_advanceable(), "The validated step still gates");
}

#[test]
fn switching_into_guided_restarts_the_validation_cycle() {
    let def = definition("reswitch", vec![validated_step("#a", "#done")]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.set_mode(PlaybackMode::Guided);
    store.start_scenario("reswitch");
    runner.tick(&mut store, &mut surface, 0);

    surface.insert_element("/", "#done", rect());
    runner.tick(&mut store, &mut surface, 500);
    assert!(runner.step_advanceable());

    // Bounce through automatic and back: validated resets, the poll
    // re-observes the condition on its next interval.
    store.set_mode(PlaybackMode::Automatic);
    runner.tick(&mut store, &mut surface, 600);
    store.set_mode(PlaybackMode::Guided);
    runner.tick(&mut store, &mut surface, 700);
    assert!(!runner.step_advanceable(), "Re-entering guided resets validation");

    runner.tick(&mut store, &mut surface, 1200);
    assert!(runner.step_advanceable());

    // Position was never reset by the mode churn.
    assert_eq!(store.current_step_index(), 0);
    assert!(store.is_active());
}

#[test]
fn retreat_is_always_allowed() {
    let def = definition(
        "back",
        vec![ScenarioStep::display("#a", "One", "..."), validated_step("#b", "#done")],
    );
    let (mut store, mut runner, mut surface) = harness(def);

    store.set_mode(PlaybackMode::Guided);
    store.start_scenario("back");
    runner.tick(&mut store, &mut surface, 0);
    runner.request_advance(&mut store);
    runner.tick(&mut store, &mut surface, 10);

    runner.request_retreat(&mut store);
    assert_eq!(store.current_step_index(), 0);
}

// =========================================================================
// End-to-end pump
// =========================================================================

#[test]
fn automatic_run_reaches_idle_within_the_delay_budget() {
    let mut quick = click_step("#a");
    quick.delay_ms = 300;
    let mut second = ScenarioStep::display("#b", "Two", "...");
    second.delay_ms = 300;

    let def = definition("pumped", vec![quick, second]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.start_scenario("pumped");
    let finished = run_to_completion(&mut store, &mut runner, &mut surface, 50, 10_000, false);

    assert!(finished);
    assert!(store.is_completed("pumped"));
    assert_eq!(surface.clicks(), &["#a".to_string()]);
}

#[test]
fn guided_run_fails_open_and_completes_under_the_pump() {
    let def = definition("guided-pump", vec![validated_step("#a", "#never")]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.set_mode(PlaybackMode::Guided);
    store.start_scenario("guided-pump");

    let finished = run_to_completion(
        &mut store,
        &mut runner,
        &mut surface,
        100,
        2 * VALIDATION_TIMEOUT_MS,
        false,
    );

    assert!(finished, "Fail-open validation unblocks the simulated user");
    assert!(store.is_completed("guided-pump"));
}

#[test]
fn shutdown_cancels_everything() {
    let def = definition("teardown", vec![click_step("#a")]);
    let (mut store, mut runner, mut surface) = harness(def);

    store.start_scenario("teardown");
    runner.tick(&mut store, &mut surface, 0);
    assert!(runner.next_due().is_some());

    runner.shutdown();
    assert_eq!(runner.next_due(), None);
}
