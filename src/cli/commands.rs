use crate::definition::loader::{load_definitions, DefinitionFile};
use crate::definition::scenario::check_definition;
use crate::error::GuideError;
use crate::host::fixture::{load_fixture, FixtureSurface};
use crate::run_to_completion;
use crate::runner::runner::ScenarioRunner;
use crate::store::persist::FileStore;
use crate::store::session::{PlaybackMode, SessionStore};
use crate::trace::logger::TraceLogger;

// ============================================================================
// list subcommand
// ============================================================================

pub fn cmd_list(defs_path: &str, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let defs = load_definitions(defs_path)?;

    if defs.is_empty() {
        eprintln!("No definitions found at: {}", defs_path);
        return Ok(());
    }

    println!(
        "{} scenarios, {} tours",
        defs.scenarios.len(),
        defs.tours.len()
    );

    for scenario in &defs.scenarios {
        println!(
            "  [{:?}/{:?}] {} — {} ({} steps, ~{} min)",
            scenario.category,
            scenario.difficulty,
            scenario.id,
            scenario.name,
            scenario.steps.len(),
            scenario.estimated_minutes
        );
        if verbose > 0 && !scenario.prerequisites.is_empty() {
            println!("      prerequisites: {}", scenario.prerequisites.join(", "));
        }
    }

    for tour in &defs.tours {
        println!(
            "  [tour] {} — {} ({} steps)",
            tour.id,
            tour.name,
            tour.steps.len()
        );
    }

    Ok(())
}

// ============================================================================
// check subcommand
// ============================================================================

/// Lint definitions and return whether they are all clean.
pub fn cmd_check(defs_path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let defs = load_definitions(defs_path)?;

    if defs.is_empty() {
        eprintln!("No definitions found at: {}", defs_path);
        return Ok(true);
    }

    let known_ids = collect_ids(&defs);
    let known_refs: Vec<&str> = known_ids.iter().map(|s| s.as_str()).collect();

    let mut issues = Vec::new();
    for scenario in &defs.scenarios {
        issues.extend(check_definition(scenario, &known_refs));
    }
    for tour in &defs.tours {
        issues.extend(check_definition(&tour.as_scenario(), &known_refs));
    }

    if issues.is_empty() {
        println!(
            "OK: {} scenarios, {} tours",
            defs.scenarios.len(),
            defs.tours.len()
        );
        Ok(true)
    } else {
        for issue in &issues {
            println!("  {}", issue);
        }
        println!("{} issue(s) found", issues.len());
        Ok(false)
    }
}

fn collect_ids(defs: &DefinitionFile) -> Vec<String> {
    defs.scenarios
        .iter()
        .map(|s| s.id.clone())
        .chain(defs.tours.iter().map(|t| t.id.clone()))
        .collect()
}

// ============================================================================
// play subcommand
// ============================================================================

/// Play a scenario headlessly and return whether it ran to completion.
pub fn cmd_play(
    scenario_id: &str,
    defs_path: &str,
    fixture_path: Option<&str>,
    mode: &str,
    trace_path: Option<&str>,
    state_path: &str,
    tick_ms: u64,
    max_ms: u64,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let defs = load_definitions(defs_path)?;

    let mut store = SessionStore::new(Box::new(FileStore::open(state_path)));
    store.register_scenarios(defs.scenarios);
    store.register_tours(defs.tours);

    if store.definition(scenario_id).is_none() {
        return Err(Box::new(GuideError::UnknownDefinition {
            id: scenario_id.to_string(),
        }));
    }

    let mut surface = match fixture_path {
        Some(path) => FixtureSurface::from_doc(load_fixture(path)?),
        None => FixtureSurface::blank(),
    };

    let tracer = match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let mut runner = ScenarioRunner::new(tracer);

    match mode {
        "guided" => store.set_mode(PlaybackMode::Guided),
        "automatic" => store.set_mode(PlaybackMode::Automatic),
        other => {
            eprintln!("Unknown mode '{}', expected automatic or guided", other);
            return Ok(false);
        }
    }

    store.start_scenario(scenario_id);
    if !store.is_active() {
        // start refused (e.g. a definition with no steps)
        return Ok(false);
    }

    if verbose > 0 {
        eprintln!("Playing '{}' in {} mode...", scenario_id, mode);
    }

    let finished = run_to_completion(
        &mut store,
        &mut runner,
        &mut surface,
        tick_ms,
        max_ms,
        verbose > 0,
    );

    if finished && store.is_completed(scenario_id) {
        println!("Completed: {}", scenario_id);
        Ok(true)
    } else {
        println!("Did not complete: {}", scenario_id);
        Ok(false)
    }
}
