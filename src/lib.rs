use crate::host::UiSurface;
use crate::runner::runner::ScenarioRunner;
use crate::store::session::{PlaybackMode, SessionStore};

pub mod cli;
pub mod definition;
pub mod error;
pub mod host;
pub mod overlay;
pub mod runner;
pub mod store;
pub mod trace;

pub const DEFAULT_TICK_MS: u64 = 50;

/// Pump the runner on a virtual clock until the session goes idle or the
/// time budget runs out. Returns true when the session reached idle.
///
/// In guided mode this acts as an always-ready user: each step is
/// confirmed the moment its validation gate opens (or fails open).
pub fn run_to_completion(
    store: &mut SessionStore,
    runner: &mut ScenarioRunner,
    surface: &mut dyn UiSurface,
    tick_ms: u64,
    max_ms: u64,
    verbose: bool,
) -> bool {
    let tick_ms = if tick_ms == 0 { DEFAULT_TICK_MS } else { tick_ms };
    let mut now_ms = 0u64;
    let mut last_position: Option<(String, usize)> = None;

    loop {
        runner.tick(store, surface, now_ms);

        let position = store
            .active_scenario_id()
            .map(|id| (id.to_string(), store.current_step_index()));

        if verbose && position != last_position {
            match &position {
                Some((id, index)) => println!("[{:>6}ms] {} step {}", now_ms, id, index),
                None => println!("[{:>6}ms] idle", now_ms),
            }
        }
        last_position = position;

        if !store.is_active() {
            return true;
        }

        if store.mode() == PlaybackMode::Guided && runner.step_advanceable() {
            runner.request_advance(store);
            continue;
        }

        if now_ms >= max_ms {
            eprintln!("Warning: playback budget of {}ms exhausted, stopping", max_ms);
            return false;
        }
        now_ms += tick_ms;
    }
}
