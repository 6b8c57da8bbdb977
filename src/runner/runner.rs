use crate::definition::scenario::ScenarioStep;
use crate::host::{Rect, UiSurface};
use crate::runner::actions::{apply_auto_fill, dispatch_action};
use crate::runner::scheduler::{Scheduler, TaskKind};
use crate::store::session::{PlaybackMode, SessionSnapshot, SessionStore};
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

/// Perceptual pacing before a scripted action fires.
pub const PRE_ACTION_PAUSE_MS: u64 = 400;

/// Second target-resolution attempt, covering route transitions and
/// conditional rendering that land shortly after step entry.
pub const RESOLVE_RETRY_MS: u64 = 200;

pub const VALIDATION_POLL_INTERVAL_MS: u64 = 500;

/// Fail-open bound: a validation selector that never appears must not
/// leave the user permanently stuck.
pub const VALIDATION_TIMEOUT_MS: u64 = 10_000;

/// Per-step working state. Rebuilt on every step transition; the
/// generation counter ties pending timers to exactly one instance.
struct DisplayedStep {
    scenario_id: String,
    step_index: usize,
    step: ScenarioStep,

    mode: PlaybackMode,
    auto_playing: bool,

    target_rect: Option<Rect>,
    target_warned: bool,
    action_dispatched: bool,

    validated: bool,
    validation_started_ms: u64,
}

/// Drives the currently displayed step: navigation, target resolution,
/// scripted actions and auto-advance in automatic mode, validation
/// gating in guided mode. Reads session state through snapshots and
/// mutates it only through the store's operations.
pub struct ScenarioRunner {
    scheduler: Scheduler,
    generation: u64,
    displayed: Option<DisplayedStep>,
    tracer: TraceLogger,
}

impl ScenarioRunner {
    pub fn new(tracer: TraceLogger) -> ScenarioRunner {
        ScenarioRunner {
            scheduler: Scheduler::new(),
            generation: 0,
            displayed: None,
            tracer,
        }
    }

    /// Single pump of the state machine at virtual time `now_ms`:
    /// reconcile against the store, fire due timers, re-track geometry.
    /// The host calls this on its event loop (timers, scroll, resize).
    pub fn tick(&mut self, store: &mut SessionStore, surface: &mut dyn UiSurface, now_ms: u64) {
        self.sync(store, surface, now_ms);
        self.run_due_tasks(store, surface, now_ms);
        // A fired Advance changes the store within this tick; enter the
        // next step now instead of waiting a pump cycle.
        self.sync(store, surface, now_ms);
        self.refresh_geometry(surface);
    }

    // ------------------------------------------------------------------
    // Store reconciliation
    // ------------------------------------------------------------------

    fn sync(&mut self, store: &SessionStore, surface: &mut dyn UiSurface, now_ms: u64) {
        let snap = store.snapshot();

        if snap.active_scenario_id.is_none() {
            if let Some(ended) = self.displayed.take() {
                self.generation += 1;
                self.scheduler.cancel_all();

                let outcome = if store.is_completed(&ended.scenario_id) {
                    "completed"
                } else {
                    "exited"
                };
                self.tracer.log(
                    &TraceEvent::now(&ended.scenario_id, ended.step_index, "ended")
                        .with_detail(outcome),
                );
            }
            return;
        }

        let same_step = match (&self.displayed, snap.active_scenario_id.as_deref()) {
            (Some(d), Some(id)) => {
                d.scenario_id == id && d.step_index == snap.current_step_index
            }
            _ => false,
        };

        if !same_step {
            // Stale timers must never fire against the new step.
            self.generation += 1;
            self.scheduler.cancel_all();
            self.enter_step(store, surface, now_ms, &snap);
            return;
        }

        self.reconcile_mode(&snap, now_ms);
    }

    fn enter_step(
        &mut self,
        store: &SessionStore,
        surface: &mut dyn UiSurface,
        now_ms: u64,
        snap: &SessionSnapshot,
    ) {
        let Some(id) = snap.active_scenario_id.clone() else {
            return;
        };
        let Some(step) = store.current_step().cloned() else {
            return;
        };
        let step_index = snap.current_step_index;

        self.tracer
            .log(&TraceEvent::now(&id, step_index, "step_entered").with_detail(&step.title));

        // Route first: the target usually only exists after navigation.
        if let Some(route) = &step.route {
            if surface.current_path() != *route {
                surface.navigate_to(route);
                self.tracer
                    .log(&TraceEvent::now(&id, step_index, "navigated").with_detail(route));
            }
        }

        let target_rect = surface.query(&step.target);
        if target_rect.is_none() {
            self.scheduler.schedule(
                TaskKind::ResolveRetry,
                self.generation,
                now_ms + RESOLVE_RETRY_MS,
            );
        }

        let mut validated = true;
        match snap.mode {
            PlaybackMode::Automatic => {
                if snap.auto_playing {
                    self.scheduler.schedule(
                        TaskKind::DispatchAction,
                        self.generation,
                        now_ms + PRE_ACTION_PAUSE_MS,
                    );
                }
            }
            PlaybackMode::Guided => {
                if step.validation.is_some() {
                    validated = false;
                    self.scheduler.schedule(
                        TaskKind::ValidationPoll,
                        self.generation,
                        now_ms + VALIDATION_POLL_INTERVAL_MS,
                    );
                }
            }
        }

        self.displayed = Some(DisplayedStep {
            scenario_id: id,
            step_index,
            step,
            mode: snap.mode,
            auto_playing: snap.auto_playing,
            target_rect,
            target_warned: false,
            action_dispatched: false,
            validated,
            validation_started_ms: now_ms,
        });
    }

    /// Same step, but playback mode or the auto-play flag moved.
    fn reconcile_mode(&mut self, snap: &SessionSnapshot, now_ms: u64) {
        let Some(d) = self.displayed.as_mut() else {
            return;
        };

        let was_running = d.mode == PlaybackMode::Automatic && d.auto_playing;
        let now_running = snap.mode == PlaybackMode::Automatic && snap.auto_playing;
        let entered_guided = snap.mode == PlaybackMode::Guided && d.mode != PlaybackMode::Guided;

        if was_running && !now_running {
            self.scheduler.cancel_kind(TaskKind::DispatchAction);
            self.scheduler.cancel_kind(TaskKind::Advance);
        }

        if entered_guided {
            // Fresh validation cycle for the current step.
            self.scheduler.cancel_kind(TaskKind::ValidationPoll);
            d.validated = d.step.validation.is_none();
            d.validation_started_ms = now_ms;
            if d.step.validation.is_some() {
                self.scheduler.schedule(
                    TaskKind::ValidationPoll,
                    self.generation,
                    now_ms + VALIDATION_POLL_INTERVAL_MS,
                );
            }
        }

        if !was_running && now_running {
            self.scheduler.cancel_kind(TaskKind::ValidationPoll);
            if d.action_dispatched {
                self.scheduler.schedule(
                    TaskKind::Advance,
                    self.generation,
                    now_ms + d.step.delay_ms,
                );
            } else {
                self.scheduler.schedule(
                    TaskKind::DispatchAction,
                    self.generation,
                    now_ms + PRE_ACTION_PAUSE_MS,
                );
            }
        }

        d.mode = snap.mode;
        d.auto_playing = snap.auto_playing;
    }

    // ------------------------------------------------------------------
    // Timer dispatch
    // ------------------------------------------------------------------

    fn run_due_tasks(&mut self, store: &mut SessionStore, surface: &mut dyn UiSurface, now_ms: u64) {
        for kind in self.scheduler.take_due(now_ms, self.generation) {
            match kind {
                TaskKind::ResolveRetry => {
                    let Some(d) = self.displayed.as_mut() else {
                        continue;
                    };
                    d.target_rect = surface.query(&d.step.target);
                    if d.target_rect.is_none() && !d.target_warned {
                        d.target_warned = true;
                        self.tracer.log(
                            &TraceEvent::now(&d.scenario_id, d.step_index, "resolve")
                                .with_selector(&d.step.target)
                                .with_warning("target_not_found"),
                        );
                    }
                }

                TaskKind::DispatchAction => {
                    let (step, id, step_index) = match &self.displayed {
                        Some(d) => (d.step.clone(), d.scenario_id.clone(), d.step_index),
                        None => continue,
                    };

                    apply_auto_fill(&step, &id, step_index, surface, &self.tracer);
                    dispatch_action(&step, &id, step_index, surface, &self.tracer);

                    if let Some(d) = self.displayed.as_mut() {
                        d.action_dispatched = true;
                    }
                    self.scheduler.schedule(
                        TaskKind::Advance,
                        self.generation,
                        now_ms + step.delay_ms,
                    );
                }

                TaskKind::Advance => {
                    store.advance_step();
                    // The step is over; anything else due belongs to it.
                    break;
                }

                TaskKind::ValidationPoll => {
                    let Some(d) = self.displayed.as_mut() else {
                        continue;
                    };
                    let Some(validation) = d.step.validation.clone() else {
                        continue;
                    };

                    if surface.query(&validation).is_some() {
                        d.validated = true;
                        self.tracer.log(
                            &TraceEvent::now(&d.scenario_id, d.step_index, "validated")
                                .with_selector(&validation),
                        );
                    } else if now_ms.saturating_sub(d.validation_started_ms)
                        >= VALIDATION_TIMEOUT_MS
                    {
                        // Fail open rather than strand the user.
                        d.validated = true;
                        self.tracer.log(
                            &TraceEvent::now(&d.scenario_id, d.step_index, "validated")
                                .with_selector(&validation)
                                .with_warning("validation_timeout"),
                        );
                    } else {
                        self.scheduler.schedule(
                            TaskKind::ValidationPoll,
                            self.generation,
                            now_ms + VALIDATION_POLL_INTERVAL_MS,
                        );
                    }
                }
            }
        }
    }

    fn refresh_geometry(&mut self, surface: &dyn UiSurface) {
        if let Some(d) = self.displayed.as_mut() {
            d.target_rect = surface.query(&d.step.target);
        }
    }

    // ------------------------------------------------------------------
    // Manual controls
    // ------------------------------------------------------------------

    /// Whether the "Next" control is enabled. Guided mode gates on the
    /// validation condition; everything else is always advanceable.
    pub fn step_advanceable(&self) -> bool {
        match &self.displayed {
            Some(d) => {
                d.mode != PlaybackMode::Guided || d.step.validation.is_none() || d.validated
            }
            None => true,
        }
    }

    /// User-driven advancement. Returns false (and does nothing) while
    /// the current step's validation gate is still closed.
    pub fn request_advance(&self, store: &mut SessionStore) -> bool {
        if !self.step_advanceable() {
            return false;
        }
        store.advance_step();
        true
    }

    pub fn request_retreat(&self, store: &mut SessionStore) {
        store.retreat_step();
    }

    /// Component teardown: drop every pending timer.
    pub fn shutdown(&mut self) {
        self.generation += 1;
        self.scheduler.cancel_all();
        self.displayed = None;
    }

    // ------------------------------------------------------------------
    // Read access for the overlay and pump loops
    // ------------------------------------------------------------------

    /// Geometry of the spotlighted element, if it resolved.
    pub fn target_rect(&self) -> Option<Rect> {
        self.displayed.as_ref().and_then(|d| d.target_rect)
    }

    pub fn validated(&self) -> bool {
        self.displayed.as_ref().map(|d| d.validated).unwrap_or(false)
    }

    /// Earliest pending timer deadline, for pumps that want to sleep.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }
}
