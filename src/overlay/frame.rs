use crate::host::Rect;
use crate::overlay::geometry::spotlight_cutout;
use crate::overlay::placement::{place_popover, PopoverLayout, POPOVER_HEIGHT, POPOVER_WIDTH};
use crate::runner::runner::ScenarioRunner;
use crate::store::session::{PlaybackMode, SessionStore};

/// Enablement of the step controls. Owned by nobody: derived fresh on
/// every frame from store + runner state.
#[derive(Debug, Clone, PartialEq)]
pub struct StepControls {
    pub next_enabled: bool,
    pub prev_enabled: bool,
    pub is_last_step: bool,
    pub mode: PlaybackMode,
    pub auto_playing: bool,
    pub hint_available: bool,
}

/// Everything the presentation layer needs to render one frame:
/// spotlight cutout (None = full-viewport dim), positioned popover,
/// step text, and control state.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub scenario_id: String,
    pub title: String,
    pub content: String,

    /// 1-based for display
    pub step_number: usize,
    pub step_count: usize,

    pub cutout: Option<Rect>,
    pub popover: PopoverLayout,
    pub controls: StepControls,

    /// Present only in guided mode; revealing it is the renderer's call
    pub hint: Option<String>,
}

/// Derive the current frame, or None while no scenario is active.
pub fn build_frame(
    store: &SessionStore,
    runner: &ScenarioRunner,
    viewport: Rect,
) -> Option<OverlayFrame> {
    let def = store.active_definition()?;
    let step = store.current_step()?;
    let index = store.current_step_index();
    let mode = store.mode();

    let cutout = spotlight_cutout(runner.target_rect(), viewport);
    let popover = place_popover(
        cutout,
        step.placement,
        POPOVER_WIDTH,
        POPOVER_HEIGHT,
        viewport,
    );

    let hint_available = mode == PlaybackMode::Guided && step.hint.is_some();

    Some(OverlayFrame {
        scenario_id: def.id.clone(),
        title: step.title.clone(),
        content: step.content.clone(),
        step_number: index + 1,
        step_count: def.steps.len(),
        cutout,
        popover,
        controls: StepControls {
            next_enabled: runner.step_advanceable(),
            prev_enabled: index > 0,
            is_last_step: index + 1 == def.steps.len(),
            mode,
            auto_playing: store.auto_playing(),
            hint_available,
        },
        hint: if hint_available { step.hint.clone() } else { None },
    })
}
