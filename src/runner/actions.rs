use crate::definition::scenario::{ScenarioStep, StepAction};
use crate::host::UiSurface;
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

/// Apply every auto-fill entry before the primary action. Missing
/// selectors are warned about and skipped; the run continues.
pub fn apply_auto_fill(
    step: &ScenarioStep,
    scenario: &str,
    step_index: usize,
    surface: &mut dyn UiSurface,
    tracer: &TraceLogger,
) {
    for (selector, value) in &step.auto_fill {
        if surface.set_value(selector, value) {
            tracer.log(
                &TraceEvent::now(scenario, step_index, "auto_fill")
                    .with_selector(selector)
                    .with_detail(value),
            );
        } else {
            tracer.log(
                &TraceEvent::now(scenario, step_index, "auto_fill")
                    .with_selector(selector)
                    .with_warning("target_not_found"),
            );
        }
    }
}

/// Perform the step's scripted action, if any. Every failure mode is
/// absorbed: an unmatched selector or missing payload logs a warning and
/// the step proceeds as a no-op.
pub fn dispatch_action(
    step: &ScenarioStep,
    scenario: &str,
    step_index: usize,
    surface: &mut dyn UiSurface,
    tracer: &TraceLogger,
) {
    let Some(action) = step.action else {
        return;
    };

    let selector = step.action_selector();

    match action {
        StepAction::Click => {
            if surface.click(selector) {
                tracer.log(
                    &TraceEvent::now(scenario, step_index, "action")
                        .with_selector(selector)
                        .with_detail("click"),
                );
            } else {
                tracer.log(
                    &TraceEvent::now(scenario, step_index, "action")
                        .with_selector(selector)
                        .with_detail("click")
                        .with_warning("target_not_found"),
                );
            }
        }

        StepAction::Type => match &step.action_value {
            Some(value) => {
                if surface.set_value(selector, value) {
                    tracer.log(
                        &TraceEvent::now(scenario, step_index, "action")
                            .with_selector(selector)
                            .with_detail(format!("type '{}'", value)),
                    );
                } else {
                    tracer.log(
                        &TraceEvent::now(scenario, step_index, "action")
                            .with_selector(selector)
                            .with_detail("type")
                            .with_warning("target_not_found"),
                    );
                }
            }
            None => {
                tracer.log(
                    &TraceEvent::now(scenario, step_index, "action")
                        .with_selector(selector)
                        .with_warning("type action has no action_value"),
                );
            }
        },

        StepAction::Select => match &step.action_value {
            Some(value) => {
                if surface.select_option(selector, value) {
                    tracer.log(
                        &TraceEvent::now(scenario, step_index, "action")
                            .with_selector(selector)
                            .with_detail(format!("select '{}'", value)),
                    );
                } else {
                    tracer.log(
                        &TraceEvent::now(scenario, step_index, "action")
                            .with_selector(selector)
                            .with_detail("select")
                            .with_warning("target_not_found"),
                    );
                }
            }
            None => {
                tracer.log(
                    &TraceEvent::now(scenario, step_index, "action")
                        .with_selector(selector)
                        .with_warning("select action has no action_value"),
                );
            }
        },

        StepAction::Navigate => {
            if let Some(path) = &step.action_value {
                surface.navigate_to(path);
                tracer.log(
                    &TraceEvent::now(scenario, step_index, "action")
                        .with_detail(format!("navigate '{}'", path)),
                );
            }
        }

        StepAction::Wait => {
            // Pacing only; advancement is handled by the step delay.
        }
    }
}
