use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line in the playback trace. Emitted on step transitions, action
/// dispatch, validation, completion, and absorbed failures.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,

    pub scenario: String,
    pub step: usize,

    /// step_entered, navigated, auto_fill, action, validated, completed...
    pub event: String,

    pub selector: Option<String>,
    pub detail: Option<String>,

    /// target_not_found, validation_timeout, unknown_definition
    pub warning: Option<String>,
}

impl TraceEvent {
    pub fn now(scenario: &str, step: usize, event: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_millis(),
            scenario: scenario.to_string(),
            step,
            event: event.to_string(),
            selector: None,
            detail: None,
            warning: None,
        }
    }

    pub fn with_selector(mut self, selector: impl ToString) -> Self {
        self.selector = Some(selector.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_warning(mut self, warning: impl ToString) -> Self {
        self.warning = Some(warning.to_string());
        self
    }
}
