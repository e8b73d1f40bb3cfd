//! UI state - activity log and caret blink

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of activity log lines kept
pub const ACTIVITY_LOG_CAPACITY: usize = 10;
pub const CARET_BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct UiState {
    /// Recent events, most recent first
    activity: VecDeque<String>,
    /// Whether the edit caret is currently visible (for blinking)
    pub caret_visible: bool,
    /// Timestamp of last caret blink state change
    pub last_caret_blink: Instant,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            activity: VecDeque::with_capacity(ACTIVITY_LOG_CAPACITY),
            caret_visible: true,
            last_caret_blink: Instant::now(),
        }
    }

    /// Push a line to the activity log, evicting the oldest past capacity
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "activity", "{}", message);
        self.push(message);
    }

    /// Like [`UiState::log`], but the line is traced as a warning
    pub fn log_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "activity", "{}", message);
        self.push(message);
    }

    /// Like [`UiState::log`], but the line is traced as an error
    pub fn log_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "activity", "{}", message);
        self.push(message);
    }

    fn push(&mut self, message: String) {
        self.activity.push_front(message);
        self.activity.truncate(ACTIVITY_LOG_CAPACITY);
    }

    pub fn activity(&self) -> impl Iterator<Item = &str> {
        self.activity.iter().map(String::as_str)
    }

    pub fn latest_activity(&self) -> Option<&str> {
        self.activity.front().map(String::as_str)
    }

    /// Reset caret blink timer (call after user input)
    pub fn reset_caret_blink(&mut self) {
        self.caret_visible = true;
        self.last_caret_blink = Instant::now();
    }

    /// Update caret blink state based on elapsed time.
    /// Returns true if the state changed (needs redraw)
    pub fn update_caret_blink(&mut self, interval: Duration) -> bool {
        if self.last_caret_blink.elapsed() >= interval {
            self.caret_visible = !self.caret_visible;
            self.last_caret_blink = Instant::now();
            true
        } else {
            false
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
