//! Application state definitions

use super::forms::FormController;
use crate::sink::Submission;
use std::collections::VecDeque;

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    /// The support request form
    pub form: FormController,
    /// Most recent submission accepted by the sink
    pub last_submission: Option<Submission>,
    /// Errors waiting to be shown, oldest first
    errors: VecDeque<String>,
}

impl AppState {
    pub fn new(form: FormController) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::debug!("Queued error: {message}");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error currently shown in the dialog
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    /// Dismiss the error currently shown
    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }
}
