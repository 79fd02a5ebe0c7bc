//! Signals delivered to a form

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Submission token handed to the submit handler.
///
/// The host's default action for a submission (leaving the form) only runs
/// when nobody called [`SubmitEvent::prevent_default`]. Clones share the
/// same flag.
#[derive(Debug, Default, Clone)]
pub struct SubmitEvent {
    default_prevented: Arc<AtomicBool>,
    prevent_calls: Arc<AtomicUsize>,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the host's default handling of this submission
    pub fn prevent_default(&mut self) {
        self.default_prevented.store(true, Ordering::SeqCst);
        self.prevent_calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }

    /// Number of `prevent_default` calls seen by this token
    #[cfg(test)]
    pub fn prevent_calls(&self) -> usize {
        self.prevent_calls.load(Ordering::SeqCst)
    }
}

/// Events the form reacts to
#[derive(Debug)]
pub enum FormEvent {
    /// A field's contents changed
    FieldChanged { field: String, value: String },
    /// The user asked to send the form
    SubmitRequested(SubmitEvent),
}
