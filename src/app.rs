//! Application state and core logic

use crate::config::FormConfig;
use crate::sink::SubmissionSink;
use crate::state::{AppState, Form, FormController, FormError, FormEvent, SubmitEvent};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Receiver of submitted forms
    sink: Box<dyn SubmissionSink>,
    /// Whether the app should quit
    quit: bool,
    /// Feedback message shown in the status bar
    pub status_message: Option<String>,
}

impl App {
    /// Create a new App instance from user configuration
    pub fn new(config: &FormConfig) -> Result<Self> {
        let sink = config.build_sink();
        tracing::info!(sink = sink.name(), "Starting support form");
        let form = FormController::support_request_with(&config.initial_values)?;
        Ok(Self {
            state: AppState::new(form),
            sink,
            quit: false,
            status_message: None,
        })
    }

    #[cfg(test)]
    pub fn with_sink(sink: Box<dyn SubmissionSink>) -> Self {
        Self {
            state: AppState::default(),
            sink,
            quit: false,
            status_message: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Name of the configured sink
    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        let on_submit = self.state.form.is_submit_active();
        let on_select = self.state.form.is_active_field_select();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        let event = match key.code {
            KeyCode::Char('s') if ctrl => Some(Self::submit_event()),
            KeyCode::Esc => {
                self.quit = true;
                None
            }
            KeyCode::Tab => {
                self.state.form.next_field();
                None
            }
            KeyCode::BackTab => {
                self.state.form.prev_field();
                None
            }
            KeyCode::Enter if on_submit => Some(Self::submit_event()),
            // Select navigation
            KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') if on_select => {
                self.option_step(true)
            }
            KeyCode::Left if on_select => self.option_step(false),
            // Text input
            KeyCode::Enter if self.state.form.is_active_field_multiline() => {
                self.state.form.line_break()
            }
            KeyCode::Enter => {
                self.state.form.next_field();
                None
            }
            KeyCode::Char(c) if !ctrl => self.state.form.char_input(c),
            KeyCode::Backspace => self.state.form.backspace(),
            _ => None,
        };

        if let Some(event) = event {
            self.handle_form_event(event).await;
        }
        Ok(())
    }

    fn submit_event() -> FormEvent {
        FormEvent::SubmitRequested(SubmitEvent::new())
    }

    fn option_step(&mut self, forward: bool) -> Option<FormEvent> {
        match self.state.form.option_step(forward) {
            Ok(event) => event,
            Err(err) => {
                self.report_form_error(err);
                None
            }
        }
    }

    /// Apply a form event, reporting submission results
    pub async fn handle_form_event(&mut self, event: FormEvent) {
        let outcome = match self.state.form.dispatch(event, self.sink.as_ref()).await {
            Ok(Some(outcome)) => outcome,
            // Field change applied
            Ok(None) => return,
            Err(err) => {
                self.report_form_error(err);
                return;
            }
        };

        // Without prevention the submission leaves the form
        if !outcome.event.default_prevented() {
            self.quit = true;
        }

        match outcome.result {
            Ok(submission) => {
                self.status_message = Some(format!("Submitted ({})", submission.id));
                self.state.last_submission = Some(submission);
            }
            Err(err) => self.push_error(format!("Submission failed: {err}")),
        }
    }

    fn report_form_error(&mut self, err: FormError) {
        tracing::error!("Form error: {err}");
        self.push_error(err.to_string());
    }
}
