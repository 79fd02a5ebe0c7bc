//! Form state management and the support request form

use super::event::{FormEvent, SubmitEvent};
use super::field::FieldSpec;
use crate::sink::{SinkError, Submission, SubmissionSink};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Identifiers of the support request fields
pub const ISSUE_TYPE: &str = "issueType";
pub const SUBJECT: &str = "subject";
pub const MESSAGE: &str = "message";

/// Options offered by the issue type select
pub const ISSUE_TYPES: [&str; 5] = ["", "billing", "technical", "account", "other"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error("field is not a select: {0}")]
    NotASelect(String),

    #[error("initial values do not match the form fields")]
    MismatchedInitialState,
}

/// Mapping from field identifier to current value.
///
/// The key set is fixed when the state is built; edits go through
/// [`FormState::with_value`], which returns a new state and leaves the
/// receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, String>,
}

impl FormState {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Empty value for every field
    pub fn blank(fields: &[FieldSpec]) -> Self {
        Self::from_pairs(fields.iter().map(|f| (f.name.clone(), String::new())))
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Copy of this state with `field` set to `value`
    pub fn with_value(&self, field: &str, value: impl Into<String>) -> Result<Self, FormError> {
        if !self.values.contains_key(field) {
            return Err(FormError::UnknownField(field.to_string()));
        }
        let mut values = self.values.clone();
        values.insert(field.to_string(), value.into());
        Ok(Self { values })
    }
}

/// Logical phase of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    /// Just submitted; values equal the initial state
    Submitted,
}

/// Result of dispatching a submission through [`FormController::dispatch`]
#[derive(Debug)]
pub struct SubmitOutcome {
    pub event: SubmitEvent,
    pub result: Result<Submission, SinkError>,
}

/// Trait for common form focus operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Keeps a [`FormState`] in sync with user edits and mediates submission
#[derive(Debug, Clone)]
pub struct FormController {
    fields: Vec<FieldSpec>,
    initial: FormState,
    state: FormState,
    phase: FormPhase,
    /// Focused field; `fields.len()` is the submit button
    pub active_field_index: usize,
}

impl FormController {
    /// Build a form whose initial values must cover exactly the given fields
    pub fn new(fields: Vec<FieldSpec>, initial: FormState) -> Result<Self, FormError> {
        let values = initial.as_map();
        let matches =
            values.len() == fields.len() && fields.iter().all(|f| values.contains_key(&f.name));
        if !matches {
            return Err(FormError::MismatchedInitialState);
        }
        Ok(Self {
            fields,
            state: initial.clone(),
            initial,
            phase: FormPhase::Editing,
            active_field_index: 0,
        })
    }

    fn support_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::select(ISSUE_TYPE, "Issue Type", &ISSUE_TYPES),
            FieldSpec::text(SUBJECT, "Subject"),
            FieldSpec::text_area(MESSAGE, "Message"),
        ]
    }

    /// The support request form: issue type, subject and message
    pub fn support_request() -> Self {
        let fields = Self::support_fields();
        let initial = FormState::blank(&fields);
        Self {
            fields,
            state: initial.clone(),
            initial,
            phase: FormPhase::Editing,
            active_field_index: 0,
        }
    }

    /// The support request form with some initial values filled in
    pub fn support_request_with(
        prefill: &BTreeMap<String, String>,
    ) -> Result<Self, FormError> {
        let fields = Self::support_fields();
        let mut initial = FormState::blank(&fields);
        for (field, value) in prefill {
            initial = initial.with_value(field, value.as_str())?;
        }
        Self::new(fields, initial)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[cfg(test)]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    #[cfg(test)]
    pub fn initial(&self) -> &FormState {
        &self.initial
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.state.get(field)
    }

    /// Whether the values equal the initial state
    pub fn is_pristine(&self) -> bool {
        self.state == self.initial
    }

    /// Replace one field's value
    pub fn handle_change(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.state = self.state.with_value(field, value)?;
        self.phase = FormPhase::Editing;
        tracing::trace!(field, "Field changed");
        Ok(())
    }

    /// Prevent the default action, hand the values to `sink`, then reset.
    ///
    /// The reset happens whether or not the sink accepted the submission.
    pub async fn handle_submit(
        &mut self,
        event: &mut SubmitEvent,
        sink: &dyn SubmissionSink,
    ) -> Result<Submission, SinkError> {
        event.prevent_default();

        let submission = Submission::new(self.state.clone());
        let result = sink.submit(&submission).await;
        if let Err(ref err) = result {
            tracing::warn!(sink = sink.name(), submission_id = %submission.id, "Submission failed: {err}");
        }

        self.reset();
        result.map(|()| submission)
    }

    /// Route a form event to its handler.
    ///
    /// Field changes yield `None`, submissions yield their outcome.
    pub async fn dispatch(
        &mut self,
        event: FormEvent,
        sink: &dyn SubmissionSink,
    ) -> Result<Option<SubmitOutcome>, FormError> {
        match event {
            FormEvent::FieldChanged { field, value } => {
                self.handle_change(&field, value)?;
                Ok(None)
            }
            FormEvent::SubmitRequested(mut event) => {
                let result = self.handle_submit(&mut event, sink).await;
                Ok(Some(SubmitOutcome { event, result }))
            }
        }
    }

    fn reset(&mut self) {
        self.state = self.initial.clone();
        self.phase = FormPhase::Submitted;
        self.active_field_index = 0;
    }

    /// Focused field, `None` when the submit button is focused
    pub fn active_spec(&self) -> Option<&FieldSpec> {
        self.fields.get(self.active_field_index)
    }

    pub fn is_submit_active(&self) -> bool {
        self.active_field_index == self.fields.len()
    }

    pub fn is_active_field_multiline(&self) -> bool {
        self.active_spec().is_some_and(FieldSpec::is_multiline)
    }

    pub fn is_active_field_select(&self) -> bool {
        self.active_spec().is_some_and(FieldSpec::is_select)
    }

    /// Event replacing the focused text field's value with `edit` applied
    fn text_edit(&self, edit: impl FnOnce(&mut String)) -> Option<FormEvent> {
        let spec = self.active_spec().filter(|s| !s.is_select())?;
        let mut value = self.state.get(&spec.name).unwrap_or_default().to_string();
        edit(&mut value);
        Some(FormEvent::FieldChanged {
            field: spec.name.clone(),
            value,
        })
    }

    /// Edit appending a character to the focused text field
    pub fn char_input(&self, c: char) -> Option<FormEvent> {
        self.text_edit(|v| v.push(c))
    }

    /// Edit removing the last character of the focused text field
    pub fn backspace(&self) -> Option<FormEvent> {
        self.text_edit(|v| {
            v.pop();
        })
    }

    /// Edit inserting a line break, only for multi-line fields
    pub fn line_break(&self) -> Option<FormEvent> {
        if !self.is_active_field_multiline() {
            return None;
        }
        self.text_edit(|v| v.push('\n'))
    }

    /// Edit stepping the focused select to its next or previous option
    pub fn option_step(&self, forward: bool) -> Result<Option<FormEvent>, FormError> {
        let Some(spec) = self.active_spec() else {
            return Ok(None);
        };
        let current = self.state.get(&spec.name).unwrap_or_default();
        let Some(next) = spec.cycle_option(current, forward) else {
            return Err(FormError::NotASelect(spec.name.clone()));
        };
        Ok(Some(FormEvent::FieldChanged {
            field: spec.name.clone(),
            value: next.to_string(),
        }))
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::support_request()
    }
}

impl Form for FormController {
    fn field_count(&self) -> usize {
        self.fields.len() + 1 // fields + submit button
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.fields.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MockSubmissionSink;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn blank_support_state() -> FormState {
        FormState::from_pairs([(ISSUE_TYPE, ""), (SUBJECT, ""), (MESSAGE, "")])
    }

    fn accepting_sink() -> MockSubmissionSink {
        let mut sink = MockSubmissionSink::new();
        sink.expect_name().return_const("mock");
        sink.expect_submit().returning(|_| Ok(()));
        sink
    }

    fn failing_sink() -> MockSubmissionSink {
        let mut sink = MockSubmissionSink::new();
        sink.expect_name().return_const("mock");
        sink.expect_submit()
            .returning(|_| Err(SinkError::Rejected("offline".to_string())));
        sink
    }

    mod form_state {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_with_value_replaces_only_target() {
            let before = blank_support_state();
            let after = before.with_value(SUBJECT, "Hello").unwrap();
            assert_eq!(after.get(SUBJECT), Some("Hello"));
            assert_eq!(after.get(ISSUE_TYPE), Some(""));
            assert_eq!(after.get(MESSAGE), Some(""));
        }

        #[test]
        fn test_with_value_leaves_original_untouched() {
            let before = blank_support_state();
            let _after = before.with_value(SUBJECT, "Hello").unwrap();
            assert_eq!(before, blank_support_state());
        }

        #[test]
        fn test_with_value_unknown_field() {
            let state = blank_support_state();
            let result = state.with_value("email", "a@b.c");
            assert_eq!(result, Err(FormError::UnknownField("email".to_string())));
        }

        #[test]
        fn test_serializes_as_plain_map() {
            let state = FormState::from_pairs([(SUBJECT, "Invoice error")]);
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, r#"{"subject":"Invoice error"}"#);
        }

        #[test]
        fn test_blank_has_one_key_per_field() {
            let form = FormController::support_request();
            let state = FormState::blank(form.fields());
            assert_eq!(state, blank_support_state());
        }
    }

    mod controller {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_support_request_starts_pristine() {
            let form = FormController::support_request();
            assert!(form.is_pristine());
            assert_eq!(form.phase(), FormPhase::Editing);
            assert_eq!(form.state(), &blank_support_state());
            assert_eq!(form.active_field_index, 0);
        }

        #[test]
        fn test_new_rejects_mismatched_initial_state() {
            let fields = vec![FieldSpec::text(SUBJECT, "Subject")];
            let initial = FormState::from_pairs([("other", "")]);
            assert_eq!(
                FormController::new(fields, initial).unwrap_err(),
                FormError::MismatchedInitialState
            );
        }

        #[test]
        fn test_new_keeps_initial_values() {
            let fields = vec![FieldSpec::text(SUBJECT, "Subject")];
            let initial = FormState::from_pairs([(SUBJECT, "Re: order")]);
            let form = FormController::new(fields, initial).unwrap();
            assert_eq!(form.value(SUBJECT), Some("Re: order"));
        }

        #[test]
        fn test_support_request_with_prefill() {
            let prefill = BTreeMap::from([(ISSUE_TYPE.to_string(), "billing".to_string())]);
            let form = FormController::support_request_with(&prefill).unwrap();
            assert_eq!(form.value(ISSUE_TYPE), Some("billing"));
            assert_eq!(form.value(SUBJECT), Some(""));
            assert!(form.is_pristine());
        }

        #[test]
        fn test_support_request_with_unknown_prefill() {
            let prefill = BTreeMap::from([("email".to_string(), "a@b.c".to_string())]);
            let err = FormController::support_request_with(&prefill).unwrap_err();
            assert_eq!(err, FormError::UnknownField("email".to_string()));
        }

        #[tokio::test]
        async fn test_reset_returns_to_prefilled_values() {
            let prefill = BTreeMap::from([(SUBJECT.to_string(), "Re: order".to_string())]);
            let mut form = FormController::support_request_with(&prefill).unwrap();
            form.handle_change(SUBJECT, "changed").unwrap();

            form.handle_submit(&mut SubmitEvent::new(), &accepting_sink())
                .await
                .unwrap();

            assert_eq!(form.value(SUBJECT), Some("Re: order"));
        }

        #[test]
        fn test_key_set_never_changes() {
            let mut form = FormController::support_request();
            let keys: Vec<String> = form.initial().as_map().keys().cloned().collect();
            for (field, value) in [(ISSUE_TYPE, "billing"), (SUBJECT, "x"), (MESSAGE, "y")] {
                form.handle_change(field, value).unwrap();
                let now: Vec<String> = form.state().as_map().keys().cloned().collect();
                assert_eq!(now, keys);
            }
            assert!(form.handle_change("extra", "z").is_err());
            assert_eq!(form.state().as_map().len(), 3);
        }

        #[test]
        fn test_unknown_field_leaves_state_intact() {
            let mut form = FormController::support_request();
            form.handle_change(SUBJECT, "kept").unwrap();
            let err = form.handle_change("nope", "x").unwrap_err();
            assert_eq!(err, FormError::UnknownField("nope".to_string()));
            assert_eq!(form.value(SUBJECT), Some("kept"));
        }

        #[tokio::test]
        async fn test_example_scenario() {
            let mut form = FormController::support_request();

            form.handle_change(ISSUE_TYPE, "billing").unwrap();
            assert_eq!(
                form.state(),
                &FormState::from_pairs([(ISSUE_TYPE, "billing"), (SUBJECT, ""), (MESSAGE, "")])
            );

            form.handle_change(SUBJECT, "Invoice error").unwrap();
            let filled = FormState::from_pairs([
                (ISSUE_TYPE, "billing"),
                (SUBJECT, "Invoice error"),
                (MESSAGE, ""),
            ]);
            assert_eq!(form.state(), &filled);

            let received = Arc::new(Mutex::new(Vec::new()));
            let seen = received.clone();
            let mut sink = MockSubmissionSink::new();
            sink.expect_name().return_const("mock");
            sink.expect_submit().times(1).returning(move |s| {
                seen.lock().unwrap().push(s.fields.clone());
                Ok(())
            });

            let mut event = SubmitEvent::new();
            let submission = form.handle_submit(&mut event, &sink).await.unwrap();

            assert_eq!(submission.fields, filled);
            assert_eq!(received.lock().unwrap().as_slice(), &[filled]);
            assert_eq!(form.state(), &blank_support_state());
            assert_eq!(form.phase(), FormPhase::Submitted);
        }

        #[tokio::test]
        async fn test_submit_prevents_default_exactly_once() {
            let mut form = FormController::support_request();
            let sink = accepting_sink();
            let mut event = SubmitEvent::new();
            form.handle_submit(&mut event, &sink).await.unwrap();
            assert!(event.default_prevented());
            assert_eq!(event.prevent_calls(), 1);
        }

        #[tokio::test]
        async fn test_default_prevented_before_sink_runs() {
            let mut form = FormController::support_request();
            let mut event = SubmitEvent::new();
            let observer = event.clone();

            let seen_prevented = Arc::new(Mutex::new(None));
            let seen = seen_prevented.clone();
            let mut sink = MockSubmissionSink::new();
            sink.expect_name().return_const("mock");
            sink.expect_submit().times(1).returning(move |_| {
                *seen.lock().unwrap() = Some(observer.default_prevented());
                Ok(())
            });

            form.handle_submit(&mut event, &sink).await.unwrap();

            assert_eq!(*seen_prevented.lock().unwrap(), Some(true));
        }

        #[tokio::test]
        async fn test_sink_sees_values_before_reset() {
            let mut form = FormController::support_request();
            form.handle_change(MESSAGE, "before reset").unwrap();

            let mut sink = MockSubmissionSink::new();
            sink.expect_name().return_const("mock");
            sink.expect_submit()
                .withf(|s| s.fields.get(MESSAGE) == Some("before reset"))
                .times(1)
                .returning(|_| Ok(()));

            form.handle_submit(&mut SubmitEvent::new(), &sink).await.unwrap();
            assert!(form.is_pristine());
        }

        #[tokio::test]
        async fn test_failed_sink_still_resets() {
            let mut form = FormController::support_request();
            form.handle_change(SUBJECT, "lost").unwrap();
            form.active_field_index = 2;

            let sink = failing_sink();
            let mut event = SubmitEvent::new();
            let result = form.handle_submit(&mut event, &sink).await;

            assert!(matches!(result, Err(SinkError::Rejected(_))));
            assert!(form.is_pristine());
            assert_eq!(form.active_field_index, 0);
            assert_eq!(event.prevent_calls(), 1);
        }

        #[tokio::test]
        async fn test_double_submit_is_idempotent() {
            let mut form = FormController::support_request();
            form.handle_change(MESSAGE, "hello").unwrap();
            let sink = accepting_sink();

            form.handle_submit(&mut SubmitEvent::new(), &sink).await.unwrap();
            let first = form.state().clone();
            form.handle_submit(&mut SubmitEvent::new(), &sink).await.unwrap();

            assert_eq!(form.state(), &first);
            assert_eq!(form.state(), form.initial());
        }

        #[tokio::test]
        async fn test_edit_after_submit_returns_to_editing() {
            let mut form = FormController::support_request();
            let sink = accepting_sink();
            form.handle_submit(&mut SubmitEvent::new(), &sink).await.unwrap();
            assert_eq!(form.phase(), FormPhase::Submitted);

            form.handle_change(SUBJECT, "again").unwrap();
            assert_eq!(form.phase(), FormPhase::Editing);
        }

        #[tokio::test]
        async fn test_dispatch_routes_events() {
            let mut form = FormController::support_request();
            let sink = accepting_sink();

            let changed = form
                .dispatch(
                    FormEvent::FieldChanged {
                        field: SUBJECT.to_string(),
                        value: "via dispatch".to_string(),
                    },
                    &sink,
                )
                .await
                .unwrap();
            assert!(changed.is_none());
            assert_eq!(form.value(SUBJECT), Some("via dispatch"));

            let outcome = form
                .dispatch(FormEvent::SubmitRequested(SubmitEvent::new()), &sink)
                .await
                .unwrap()
                .unwrap();
            assert!(outcome.event.default_prevented());
            assert_eq!(outcome.result.unwrap().fields.get(SUBJECT), Some("via dispatch"));
            assert!(form.is_pristine());
        }

        #[tokio::test]
        async fn test_dispatch_unknown_field_errors() {
            let mut form = FormController::support_request();
            let sink = MockSubmissionSink::new();
            let result = form
                .dispatch(
                    FormEvent::FieldChanged {
                        field: "bogus".to_string(),
                        value: String::new(),
                    },
                    &sink,
                )
                .await;
            assert!(matches!(result, Err(FormError::UnknownField(_))));
        }
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        fn apply(form: &mut FormController, event: Option<FormEvent>) {
            if let Some(FormEvent::FieldChanged { field, value }) = event {
                form.handle_change(&field, value).unwrap();
            }
        }

        fn type_chars(form: &mut FormController, text: &str) {
            for c in text.chars() {
                let event = form.char_input(c);
                apply(form, event);
            }
        }

        #[test]
        fn test_char_input_and_backspace_on_text_field() {
            let mut form = FormController::support_request();
            form.set_active_field(1);
            type_chars(&mut form, "hi");
            assert_eq!(form.value(SUBJECT), Some("hi"));
            let event = form.backspace();
            apply(&mut form, event);
            assert_eq!(form.value(SUBJECT), Some("h"));
        }

        #[test]
        fn test_edit_events_do_not_touch_state() {
            let mut form = FormController::support_request();
            form.set_active_field(1);
            let event = form.char_input('x');
            assert!(matches!(
                event,
                Some(FormEvent::FieldChanged { ref field, ref value }) if field == SUBJECT && value == "x"
            ));
            assert!(form.is_pristine());
        }

        #[test]
        fn test_char_input_ignored_on_select() {
            let form = FormController::support_request();
            assert!(form.char_input('x').is_none());
        }

        #[test]
        fn test_char_input_ignored_on_submit_button() {
            let mut form = FormController::support_request();
            form.set_active_field(3);
            assert!(form.char_input('x').is_none());
            assert!(form.backspace().is_none());
        }

        #[test]
        fn test_line_break_only_in_text_area() {
            let mut form = FormController::support_request();
            form.set_active_field(1);
            assert!(form.line_break().is_none());

            form.set_active_field(2);
            type_chars(&mut form, "a");
            let event = form.line_break();
            apply(&mut form, event);
            type_chars(&mut form, "b");
            assert_eq!(form.value(MESSAGE), Some("a\nb"));
        }

        #[test]
        fn test_option_step_on_select() {
            let mut form = FormController::support_request();
            let event = form.option_step(true).unwrap();
            apply(&mut form, event);
            assert_eq!(form.value(ISSUE_TYPE), Some("billing"));
            for _ in 0..2 {
                let event = form.option_step(false).unwrap();
                apply(&mut form, event);
            }
            assert_eq!(form.value(ISSUE_TYPE), Some("other"));
        }

        #[test]
        fn test_option_step_on_text_field_errors() {
            let mut form = FormController::support_request();
            form.set_active_field(1);
            assert_eq!(
                form.option_step(true).unwrap_err(),
                FormError::NotASelect(SUBJECT.to_string())
            );
        }

        #[test]
        fn test_option_step_on_submit_button_is_none() {
            let mut form = FormController::support_request();
            form.set_active_field(3);
            assert!(form.option_step(true).unwrap().is_none());
        }
    }

    mod focus {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_field_count_includes_submit_button() {
            let form = FormController::support_request();
            assert_eq!(form.field_count(), 4);
        }

        #[test]
        fn test_next_field_cycles() {
            let mut form = FormController::support_request();
            for _ in 0..4 {
                form.next_field();
            }
            assert_eq!(form.active_field_index, 0);
        }

        #[test]
        fn test_prev_field_wraps_to_submit() {
            let mut form = FormController::support_request();
            form.prev_field();
            assert!(form.is_submit_active());
            assert!(form.active_spec().is_none());
        }

        #[test]
        fn test_set_active_field_clamps() {
            let mut form = FormController::support_request();
            form.set_active_field(100);
            assert_eq!(form.active_field_index, 3);
        }

        #[test]
        fn test_active_field_kinds() {
            let mut form = FormController::support_request();
            assert!(form.is_active_field_select());
            form.next_field();
            assert!(!form.is_active_field_select());
            assert!(!form.is_active_field_multiline());
            form.next_field();
            assert!(form.is_active_field_multiline());
        }
    }
}
