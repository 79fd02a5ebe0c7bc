//! Form domain layer
//!
//! Field descriptions, the controlled [`FormState`] mapping and the
//! [`FormController`] that keeps it in sync with edits and submissions.

mod event;
mod field;
mod form_state;

pub use event::{FormEvent, SubmitEvent};
pub use field::FieldSpec;
pub use form_state::{
    Form, FormController, FormError, FormPhase, FormState, ISSUE_TYPE, MESSAGE, SUBJECT,
};
