//! Trait abstraction for the downstream submission collaborator

use crate::state::FormState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A snapshot of the form handed to a sink on submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub fields: FormState,
}

impl Submission {
    pub fn new(fields: FormState) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            fields,
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write submission: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize submission: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Receiver of submitted forms, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Short name used in status messages and logs
    fn name(&self) -> &'static str;

    /// Hand a submission over to the sink
    async fn submit(&self, submission: &Submission) -> Result<(), SinkError>;
}
