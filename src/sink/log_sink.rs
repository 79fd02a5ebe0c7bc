//! Sink writing submissions to the diagnostic log

use super::traits::{SinkError, Submission, SubmissionSink};
use async_trait::async_trait;

/// Emits each submission as an `info` event
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl SubmissionSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn submit(&self, submission: &Submission) -> Result<(), SinkError> {
        let fields = serde_json::to_string(&submission.fields)?;
        tracing::info!(
            submission_id = %submission.id,
            submitted_at = %submission.submitted_at,
            %fields,
            "Form submitted"
        );
        Ok(())
    }
}
