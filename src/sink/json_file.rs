//! Sink appending submissions to a JSON lines file

use super::traits::{SinkError, Submission, SubmissionSink};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Appends one JSON object per line for every submission
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

}

#[async_trait]
impl SubmissionSink for JsonFileSink {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn submit(&self, submission: &Submission) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut line = serde_json::to_string(submission)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), submission_id = %submission.id, "Appended submission");
        Ok(())
    }
}
