//! Configuration handling for the form

use crate::sink::{JsonFileSink, LogSink, SubmissionSink};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Where submitted forms are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Log,
    Json,
}

/// User configuration for the form
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Submission sink
    pub sink: Option<SinkKind>,
    /// File the JSON sink appends to
    pub submissions_path: Option<String>,
    /// File receiving log output
    pub log_file: Option<String>,
    /// Values the form starts with and resets to, by field identifier
    #[serde(default)]
    pub initial_values: BTreeMap<String, String>,
}

impl FormConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "support-form", "support-form")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: FormConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn sink_kind(&self) -> SinkKind {
        self.sink.unwrap_or_default()
    }

    /// Submissions file, defaulting to the data directory
    pub fn submissions_path(&self) -> PathBuf {
        self.submissions_path
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| {
                Self::project_dirs().map(|dirs| dirs.data_dir().join("submissions.jsonl"))
            })
            .unwrap_or_else(|| PathBuf::from("submissions.jsonl"))
    }

    /// Log file, `None` when no location can be determined
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_ref().map(PathBuf::from).or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join("support-form.log"))
        })
    }

    /// Build the configured submission sink
    pub fn build_sink(&self) -> Box<dyn SubmissionSink> {
        match self.sink_kind() {
            SinkKind::Log => Box::new(LogSink),
            SinkKind::Json => Box::new(JsonFileSink::new(self.submissions_path())),
        }
    }
}
