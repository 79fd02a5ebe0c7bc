//! Submission sinks receiving completed forms

mod json_file;
mod log_sink;
mod traits;

pub use json_file::JsonFileSink;
pub use log_sink::LogSink;
pub use traits::{SinkError, Submission, SubmissionSink};

#[cfg(test)]
pub use traits::MockSubmissionSink;
