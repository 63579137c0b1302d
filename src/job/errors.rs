//! Error types for the job-file preparation pipeline

use thiserror::Error;

/// Errors that can occur while preparing or running a job script
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The script source could not be resolved (bad or unreadable source)
    #[error("Failed to resolve script source: {0}")]
    Expansion(String),

    /// The expanded script could not be written into the workspace
    #[error("Failed to materialize script in workspace: {0}")]
    Materialization(String),

    /// The materialized temp file was missing or unreadable before launch
    #[error("Script file verification failed: {0}")]
    Verification(String),

    /// The interpreter process could not be started
    #[error("Failed to launch interpreter: {0}")]
    Launch(String),

    /// The operation was cancelled at a blocking point
    #[error("Interrupted while {phase}")]
    Interrupted {
        /// Phase during which the cancellation was observed.
        phase: &'static str,
    },

    /// No factory registered for the requested source type tag
    #[error("Unknown job source type: '{0}'")]
    UnknownSource(String),

    /// A source configuration did not match its factory's expected shape
    #[error("Invalid job source configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for JobError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl JobError {
    /// Returns true for cancellation, which the caller must report as an
    /// aborted build rather than a failed one
    #[must_use]
    pub fn is_interruption(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}
