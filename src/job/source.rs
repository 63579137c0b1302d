//! Job script sources
//!
//! A job source produces the raw script text a build step will execute:
//! either inline text stored with the step configuration, or a path
//! expression resolved and read from the workspace at build time.

use crate::executor::{BuildContext, CancelFlag, Workspace};
use crate::job::JobError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source of job script text
///
/// Constructed once per build-step configuration and immutable for the
/// duration of a build.
pub trait JobSource: std::fmt::Debug + Send + Sync {
    /// Display name of this source configuration
    fn job_name(&self) -> &str;

    /// Produces the raw script text to be materialized
    ///
    /// # Errors
    ///
    /// Returns `JobError::Expansion` if the source cannot be read and
    /// `JobError::Interrupted` on build cancellation.
    fn resolve(
        &self,
        context: &BuildContext,
        workspace: &dyn Workspace,
        cancel: &CancelFlag,
    ) -> Result<String, JobError>;
}

/// Inline script text stored with the step configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringJobSource {
    /// Display name of the job
    pub job_name: String,

    /// Literal script text
    pub job_content: String,
}

impl StringJobSource {
    /// Creates an inline source
    #[must_use]
    pub fn new(job_name: impl Into<String>, job_content: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            job_content: job_content.into(),
        }
    }
}

impl JobSource for StringJobSource {
    fn job_name(&self) -> &str {
        &self.job_name
    }

    fn resolve(
        &self,
        _context: &BuildContext,
        _workspace: &dyn Workspace,
        cancel: &CancelFlag,
    ) -> Result<String, JobError> {
        cancel.checkpoint("resolving")?;
        // Literal text; placeholder expansion happens during materialization
        Ok(self.job_content.clone())
    }
}

/// Script read from a workspace file whose path may contain placeholders
///
/// The path expression is expanded with build parameters first and
/// environment variables second, then read through the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileJobSource {
    /// Display name of the job
    pub job_name: String,

    /// Path expression, relative to the workspace unless absolute
    pub job_path: String,
}

impl FileJobSource {
    /// Creates a file-backed source
    #[must_use]
    pub fn new(job_name: impl Into<String>, job_path: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            job_path: job_path.into(),
        }
    }

    /// Expands the path expression against the build context
    #[must_use]
    pub fn expand_job_path(&self, context: &BuildContext) -> String {
        context.expand(&self.job_path)
    }
}

impl JobSource for FileJobSource {
    fn job_name(&self) -> &str {
        &self.job_name
    }

    fn resolve(
        &self,
        context: &BuildContext,
        workspace: &dyn Workspace,
        cancel: &CancelFlag,
    ) -> Result<String, JobError> {
        cancel.checkpoint("resolving")?;
        let path = self.expand_job_path(context);
        tracing::debug!(path = %path, "Reading job script from workspace");
        workspace
            .read_to_string(&PathBuf::from(&path))
            .map_err(|e| JobError::Expansion(format!("cannot read '{path}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::LocalWorkspace;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn context(workspace: &TempDir) -> BuildContext {
        BuildContext::new("test-job", 1, workspace.path()).with_env(HashMap::new())
    }

    #[test]
    fn test_string_source_returns_literal_text() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir).with_parameter("P", "value");

        let source = StringJobSource::new("inline", "Write-Host ${P}");
        let raw = source.resolve(&ctx, &ws, &CancelFlag::new()).unwrap();
        // No expansion yet; that is the materializer's job
        assert_eq!(raw, "Write-Host ${P}");
    }

    #[test]
    fn test_file_source_expands_path_and_reads() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("job_1.ps1"), "Write-Host from-file").unwrap();

        let ctx = context(&dir).with_parameter("TestParam", "job");
        let source = FileJobSource::new("testJob", "${TestParam}_${BUILD_NUMBER}.ps1");

        assert_eq!(source.expand_job_path(&ctx), "job_1.ps1");
        let raw = source.resolve(&ctx, &ws, &CancelFlag::new()).unwrap();
        assert_eq!(raw, "Write-Host from-file");
    }

    #[test]
    fn test_file_source_missing_file_is_expansion_error() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);

        let source = FileJobSource::new("testJob", "absent.ps1");
        let err = source.resolve(&ctx, &ws, &CancelFlag::new()).unwrap_err();
        assert!(matches!(err, JobError::Expansion(_)));
    }

    #[test]
    fn test_cancellation_propagates_from_resolve() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let source = StringJobSource::new("inline", "Write-Host hi");
        let err = source.resolve(&ctx, &ws, &cancel).unwrap_err();
        assert!(err.is_interruption());
    }
}
