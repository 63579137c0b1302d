//! Script materialization
//!
//! Turns resolved script text into a temp file inside the build workspace:
//! two expansion passes (build parameters, then environment), an optional
//! explicit CRLF transform, and a uniquely named temp-file write through the
//! workspace.
//!
//! Expansion never converts line endings on its own. Interpreters that
//! expect native endings get them only through the separate, opt-in CRLF
//! transform.

use crate::console::ConsoleLogger;
use crate::executor::{BuildContext, CancelFlag, Workspace};
use crate::job::JobError;
use std::path::PathBuf;

/// Default temp-file name prefix identifying this runner
pub const DEFAULT_JOB_PREFIX: &str = "scriptline_";

/// Default temp-file suffix, matching the PowerShell script extension
pub const DEFAULT_JOB_SUFFIX: &str = ".ps1";

/// An expanded script written to a workspace temp file
///
/// Owned exclusively by a single execution attempt: the file is created at
/// the start of execution and deleted at the end, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedScript {
    /// Path of the temp file inside the workspace
    pub path: PathBuf,

    /// The expanded content that was written
    pub content: String,
}

impl MaterializedScript {
    /// File name of the temp file, for console messages
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Writes expanded scripts into workspace temp files
#[derive(Debug, Clone)]
pub struct Materializer {
    prefix: String,
    suffix: String,
    crlf_newlines: bool,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Materializer {
    /// Creates a materializer with the default prefix and suffix
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_JOB_PREFIX.to_string(),
            suffix: DEFAULT_JOB_SUFFIX.to_string(),
            crlf_newlines: false,
        }
    }

    /// Sets the temp-file suffix (the target interpreter's script extension)
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the temp-file prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enables the explicit CRLF transform applied after expansion
    #[must_use]
    pub fn with_crlf_newlines(mut self, enabled: bool) -> Self {
        self.crlf_newlines = enabled;
        self
    }

    /// Expands raw script text and writes it to a new workspace temp file
    ///
    /// # Errors
    ///
    /// Returns `JobError::Materialization` if the temp file cannot be
    /// created and `JobError::Interrupted` on cancellation.
    pub fn write(
        &self,
        raw_text: &str,
        context: &BuildContext,
        workspace: &dyn Workspace,
        cancel: &CancelFlag,
    ) -> Result<MaterializedScript, JobError> {
        cancel.checkpoint("materializing")?;

        let expanded = context.expand(raw_text);
        let content = if self.crlf_newlines {
            normalize_crlf(&expanded)
        } else {
            expanded
        };

        let path = workspace
            .create_temp_file(&self.prefix, &self.suffix, &content)
            .map_err(|e| JobError::Materialization(e.to_string()))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Materialized job script");

        Ok(MaterializedScript { path, content })
    }
}

/// Rewrites text with CRLF line endings and a trailing CRLF
///
/// Already-CRLF input comes out unchanged.
#[must_use]
pub fn normalize_crlf(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 16 + 2);
    for line in input.split('\n') {
        out.push_str(line.strip_suffix('\r').unwrap_or(line));
        out.push_str("\r\n");
    }
    // split() yields one final empty piece for trailing-newline input
    if input.ends_with('\n') {
        out.truncate(out.len() - 2);
    }
    out
}

/// Outcome of the pre-launch existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The temp file exists on the workspace host
    Present,

    /// The file is missing, or the check itself failed with an IO error
    Missing,

    /// Cancellation was observed during the check
    Interrupted,
}

/// Confirms the materialized temp file exists before launching
///
/// Missing files and IO errors during the check are soft failures: the
/// condition is logged and reported as [`Verification::Missing`] for the
/// caller to abort on, never raised as an error. Cancellation is surfaced as
/// its own outcome so the caller can abort instead of failing the build.
#[must_use]
pub fn verify(
    script: &MaterializedScript,
    workspace: &dyn Workspace,
    cancel: &CancelFlag,
    console: &ConsoleLogger,
) -> Verification {
    if cancel.is_cancelled() {
        return Verification::Interrupted;
    }
    match workspace.exists(&script.path) {
        Ok(true) => Verification::Present,
        Ok(false) => {
            console.log_tagged(&format!(
                "ERROR: Job file {} doesn't exist in workspace {}",
                script.file_name(),
                workspace.root().display()
            ));
            Verification::Missing
        }
        Err(e) => {
            console.log_tagged(&format!(
                "ERROR: failed to verify that {} exists: {e}",
                script.file_name()
            ));
            Verification::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::LocalWorkspace;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> BuildContext {
        BuildContext::new("test-job", 3, dir.path()).with_env(HashMap::new())
    }

    fn quiet_console() -> ConsoleLogger {
        ConsoleLogger::new(Box::new(std::io::sink())).without_color()
    }

    #[test]
    fn test_write_expands_and_creates_file() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir).with_parameter("TestStringParam", "My test string parameter");

        let script = Materializer::new()
            .write("Value: ${TestStringParam}", &ctx, &ws, &CancelFlag::new())
            .unwrap();

        assert_eq!(script.content, "Value: My test string parameter");
        assert_eq!(
            ws.read_to_string(&script.path).unwrap(),
            "Value: My test string parameter"
        );
        assert!(script.file_name().starts_with(DEFAULT_JOB_PREFIX));
        assert!(script.file_name().ends_with(DEFAULT_JOB_SUFFIX));
    }

    #[test]
    fn test_write_leaves_line_endings_alone_by_default() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);

        let script = Materializer::new()
            .write("line1\nline2", &ctx, &ws, &CancelFlag::new())
            .unwrap();
        assert_eq!(script.content, "line1\nline2");
    }

    #[test]
    fn test_write_with_crlf_normalization() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);

        let script = Materializer::new()
            .with_crlf_newlines(true)
            .write("line1\nline2", &ctx, &ws, &CancelFlag::new())
            .unwrap();
        assert_eq!(script.content, "line1\r\nline2\r\n");
    }

    #[test]
    fn test_normalize_crlf_idempotent() {
        assert_eq!(normalize_crlf("a\r\nb\r\n"), "a\r\nb\r\n");
        assert_eq!(normalize_crlf(normalize_crlf("a\nb").as_str()), "a\r\nb\r\n");
    }

    #[test]
    fn test_two_invocations_get_distinct_paths() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);
        let materializer = Materializer::new();

        let first = materializer.write("x", &ctx, &ws, &CancelFlag::new()).unwrap();
        let second = materializer.write("x", &ctx, &ws, &CancelFlag::new()).unwrap();
        assert_ne!(first.path, second.path);
    }

    #[test]
    fn test_write_interrupted() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = Materializer::new().write("x", &ctx, &ws, &cancel).unwrap_err();
        assert!(err.is_interruption());
    }

    #[test]
    fn test_verify_present() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);
        let script = Materializer::new().write("x", &ctx, &ws, &CancelFlag::new()).unwrap();

        let outcome = verify(&script, &ws, &CancelFlag::new(), &quiet_console());
        assert_eq!(outcome, Verification::Present);
    }

    #[test]
    fn test_verify_missing_is_soft() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let script = MaterializedScript {
            path: dir.path().join("scriptline_gone.ps1"),
            content: String::new(),
        };

        let outcome = verify(&script, &ws, &CancelFlag::new(), &quiet_console());
        assert_eq!(outcome, Verification::Missing);
    }

    #[test]
    fn test_verify_surfaces_interruption() {
        let dir = TempDir::new().unwrap();
        let ws = LocalWorkspace::new(dir.path()).unwrap();
        let ctx = context(&dir);
        let script = Materializer::new().write("x", &ctx, &ws, &CancelFlag::new()).unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let outcome = verify(&script, &ws, &cancel, &quiet_console());
        assert_eq!(outcome, Verification::Interrupted);
    }
}
