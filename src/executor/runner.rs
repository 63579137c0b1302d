//! Script execution
//!
//! Drives one build-step invocation end to end:
//!
//! ```text
//! Resolving -> Materializing -> Verifying -> {Aborted | Executing}
//!           -> Cleaning -> {Succeeded | Failed}
//! ```
//!
//! The temp file is deleted after the process completes or after any failure
//! prior to launch; deletion failures are logged and never change the
//! reported outcome. Cancellation propagates as `JobError::Interrupted` from
//! every blocking point so the surrounding CI system can record the build as
//! aborted rather than failed.

use crate::console::ConsoleLogger;
use crate::executor::command::{build_command_line, Interpreter};
use crate::executor::materialize::{verify, MaterializedScript, Materializer, Verification};
use crate::executor::{BuildContext, CancelFlag, Workspace};
use crate::job::{JobError, JobSource, PropertyOptions};
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::time::Duration;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of one interpreter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Raw exit code; -1 when the process could not be launched
    pub exit_code: i32,
}

impl ExecutionResult {
    /// Returns true if the step succeeded (exit code 0)
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns true if the step failed
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.exit_code != 0
    }
}

/// Runs job scripts through an external interpreter
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: Interpreter,
    materializer: Materializer,
    options: PropertyOptions,
    console: ConsoleLogger,
    cancel: CancelFlag,
}

impl ScriptRunner {
    /// Creates a runner for the given interpreter, writing progress to the
    /// given console
    #[must_use]
    pub fn new(interpreter: Interpreter, console: ConsoleLogger) -> Self {
        let materializer = Materializer::new().with_suffix(interpreter.script_suffix.clone());
        Self {
            interpreter,
            materializer,
            options: PropertyOptions::new(),
            console,
            cancel: CancelFlag::new(),
        }
    }

    /// Replaces the materializer (prefix, suffix, CRLF normalization)
    #[must_use]
    pub fn with_materializer(mut self, materializer: Materializer) -> Self {
        self.materializer = materializer;
        self
    }

    /// Sets the step-level interpreter options
    #[must_use]
    pub fn with_options(mut self, options: PropertyOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses an externally controlled cancellation flag
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for requesting cancellation of a running invocation
    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Runs one build-step invocation
    ///
    /// # Errors
    ///
    /// Returns the preparation error that aborted the step, or
    /// `JobError::Interrupted` on cancellation. A process that launched and
    /// exited non-zero is not an error here; inspect the returned exit code.
    pub fn run(
        &self,
        source: &dyn JobSource,
        context: &BuildContext,
        workspace: &dyn Workspace,
    ) -> Result<ExecutionResult, JobError> {
        // Resolving
        let raw_text = source
            .resolve(context, workspace, &self.cancel)
            .map_err(|e| {
                if !e.is_interruption() {
                    self.console
                        .log_tagged(&format!("ERROR: Could not resolve job script: {e}"));
                }
                e
            })?;

        // Materializing
        let script = self
            .materializer
            .write(&raw_text, context, workspace, &self.cancel)
            .map_err(|e| {
                if !e.is_interruption() {
                    self.console
                        .log_tagged(&format!("ERROR: Could not prepare job file: {e}"));
                }
                e
            })?;
        self.console
            .log_tagged(&format!("INFO: Job file {} prepared", script.file_name()));

        // Verifying; failures abort with the temp file removed
        match verify(&script, workspace, &self.cancel, &self.console) {
            Verification::Present => {}
            Verification::Missing => {
                self.cleanup(&script, workspace);
                return Err(JobError::Verification(format!(
                    "job file {} missing before launch",
                    script.file_name()
                )));
            }
            Verification::Interrupted => {
                self.cleanup(&script, workspace);
                return Err(JobError::Interrupted { phase: "verifying" });
            }
        }

        // Executing, then Cleaning unconditionally
        let outcome = self.execute(&script, context, workspace);
        self.cleanup(&script, workspace);
        let exit_code = outcome?;

        Ok(ExecutionResult { exit_code })
    }

    /// Runs one invocation and reduces it to the step outcome
    ///
    /// All failures except cancellation map to `Ok(false)`; cancellation
    /// propagates so the build can be recorded as aborted.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Interrupted` on cancellation only.
    pub fn perform(
        &self,
        source: &dyn JobSource,
        context: &BuildContext,
        workspace: &dyn Workspace,
    ) -> Result<bool, JobError> {
        match self.run(source, context, workspace) {
            Ok(result) => Ok(result.is_success()),
            Err(e) if e.is_interruption() => Err(e),
            Err(e) => {
                tracing::error!(error = %e, "Build step aborted");
                Ok(false)
            }
        }
    }

    /// Launches the interpreter and waits for it, streaming output
    ///
    /// Launch failures are fatal for the step but not for the caller: they
    /// are logged and mapped to exit code -1.
    fn execute(
        &self,
        script: &MaterializedScript,
        context: &BuildContext,
        workspace: &dyn Workspace,
    ) -> Result<i32, JobError> {
        self.cancel.checkpoint("executing")?;

        let mut env = context.build_env();
        self.options.apply(&mut env);

        let cmd = build_command_line(&self.interpreter, &script.path);
        self.console
            .log_tagged(&format!("INFO: Command {}", cmd.join(" ")));
        tracing::debug!(command = ?cmd, "Launching interpreter");

        let mut child = match Command::new(&cmd[0])
            .args(&cmd[1..])
            .current_dir(workspace.root())
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                self.console
                    .log_tagged(&format!("ERROR: command execution failed: {e}"));
                tracing::error!(error = %e, command = %cmd[0], "Failed to launch interpreter");
                return Ok(-1);
            }
        };

        let stdout_pump = child.stdout.take().map(|out| self.pump_lines(out));
        let stderr_pump = child.stderr.take().map(|err| self.pump_lines(err));

        let exit_code = loop {
            if self.cancel.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                join_pump(stdout_pump);
                join_pump(stderr_pump);
                return Err(JobError::Interrupted { phase: "executing" });
            }
            match child.try_wait() {
                Ok(Some(status)) => break status.code().unwrap_or(-1),
                Ok(None) => std::thread::sleep(WAIT_POLL_INTERVAL),
                Err(e) => {
                    self.console
                        .log_tagged(&format!("ERROR: command execution failed: {e}"));
                    break -1;
                }
            }
        };

        join_pump(stdout_pump);
        join_pump(stderr_pump);
        Ok(exit_code)
    }

    fn pump_lines<R>(&self, reader: R) -> std::thread::JoinHandle<()>
    where
        R: std::io::Read + Send + 'static,
    {
        let console = self.console.clone();
        std::thread::spawn(move || {
            for line in BufReader::new(reader).lines().map_while(Result::ok) {
                console.stream(&line);
            }
        })
    }

    /// Best-effort temp-file deletion; never escalates
    fn cleanup(&self, script: &MaterializedScript, workspace: &dyn Workspace) {
        self.console
            .log_tagged(&format!("INFO: Deleting job file {}", script.file_name()));
        match workspace.delete(&script.path) {
            Ok(_) => self
                .console
                .log_tagged(&format!("INFO: Script file deleted: {}", script.file_name())),
            Err(e) => {
                self.console.log_tagged(&format!(
                    "ERROR: Unable to delete script file {}: {e}",
                    script.file_name()
                ));
                tracing::warn!(error = %e, path = %script.path.display(), "Temp file cleanup failed");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn build_process_env(
        &self,
        context: &BuildContext,
    ) -> std::collections::HashMap<String, String> {
        let mut env = context.build_env();
        self.options.apply(&mut env);
        env
    }
}

fn join_pump(handle: Option<std::thread::JoinHandle<()>>) {
    if let Some(handle) = handle {
        let _ = handle.join();
    }
}
