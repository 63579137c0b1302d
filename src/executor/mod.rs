//! Script preparation and execution
//!
//! Everything between resolved script text and a reported exit code: the
//! per-build expansion context, workspace file access, temp-file
//! materialization, interpreter command-line construction, and the runner
//! that drives one invocation through its phases.

mod cancel;
mod command;
mod context;
mod materialize;
mod runner;
mod workspace;

pub use cancel::CancelFlag;
pub use command::{build_command_line, Interpreter};
pub use context::{
    expand_placeholders, BuildContext, BUILD_NUMBER_VAR, JOB_NAME_VAR, WORKSPACE_VAR,
};
pub use materialize::{
    normalize_crlf, verify, MaterializedScript, Materializer, Verification, DEFAULT_JOB_PREFIX,
    DEFAULT_JOB_SUFFIX,
};
pub use runner::{ExecutionResult, ScriptRunner};
pub use workspace::{LocalWorkspace, Workspace};
