//! # Scriptline - CI build-step script runner
//!
//! Scriptline is the engine of a CI "execute script" build step: it takes a
//! script source (inline text or a workspace file), expands build parameter
//! and environment placeholders, writes the result to a uniquely named temp
//! file inside the build workspace, runs it through an external interpreter
//! (PowerShell by default) and streams the annotated output back to the
//! build console, cleaning the temp file up whatever the outcome.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scriptline::prelude::*;
//!
//! # fn main() -> Result<(), JobError> {
//! let workspace = LocalWorkspace::new("/workspace/my-job")?;
//! let context = BuildContext::new("my-job", 42, workspace.root())
//!     .with_parameter("TARGET", "staging");
//!
//! let runner = ScriptRunner::new(Interpreter::powershell(), ConsoleLogger::stdout());
//! let source = StringJobSource::new("deploy", "Write-Host \"Deploying to ${TARGET}\"");
//!
//! let result = runner.run(&source, &context, &workspace)?;
//! assert!(result.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Expansion semantics
//!
//! Placeholders use the `${NAME}` syntax. Build parameters are substituted
//! first, then environment variables against the merged build environment in
//! which parameter values override same-named entries. Unknown placeholders
//! stay literal.
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <https://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <https://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod console;
pub mod executor;
pub mod infrastructure;
pub mod job;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use console::{annotate, ConsoleLogger, CONSOLE_TAG};
pub use executor::{
    build_command_line, expand_placeholders, normalize_crlf, verify, BuildContext, CancelFlag,
    ExecutionResult, Interpreter, LocalWorkspace, MaterializedScript, Materializer, ScriptRunner,
    Verification, Workspace,
};
pub use job::{
    parse_properties, FileJobSource, JobError, JobSource, JobSourceRegistry, PropertyOptions,
    StringJobSource,
};

/// Version of the scriptline crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
