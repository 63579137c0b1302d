//! Prelude module for common imports

// Re-export job source types
pub use crate::job::{
    FileJobSource, JobError, JobSource, JobSourceRegistry, PropertyOptions, StringJobSource,
};

// Re-export executor types
pub use crate::executor::{
    BuildContext, CancelFlag, ExecutionResult, Interpreter, LocalWorkspace, MaterializedScript,
    Materializer, ScriptRunner, Verification, Workspace,
};

// Re-export console types
pub use crate::console::{ConsoleLogger, CONSOLE_TAG};
