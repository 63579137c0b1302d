//! scriptline - run CI job scripts the way a build step would
//!
//! Materializes a parameter/environment-expanded script into a workspace
//! temp file, executes it via an external interpreter (PowerShell by
//! default) and streams annotated output to the console. The process exit
//! code mirrors the script's.
//!
//! ## Commands
//!
//! - `scriptline run` - Materialize and execute a script
//! - `scriptline expand` - Print the materialized script without executing
//! - `scriptline completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Run an inline script with a build parameter
//! scriptline run --inline 'Write-Host "Deploying ${TARGET}"' --param TARGET=staging
//!
//! # Run a workspace script file through pwsh with policy bypass
//! scriptline run deploy.ps1 --interpreter pwsh \
//!     --interpreter-args '-ExecutionPolicy Bypass -File'
//!
//! # Inspect what would be executed
//! scriptline expand --inline 'Build #${BUILD_NUMBER}' --build-number 7
//! ```

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    // Initialize tracing for debugging
    if std::env::var("SCRIPTLINE_DEBUG").is_ok() {
        scriptline::infrastructure::init_logging("debug");
    }

    // Run the CLI
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if std::env::var("SCRIPTLINE_VERBOSE").is_ok() {
                eprintln!("{:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}
