//! Interpreter discovery and command-line construction
//!
//! The interpreter executable is located by probing a short ordered list of
//! well-known install locations; the first existing path wins. If none
//! exist the bare command name is used and resolution is left to the ambient
//! search path, letting the launch fail if the interpreter is truly absent.

use std::path::{Path, PathBuf};

/// External interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    /// Bare command name used when no probe path exists
    pub command: String,

    /// Well-known install locations, probed in order
    pub probe_paths: Vec<PathBuf>,

    /// Arguments inserted between the interpreter and the script path,
    /// e.g. execution-policy bypass flags; empty by default
    pub args: Vec<String>,

    /// Script file extension this interpreter expects
    pub script_suffix: String,
}

impl Interpreter {
    /// Creates an interpreter with no probe paths and no extra arguments
    #[must_use]
    pub fn new(command: impl Into<String>, script_suffix: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            probe_paths: Vec::new(),
            args: Vec::new(),
            script_suffix: script_suffix.into(),
        }
    }

    /// Windows PowerShell, probing its system install locations
    #[must_use]
    pub fn powershell() -> Self {
        Self {
            command: "powershell.exe".to_string(),
            probe_paths: vec![
                PathBuf::from(r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe"),
                PathBuf::from(r"C:\Windows\SysWOW64\WindowsPowerShell\v1.0\powershell.exe"),
            ],
            args: Vec::new(),
            script_suffix: ".ps1".to_string(),
        }
    }

    /// PowerShell Core (`pwsh`), probing common unix and windows locations
    #[must_use]
    pub fn pwsh() -> Self {
        Self {
            command: "pwsh".to_string(),
            probe_paths: vec![
                PathBuf::from("/usr/bin/pwsh"),
                PathBuf::from("/usr/local/bin/pwsh"),
                PathBuf::from(r"C:\Program Files\PowerShell\7\pwsh.exe"),
            ],
            args: Vec::new(),
            script_suffix: ".ps1".to_string(),
        }
    }

    /// POSIX shell, for running on hosts without PowerShell
    #[must_use]
    pub fn posix_shell() -> Self {
        Self {
            command: "sh".to_string(),
            probe_paths: vec![PathBuf::from("/bin/sh"), PathBuf::from("/usr/bin/sh")],
            args: Vec::new(),
            script_suffix: ".sh".to_string(),
        }
    }

    /// Adds probe paths checked before the defaults fall through to the bare
    /// command
    #[must_use]
    pub fn with_probe_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.probe_paths = paths;
        self
    }

    /// Sets extra interpreter arguments
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Resolves the executable: first existing probe path, else the bare
    /// command name
    #[must_use]
    pub fn locate(&self) -> String {
        for path in &self.probe_paths {
            if path.exists() {
                return path.to_string_lossy().to_string();
            }
        }
        self.command.clone()
    }
}

/// Builds the command line for running a materialized script
///
/// The resolved interpreter path is always the first element and the script
/// path is always the last.
#[must_use]
pub fn build_command_line(interpreter: &Interpreter, script_path: &Path) -> Vec<String> {
    let mut cmd = Vec::with_capacity(interpreter.args.len() + 2);
    cmd.push(interpreter.locate());
    cmd.extend(interpreter.args.iter().cloned());
    cmd.push(script_path.to_string_lossy().to_string());
    cmd
}
