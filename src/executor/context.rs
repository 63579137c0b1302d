//! Build context and placeholder expansion
//!
//! This module provides the per-build expansion context: build parameters
//! (supplied at trigger time) plus environment variables (including computed
//! ones like the build number), and the two-pass `${VAR}` expansion applied
//! to script text before materialization.
//!
//! ## Expansion order
//!
//! Expansion happens in two passes whose order is significant:
//!
//! 1. Build parameter placeholders are substituted first.
//! 2. Environment-variable placeholders are substituted against the full
//!    build environment, which already contains the parameter values merged
//!    in on top of the environment entries.
//!
//! A placeholder naming both a parameter and an environment variable
//! therefore always receives the parameter value. Unknown placeholders are
//! left as literal text.

use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

/// Computed environment key holding the current build number
pub const BUILD_NUMBER_VAR: &str = "BUILD_NUMBER";

/// Computed environment key holding the job name
pub const JOB_NAME_VAR: &str = "JOB_NAME";

/// Computed environment key holding the workspace directory
pub const WORKSPACE_VAR: &str = "WORKSPACE";

/// Per-build expansion context
///
/// Built fresh for every build invocation and never persisted. Keys are
/// case-sensitive strings.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Name of the job being built
    pub job_name: String,

    /// Current build number
    pub build_number: usize,

    /// Parameters supplied when the build was triggered
    pub parameters: HashMap<String, String>,

    /// Environment variables available to the build
    pub env: HashMap<String, String>,

    /// Workspace directory allocated to the build
    pub workspace: PathBuf,
}

impl BuildContext {
    /// Creates a context with an empty parameter set and the ambient process
    /// environment
    #[must_use]
    pub fn new(job_name: &str, build_number: usize, workspace: impl Into<PathBuf>) -> Self {
        Self {
            job_name: job_name.to_string(),
            build_number,
            parameters: HashMap::new(),
            env: std::env::vars().collect(),
            workspace: workspace.into(),
        }
    }

    /// Replaces the environment map (useful for hermetic tests)
    #[must_use]
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Adds a build parameter
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Adds an environment variable
    #[must_use]
    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Returns the full build environment: environment variables, computed
    /// keys, and the build parameters merged in last so they override
    /// same-named entries
    #[must_use]
    pub fn build_env(&self) -> HashMap<String, String> {
        let mut merged = self.env.clone();
        merged.insert(
            WORKSPACE_VAR.to_string(),
            self.workspace.to_string_lossy().to_string(),
        );
        merged.insert(BUILD_NUMBER_VAR.to_string(), self.build_number.to_string());
        merged.insert(JOB_NAME_VAR.to_string(), self.job_name.clone());
        for (key, value) in &self.parameters {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Substitutes build parameter placeholders only (first expansion pass)
    #[must_use]
    pub fn expand_parameters(&self, input: &str) -> String {
        expand_placeholders(input, &self.parameters)
    }

    /// Substitutes environment placeholders against the full build
    /// environment (second expansion pass)
    #[must_use]
    pub fn expand_env(&self, input: &str) -> String {
        expand_placeholders(input, &self.build_env())
    }

    /// Runs both expansion passes in the mandated order: parameters first,
    /// then the merged environment
    #[must_use]
    pub fn expand(&self, input: &str) -> String {
        self.expand_env(&self.expand_parameters(input))
    }
}

/// Expands `${NAME}` placeholders against a key/value map
///
/// Placeholders with no matching key are left unchanged in the output.
#[must_use]
pub fn expand_placeholders(input: &str, vars: &HashMap<String, String>) -> String {
    static VAR_PATTERN: once_cell::sync::Lazy<Regex> =
        once_cell::sync::Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

    VAR_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            if let Some(value) = vars.get(name) {
                value.clone()
            } else {
                // Keep the original if not found
                caps.get(0)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            }
        })
        .to_string()
}
