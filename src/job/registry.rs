//! Job source registry
//!
//! Replaces host-runtime extension discovery with an explicit mapping from a
//! type tag to a factory function, populated at process start. Factories
//! take a JSON configuration object and build the corresponding source.

use crate::job::{FileJobSource, JobError, JobSource, StringJobSource};
use std::collections::HashMap;
use std::sync::Arc;

/// Factory building a job source from its JSON configuration
pub type SourceFactory =
    Arc<dyn Fn(&serde_json::Value) -> Result<Box<dyn JobSource>, JobError> + Send + Sync>;

/// Registry of job source types
#[derive(Default, Clone)]
pub struct JobSourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl JobSourceRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in `string` and `file` sources
    /// registered
    #[must_use]
    pub fn with_builtin_sources() -> Self {
        let mut registry = Self::new();
        registry.register("string", |config| {
            let source: StringJobSource = serde_json::from_value(config.clone())
                .map_err(|e| JobError::InvalidConfig(e.to_string()))?;
            Ok(Box::new(source) as Box<dyn JobSource>)
        });
        registry.register("file", |config| {
            let source: FileJobSource = serde_json::from_value(config.clone())
                .map_err(|e| JobError::InvalidConfig(e.to_string()))?;
            Ok(Box::new(source) as Box<dyn JobSource>)
        });
        registry
    }

    /// Registers a factory under a type tag, replacing any previous entry
    pub fn register<F>(&mut self, tag: impl Into<String>, factory: F)
    where
        F: Fn(&serde_json::Value) -> Result<Box<dyn JobSource>, JobError> + Send + Sync + 'static,
    {
        self.factories.insert(tag.into(), Arc::new(factory));
    }

    /// Builds a source for the given tag and configuration
    ///
    /// # Errors
    ///
    /// Returns `JobError::UnknownSource` for an unregistered tag, or the
    /// factory's own error for a bad configuration.
    pub fn create(
        &self,
        tag: &str,
        config: &serde_json::Value,
    ) -> Result<Box<dyn JobSource>, JobError> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| JobError::UnknownSource(tag.to_string()))?;
        factory(config)
    }

    /// Checks whether a tag is registered
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Returns all registered tags
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_tags_registered() {
        let registry = JobSourceRegistry::with_builtin_sources();
        assert!(registry.contains("string"));
        assert!(registry.contains("file"));
        assert!(!registry.contains("xml"));
    }

    #[test]
    fn test_create_string_source() {
        let registry = JobSourceRegistry::with_builtin_sources();
        let config = json!({ "jobName": "inline", "jobContent": "Write-Host hi" });

        let source = registry.create("string", &config).unwrap();
        assert_eq!(source.job_name(), "inline");
    }

    #[test]
    fn test_create_file_source() {
        let registry = JobSourceRegistry::with_builtin_sources();
        let config = json!({ "jobName": "fromFile", "jobPath": "${TestParam}.ps1" });

        let source = registry.create("file", &config).unwrap();
        assert_eq!(source.job_name(), "fromFile");
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let registry = JobSourceRegistry::with_builtin_sources();
        let err = registry.create("xml", &json!({})).unwrap_err();
        assert_eq!(err, JobError::UnknownSource("xml".to_string()));
    }

    #[test]
    fn test_bad_config_is_invalid_config() {
        let registry = JobSourceRegistry::with_builtin_sources();
        let err = registry
            .create("string", &json!({ "jobName": "x" }))
            .unwrap_err();
        assert!(matches!(err, JobError::InvalidConfig(_)));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = JobSourceRegistry::new();
        registry.register("fixed", |_| {
            Ok(Box::new(StringJobSource::new("fixed", "Write-Host fixed")) as Box<dyn JobSource>)
        });

        let source = registry.create("fixed", &json!({})).unwrap();
        assert_eq!(source.job_name(), "fixed");
        assert_eq!(registry.tags(), vec!["fixed"]);
    }
}
