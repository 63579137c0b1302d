//! Interpreter option construction from step configuration
//!
//! A build step may carry a freeform property set (line-oriented `key=value`
//! pairs) plus a legacy freeform options string. Both feed a single
//! Java-options-style environment variable handed to the launched process:
//! each property becomes ` -Dkey=value`, and the legacy string is appended
//! verbatim after them.

use std::collections::HashMap;

/// Default name of the amended options variable
pub const DEFAULT_OPTS_VAR: &str = "JAVA_OPTS";

/// Parses a line-oriented property set
///
/// Blank lines and `#`/`!` comment lines are skipped; the first `=` splits
/// key from value and both sides are trimmed. Input order is preserved.
#[must_use]
pub fn parse_properties(input: &str) -> Vec<(String, String)> {
    let mut props = Vec::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            props.push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    props
}

/// Step-level option configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOptions {
    /// Freeform property set, one `key=value` per line
    pub properties: Option<String>,

    /// Legacy freeform options string, appended verbatim after the
    /// property-derived options
    pub legacy_opts: Option<String>,

    /// Name of the environment variable to amend; defaults to `JAVA_OPTS`
    pub opts_var: String,
}

impl PropertyOptions {
    /// Creates an empty option set amending the default variable
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: None,
            legacy_opts: None,
            opts_var: DEFAULT_OPTS_VAR.to_string(),
        }
    }

    /// Sets the property set string
    #[must_use]
    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    /// Sets the legacy freeform options string
    #[must_use]
    pub fn with_legacy_opts(mut self, opts: impl Into<String>) -> Self {
        self.legacy_opts = Some(opts.into());
        self
    }

    /// Amends a different environment variable
    #[must_use]
    pub fn for_variable(mut self, name: impl Into<String>) -> Self {
        self.opts_var = name.into();
        self
    }

    /// Returns true when there is nothing to amend
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_none() && self.legacy_opts.is_none()
    }

    /// Builds the amended variable value from an existing value
    ///
    /// Order is fixed: existing value, then ` -Dkey=value` per property in
    /// input order, then the legacy string space-joined at the end.
    #[must_use]
    pub fn amended_value(&self, existing: Option<&str>) -> String {
        let mut value = existing.unwrap_or("").to_string();
        if let Some(properties) = &self.properties {
            for (key, val) in parse_properties(properties) {
                value.push_str(&format!(" -D{key}={val}"));
            }
        }
        if let Some(legacy) = &self.legacy_opts {
            value.push(' ');
            value.push_str(legacy);
        }
        value
    }

    /// Applies the amendment to a process environment in place
    pub fn apply(&self, env: &mut HashMap<String, String>) {
        if self.is_empty() {
            return;
        }
        let amended = self.amended_value(env.get(&self.opts_var).map(String::as_str));
        env.insert(self.opts_var.clone(), amended);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_properties_preserves_order() {
        let props = parse_properties("foo=bar\nbaz=qux");
        assert_eq!(
            props,
            vec![
                ("foo".to_string(), "bar".to_string()),
                ("baz".to_string(), "qux".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_properties_skips_comments_and_blanks() {
        let props = parse_properties("# comment\n\n! also comment\nkey = value ");
        assert_eq!(props, vec![("key".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_parse_properties_splits_on_first_equals() {
        let props = parse_properties("opt=a=b");
        assert_eq!(props, vec![("opt".to_string(), "a=b".to_string())]);
    }

    #[test]
    fn test_amended_value_no_legacy() {
        let options = PropertyOptions::new().with_properties("foo=bar\nbaz=qux");
        assert_eq!(options.amended_value(None), " -Dfoo=bar -Dbaz=qux");
    }

    #[test]
    fn test_amended_value_keeps_existing_prefix() {
        let options = PropertyOptions::new().with_properties("foo=bar");
        assert_eq!(options.amended_value(Some("-Xmx512m")), "-Xmx512m -Dfoo=bar");
    }

    #[test]
    fn test_legacy_opts_appended_last() {
        let options = PropertyOptions::new()
            .with_properties("foo=bar")
            .with_legacy_opts("-verbose:gc");
        assert_eq!(options.amended_value(None), " -Dfoo=bar -verbose:gc");
    }

    #[test]
    fn test_apply_amends_environment() {
        let mut env = HashMap::from([("JAVA_OPTS".to_string(), "-Xms128m".to_string())]);
        PropertyOptions::new().with_properties("a=1").apply(&mut env);
        assert_eq!(env.get("JAVA_OPTS").unwrap(), "-Xms128m -Da=1");
    }

    #[test]
    fn test_apply_with_custom_variable() {
        let mut env = HashMap::new();
        PropertyOptions::new()
            .with_properties("a=1")
            .for_variable("PS_OPTS")
            .apply(&mut env);
        assert_eq!(env.get("PS_OPTS").unwrap(), " -Da=1");
        assert!(!env.contains_key(DEFAULT_OPTS_VAR));
    }

    #[test]
    fn test_apply_is_noop_when_empty() {
        let mut env = HashMap::new();
        PropertyOptions::new().apply(&mut env);
        assert!(env.is_empty());
    }
}
