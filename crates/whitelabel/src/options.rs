//! Plugin configuration.

use crate::context::OverrideTag;
use serde::{Deserialize, Serialize};

/// Default output pattern: one directory per logical entry, one chunk per
/// variant tag.
pub const DEFAULT_OUTPUT_PATH: &str = "{name}/{override}";

/// Configuration for [`ModuleOverridePlugin`](crate::ModuleOverridePlugin).
///
/// # Example
///
/// ```rust
/// use whitelabel::ModuleOverrideOptions;
///
/// let options = ModuleOverrideOptions::new()
///     .with_overrides(["brandA", "brandB"])
///     .with_output_path("{name}/{override}")
///     .with_debug(true);
/// assert_eq!(options.overrides.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleOverrideOptions {
    /// Declared variant tags, in enumeration order. An empty list disables
    /// substitution and is recorded as a build-level error rather than
    /// failing construction.
    pub overrides: Vec<OverrideTag>,

    /// Output-name pattern for synthesized variant entries. Must contain
    /// `{override}`; may contain `{name}`.
    pub output_path: String,

    /// Emit discovery and substitution decisions at debug level.
    pub debug: bool,
}

impl Default for ModuleOverrideOptions {
    fn default() -> Self {
        Self {
            overrides: Vec::new(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            debug: false,
        }
    }
}

impl ModuleOverrideOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides<I, T>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OverrideTag>,
    {
        self.overrides = overrides.into_iter().map(Into::into).collect();
        self
    }

    /// Append one variant tag.
    pub fn override_tag(mut self, tag: impl Into<OverrideTag>) -> Self {
        self.overrides.push(tag.into());
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<String>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_pattern() {
        let options = ModuleOverrideOptions::default();
        assert!(options.overrides.is_empty());
        assert_eq!(options.output_path, "{name}/{override}");
        assert!(!options.debug);
    }

    #[test]
    fn builder_accumulates_tags() {
        let options = ModuleOverrideOptions::new()
            .override_tag("brandA")
            .override_tag("brandB");
        let tags: Vec<&str> = options.overrides.iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, ["brandA", "brandB"]);
    }

    #[test]
    fn deserializes_from_config_json() {
        let options: ModuleOverrideOptions = serde_json::from_str(
            r#"{ "overrides": ["brandA", "brandB"], "output_path": "{override}/{name}" }"#,
        )
        .expect("valid options");
        assert_eq!(options.overrides.len(), 2);
        assert_eq!(options.output_path, "{override}/{name}");
        assert!(!options.debug);
    }
}
