//! Build-level diagnostics.
//!
//! Non-fatal problems a plugin wants recorded against the build as a whole
//! land here instead of failing a hook. The host decides how to surface the
//! collected entries once the build finishes.

use serde::{Deserialize, Serialize};

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// One build-level diagnostic entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDiagnostic {
    pub severity: DiagnosticSeverity,
    /// Name of the plugin that recorded the entry, if any.
    pub plugin: Option<String>,
    pub message: String,
}

impl BuildDiagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            plugin: None,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            plugin: None,
            message: message.into(),
        }
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }
}

impl std::fmt::Display for BuildDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.plugin {
            Some(plugin) => write!(f, "[{plugin}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_plugin_name() {
        let diagnostic = BuildDiagnostic::error("no overrides declared").with_plugin("demo");
        assert_eq!(diagnostic.to_string(), "[demo] no overrides declared");
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
    }
}
