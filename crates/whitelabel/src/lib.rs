#![cfg_attr(docsrs, feature(doc_cfg))]

//! # whitelabel
//!
//! Emit multiple variant bundles from a single entry point by swapping
//! per-variant override files into the module graph at render time.
//!
//! Declare a list of override tags (say `brandA` and `brandB`) and, for any
//! source file `foo.js`, drop sibling files `foo.brandA.js` /
//! `foo.brandB.js` next to it. Every configured entry then produces one
//! extra chunk per tag, identical to the base chunk except that each tagged
//! sibling replaces its original.
//!
//! Two pieces cooperate through shared per-build state:
//!
//! - [`OverrideDiscoveryLoader`] runs in the host's per-file transform
//!   pipeline. For each file it probes one sibling candidate per tag, asks
//!   the host to load the ones that exist, and records the mapping. It
//!   never modifies file content.
//! - [`ModuleOverridePlugin`] expands entries into variants at build start
//!   and swaps recorded overrides in at render time, both for module
//!   content and for chunk manifests (the path nested asset pipelines use).
//!
//! Both must be registered on the same build; the loader fails fast if the
//! plugin has not installed the shared context.
//!
//! ## Quick start
//!
//! ```rust
//! use whitelabel::{ModuleOverrideOptions, ModuleOverridePlugin, OverrideDiscoveryLoader};
//!
//! # fn main() -> Result<(), whitelabel::OverrideError> {
//! let options = ModuleOverrideOptions::new()
//!     .with_overrides(["brandA", "brandB"])
//!     .with_output_path("{name}/{override}");
//!
//! let plugin = ModuleOverridePlugin::new(options)?;
//! let loader = OverrideDiscoveryLoader::new();
//! // Register both on the host compiler; see whitelabel-host.
//! # let _ = (plugin, loader);
//! # Ok(())
//! # }
//! ```

mod context;
mod entry;
mod loader;
mod options;
mod plugin;
pub mod template;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use context::{OverrideContext, OverrideTag};
pub use loader::OverrideDiscoveryLoader;
pub use options::{DEFAULT_OUTPUT_PATH, ModuleOverrideOptions};
pub use plugin::ModuleOverridePlugin;
pub use template::TemplateError;

// Re-export the host protocol types plugin users wire up against.
pub use whitelabel_host::{
    Compilation, Compiler, EntryItem, EntryPoints, FileSystem, FsError, Loader, Plugin,
    RenderedSource,
};

/// Plugin name used in hook registrations, diagnostics, and logging.
pub const PLUGIN_NAME: &str = "whitelabel-module-override";

/// Error types for whitelabel configuration and discovery.
#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    /// The output pattern cannot address distinct variant outputs.
    #[error("output pattern {output_path:?} must contain the {{override}} placeholder")]
    MissingOverridePlaceholder { output_path: String },

    /// The discovery loader ran on a build the plugin was never registered
    /// on, so the shared override context does not exist.
    #[error(
        "the override discovery loader is used without the whitelabel-module-override \
         plugin; register the plugin so it can initialize the shared override context"
    )]
    LoaderWithoutPlugin,

    /// Probing a candidate failed with something other than not-found.
    #[error("failed to probe override candidate {candidate}")]
    DiscoveryIo {
        candidate: std::path::PathBuf,
        #[source]
        source: whitelabel_host::FsError,
    },

    /// The host rejected loading a discovered override as a module.
    #[error("failed to load override module {path}: {reason}")]
    ModuleLoad {
        path: std::path::PathBuf,
        reason: String,
    },

    /// Invalid output pattern.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Two variants rendered to the same output name.
    #[error(
        "override variants collapsed onto one output name {0:?}; \
         include {{name}} in the output pattern to keep entries distinct"
    )]
    DuplicateVariantName(String),
}

/// Result type alias for whitelabel operations.
pub type Result<T> = std::result::Result<T, OverrideError>;

impl miette::Diagnostic for OverrideError {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            OverrideError::MissingOverridePlaceholder { .. } => "MISSING_OVERRIDE_PLACEHOLDER",
            OverrideError::LoaderWithoutPlugin => "LOADER_WITHOUT_PLUGIN",
            OverrideError::DiscoveryIo { .. } => "DISCOVERY_IO_ERROR",
            OverrideError::ModuleLoad { .. } => "MODULE_LOAD_ERROR",
            OverrideError::Template(_) => "INVALID_OUTPUT_PATTERN",
            OverrideError::DuplicateVariantName(_) => "DUPLICATE_VARIANT_NAME",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            OverrideError::MissingOverridePlaceholder { output_path } => Some(Box::new(format!(
                "The configured output pattern is \"{output_path}\". Add the {{override}} \
                 placeholder so every variant maps to a distinct output, e.g. \
                 \"{{name}}/{{override}}\"."
            ))),
            OverrideError::LoaderWithoutPlugin => Some(Box::new(
                "Add ModuleOverridePlugin to the same compiler the loader is registered on; \
                 the loader only records discoveries into the context the plugin owns.",
            )),
            OverrideError::DuplicateVariantName(_) => Some(Box::new(
                "With more than one entry, the output pattern needs {name} so each entry's \
                 variants stay distinct.",
            )),
            _ => None,
        }
    }
}
