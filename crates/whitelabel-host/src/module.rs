//! Module records and the host's module factory.

use crate::compilation::Compilation;
use crate::source::RenderedSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The host's compiled representation of one source file.
///
/// A record is immutable once built. Its `source` is the fully rendered
/// output in the host's dependency-template context, which is what makes
/// render-time substitution transparent: swapping one record's rendered
/// bytes for another's never disturbs reference resolution.
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    resource: PathBuf,
    source: RenderedSource,
    dependencies: Vec<PathBuf>,
}

impl ModuleRecord {
    pub fn new(resource: PathBuf, source: RenderedSource) -> Self {
        Self {
            resource,
            source,
            dependencies: Vec::new(),
        }
    }

    /// Attach the direct dependencies the host's factory discovered while
    /// building this module.
    pub fn with_dependencies(mut self, dependencies: Vec<PathBuf>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Absolute path of the source file this record was compiled from.
    pub fn resource(&self) -> &Path {
        &self.resource
    }

    pub fn source(&self) -> &RenderedSource {
        &self.source
    }

    /// Rendered bytes for inclusion in a chunk.
    pub fn rendered(&self) -> RenderedSource {
        self.source.clone()
    }

    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }
}

/// Errors from admitting a file into the module graph.
#[derive(Debug, thiserror::Error)]
pub enum ModuleLoadError {
    /// The source file could not be read.
    #[error("failed to read module {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A loader stage rejected the file.
    #[error("loader \"{loader}\" failed for {path}: {reason}")]
    Loader {
        loader: String,
        path: PathBuf,
        reason: String,
    },

    /// The host's factory rejected the file for any other reason.
    #[error("module factory rejected {path}: {reason}")]
    Factory { path: PathBuf, reason: String },
}

/// The host's "compile this path into a module record" black box.
///
/// Implementations run the compilation's loader chain as part of building,
/// so a factory call can re-enter [`Compilation::load_module`] for files a
/// loader asks to admit.
#[async_trait]
pub trait ModuleFactory: Send + Sync + std::fmt::Debug {
    async fn build_module(
        &self,
        compilation: &Arc<Compilation>,
        resource: &Path,
    ) -> Result<Arc<ModuleRecord>, ModuleLoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_resource_and_dependencies() {
        let record = ModuleRecord::new(
            PathBuf::from("/app/src/index.js"),
            RenderedSource::new("import \"./theme.js\";"),
        )
        .with_dependencies(vec![PathBuf::from("/app/src/theme.js")]);

        assert_eq!(record.resource(), Path::new("/app/src/index.js"));
        assert_eq!(record.dependencies().len(), 1);
        assert_eq!(record.rendered(), *record.source());
    }
}
