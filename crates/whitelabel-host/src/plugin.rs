//! Plugin and loader hook traits.
//!
//! The host drives plugins: it calls each hook at the matching point of the
//! build and a plugin answers with "no opinion" (`Ok(None)` / `Ok(())`) or a
//! replacement value. Hooks receive borrowed argument structs so the host
//! keeps ownership of its own graph.

use crate::chunk::Chunk;
use crate::compilation::Compilation;
use crate::compiler::Compiler;
use crate::entry::EntryPoints;
use crate::module::{ModuleLoadError, ModuleRecord};
use crate::source::RenderedSource;
use async_trait::async_trait;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

/// Return type of hooks that may substitute rendered output.
///
/// `Ok(None)` keeps whatever the host already had.
pub type HookRenderReturn = anyhow::Result<Option<RenderedSource>>;

/// Return type of the per-file transform stage.
pub type HookTransformReturn = anyhow::Result<Option<RenderedSource>>;

/// Return type of hooks that only observe or mutate in place.
pub type HookNoopReturn = anyhow::Result<()>;

/// Arguments for [`Plugin::render_module_content`].
#[derive(Debug)]
pub struct ModuleRenderArgs<'a> {
    /// The module whose rendered bytes are being finalized.
    pub module: &'a Arc<ModuleRecord>,
    /// The chunk the bytes are being rendered into.
    pub chunk: &'a Chunk,
    /// Rendered bytes as produced so far (earlier plugins may already have
    /// replaced them).
    pub source: &'a RenderedSource,
}

/// Arguments for [`Plugin::render_manifest`].
#[derive(Debug)]
pub struct RenderManifestArgs<'a> {
    /// The chunk whose module manifest is being assembled. Hooks mutate its
    /// module set in place.
    pub chunk: &'a Chunk,
}

/// A build plugin.
///
/// Every hook has a pass-through default so implementations only override
/// the extension points they care about.
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Plugin name, used in diagnostics and logging.
    fn name(&self) -> Cow<'static, str>;

    /// Fired once per configured entry declaration, before graph
    /// construction. Plugins may add further entries through the compiler.
    fn entry_option(&self, _compiler: &Compiler, _entries: &EntryPoints) -> HookNoopReturn {
        Ok(())
    }

    /// Fired once per top-level compilation, before any module is built.
    fn compilation(&self, _compilation: &Arc<Compilation>) -> HookNoopReturn {
        Ok(())
    }

    /// Fired once inside every child compilation the host spawns.
    ///
    /// Child compilations share no hook registrations or extension state
    /// with their parent; a plugin that needs either must set them up again
    /// here.
    fn child_compilation(&self, _compilation: &Arc<Compilation>) -> HookNoopReturn {
        Ok(())
    }

    /// Fired while the host finalizes a module's rendered bytes for
    /// inclusion in a specific chunk. Returning `Ok(Some(..))` substitutes
    /// the bytes; the dependency-template context is unchanged.
    fn render_module_content(
        &self,
        _compilation: &Compilation,
        _args: &ModuleRenderArgs<'_>,
    ) -> HookRenderReturn {
        Ok(None)
    }

    /// Fired while the host assembles the final list of modules physically
    /// included in a chunk. Membership changes go through
    /// [`Chunk::substitute`] and friends, in place.
    fn render_manifest(
        &self,
        _compilation: &Compilation,
        _args: &RenderManifestArgs<'_>,
    ) -> HookNoopReturn {
        Ok(())
    }
}

/// Context handed to a loader for the file it is processing.
#[derive(Debug)]
pub struct LoaderContext<'a> {
    compilation: &'a Arc<Compilation>,
    resource: &'a Path,
}

impl<'a> LoaderContext<'a> {
    pub fn new(compilation: &'a Arc<Compilation>, resource: &'a Path) -> Self {
        Self {
            compilation,
            resource,
        }
    }

    /// Absolute path of the file currently being processed.
    pub fn resource(&self) -> &Path {
        self.resource
    }

    pub fn compilation(&self) -> &Arc<Compilation> {
        self.compilation
    }

    /// Extension storage of the owning compilation.
    pub fn extensions(&self) -> &crate::extensions::Extensions {
        self.compilation.extensions()
    }

    /// Ask the host to admit an additional file into the module graph.
    ///
    /// Idempotent: a file that is already part of the graph is returned as
    /// is, not rebuilt.
    pub async fn load_module(&self, resource: &Path) -> Result<Arc<ModuleRecord>, ModuleLoadError> {
        self.compilation.load_module(resource).await
    }
}

/// A per-file transform pipeline stage.
///
/// Loaders run in registration order while the host builds a module. A
/// stage may rewrite the content (`Ok(Some(..))`), pass it through
/// untouched (`Ok(None)`), or fail the file's processing step with an
/// error. A loader error fails that one file, not the files around it.
#[async_trait]
pub trait Loader: Send + Sync + std::fmt::Debug {
    /// Loader name, used in diagnostics and logging.
    fn name(&self) -> Cow<'static, str>;

    async fn process(
        &self,
        ctx: &LoaderContext<'_>,
        source: &RenderedSource,
    ) -> HookTransformReturn;
}
