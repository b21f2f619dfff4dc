//! Compilation instances.

use crate::diagnostics::BuildDiagnostic;
use crate::extensions::Extensions;
use crate::module::{ModuleFactory, ModuleLoadError, ModuleRecord};
use crate::plugin::{Loader, Plugin};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One build instance: the module registry, the diagnostics sink, and the
/// typed extension storage plugins share state through.
///
/// The host creates one compilation per top-level build and a separate one
/// for every child build it spawns for auxiliary asset pipelines. A child
/// shares the parent's factory, plugins, and loaders but none of its
/// per-build state.
#[derive(Debug)]
pub struct Compilation {
    name: Option<String>,
    factory: Arc<dyn ModuleFactory>,
    plugins: Vec<Arc<dyn Plugin>>,
    loaders: Vec<Arc<dyn Loader>>,
    modules: RwLock<FxHashMap<PathBuf, Arc<ModuleRecord>>>,
    diagnostics: Mutex<Vec<BuildDiagnostic>>,
    extensions: Extensions,
}

impl Compilation {
    pub fn new(
        name: Option<String>,
        factory: Arc<dyn ModuleFactory>,
        plugins: Vec<Arc<dyn Plugin>>,
        loaders: Vec<Arc<dyn Loader>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            factory,
            plugins,
            loaders,
            modules: RwLock::new(FxHashMap::default()),
            diagnostics: Mutex::new(Vec::new()),
            extensions: Extensions::new(),
        })
    }

    /// Name of a child compilation; `None` for the top-level build.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_child(&self) -> bool {
        self.name.is_some()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn loaders(&self) -> &[Arc<dyn Loader>] {
        &self.loaders
    }

    /// Look up an already-built module by its source path.
    pub fn module_by_resource(&self, resource: &Path) -> Option<Arc<ModuleRecord>> {
        self.modules.read().get(resource).cloned()
    }

    /// Snapshot of every module currently in the graph.
    pub fn modules(&self) -> Vec<Arc<ModuleRecord>> {
        self.modules.read().values().cloned().collect()
    }

    /// Register a built module. The first record for a path wins; a module
    /// is never rebuilt into a different record within one build.
    pub fn add_module(&self, module: Arc<ModuleRecord>) -> Arc<ModuleRecord> {
        let mut modules = self.modules.write();
        Arc::clone(
            modules
                .entry(module.resource().to_path_buf())
                .or_insert(module),
        )
    }

    pub fn push_diagnostic(&self, diagnostic: BuildDiagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    pub fn diagnostics(&self) -> Vec<BuildDiagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Admit a file into the module graph, building it through the factory
    /// (and its loader chain) if it is not already present.
    ///
    /// Two concurrent calls for the same new path may both build; the first
    /// registration wins and both callers observe the same record.
    pub async fn load_module(
        self: &Arc<Self>,
        resource: &Path,
    ) -> Result<Arc<ModuleRecord>, ModuleLoadError> {
        if let Some(existing) = self.module_by_resource(resource) {
            return Ok(existing);
        }
        tracing::trace!(resource = %resource.display(), "building module");
        let module = self.factory.build_module(self, resource).await?;
        Ok(self.add_module(module))
    }

    /// Spawn a child compilation and fire every plugin's
    /// [`Plugin::child_compilation`] hook inside it.
    pub fn create_child(self: &Arc<Self>, name: impl Into<String>) -> anyhow::Result<Arc<Self>> {
        let name = name.into();
        tracing::debug!(child = %name, "spawning child compilation");
        let child = Compilation::new(
            Some(name),
            Arc::clone(&self.factory),
            self.plugins.clone(),
            self.loaders.clone(),
        );
        for plugin in child.plugins() {
            plugin.child_compilation(&child)?;
        }
        Ok(child)
    }
}
