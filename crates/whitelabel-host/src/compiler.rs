//! Compiler: configuration-time handle for one build.

use crate::compilation::Compilation;
use crate::entry::{EntryItem, EntryPoints};
use crate::module::ModuleFactory;
use crate::plugin::{Loader, Plugin};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Holds the build configuration: context directory, entry declarations,
/// plugins, and loaders.
///
/// The named entry list is interior mutable because the `entry_option` hook
/// lets plugins synthesize additional entries before the graph is built.
#[derive(Debug)]
pub struct Compiler {
    context: PathBuf,
    entry: EntryPoints,
    entries: RwLock<Vec<(String, EntryItem)>>,
    plugins: Vec<Arc<dyn Plugin>>,
    loaders: Vec<Arc<dyn Loader>>,
    factory: Arc<dyn ModuleFactory>,
}

impl Compiler {
    pub fn new(
        context: impl Into<PathBuf>,
        entry: EntryPoints,
        factory: Arc<dyn ModuleFactory>,
    ) -> Self {
        Self {
            context: context.into(),
            entry,
            entries: RwLock::new(Vec::new()),
            plugins: Vec::new(),
            loaders: Vec::new(),
            factory,
        }
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loaders.push(loader);
        self
    }

    /// Directory entry paths are resolved against.
    pub fn context(&self) -> &Path {
        &self.context
    }

    pub fn entry(&self) -> &EntryPoints {
        &self.entry
    }

    /// Append a named entry. Called by the host for the configured entries
    /// and by plugins (during `entry_option`) for synthesized ones.
    pub fn add_entry(&self, name: impl Into<String>, item: EntryItem) {
        self.entries.write().push((name.into(), item));
    }

    /// Snapshot of the named entry list in registration order.
    pub fn entries(&self) -> Vec<(String, EntryItem)> {
        self.entries.read().clone()
    }

    /// Seed the named entry list from the configured declaration and fire
    /// every plugin's `entry_option` hook, exactly once per build.
    pub fn apply_entry_options(&self) -> anyhow::Result<()> {
        for (name, item) in self.entry.named() {
            self.add_entry(name, item);
        }
        for plugin in &self.plugins {
            plugin.entry_option(self, &self.entry)?;
        }
        Ok(())
    }

    /// Create the top-level compilation and fire every plugin's
    /// `compilation` hook inside it.
    pub fn create_compilation(&self) -> anyhow::Result<Arc<Compilation>> {
        let compilation = Compilation::new(
            None,
            Arc::clone(&self.factory),
            self.plugins.clone(),
            self.loaders.clone(),
        );
        for plugin in compilation.plugins() {
            plugin.compilation(&compilation)?;
        }
        Ok(compilation)
    }

    /// Resolve an entry path against the context directory.
    pub fn resolve_entry_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.context.join(path)
        }
    }
}
