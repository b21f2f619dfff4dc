//! The substitution orchestrator.

use crate::context::{OverrideContext, OverrideTag};
use crate::entry::expand_entries;
use crate::options::ModuleOverrideOptions;
use crate::{template, OverrideError, PLUGIN_NAME};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};
use whitelabel_host::{
    BuildDiagnostic, Compilation, Compiler, EntryPoints, HookNoopReturn, HookRenderReturn,
    ModuleRecord, ModuleRenderArgs, Plugin, RenderManifestArgs,
};

/// Emits one variant of every entry chunk per declared override tag,
/// swapping in per-variant override modules at render time.
///
/// The plugin owns the build's override bookkeeping: at compilation start
/// (top-level and every child) it installs a fresh [`OverrideContext`] that
/// the [`OverrideDiscoveryLoader`](crate::OverrideDiscoveryLoader)
/// populates as files are processed. At render time it substitutes
/// recorded overrides along two paths: module content for ordinary chunk
/// rendering, and the chunk manifest for nested asset pipelines that skip
/// the content hook.
#[derive(Debug)]
pub struct ModuleOverridePlugin {
    options: ModuleOverrideOptions,
    /// Variant output name -> tag, filled during entry expansion and
    /// read-only at render time.
    variants: RwLock<FxHashMap<String, OverrideTag>>,
}

impl ModuleOverridePlugin {
    /// Validate `options` and build the plugin.
    ///
    /// Fails when the output pattern lacks `{override}`: without it,
    /// variants could not map to distinct outputs. An empty tag list is
    /// accepted here and reported as a build-level error instead, since
    /// declaring no overrides is a legitimate way to disable the plugin.
    pub fn new(options: ModuleOverrideOptions) -> Result<Self, OverrideError> {
        if !template::has_placeholder(&options.output_path, template::OVERRIDE_PLACEHOLDER) {
            return Err(OverrideError::MissingOverridePlaceholder {
                output_path: options.output_path,
            });
        }
        Ok(Self {
            options,
            variants: RwLock::new(FxHashMap::default()),
        })
    }

    pub fn options(&self) -> &ModuleOverrideOptions {
        &self.options
    }

    /// Tag represented by a chunk, if the chunk is one of our variants.
    fn variant_tag(&self, chunk_name: &str) -> Option<OverrideTag> {
        self.variants.read().get(chunk_name).cloned()
    }

    /// Install a fresh override context into `compilation`.
    ///
    /// Shared by the top-level and child compilation hooks: every build
    /// instance gets its own context, created and attached here, never
    /// inherited from a parent.
    fn attach(&self, compilation: &Arc<Compilation>) -> HookNoopReturn {
        let context = Arc::new(OverrideContext::new(self.options.overrides.clone()));
        compilation.extensions().insert(context);

        if self.options.overrides.is_empty() && !compilation.is_child() {
            compilation.push_diagnostic(
                BuildDiagnostic::error(
                    "option \"overrides\" must declare at least one tag; \
                     no variant output will be produced",
                )
                .with_plugin(PLUGIN_NAME),
            );
        }

        if self.options.debug {
            debug!(
                child = compilation.name().unwrap_or("<top-level>"),
                overrides = ?self.options.overrides,
                "attached override context"
            );
        }
        Ok(())
    }

    /// Recorded override module for `resource` within `chunk`, if the chunk
    /// is a variant and the override was loaded.
    fn override_module(
        &self,
        compilation: &Compilation,
        chunk_name: &str,
        resource: &Path,
    ) -> Option<Arc<ModuleRecord>> {
        let tag = self.variant_tag(chunk_name)?;
        let context = compilation.extensions().get::<OverrideContext>()?;
        let override_path = context.override_for(resource, &tag)?;
        compilation.module_by_resource(&override_path)
    }
}

impl Plugin for ModuleOverridePlugin {
    fn name(&self) -> Cow<'static, str> {
        PLUGIN_NAME.into()
    }

    /// Synthesize one entry per (declared entry, tag) and remember which
    /// tag each synthesized output name represents.
    fn entry_option(&self, compiler: &Compiler, entries: &EntryPoints) -> HookNoopReturn {
        let expanded =
            expand_entries(entries, &self.options.overrides, &self.options.output_path)?;
        debug!(
            entries = entries.len(),
            overrides = self.options.overrides.len(),
            variants = expanded.entries.len(),
            "expanding entries"
        );
        for (name, item) in expanded.entries {
            compiler.add_entry(name, item);
        }
        *self.variants.write() = expanded.variants;
        Ok(())
    }

    fn compilation(&self, compilation: &Arc<Compilation>) -> HookNoopReturn {
        self.attach(compilation)
    }

    fn child_compilation(&self, compilation: &Arc<Compilation>) -> HookNoopReturn {
        self.attach(compilation)
    }

    /// Path A: while a module's rendered bytes are finalized for a variant
    /// chunk, swap in the override module's rendered bytes.
    fn render_module_content(
        &self,
        compilation: &Compilation,
        args: &ModuleRenderArgs<'_>,
    ) -> HookRenderReturn {
        let resource = args.module.resource();
        match self.override_module(compilation, args.chunk.name(), resource) {
            Some(module) => {
                trace!(
                    chunk = args.chunk.name(),
                    original = %resource.display(),
                    override_module = %module.resource().display(),
                    "substituting module content"
                );
                Ok(Some(module.rendered()))
            }
            None => Ok(None),
        }
    }

    /// Path B: while a variant chunk's module manifest is assembled,
    /// replace original modules with their overrides outright. Nested
    /// asset pipelines emit straight from the manifest, so this is the
    /// path that covers child compilations.
    fn render_manifest(
        &self,
        compilation: &Compilation,
        args: &RenderManifestArgs<'_>,
    ) -> HookNoopReturn {
        let Some(tag) = self.variant_tag(args.chunk.name()) else {
            return Ok(());
        };
        let Some(context) = compilation.extensions().get::<OverrideContext>() else {
            return Ok(());
        };

        for resource in args.chunk.modules() {
            let Some(override_path) = context.override_for(&resource, &tag) else {
                continue;
            };
            if compilation.module_by_resource(&override_path).is_some() {
                trace!(
                    chunk = args.chunk.name(),
                    original = %resource.display(),
                    override_module = %override_path.display(),
                    "substituting manifest entry"
                );
                args.chunk.substitute(&resource, override_path);
            }
        }
        Ok(())
    }
}
