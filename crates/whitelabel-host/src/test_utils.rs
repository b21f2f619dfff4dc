//! In-memory reference host.
//!
//! A deliberately small bundler stand-in that exercises the full hook
//! protocol: it reads real files, runs the loader chain, follows relative
//! `import` specifiers, groups modules into one chunk per named entry, and
//! renders chunks through the manifest and module-content hooks. Integration
//! tests for plugins drive this instead of a production bundler.
//!
//! Fidelity notes:
//! - top-level chunks render each module through
//!   [`Plugin::render_module_content`];
//! - child compilations render through the manifest path only, mirroring
//!   nested asset pipelines that bypass the content hook.

use crate::chunk::Chunk;
use crate::compilation::Compilation;
use crate::compiler::Compiler;
use crate::diagnostics::BuildDiagnostic;
use crate::module::{ModuleFactory, ModuleLoadError, ModuleRecord};
use crate::plugin::{LoaderContext, ModuleRenderArgs, Plugin, RenderManifestArgs};
use crate::source::RenderedSource;
use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Module factory that reads files from disk, runs the compilation's loader
/// chain, and records relative `import` specifiers as dependencies.
#[derive(Debug)]
pub struct TestModuleFactory {
    import_re: Regex,
}

impl TestModuleFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            // Relative static imports only; bare specifiers are treated as
            // external and ignored.
            import_re: Regex::new(r#"(?m)^\s*import\s+(?:[^"'\n]+\s+from\s+)?["'](\.{1,2}/[^"']+)["']"#)
                .expect("import pattern is valid"),
        })
    }

    fn scan_dependencies(&self, resource: &Path, source: &str) -> Vec<PathBuf> {
        let dir = resource.parent().unwrap_or_else(|| Path::new("."));
        self.import_re
            .captures_iter(source)
            .map(|captures| dir.join(&captures[1]))
            .collect()
    }
}

#[async_trait]
impl ModuleFactory for TestModuleFactory {
    async fn build_module(
        &self,
        compilation: &Arc<Compilation>,
        resource: &Path,
    ) -> Result<Arc<ModuleRecord>, ModuleLoadError> {
        let text = tokio::fs::read_to_string(resource)
            .await
            .map_err(|source| ModuleLoadError::Read {
                path: resource.to_path_buf(),
                source,
            })?;

        let mut source = RenderedSource::from(text);
        for loader in compilation.loaders() {
            let ctx = LoaderContext::new(compilation, resource);
            match loader.process(&ctx, &source).await {
                Ok(Some(replacement)) => source = replacement,
                Ok(None) => {}
                Err(error) => {
                    return Err(ModuleLoadError::Loader {
                        loader: loader.name().into_owned(),
                        path: resource.to_path_buf(),
                        reason: format!("{error:#}"),
                    });
                }
            }
        }

        let dependencies = self.scan_dependencies(resource, source.as_str());
        Ok(Arc::new(
            ModuleRecord::new(resource.to_path_buf(), source).with_dependencies(dependencies),
        ))
    }
}

/// One emitted chunk artifact.
#[derive(Debug, Clone)]
pub struct ChunkAsset {
    /// Chunk (output) name the artifact was rendered for.
    pub name: String,
    /// Emitted filename.
    pub filename: String,
    pub source: RenderedSource,
}

/// Result of driving a build through the reference host.
#[derive(Debug)]
pub struct BuildOutput {
    pub assets: Vec<ChunkAsset>,
    pub diagnostics: Vec<BuildDiagnostic>,
    /// The top-level compilation, kept alive so tests can inspect the module
    /// graph and extension state after the build.
    pub compilation: Arc<Compilation>,
}

impl BuildOutput {
    pub fn asset(&self, name: &str) -> Option<&ChunkAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }

    pub fn asset_names(&self) -> Vec<&str> {
        self.assets.iter().map(|asset| asset.name.as_str()).collect()
    }
}

/// Load `entry` and its transitive relative imports into `compilation`,
/// adding each reached module to `chunk`.
pub async fn build_chunk(
    compilation: &Arc<Compilation>,
    chunk: &Chunk,
    entry: &Path,
) -> Result<(), ModuleLoadError> {
    let mut queue = VecDeque::from([entry.to_path_buf()]);
    while let Some(resource) = queue.pop_front() {
        if !chunk.insert_module(resource.clone()) {
            continue;
        }
        let module = compilation.load_module(&resource).await?;
        queue.extend(module.dependencies().iter().cloned());
    }
    Ok(())
}

/// Render one module for `chunk`, letting every plugin substitute content.
pub fn render_module(
    compilation: &Compilation,
    chunk: &Chunk,
    module: &Arc<ModuleRecord>,
) -> anyhow::Result<RenderedSource> {
    let mut source = module.rendered();
    for plugin in compilation.plugins() {
        let args = ModuleRenderArgs {
            module,
            chunk,
            source: &source,
        };
        if let Some(replacement) = plugin.render_module_content(compilation, &args)? {
            source = replacement;
        }
    }
    Ok(source)
}

/// Render a top-level chunk: banner plus content for every member module,
/// each passed through the module-content hook.
pub fn render_chunk(compilation: &Compilation, chunk: &Chunk) -> anyhow::Result<RenderedSource> {
    let mut out = String::new();
    for resource in chunk.modules() {
        let module = compilation
            .module_by_resource(&resource)
            .with_context(|| format!("chunk {} lists unknown module {}", chunk.name(), resource.display()))?;
        out.push_str(&format!("// {}\n", resource.display()));
        out.push_str(render_module(compilation, chunk, &module)?.as_str());
        out.push('\n');
    }
    Ok(RenderedSource::from(out))
}

/// Render a child-compilation chunk: assemble the manifest (firing
/// [`Plugin::render_manifest`]) and concatenate the listed modules' rendered
/// bytes directly, without the module-content hook.
pub fn render_child_chunk(
    compilation: &Compilation,
    chunk: &Chunk,
) -> anyhow::Result<RenderedSource> {
    for plugin in compilation.plugins() {
        plugin.render_manifest(compilation, &RenderManifestArgs { chunk })?;
    }
    let mut out = String::new();
    for resource in chunk.modules() {
        let module = compilation
            .module_by_resource(&resource)
            .with_context(|| format!("chunk {} lists unknown module {}", chunk.name(), resource.display()))?;
        out.push_str(&format!("// {}\n", resource.display()));
        out.push_str(module.rendered().as_str());
        out.push('\n');
    }
    Ok(RenderedSource::from(out))
}

impl Compiler {
    /// Drive a complete build: entry options, compilation, one chunk per
    /// named entry, manifest assembly, module render, asset emission.
    pub async fn run(&self) -> anyhow::Result<BuildOutput> {
        self.apply_entry_options()?;
        let compilation = self.create_compilation()?;

        let mut chunks = Vec::new();
        for (name, item) in self.entries() {
            let chunk = Chunk::new(&name);
            for path in item.paths() {
                let resource = self.resolve_entry_path(path);
                build_chunk(&compilation, &chunk, &resource)
                    .await
                    .with_context(|| format!("building entry \"{name}\""))?;
            }
            chunks.push(chunk);
        }

        let mut assets = Vec::new();
        for chunk in &chunks {
            for plugin in compilation.plugins() {
                plugin.render_manifest(&compilation, &RenderManifestArgs { chunk })?;
            }
            let source = render_chunk(&compilation, chunk)?;
            assets.push(ChunkAsset {
                name: chunk.name().to_string(),
                filename: format!("{}.js", chunk.name()),
                source,
            });
        }

        Ok(BuildOutput {
            assets,
            diagnostics: compilation.diagnostics(),
            compilation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryPoints;

    #[tokio::test]
    async fn factory_scans_relative_imports() {
        let dir = tempfile::tempdir().expect("temp dir");
        let src = dir.path().join("src");
        std::fs::create_dir(&src).expect("create src");
        std::fs::write(
            src.join("index.js"),
            "import \"./a.js\";\nimport { b } from './b.js';\nimport fs from \"fs\";\nexport default 1;\n",
        )
        .expect("write entry");
        std::fs::write(src.join("a.js"), "export const a = 1;\n").expect("write a");
        std::fs::write(src.join("b.js"), "export const b = 2;\n").expect("write b");

        let compiler = Compiler::new(
            dir.path(),
            EntryPoints::Single(PathBuf::from("src/index.js")),
            TestModuleFactory::new(),
        );
        let output = compiler.run().await.expect("build");

        assert_eq!(output.asset_names(), ["main"]);
        let main = output.asset("main").expect("main asset");
        assert!(main.source.as_str().contains("export const a = 1;"));
        assert!(main.source.as_str().contains("export const b = 2;"));
        // Bare specifiers stay external.
        assert_eq!(output.compilation.modules().len(), 3);
    }
}
