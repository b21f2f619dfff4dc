//! Override discovery: the per-file pipeline stage.

use crate::context::{OverrideContext, OverrideTag};
use crate::{OverrideError, PLUGIN_NAME};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};
use whitelabel_host::{FileSystem, HookTransformReturn, Loader, LoaderContext, RenderedSource};

/// Candidate override path for `resource` and `tag`: directory and
/// extension unchanged, tag inserted before the extension.
///
/// `src/foo.js` + `brandA` -> `src/foo.brandA.js`; an extensionless file
/// gets the tag appended (`Makefile` -> `Makefile.brandA`).
fn candidate_path(resource: &Path, tag: &OverrideTag) -> PathBuf {
    let mut file_name = resource
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    file_name.push(".");
    file_name.push(tag.as_str());
    if let Some(extension) = resource.extension() {
        file_name.push(".");
        file_name.push(extension);
    }
    resource.with_file_name(file_name)
}

/// Per-file override discovery stage.
///
/// For every file admitted into the build, probes one sibling candidate per
/// declared tag and asks the host to load the ones that exist, recording the
/// mapping in the shared [`OverrideContext`]. The file's own content is
/// never touched; substitution happens later, at render time.
///
/// Requires [`ModuleOverridePlugin`](crate::ModuleOverridePlugin) to be
/// registered on the same build: the plugin owns the context this stage
/// writes into, and running without it is a configuration error.
#[derive(Debug)]
pub struct OverrideDiscoveryLoader {
    fs: Arc<dyn FileSystem>,
}

impl OverrideDiscoveryLoader {
    /// Discovery against the real filesystem.
    #[cfg(not(target_family = "wasm"))]
    pub fn new() -> Self {
        Self::with_file_system(Arc::new(whitelabel_host::NativeFileSystem::new()))
    }

    /// Discovery against a caller-supplied probe, for hosts with virtual
    /// filesystems and for tests.
    pub fn with_file_system(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

#[cfg(not(target_family = "wasm"))]
impl Default for OverrideDiscoveryLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Loader for OverrideDiscoveryLoader {
    fn name(&self) -> Cow<'static, str> {
        "override-discovery".into()
    }

    async fn process(
        &self,
        ctx: &LoaderContext<'_>,
        _source: &RenderedSource,
    ) -> HookTransformReturn {
        let Some(context) = ctx.extensions().get::<OverrideContext>() else {
            return Err(OverrideError::LoaderWithoutPlugin.into());
        };

        let resource = ctx.resource();

        // Loop-breaking rule: a file loaded as an override is never itself
        // scanned for further overrides.
        if context.is_loaded(resource) {
            trace!(
                resource = %resource.display(),
                "skipping override scan for a loaded override"
            );
            return Ok(None);
        }

        let probes = context.overrides().iter().map(|tag| {
            let candidate = candidate_path(resource, tag);
            let shared = Arc::clone(&context);
            let fs = Arc::clone(&self.fs);
            async move {
                match fs.metadata(&candidate).await {
                    Ok(_) => {}
                    Err(error) if error.is_not_found() => {
                        trace!(
                            candidate = %candidate.display(),
                            tag = %tag,
                            "no override candidate"
                        );
                        return Ok(());
                    }
                    Err(error) => {
                        return Err(OverrideError::DiscoveryIo {
                            candidate,
                            source: error,
                        });
                    }
                }

                // Marked before the load so the candidate's own trip through
                // this stage passes straight through.
                shared.mark_loaded(candidate.clone());

                let module = ctx.load_module(&candidate).await.map_err(|error| {
                    OverrideError::ModuleLoad {
                        path: candidate.clone(),
                        reason: error.to_string(),
                    }
                })?;
                shared.record(resource, tag, module.resource().to_path_buf());
                debug!(
                    original = %resource.display(),
                    tag = %tag,
                    override_module = %module.resource().display(),
                    "recorded override"
                );
                Ok(())
            }
        });

        // Fan-out per candidate, fan-in before the file's processing step
        // completes; one candidate's unexpected failure fails the file.
        try_join_all(probes).await.map_err(|error| {
            anyhow::Error::from(error).context(format!(
                "{PLUGIN_NAME}: override discovery failed for {}",
                resource.display()
            ))
        })?;

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> OverrideTag {
        OverrideTag::from(s)
    }

    #[test]
    fn candidate_keeps_directory_and_extension() {
        assert_eq!(
            candidate_path(Path::new("/app/src/foo.js"), &tag("brandA")),
            PathBuf::from("/app/src/foo.brandA.js")
        );
    }

    #[test]
    fn candidate_for_multi_dot_name_splits_at_last_dot() {
        assert_eq!(
            candidate_path(Path::new("/app/src/foo.test.js"), &tag("brandA")),
            PathBuf::from("/app/src/foo.test.brandA.js")
        );
    }

    #[test]
    fn candidate_for_extensionless_file_appends_tag() {
        assert_eq!(
            candidate_path(Path::new("/app/Procfile"), &tag("brandA")),
            PathBuf::from("/app/Procfile.brandA")
        );
    }

    #[test]
    fn candidate_of_an_override_chains_the_tag() {
        // Derivation alone would chain tags; the loaded-override guard is
        // what keeps this path from ever being probed.
        assert_eq!(
            candidate_path(Path::new("/app/src/foo.brandA.js"), &tag("brandA")),
            PathBuf::from("/app/src/foo.brandA.brandA.js")
        );
    }
}
