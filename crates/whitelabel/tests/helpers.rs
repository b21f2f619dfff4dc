//! Shared test utilities for whitelabel integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use whitelabel::{
    ModuleOverrideOptions, ModuleOverridePlugin, OverrideDiscoveryLoader, OverrideTag,
};
use whitelabel_host::test_utils::TestModuleFactory;
use whitelabel_host::{
    Compiler, EntryPoints, FileMetadata, FileSystem, FsError, FsResult, NativeFileSystem,
};

/// Create a project directory with the given `(relative path, content)`
/// files under it.
pub fn project_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (relative, content) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write fixture file");
    }
    dir
}

pub fn tag(name: &str) -> OverrideTag {
    OverrideTag::from(name)
}

/// A compiler wired with the override plugin and discovery loader.
pub fn override_compiler(
    project: &Path,
    entry: EntryPoints,
    overrides: &[&str],
) -> Compiler {
    let plugin = ModuleOverridePlugin::new(
        ModuleOverrideOptions::new().with_overrides(overrides.iter().copied()),
    )
    .expect("valid options");
    Compiler::new(project, entry, TestModuleFactory::new())
        .with_plugin(Arc::new(plugin))
        .with_loader(Arc::new(OverrideDiscoveryLoader::new()))
}

/// Same as [`override_compiler`] but with a caller-supplied probe
/// filesystem for the discovery loader.
pub fn override_compiler_with_fs(
    project: &Path,
    entry: EntryPoints,
    overrides: &[&str],
    fs: Arc<dyn FileSystem>,
) -> Compiler {
    let plugin = ModuleOverridePlugin::new(
        ModuleOverrideOptions::new().with_overrides(overrides.iter().copied()),
    )
    .expect("valid options");
    Compiler::new(project, entry, TestModuleFactory::new())
        .with_plugin(Arc::new(plugin))
        .with_loader(Arc::new(OverrideDiscoveryLoader::with_file_system(fs)))
}

/// Probe wrapper that records every probed path.
#[derive(Debug, Default)]
pub struct RecordingFileSystem {
    inner: NativeFileSystem,
    probes: Mutex<Vec<PathBuf>>,
}

impl RecordingFileSystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn probes(&self) -> Vec<PathBuf> {
        self.probes.lock().expect("probe log").clone()
    }

    pub fn probed(&self, file_name: &str) -> bool {
        self.probes()
            .iter()
            .any(|path| path.file_name().is_some_and(|name| name == file_name))
    }
}

#[async_trait]
impl FileSystem for RecordingFileSystem {
    async fn metadata(&self, path: &Path) -> FsResult<FileMetadata> {
        self.probes
            .lock()
            .expect("probe log")
            .push(path.to_path_buf());
        self.inner.metadata(path).await
    }
}

/// Probe wrapper that fails with a non-not-found error for any path whose
/// file name contains `fail_marker`.
#[derive(Debug)]
pub struct FaultyFileSystem {
    inner: NativeFileSystem,
    fail_marker: String,
}

impl FaultyFileSystem {
    pub fn failing_on(fail_marker: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            inner: NativeFileSystem::new(),
            fail_marker: fail_marker.into(),
        })
    }
}

#[async_trait]
impl FileSystem for FaultyFileSystem {
    async fn metadata(&self, path: &Path) -> FsResult<FileMetadata> {
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        if name.contains(&self.fail_marker) {
            return Err(FsError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "permission denied",
                ),
            });
        }
        self.inner.metadata(path).await
    }
}
