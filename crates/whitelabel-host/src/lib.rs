//! # whitelabel-host
//!
//! The host bundler extension-point protocol consumed by whitelabel
//! plugins.
//!
//! A production bundler that wants to support whitelabel plugins implements
//! the host side of this protocol: it owns the module graph, chunk
//! assembly, and asset emission, and fires the hooks on [`Plugin`] and
//! [`Loader`] at the matching points of its build. The plugins never bundle
//! anything themselves; they only decide, at two well-defined render-time
//! extension points, which already-compiled module record a chunk should
//! use.
//!
//! The crate also ships an in-memory reference host behind the
//! `test-utils` feature so plugin crates can integration-test the whole
//! hook protocol without a production bundler.
//!
//! ## Protocol overview
//!
//! - [`Compiler`] holds configuration: context directory, entry
//!   declarations ([`EntryPoints`]), plugins, loaders.
//! - [`Compilation`] is one build instance. Child builds get their own
//!   instance and share no hook registrations or extension state with the
//!   parent.
//! - [`Plugin`] hooks: `entry_option`, `compilation`, `child_compilation`,
//!   `render_module_content`, `render_manifest`.
//! - [`Loader`] is the per-file transform stage; it can admit additional
//!   files through [`LoaderContext::load_module`].
//! - [`Extensions`] is typed per-compilation storage for plugin state.
//! - [`FileSystem`] abstracts the status probe plugins use for candidate
//!   files, with [`FsError::NotFound`] as the only "absent" error class.

mod chunk;
mod compilation;
mod compiler;
mod diagnostics;
mod entry;
mod extensions;
mod fs;
mod module;
mod plugin;
mod source;

// In-memory reference host (test builds and the test-utils feature)
#[cfg(any(
    all(any(test, doctest), not(target_family = "wasm")),
    all(feature = "test-utils", not(target_family = "wasm"))
))]
pub mod test_utils;

pub use chunk::Chunk;
pub use compilation::Compilation;
pub use compiler::Compiler;
pub use diagnostics::{BuildDiagnostic, DiagnosticSeverity};
pub use entry::{EntryItem, EntryPoints};
pub use extensions::Extensions;
pub use fs::{FileMetadata, FileSystem, FsError, FsResult};
pub use module::{ModuleFactory, ModuleLoadError, ModuleRecord};
pub use plugin::{
    HookNoopReturn, HookRenderReturn, HookTransformReturn, Loader, LoaderContext,
    ModuleRenderArgs, Plugin, RenderManifestArgs,
};
pub use source::RenderedSource;

#[cfg(not(target_family = "wasm"))]
pub use fs::NativeFileSystem;
