//! Shared per-compilation override bookkeeping.

use dashmap::{DashMap, DashSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

/// An opaque tag identifying one build variant (e.g. `"brandA"`).
///
/// Declared as an ordered sequence on the plugin options; order matters for
/// enumeration only, never for precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTag(String);

impl OverrideTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverrideTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for OverrideTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl AsRef<str> for OverrideTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OverrideTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Override bookkeeping for one compilation.
///
/// Created by the orchestrator plugin at build start (separately for every
/// child build) and installed into that compilation's extension storage,
/// where the discovery loader finds it. Dropped with the compilation;
/// nothing survives into the next build.
///
/// Mutated concurrently by every in-flight loader invocation. All writes
/// are additive and idempotent, keyed disjointly per (original path, tag)
/// pair, so first-writer-wins is the only discipline needed.
#[derive(Debug)]
pub struct OverrideContext {
    overrides: Vec<OverrideTag>,
    /// Absolute paths already admitted as overrides. Consulted before a
    /// file is scanned so an override is never probed for further
    /// overrides. Write once per path, never removed during the build.
    loaded_overrides: DashSet<PathBuf>,
    /// original module path -> tag -> override module path.
    overrides_map: DashMap<PathBuf, FxHashMap<OverrideTag, PathBuf>>,
}

impl OverrideContext {
    pub fn new(overrides: Vec<OverrideTag>) -> Self {
        Self {
            overrides,
            loaded_overrides: DashSet::new(),
            overrides_map: DashMap::new(),
        }
    }

    /// Declared tags, in declaration order.
    pub fn overrides(&self) -> &[OverrideTag] {
        &self.overrides
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Mark a path as loaded-as-override. Returns `false` when another
    /// writer got there first, which is safe to ignore: the same path always
    /// maps to the same override.
    pub fn mark_loaded(&self, path: PathBuf) -> bool {
        self.loaded_overrides.insert(path)
    }

    /// Whether `path` was admitted into the graph as an override.
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded_overrides.contains(path)
    }

    /// Record that `original` has an override for `tag` at `override_path`.
    ///
    /// At most one override path per (original, tag) pair; re-recording the
    /// same pair keeps the first value. Candidate derivation is
    /// deterministic, so a second writer always carries the same path.
    pub fn record(&self, original: &Path, tag: &OverrideTag, override_path: PathBuf) {
        let mut slot = self.overrides_map.entry(original.to_path_buf()).or_default();
        match slot.entry(tag.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(override_path);
            }
            Entry::Occupied(occupied) => {
                debug_assert_eq!(
                    occupied.get(),
                    &override_path,
                    "one (original, tag) pair must never map to two override paths"
                );
            }
        }
    }

    /// Recorded override path for `(original, tag)`, if any.
    pub fn override_for(&self, original: &Path, tag: &OverrideTag) -> Option<PathBuf> {
        self.overrides_map
            .get(original)
            .and_then(|slot| slot.get(tag).cloned())
    }

    /// Snapshot of the recorded overrides for `original`.
    pub fn recorded(&self, original: &Path) -> Option<FxHashMap<OverrideTag, PathBuf>> {
        self.overrides_map
            .get(original)
            .map(|slot| slot.value().clone())
    }

    /// Number of original modules with at least one recorded override.
    pub fn len(&self) -> usize {
        self.overrides_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> OverrideTag {
        OverrideTag::from(s)
    }

    #[test]
    fn record_and_look_up() {
        let context = OverrideContext::new(vec![tag("brandA"), tag("brandB")]);
        context.record(
            Path::new("/src/foo.js"),
            &tag("brandA"),
            PathBuf::from("/src/foo.brandA.js"),
        );

        assert_eq!(
            context.override_for(Path::new("/src/foo.js"), &tag("brandA")),
            Some(PathBuf::from("/src/foo.brandA.js"))
        );
        assert_eq!(
            context.override_for(Path::new("/src/foo.js"), &tag("brandB")),
            None
        );
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn record_is_idempotent() {
        let context = OverrideContext::new(vec![tag("brandA")]);
        for _ in 0..2 {
            context.record(
                Path::new("/src/foo.js"),
                &tag("brandA"),
                PathBuf::from("/src/foo.brandA.js"),
            );
        }

        let recorded = context.recorded(Path::new("/src/foo.js")).expect("slot");
        assert_eq!(recorded.len(), 1);
    }

    #[test]
    fn mark_loaded_first_writer_wins() {
        let context = OverrideContext::new(vec![tag("brandA")]);
        assert!(context.mark_loaded(PathBuf::from("/src/foo.brandA.js")));
        assert!(!context.mark_loaded(PathBuf::from("/src/foo.brandA.js")));
        assert!(context.is_loaded(Path::new("/src/foo.brandA.js")));
    }

    #[test]
    fn declared_order_is_preserved() {
        let context = OverrideContext::new(vec![tag("b"), tag("a")]);
        let tags: Vec<&str> = context.overrides().iter().map(OverrideTag::as_str).collect();
        assert_eq!(tags, ["b", "a"]);
        assert!(context.has_overrides());
    }
}
