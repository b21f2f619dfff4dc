//! Chunks: the host's unit of output grouping.

use indexmap::IndexSet;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

/// A named group of modules destined for one emitted artifact.
///
/// The module set is insertion ordered and interior mutable because the
/// manifest-assembly hook is allowed to rewrite membership while the host
/// holds the chunk.
#[derive(Debug)]
pub struct Chunk {
    name: String,
    modules: RwLock<IndexSet<PathBuf>>,
}

impl Chunk {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: RwLock::new(IndexSet::new()),
        }
    }

    /// Output name of the chunk. For variant chunks this is the name the
    /// entry expansion synthesized, which is how render-time hooks recover
    /// the variant tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a module. Returns `false` when it was already a member.
    pub fn insert_module(&self, resource: PathBuf) -> bool {
        self.modules.write().insert(resource)
    }

    pub fn contains(&self, resource: &Path) -> bool {
        self.modules.read().contains(resource)
    }

    /// Snapshot of the member modules in insertion order.
    pub fn modules(&self) -> Vec<PathBuf> {
        self.modules.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Replace `original` with `replacement` at the same position.
    ///
    /// Returns `false` when `original` is not a member; the set is left
    /// untouched in that case.
    pub fn substitute(&self, original: &Path, replacement: PathBuf) -> bool {
        let mut modules = self.modules.write();
        let Some(index) = modules.get_index_of(original) else {
            return false;
        };
        modules.shift_remove_index(index);
        modules.shift_insert(index, replacement);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_with(paths: &[&str]) -> Chunk {
        let chunk = Chunk::new("main");
        for path in paths {
            chunk.insert_module(PathBuf::from(path));
        }
        chunk
    }

    #[test]
    fn insert_is_idempotent() {
        let chunk = chunk_with(&["/a.js", "/b.js"]);
        assert!(!chunk.insert_module(PathBuf::from("/a.js")));
        assert_eq!(chunk.len(), 2);
    }

    #[test]
    fn substitute_preserves_position() {
        let chunk = chunk_with(&["/a.js", "/b.js", "/c.js"]);
        assert!(chunk.substitute(Path::new("/b.js"), PathBuf::from("/b.brandA.js")));
        assert_eq!(
            chunk.modules(),
            vec![
                PathBuf::from("/a.js"),
                PathBuf::from("/b.brandA.js"),
                PathBuf::from("/c.js"),
            ]
        );
    }

    #[test]
    fn substitute_missing_module_is_a_no_op() {
        let chunk = chunk_with(&["/a.js"]);
        assert!(!chunk.substitute(Path::new("/zzz.js"), PathBuf::from("/zzz.brandA.js")));
        assert_eq!(chunk.modules(), vec![PathBuf::from("/a.js")]);
    }
}
