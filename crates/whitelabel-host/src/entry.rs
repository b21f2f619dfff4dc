//! Entry declarations.

use indexmap::IndexMap;
use std::path::PathBuf;

/// One logical entry: a single module or a list of modules bundled as one
/// output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryItem {
    /// Single entry module.
    Single(PathBuf),

    /// Multiple modules treated as one logical entry.
    Multiple(Vec<PathBuf>),
}

impl EntryItem {
    /// The entry's module paths in declaration order.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            EntryItem::Single(path) => std::slice::from_ref(path),
            EntryItem::Multiple(paths) => paths,
        }
    }
}

/// Configured entry point(s) for a build.
///
/// There is deliberately no callback form: entry declarations are data, so
/// everything a plugin can observe at `entry_option` time is already fully
/// evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoints {
    /// Single entry point.
    Single(PathBuf),

    /// Multiple entry points bundled as one logical entry.
    Multiple(Vec<PathBuf>),

    /// Named entry points with custom output names.
    ///
    /// Keys are the output chunk names, values are the entry modules.
    Named(IndexMap<String, EntryItem>),
}

impl EntryPoints {
    /// Output name given to the unnamed `Single`/`Multiple` forms.
    pub const DEFAULT_NAME: &'static str = "main";

    /// Normalize into `(output name, entry)` pairs. The unnamed forms
    /// become one entry named [`EntryPoints::DEFAULT_NAME`].
    pub fn named(&self) -> Vec<(String, EntryItem)> {
        match self {
            EntryPoints::Single(path) => vec![(
                Self::DEFAULT_NAME.to_string(),
                EntryItem::Single(path.clone()),
            )],
            EntryPoints::Multiple(paths) => vec![(
                Self::DEFAULT_NAME.to_string(),
                EntryItem::Multiple(paths.clone()),
            )],
            EntryPoints::Named(entries) => entries
                .iter()
                .map(|(name, item)| (name.clone(), item.clone()))
                .collect(),
        }
    }

    /// Number of logical entries declared.
    pub fn len(&self) -> usize {
        match self {
            EntryPoints::Single(_) | EntryPoints::Multiple(_) => 1,
            EntryPoints::Named(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            EntryPoints::Single(_) | EntryPoints::Multiple(_) => false,
            EntryPoints::Named(entries) => entries.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_normalizes_to_main() {
        let entry = EntryPoints::Single(PathBuf::from("src/index.js"));
        let named = entry.named();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].0, "main");
        assert_eq!(named[0].1.paths(), [PathBuf::from("src/index.js")]);
    }

    #[test]
    fn multiple_stays_one_logical_entry() {
        let entry = EntryPoints::Multiple(vec![
            PathBuf::from("src/polyfill.js"),
            PathBuf::from("src/index.js"),
        ]);
        assert_eq!(entry.len(), 1);
        assert_eq!(entry.named()[0].1.paths().len(), 2);
    }

    #[test]
    fn named_preserves_declaration_order() {
        let mut entries = IndexMap::new();
        entries.insert(
            "app".to_string(),
            EntryItem::Single(PathBuf::from("src/app.js")),
        );
        entries.insert(
            "admin".to_string(),
            EntryItem::Single(PathBuf::from("src/admin.js")),
        );
        let entry = EntryPoints::Named(entries);

        let names: Vec<String> = entry.named().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["app", "admin"]);
    }
}
