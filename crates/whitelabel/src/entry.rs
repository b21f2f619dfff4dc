//! Entry expansion: one synthesized entry per (logical entry, variant tag).

use crate::context::OverrideTag;
use crate::template;
use crate::OverrideError;
use rustc_hash::FxHashMap;
use whitelabel_host::{EntryItem, EntryPoints};

/// Result of expanding the configured entries against the declared tags.
#[derive(Debug)]
pub(crate) struct ExpandedEntries {
    /// Synthesized `(output name, entry)` pairs, in (entry, tag) order.
    pub entries: Vec<(String, EntryItem)>,
    /// Variant output name -> the tag it represents. Read-only after
    /// expansion; render-time hooks use it to recover a chunk's tag.
    pub variants: FxHashMap<String, OverrideTag>,
}

/// Synthesize one additional entry per declared entry and tag.
///
/// Output names come from `output_path`. Two variants collapsing onto one
/// name (a pattern without `{name}` across several entries) is a
/// configuration error, not a silent overwrite.
pub(crate) fn expand_entries(
    entry: &EntryPoints,
    overrides: &[OverrideTag],
    output_path: &str,
) -> Result<ExpandedEntries, OverrideError> {
    let mut entries = Vec::with_capacity(entry.len() * overrides.len());
    let mut variants = FxHashMap::default();

    for (name, item) in entry.named() {
        for tag in overrides {
            let variant_name = template::substitute(
                output_path,
                &[("name", name.as_str()), ("override", tag.as_str())],
            )?;
            if variants
                .insert(variant_name.clone(), tag.clone())
                .is_some()
            {
                return Err(OverrideError::DuplicateVariantName(variant_name));
            }
            entries.push((variant_name, item.clone()));
        }
    }

    Ok(ExpandedEntries { entries, variants })
}
