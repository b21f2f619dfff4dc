//! Rendered module output.

use arcstr::ArcStr;

/// Immutable rendered bytes of a module or chunk.
///
/// Cloning is cheap (reference counted), which matters because render-time
/// substitution hands the same compiled output to every variant chunk that
/// needs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedSource {
    text: ArcStr,
}

impl RenderedSource {
    /// Wrap already-rendered text.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: ArcStr::from(text.as_ref()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for RenderedSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for RenderedSource {
    fn from(text: String) -> Self {
        Self {
            text: ArcStr::from(text),
        }
    }
}

impl std::fmt::Display for RenderedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
