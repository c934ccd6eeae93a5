//! The host metadata seam: resolved links and parsed document structure.

use serde_json::Value;
use std::collections::HashMap;

/// Resolved links as exposed by the host: source document path mapped to the
/// target paths it references, each with a reference count.
pub type ResolvedLinks = HashMap<String, HashMap<String, usize>>;

/// One parsed content section of a markdown document.
///
/// The host cache tags sections by kind; the only kind this core interprets
/// is `yaml`, the frontmatter preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: String,
}

impl Section {
    pub fn new(kind: impl Into<String>) -> Self {
        Section { kind: kind.into() }
    }

    /// A frontmatter section.
    pub fn frontmatter() -> Self {
        Section::new("yaml")
    }

    pub fn is_frontmatter(&self) -> bool {
        self.kind == "yaml"
    }
}

/// Host collaborator exposing the link-resolution index and the
/// structured-content cache.
///
/// A document that was never parsed has no cache entry; the classifier treats
/// that the same as an empty section list, not as an error.
pub trait MetadataIndex {
    /// The full resolved-links mapping for the vault.
    fn resolved_links(&self) -> ResolvedLinks;

    /// The ordered section list for a markdown document, or `None` when the
    /// document has never been parsed.
    fn sections(&self, path: &str) -> Option<Vec<Section>>;

    /// The frontmatter key/value map for a markdown document, or `None` when
    /// the document has no cached frontmatter.
    fn frontmatter(&self, path: &str) -> Option<HashMap<String, Value>>;
}
