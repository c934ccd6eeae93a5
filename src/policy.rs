//! Cleanup policy loading and defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether a configured set selects what to act on or what to leave alone.
///
/// For attachment extensions, `Include` means allow-list (a file's extension
/// must match to be considered), `Exclude` means deny-list (matching
/// extensions are left alone and everything else is considered). For folder
/// patterns, `Exclude` drops matching candidates, `Include` keeps only
/// matching candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Include,
    Exclude,
}

/// Where deleted entries go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletionDestination {
    /// Erase permanently. Unrecoverable.
    Permanent,
    /// Move to the operating system trash.
    SystemTrash,
    /// Move to the application-level trash inside the vault.
    AppTrash,
}

/// User-configurable cleanup policy, supplied by the host before a run and
/// read-only during it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupPolicy {
    /// Attachment extensions considered for cleanup. `"*"` means any
    /// non-markdown extension. The markdown extension is always implicitly
    /// part of the pattern so empty-document rules apply regardless.
    pub attachment_extensions: HashSet<String>,

    /// How `attachment_extensions` is applied (allow-list or deny-list).
    pub attachment_mode: FilterMode,

    /// Whether empty folders (and their single-child ancestor chains) are
    /// removal candidates.
    pub remove_folders: bool,

    /// Frontmatter keys that do not make a document worth keeping: a document
    /// whose only content is a frontmatter block with keys drawn entirely
    /// from this set is removable. Empty set disables the rule.
    pub ignored_frontmatter: HashSet<String>,

    /// Path prefixes the final candidate set is filtered against.
    pub excluded_folders: Vec<String>,

    /// How `excluded_folders` is applied.
    pub folder_mode: FilterMode,

    pub deletion_destination: DeletionDestination,

    /// When true, the host confirmation collaborator is consulted before any
    /// deletion happens.
    pub deletion_confirmation: bool,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        CleanupPolicy {
            attachment_extensions: HashSet::from(["*".to_string()]),
            attachment_mode: FilterMode::Include,
            remove_folders: false,
            ignored_frontmatter: HashSet::new(),
            excluded_folders: Vec::new(),
            folder_mode: FilterMode::Exclude,
            deletion_destination: DeletionDestination::SystemTrash,
            deletion_confirmation: true,
        }
    }
}

impl CleanupPolicy {
    /// Parse a policy from TOML, as stored in the host's configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse cleanup policy TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = CleanupPolicy::default();
        assert!(policy.attachment_extensions.contains("*"));
        assert_eq!(policy.attachment_mode, FilterMode::Include);
        assert!(!policy.remove_folders);
        assert!(policy.ignored_frontmatter.is_empty());
        assert!(policy.excluded_folders.is_empty());
        assert_eq!(policy.deletion_destination, DeletionDestination::SystemTrash);
        assert!(policy.deletion_confirmation);
    }

    #[test]
    fn test_parse_full_policy() {
        let policy = CleanupPolicy::from_toml_str(
            r#"
            attachment_extensions = ["png", "jpg"]
            attachment_mode = "include"
            remove_folders = true
            ignored_frontmatter = ["created", "modified"]
            excluded_folders = ["Archive"]
            folder_mode = "exclude"
            deletion_destination = "app-trash"
            deletion_confirmation = false
            "#,
        )
        .unwrap();

        assert!(policy.attachment_extensions.contains("png"));
        assert!(policy.remove_folders);
        assert!(policy.ignored_frontmatter.contains("created"));
        assert_eq!(policy.excluded_folders, vec!["Archive".to_string()]);
        assert_eq!(policy.deletion_destination, DeletionDestination::AppTrash);
        assert!(!policy.deletion_confirmation);
    }

    #[test]
    fn test_parse_partial_policy_uses_defaults() {
        let policy = CleanupPolicy::from_toml_str("remove_folders = true\n").unwrap();
        assert!(policy.remove_folders);
        assert!(policy.attachment_extensions.contains("*"));
        assert_eq!(policy.deletion_destination, DeletionDestination::SystemTrash);
    }

    #[test]
    fn test_parse_invalid_destination() {
        let result = CleanupPolicy::from_toml_str("deletion_destination = \"incinerator\"\n");
        assert!(result.is_err());
    }
}
