//! The host vault seam: tree enumeration and deletion primitives.

use std::io;
use thiserror::Error;

/// Errors surfaced by vault collaborators.
///
/// These are per-entry recoverable: a cleanup run logs them and keeps going.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no such entry in vault: {path}")]
    NotFound { path: String },

    #[error("failed to move {path} to system trash: {source}")]
    SystemTrash {
        path: String,
        #[source]
        source: trash::Error,
    },
}

/// A file in the vault tree.
///
/// Paths are vault-relative, slash-separated, and case-sensitive. The
/// extension is the trailing segment after the last `.` of the final path
/// component, or empty when there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: String,
    pub extension: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        FileInfo {
            path,
            extension,
            size,
        }
    }
}

/// A folder in the vault tree, with its live direct-child count.
///
/// The root folder has path `"/"` and no parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderInfo {
    pub path: String,
    pub parent: Option<String>,
    pub child_count: usize,
}

impl FolderInfo {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The folder containing a vault path; `"/"` for top-level entries.
pub fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => "/".to_string(),
    }
}

/// Derive the extension from a vault path (segment after the last `.` of the
/// last component).
pub fn extension_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx + 1..].to_string(),
        _ => String::new(),
    }
}

/// Host collaborator that owns the file tree.
///
/// This core only reads the tree and issues delete requests; it never holds
/// references into it across calls. Implementations must tolerate delete
/// requests for entries that vanished since enumeration (report
/// [`VaultError::NotFound`], which the executor treats as a per-entry
/// failure).
pub trait Vault {
    /// Every file currently in the vault.
    fn files(&self) -> Vec<FileInfo>;

    /// Every folder currently in the vault, including the root.
    fn folders(&self) -> Vec<FolderInfo>;

    /// Read a file's textual content.
    fn read_to_string(&self, path: &str) -> Result<String, VaultError>;

    /// Erase a file or folder permanently.
    fn delete_permanently(&self, path: &str) -> Result<(), VaultError>;

    /// Move a file or folder to the operating system trash.
    fn trash_system(&self, path: &str) -> Result<(), VaultError>;

    /// Move a file or folder to the application-level trash.
    fn trash_local(&self, path: &str) -> Result<(), VaultError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_of_nested_path() {
        assert_eq!(parent_of("A/B/x.md"), "A/B");
        assert_eq!(parent_of("A/B"), "A");
    }

    #[test]
    fn test_parent_of_top_level_is_root() {
        assert_eq!(parent_of("note.md"), "/");
        assert_eq!(parent_of("A"), "/");
    }

    #[test]
    fn test_extension_of_simple() {
        assert_eq!(extension_of("note.md"), "md");
        assert_eq!(extension_of("assets/image.png"), "png");
    }

    #[test]
    fn test_extension_of_no_extension() {
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of("dir/README"), "");
    }

    #[test]
    fn test_extension_of_trailing_dot() {
        assert_eq!(extension_of("weird."), "");
    }

    #[test]
    fn test_extension_of_ignores_dots_in_folders() {
        assert_eq!(extension_of("archive.old/plain"), "");
        assert_eq!(extension_of("archive.old/note.md"), "md");
    }

    #[test]
    fn test_file_info_derives_extension() {
        let info = FileInfo::new("boards/plan.canvas", 120);
        assert_eq!(info.extension, "canvas");
        assert_eq!(info.size, 120);
    }

    #[test]
    fn test_folder_root_detection() {
        let root = FolderInfo {
            path: "/".to_string(),
            parent: None,
            child_count: 3,
        };
        let child = FolderInfo {
            path: "A".to_string(),
            parent: Some("/".to_string()),
            child_count: 0,
        };
        assert!(root.is_root());
        assert!(!child.is_root());
    }
}
