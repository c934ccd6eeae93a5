//! Filesystem-backed vault.

use crate::vault::{FileInfo, FolderInfo, Vault, VaultError};

use anyhow::{ensure, Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory inside the vault root that serves as the application trash.
const APP_TRASH_DIR: &str = ".trash";

/// A [`Vault`] over a directory on disk.
///
/// Paths are vault-relative and slash-separated; the root is `"/"`.
/// Dot-prefixed entries (host configuration, the app trash itself) are
/// invisible to enumeration, and symlinks are skipped rather than followed.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let metadata = fs::metadata(&root)
            .with_context(|| format!("Failed to open vault root {}", root.display()))?;
        ensure!(metadata.is_dir(), "vault root {} is not a directory", root.display());
        Ok(FsVault { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &str) -> PathBuf {
        let mut abs = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            abs.push(segment);
        }
        abs
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<&str> = rel
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();
        Some(segments.join("/"))
    }

    fn io_error(path: &str, source: io::Error) -> VaultError {
        if source.kind() == io::ErrorKind::NotFound {
            VaultError::NotFound {
                path: path.to_string(),
            }
        } else {
            VaultError::Io {
                path: path.to_string(),
                source,
            }
        }
    }

    /// Count the visible direct children of a directory. A directory whose
    /// contents cannot be read reports `usize::MAX`: unknown contents must
    /// never look empty, or the collapser would seed a populated folder.
    fn visible_child_count(dir: &Path) -> usize {
        match fs::read_dir(dir) {
            Ok(entries) => entries
                .flatten()
                .filter(|e| !is_hidden_name(&e.file_name().to_string_lossy()))
                .count(),
            Err(err) => {
                log::warn!("Could not read directory {}: {}", dir.display(), err);
                usize::MAX
            }
        }
    }

    fn walk(&self) -> impl Iterator<Item = walkdir::DirEntry> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !is_hidden_name(&entry.file_name().to_string_lossy())
            })
            .filter_map(|result| match result {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("Failed to access vault entry: {}", err);
                    None
                }
            })
    }
}

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

impl Vault for FsVault {
    fn files(&self) -> Vec<FileInfo> {
        self.walk()
            .filter_map(|entry| {
                // symlink_metadata so symlinks are neither followed nor sized
                let metadata = fs::symlink_metadata(entry.path()).ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let path = self.relative(entry.path())?;
                Some(FileInfo::new(path, metadata.len()))
            })
            .collect()
    }

    fn folders(&self) -> Vec<FolderInfo> {
        self.walk()
            .filter_map(|entry| {
                let metadata = fs::symlink_metadata(entry.path()).ok()?;
                if !metadata.is_dir() {
                    return None;
                }
                let child_count = Self::visible_child_count(entry.path());
                if entry.depth() == 0 {
                    return Some(FolderInfo {
                        path: "/".to_string(),
                        parent: None,
                        child_count,
                    });
                }
                let path = self.relative(entry.path())?;
                let parent = match path.rsplit_once('/') {
                    Some((dir, _)) => dir.to_string(),
                    None => "/".to_string(),
                };
                Some(FolderInfo {
                    path,
                    parent: Some(parent),
                    child_count,
                })
            })
            .collect()
    }

    fn read_to_string(&self, path: &str) -> Result<String, VaultError> {
        fs::read_to_string(self.absolute(path)).map_err(|e| Self::io_error(path, e))
    }

    fn delete_permanently(&self, path: &str) -> Result<(), VaultError> {
        let abs = self.absolute(path);
        let metadata = fs::symlink_metadata(&abs).map_err(|e| Self::io_error(path, e))?;
        let result = if metadata.is_dir() {
            fs::remove_dir_all(&abs)
        } else {
            fs::remove_file(&abs)
        };
        result.map_err(|e| Self::io_error(path, e))
    }

    fn trash_system(&self, path: &str) -> Result<(), VaultError> {
        let abs = self.absolute(path);
        if !abs.exists() {
            return Err(VaultError::NotFound {
                path: path.to_string(),
            });
        }
        trash::delete(&abs).map_err(|source| VaultError::SystemTrash {
            path: path.to_string(),
            source,
        })
    }

    fn trash_local(&self, path: &str) -> Result<(), VaultError> {
        let abs = self.absolute(path);
        if !abs.exists() {
            return Err(VaultError::NotFound {
                path: path.to_string(),
            });
        }

        let trash_dir = self.root.join(APP_TRASH_DIR);
        fs::create_dir_all(&trash_dir).map_err(|e| Self::io_error(path, e))?;

        let name = path.rsplit('/').next().unwrap_or(path);
        let destination = unique_destination(&trash_dir, name);
        fs::rename(&abs, destination).map_err(|e| Self::io_error(path, e))
    }
}

/// Pick a non-colliding name inside the trash directory by appending a
/// counter to the basename.
fn unique_destination(trash_dir: &Path, name: &str) -> PathBuf {
    let direct = trash_dir.join(name);
    if !direct.exists() {
        return direct;
    }
    let mut counter = 1;
    loop {
        let candidate = trash_dir.join(format!("{name} {counter}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
