//! In-memory vault and metadata collaborators.
//!
//! Deterministic implementations of the host seams, used by the integration
//! tests and usable by hosts that keep their tree in memory. Deletions are
//! applied to the in-memory tree and recorded, so a test can observe both the
//! destination routing and the resulting state.

use crate::metadata::{MetadataIndex, ResolvedLinks, Section};
use crate::policy::DeletionDestination;
use crate::vault::{FileInfo, FolderInfo, Vault, VaultError};

use crate::vault::parent_of;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryTree {
    /// path -> (content, size)
    files: BTreeMap<String, (String, u64)>,
    folders: BTreeSet<String>,
    denied: HashSet<String>,
    deletions: Vec<(String, DeletionDestination)>,
}

/// An in-memory [`Vault`]. Interior mutability keeps the trait's `&self`
/// deletion contract; a `RwLock` (not `RefCell`) because the canvas pass
/// reads from rayon worker threads.
#[derive(Debug, Default)]
pub struct MemoryVault {
    tree: RwLock<MemoryTree>,
}

/// Materialize every ancestor folder of a path, as creating the entry on a
/// real filesystem would. Deleting a file later leaves its folder behind.
fn register_ancestors(tree: &mut MemoryTree, path: &str) {
    let mut current = parent_of(path);
    while current != "/" {
        tree.folders.insert(current.clone());
        current = parent_of(&current);
    }
}

impl MemoryVault {
    pub fn new() -> Self {
        MemoryVault::default()
    }

    /// Add a text file; size is the content's byte length.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        {
            let mut tree = self.tree.write().unwrap();
            let size = content.len() as u64;
            tree.files
                .insert(path.to_string(), (content.to_string(), size));
            register_ancestors(&mut tree, path);
        }
        self
    }

    /// Add a file with an explicit size and no readable content.
    pub fn with_binary_file(self, path: &str, size: u64) -> Self {
        {
            let mut tree = self.tree.write().unwrap();
            tree.files.insert(path.to_string(), (String::new(), size));
            register_ancestors(&mut tree, path);
        }
        self
    }

    /// Add an explicit (possibly empty) folder.
    pub fn with_folder(self, path: &str) -> Self {
        {
            let mut tree = self.tree.write().unwrap();
            tree.folders.insert(path.to_string());
            register_ancestors(&mut tree, path);
        }
        self
    }

    /// Make every deletion of `path` fail with a permission error.
    pub fn with_denied_path(self, path: &str) -> Self {
        self.tree.write().unwrap().denied.insert(path.to_string());
        self
    }

    /// The deletions performed so far, in order, with their destination.
    pub fn deletions(&self) -> Vec<(String, DeletionDestination)> {
        self.tree.read().unwrap().deletions.clone()
    }

    pub fn contains(&self, path: &str) -> bool {
        let tree = self.tree.read().unwrap();
        tree.files.contains_key(path) || tree.folders.contains(path)
    }

    fn delete(&self, path: &str, destination: DeletionDestination) -> Result<(), VaultError> {
        let mut tree = self.tree.write().unwrap();

        if tree.denied.contains(path) {
            return Err(VaultError::Io {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "deletion denied"),
            });
        }

        if tree.files.remove(path).is_none() {
            if !tree.folders.remove(path) {
                return Err(VaultError::NotFound {
                    path: path.to_string(),
                });
            }
            // Drop anything still nested under a removed folder
            let prefix = format!("{path}/");
            tree.files.retain(|p, _| !p.starts_with(&prefix));
            tree.folders.retain(|p| !p.starts_with(&prefix));
        }

        tree.deletions.push((path.to_string(), destination));
        Ok(())
    }
}

impl Vault for MemoryVault {
    fn files(&self) -> Vec<FileInfo> {
        let tree = self.tree.read().unwrap();
        tree.files
            .iter()
            .map(|(path, (_, size))| FileInfo::new(path.clone(), *size))
            .collect()
    }

    fn folders(&self) -> Vec<FolderInfo> {
        let tree = self.tree.read().unwrap();

        let mut child_counts: HashMap<String, usize> = HashMap::new();
        for path in tree.files.keys().chain(tree.folders.iter()) {
            *child_counts.entry(parent_of(path)).or_insert(0) += 1;
        }

        let mut out = vec![FolderInfo {
            path: "/".to_string(),
            parent: None,
            child_count: child_counts.get("/").copied().unwrap_or(0),
        }];
        out.extend(tree.folders.iter().map(|path| FolderInfo {
            path: path.clone(),
            parent: Some(parent_of(path)),
            child_count: child_counts.get(path).copied().unwrap_or(0),
        }));
        out
    }

    fn read_to_string(&self, path: &str) -> Result<String, VaultError> {
        let tree = self.tree.read().unwrap();
        tree.files
            .get(path)
            .map(|(content, _)| content.clone())
            .ok_or_else(|| VaultError::NotFound {
                path: path.to_string(),
            })
    }

    fn delete_permanently(&self, path: &str) -> Result<(), VaultError> {
        self.delete(path, DeletionDestination::Permanent)
    }

    fn trash_system(&self, path: &str) -> Result<(), VaultError> {
        self.delete(path, DeletionDestination::SystemTrash)
    }

    fn trash_local(&self, path: &str) -> Result<(), VaultError> {
        self.delete(path, DeletionDestination::AppTrash)
    }
}

/// An in-memory [`MetadataIndex`] with builder-style setup.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    links: ResolvedLinks,
    sections: HashMap<String, Vec<Section>>,
    frontmatter: HashMap<String, HashMap<String, Value>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        MemoryIndex::default()
    }

    /// Record that `source` references `target` (incrementing the count).
    pub fn with_link(mut self, source: &str, target: &str) -> Self {
        *self
            .links
            .entry(source.to_string())
            .or_default()
            .entry(target.to_string())
            .or_insert(0) += 1;
        self
    }

    pub fn with_sections(mut self, path: &str, sections: Vec<Section>) -> Self {
        self.sections.insert(path.to_string(), sections);
        self
    }

    pub fn with_frontmatter_key(mut self, path: &str, key: &str) -> Self {
        self.frontmatter
            .entry(path.to_string())
            .or_default()
            .insert(key.to_string(), Value::Null);
        self
    }
}

impl MetadataIndex for MemoryIndex {
    fn resolved_links(&self) -> ResolvedLinks {
        self.links.clone()
    }

    fn sections(&self, path: &str) -> Option<Vec<Section>> {
        self.sections.get(path).cloned()
    }

    fn frontmatter(&self, path: &str) -> Option<HashMap<String, Value>> {
        self.frontmatter.get(path).cloned()
    }
}
