//! Empty-folder collapsing.

use crate::vault::FolderInfo;
use std::collections::{HashMap, HashSet};

/// Find every folder that becomes removable once empty leaves are taken out.
///
/// Seeds are the non-root folders with zero children. From each seed the
/// parent chain is walked upward: a parent qualifies only while it currently
/// has exactly one child (the seed or the previously collapsed descendant)
/// and is not the root. The first ancestor with two or more children, or the
/// root, terminates the walk without being added.
///
/// Output order is deepest-first within each chain, so entries can be deleted
/// in order. Each folder appears at most once.
pub fn collapse_empty_folders(folders: &[FolderInfo]) -> Vec<String> {
    let by_path: HashMap<&str, &FolderInfo> =
        folders.iter().map(|f| (f.path.as_str(), f)).collect();

    let mut removal = Vec::new();
    let mut seen = HashSet::new();

    for seed in folders.iter().filter(|f| !f.is_root() && f.child_count == 0) {
        if !seen.insert(seed.path.as_str()) {
            continue;
        }
        removal.push(seed.path.clone());

        let mut parent = seed.parent.as_deref();
        while let Some(path) = parent {
            let Some(folder) = by_path.get(path) else {
                break;
            };
            if folder.is_root() || folder.child_count != 1 {
                break;
            }
            if seen.insert(folder.path.as_str()) {
                removal.push(folder.path.clone());
            }
            parent = folder.parent.as_deref();
        }
    }

    removal
}
