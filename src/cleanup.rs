//! Cleanup orchestration and best-effort execution.

use crate::classify::{classify_files, FileCandidate};
use crate::filter::{apply_path_filter, path_passes_filter};
use crate::folders::collapse_empty_folders;
use crate::metadata::MetadataIndex;
use crate::policy::{CleanupPolicy, DeletionDestination};
use crate::references::build_reference_set;
use crate::vault::{parent_of, Vault, VaultError};

use log::warn;
use std::collections::HashMap;

/// The final deletion set of one run: file candidates plus folder paths.
///
/// Files and folders are disjoint and each entry appears exactly once. Folder
/// paths are ordered deepest-first so children are deleted before parents.
#[derive(Debug, Default)]
pub struct DeletionSet {
    pub files: Vec<FileCandidate>,
    pub folders: Vec<String>,
}

impl DeletionSet {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.folders.len()
    }

    /// Total size of the file candidates, for host reporting.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// One entry that could not be deleted. The rest of the set is still
/// processed.
#[derive(Debug)]
pub struct DeletionFailure {
    pub path: String,
    pub error: VaultError,
}

/// End-of-run outcome reported to the host.
#[derive(Debug)]
pub enum CleanupOutcome {
    /// No candidates were found; nothing was touched.
    NothingToClean,
    /// Confirmation was required and the user declined; nothing was touched.
    Declined,
    /// Deletion ran. Counts cover successful deletions only; per-entry
    /// failures are captured alongside.
    Removed {
        files: usize,
        folders: usize,
        failures: Vec<DeletionFailure>,
    },
}

/// Host collaborator that presents the candidate list and reports the user's
/// decision.
pub trait ConfirmCleanup {
    fn confirm(&self, candidates: &DeletionSet) -> bool;
}

/// Resolve the full deletion set for the current vault state without touching
/// anything. `run_cleanup` is this plus execution; hosts that preview the set
/// (the confirmation dialog does) call this directly.
///
/// Folder child counts are taken net of the files this same run deletes, so a
/// folder left empty by those deletions collapses immediately and one run
/// converges (an immediate re-run resolves nothing).
pub fn resolve_candidates<V>(
    vault: &V,
    index: &dyn MetadataIndex,
    policy: &CleanupPolicy,
) -> DeletionSet
where
    V: Vault + Sync,
{
    let references = build_reference_set(vault, index);
    let files: Vec<FileCandidate> = classify_files(&vault.files(), &references, index, policy)
        .into_iter()
        .filter(|c| path_passes_filter(&c.path, &policy.excluded_folders, policy.folder_mode))
        .collect();

    let folders = if policy.remove_folders {
        let mut snapshot = vault.folders();

        let mut removed_children: HashMap<String, usize> = HashMap::new();
        for candidate in &files {
            *removed_children.entry(parent_of(&candidate.path)).or_insert(0) += 1;
        }
        for folder in &mut snapshot {
            if let Some(&n) = removed_children.get(&folder.path) {
                folder.child_count = folder.child_count.saturating_sub(n);
            }
        }

        apply_path_filter(
            collapse_empty_folders(&snapshot),
            &policy.excluded_folders,
            policy.folder_mode,
        )
    } else {
        Vec::new()
    };

    DeletionSet { files, folders }
}

/// Run one full cleanup: resolve candidates, gate on confirmation when the
/// policy asks for it, then delete best-effort per entry.
///
/// With confirmation enabled and no confirmer supplied, the run counts as
/// declined — same conservative bias as the classifier.
pub fn run_cleanup<V>(
    vault: &V,
    index: &dyn MetadataIndex,
    policy: &CleanupPolicy,
    confirmer: Option<&dyn ConfirmCleanup>,
) -> CleanupOutcome
where
    V: Vault + Sync,
{
    let set = resolve_candidates(vault, index, policy);

    if set.is_empty() {
        return CleanupOutcome::NothingToClean;
    }

    if policy.deletion_confirmation {
        let confirmed = confirmer.is_some_and(|c| c.confirm(&set));
        if !confirmed {
            return CleanupOutcome::Declined;
        }
    }

    execute(vault, &set, policy.deletion_destination)
}

/// Delete every entry of the set. One failure never aborts the rest; files go
/// first, then folders in their deepest-first order.
fn execute<V: Vault>(
    vault: &V,
    set: &DeletionSet,
    destination: DeletionDestination,
) -> CleanupOutcome {
    let mut failures = Vec::new();
    let mut files = 0;
    let mut folders = 0;

    for candidate in &set.files {
        match delete_entry(vault, &candidate.path, destination) {
            Ok(()) => files += 1,
            Err(error) => {
                warn!("Could not delete {}: {}", candidate.path, error);
                failures.push(DeletionFailure {
                    path: candidate.path.clone(),
                    error,
                });
            }
        }
    }

    for path in &set.folders {
        match delete_entry(vault, path, destination) {
            Ok(()) => folders += 1,
            Err(error) => {
                warn!("Could not delete folder {}: {}", path, error);
                failures.push(DeletionFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    CleanupOutcome::Removed {
        files,
        folders,
        failures,
    }
}

fn delete_entry<V: Vault>(
    vault: &V,
    path: &str,
    destination: DeletionDestination,
) -> Result<(), VaultError> {
    match destination {
        DeletionDestination::Permanent => vault.delete_permanently(path),
        DeletionDestination::SystemTrash => vault.trash_system(path),
        DeletionDestination::AppTrash => vault.trash_local(path),
    }
}
