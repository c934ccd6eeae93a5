//! vaultsweep - Unused-File and Empty-Folder Cleanup
//!
//! vaultsweep finds resources in a hierarchical note vault that nothing references
//! and removes them under a configurable policy. Unlike a blanket sweep, it is
//! conservative: a file is only a candidate when it survives extension filtering,
//! emptiness heuristics, AND is absent from every evidence source of "in use"
//! (the host link index plus references embedded in canvas documents).
//!
//! ## Architecture
//!
//! A cleanup run flows through five stages:
//! - reference extraction (link index + canvas parsing) into one reference set
//! - per-file classification (extension rules, emptiness rules, reference check)
//! - empty-folder collapsing (leaf folders and single-child ancestor chains)
//! - path filtering (exclude/include prefix policy over the candidate union)
//! - execution (permanent delete / OS trash / app trash, best-effort per entry)
//!
//! The vault tree, link index, and structured-content cache are owned by the
//! embedding host and consumed through the [`Vault`] and [`MetadataIndex`]
//! traits; [`FsVault`] and [`MemoryVault`] are ready-made implementations.

pub mod canvas;
pub mod classify;
pub mod cleanup;
pub mod filter;
pub mod folders;
pub mod fs;
pub mod memory;
pub mod metadata;
pub mod policy;
pub mod references;
pub mod vault;

// Re-export commonly used items
pub use canvas::{canvas_references, extract_wikilinks, WikiLink};
pub use classify::{classify_files, FileCandidate, RemovalReason};
pub use cleanup::{
    resolve_candidates, run_cleanup, CleanupOutcome, ConfirmCleanup, DeletionFailure, DeletionSet,
};
pub use filter::apply_path_filter;
pub use folders::collapse_empty_folders;
pub use fs::FsVault;
pub use memory::{MemoryIndex, MemoryVault};
pub use metadata::{MetadataIndex, ResolvedLinks, Section};
pub use policy::{CleanupPolicy, DeletionDestination, FilterMode};
pub use references::build_reference_set;
pub use vault::{FileInfo, FolderInfo, Vault, VaultError};

/// Extension of markdown documents, without the leading dot.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Extension of canvas documents, without the leading dot.
pub const CANVAS_EXTENSION: &str = "canvas";
