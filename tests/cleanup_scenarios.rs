//! End-to-end cleanup runs over the in-memory vault.

use std::collections::HashSet;

use vaultsweep::{
    resolve_candidates, run_cleanup, CleanupOutcome, CleanupPolicy, ConfirmCleanup,
    DeletionDestination, DeletionSet, FilterMode, MemoryIndex, MemoryVault, Section,
};

fn allow_all_policy() -> CleanupPolicy {
    CleanupPolicy {
        deletion_confirmation: false,
        deletion_destination: DeletionDestination::Permanent,
        ..CleanupPolicy::default()
    }
}

fn candidate_paths(set: &DeletionSet) -> HashSet<String> {
    set.files
        .iter()
        .map(|c| c.path.clone())
        .chain(set.folders.iter().cloned())
        .collect()
}

#[test]
fn embedded_image_survives_while_orphan_is_removed() {
    // note.md embeds image.png; orphan.png has no references at all
    let vault = MemoryVault::new()
        .with_file("note.md", "![[image.png]]")
        .with_binary_file("image.png", 5120)
        .with_binary_file("orphan.png", 5120);
    let index = MemoryIndex::new()
        .with_link("note.md", "image.png")
        .with_sections("note.md", vec![Section::new("paragraph")]);

    let set = resolve_candidates(&vault, &index, &allow_all_policy());
    assert_eq!(candidate_paths(&set), HashSet::from(["orphan.png".to_string()]));
}

#[test]
fn canvas_file_node_protects_its_target() {
    let vault = MemoryVault::new()
        .with_file(
            "board.canvas",
            r#"{"nodes":[{"id":"n1","type":"file","file":"diagram.png","x":0,"y":0}]}"#,
        )
        .with_binary_file("diagram.png", 2048)
        .with_binary_file("unused.png", 2048);

    let set = resolve_candidates(&vault, &MemoryIndex::new(), &allow_all_policy());
    let paths = candidate_paths(&set);
    assert!(paths.contains("unused.png"));
    assert!(!paths.contains("diagram.png"));
}

#[test]
fn empty_markdown_is_candidate_regardless_of_frontmatter_policy() {
    let vault = MemoryVault::new().with_file("empty.md", "");

    for ignored in [vec![], vec!["created".to_string()]] {
        let mut policy = allow_all_policy();
        policy.ignored_frontmatter = ignored.into_iter().collect();

        let set = resolve_candidates(&vault, &MemoryIndex::new(), &policy);
        assert_eq!(candidate_paths(&set), HashSet::from(["empty.md".to_string()]));
    }
}

#[test]
fn folder_chain_collapses_up_to_first_shared_ancestor() {
    // A/B/C is empty; A/B holds only C; A holds B plus x.md
    let vault = MemoryVault::new()
        .with_folder("A/B/C")
        .with_file("A/x.md", "text")
        .with_binary_file("keep.png", 10);
    let index = MemoryIndex::new()
        .with_link("A/x.md", "keep.png")
        .with_sections("A/x.md", vec![Section::new("paragraph")]);

    let mut policy = allow_all_policy();
    policy.remove_folders = true;

    let set = resolve_candidates(&vault, &index, &policy);
    assert_eq!(
        set.folders,
        vec!["A/B/C".to_string(), "A/B".to_string()]
    );
    assert!(set.files.is_empty());
}

#[test]
fn excluded_folder_prefix_removes_candidates() {
    let vault = MemoryVault::new()
        .with_binary_file("Archive/old.png", 100)
        .with_binary_file("loose.png", 100);

    let mut policy = allow_all_policy();
    policy.excluded_folders = vec!["Archive".to_string()];
    policy.folder_mode = FilterMode::Exclude;

    let set = resolve_candidates(&vault, &MemoryIndex::new(), &policy);
    assert_eq!(candidate_paths(&set), HashSet::from(["loose.png".to_string()]));
}

#[test]
fn include_mode_keeps_only_matching_candidates() {
    let vault = MemoryVault::new()
        .with_binary_file("Inbox/tmp.png", 100)
        .with_binary_file("loose.png", 100);

    let mut policy = allow_all_policy();
    policy.excluded_folders = vec!["Inbox".to_string()];
    policy.folder_mode = FilterMode::Include;

    let set = resolve_candidates(&vault, &MemoryIndex::new(), &policy);
    assert_eq!(
        candidate_paths(&set),
        HashSet::from(["Inbox/tmp.png".to_string()])
    );
}

#[test]
fn resolution_is_deterministic() {
    let vault = MemoryVault::new()
        .with_binary_file("a.png", 1)
        .with_binary_file("b.png", 2)
        .with_file("empty.md", "")
        .with_folder("Empty");
    let index = MemoryIndex::new().with_link("note.md", "a.png");

    let mut policy = allow_all_policy();
    policy.remove_folders = true;

    let first = resolve_candidates(&vault, &index, &policy);
    let second = resolve_candidates(&vault, &index, &policy);
    assert_eq!(candidate_paths(&first), candidate_paths(&second));
    assert_eq!(first.folders, second.folders);
}

#[test]
fn cleanup_is_idempotent() {
    let vault = MemoryVault::new()
        .with_binary_file("orphan.png", 100)
        .with_file("note.md", "kept")
        .with_binary_file("image.png", 100)
        .with_folder("Empty");
    let index = MemoryIndex::new()
        .with_link("note.md", "image.png")
        .with_sections("note.md", vec![Section::new("paragraph")]);

    let mut policy = allow_all_policy();
    policy.remove_folders = true;

    let outcome = run_cleanup(&vault, &index, &policy, None);
    match outcome {
        CleanupOutcome::Removed { files, folders, failures } => {
            assert_eq!(files, 1);
            assert_eq!(folders, 1);
            assert!(failures.is_empty());
        }
        other => panic!("expected Removed, got {:?}", other),
    }

    // Second run over the mutated vault finds nothing
    let outcome = run_cleanup(&vault, &index, &policy, None);
    assert!(matches!(outcome, CleanupOutcome::NothingToClean));
}

#[test]
fn folder_emptied_by_same_run_deletions_is_collapsed() {
    // D's only child is a file candidate, so D itself must go in the same
    // run, leaving nothing for a second run to find
    let vault = MemoryVault::new().with_binary_file("D/orphan.png", 100);
    let mut policy = allow_all_policy();
    policy.remove_folders = true;

    let outcome = run_cleanup(&vault, &MemoryIndex::new(), &policy, None);
    match outcome {
        CleanupOutcome::Removed { files, folders, failures } => {
            assert_eq!(files, 1);
            assert_eq!(folders, 1);
            assert!(failures.is_empty());
        }
        other => panic!("expected Removed, got {:?}", other),
    }
    assert!(!vault.contains("D/orphan.png"));
    assert!(!vault.contains("D"));

    let second = resolve_candidates(&vault, &MemoryIndex::new(), &policy);
    assert!(second.is_empty());
}

#[test]
fn chain_above_folder_emptied_by_file_deletions_is_collapsed() {
    // A holds only B; B's children are two file candidates. Netting the
    // same-run deletions seeds B and the walk collapses A too.
    let vault = MemoryVault::new()
        .with_binary_file("A/B/one.png", 10)
        .with_binary_file("A/B/two.png", 10)
        .with_file("note.md", "kept")
        .with_binary_file("image.png", 10);
    let index = MemoryIndex::new()
        .with_link("note.md", "image.png")
        .with_sections("note.md", vec![Section::new("paragraph")]);

    let mut policy = allow_all_policy();
    policy.remove_folders = true;

    let set = resolve_candidates(&vault, &index, &policy);
    assert_eq!(set.folders, vec!["A/B".to_string(), "A".to_string()]);

    run_cleanup(&vault, &index, &policy, None);
    let second = resolve_candidates(&vault, &index, &policy);
    assert!(second.is_empty());
}

#[test]
fn excluded_file_still_props_up_its_folder() {
    // The only child of D is excluded from deletion, so D keeps a live
    // child and must not collapse
    let vault = MemoryVault::new().with_binary_file("D/old.png", 100);
    let mut policy = allow_all_policy();
    policy.remove_folders = true;
    policy.excluded_folders = vec!["D".to_string()];
    policy.folder_mode = FilterMode::Exclude;

    let set = resolve_candidates(&vault, &MemoryIndex::new(), &policy);
    assert!(set.is_empty());
}

#[test]
fn nothing_to_clean_performs_no_side_effects() {
    let vault = MemoryVault::new()
        .with_file("note.md", "kept")
        .with_binary_file("image.png", 100);
    let index = MemoryIndex::new()
        .with_link("note.md", "image.png")
        .with_sections("note.md", vec![Section::new("paragraph")]);

    let outcome = run_cleanup(&vault, &index, &allow_all_policy(), None);
    assert!(matches!(outcome, CleanupOutcome::NothingToClean));
    assert!(vault.deletions().is_empty());
}

struct Decline;
impl ConfirmCleanup for Decline {
    fn confirm(&self, _candidates: &DeletionSet) -> bool {
        false
    }
}

struct Accept;
impl ConfirmCleanup for Accept {
    fn confirm(&self, _candidates: &DeletionSet) -> bool {
        true
    }
}

#[test]
fn declined_confirmation_deletes_nothing() {
    let vault = MemoryVault::new().with_binary_file("orphan.png", 100);
    let mut policy = allow_all_policy();
    policy.deletion_confirmation = true;

    let outcome = run_cleanup(&vault, &MemoryIndex::new(), &policy, Some(&Decline));
    assert!(matches!(outcome, CleanupOutcome::Declined));
    assert!(vault.contains("orphan.png"));
    assert!(vault.deletions().is_empty());
}

#[test]
fn missing_confirmer_counts_as_decline() {
    let vault = MemoryVault::new().with_binary_file("orphan.png", 100);
    let mut policy = allow_all_policy();
    policy.deletion_confirmation = true;

    let outcome = run_cleanup(&vault, &MemoryIndex::new(), &policy, None);
    assert!(matches!(outcome, CleanupOutcome::Declined));
    assert!(vault.contains("orphan.png"));
}

#[test]
fn accepted_confirmation_deletes() {
    let vault = MemoryVault::new().with_binary_file("orphan.png", 100);
    let mut policy = allow_all_policy();
    policy.deletion_confirmation = true;

    let outcome = run_cleanup(&vault, &MemoryIndex::new(), &policy, Some(&Accept));
    assert!(matches!(outcome, CleanupOutcome::Removed { files: 1, .. }));
    assert!(!vault.contains("orphan.png"));
}

#[test]
fn deletions_route_to_configured_destination() {
    for destination in [
        DeletionDestination::Permanent,
        DeletionDestination::SystemTrash,
        DeletionDestination::AppTrash,
    ] {
        let vault = MemoryVault::new().with_binary_file("orphan.png", 100);
        let mut policy = allow_all_policy();
        policy.deletion_destination = destination;

        run_cleanup(&vault, &MemoryIndex::new(), &policy, None);
        assert_eq!(vault.deletions(), vec![("orphan.png".to_string(), destination)]);
    }
}

#[test]
fn one_failed_deletion_does_not_abort_the_rest() {
    let vault = MemoryVault::new()
        .with_binary_file("locked.png", 100)
        .with_binary_file("orphan.png", 100)
        .with_denied_path("locked.png");

    let outcome = run_cleanup(&vault, &MemoryIndex::new(), &allow_all_policy(), None);
    match outcome {
        CleanupOutcome::Removed { files, failures, .. } => {
            assert_eq!(files, 1);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].path, "locked.png");
        }
        other => panic!("expected Removed, got {:?}", other),
    }
    assert!(vault.contains("locked.png"));
    assert!(!vault.contains("orphan.png"));
}

#[test]
fn canvas_size_boundary() {
    // 49 bytes: size-based candidate; 50 bytes: kept
    let vault = MemoryVault::new()
        .with_binary_file("small.canvas", 49)
        .with_binary_file("edge.canvas", 50);

    let set = resolve_candidates(&vault, &MemoryIndex::new(), &allow_all_policy());
    assert_eq!(
        candidate_paths(&set),
        HashSet::from(["small.canvas".to_string()])
    );
}

#[test]
fn malformed_canvas_keeps_its_references_unprotected_but_run_continues() {
    let vault = MemoryVault::new()
        .with_file("broken.canvas", "{this is not json at all, well over fifty bytes long}")
        .with_binary_file("orphan.png", 100);

    let set = resolve_candidates(&vault, &MemoryIndex::new(), &allow_all_policy());
    let paths = candidate_paths(&set);
    // The orphan is still found; the oversized broken canvas itself is kept
    assert!(paths.contains("orphan.png"));
    assert!(!paths.contains("broken.canvas"));
}

#[test]
fn remove_folders_disabled_contributes_no_folder_candidates() {
    let vault = MemoryVault::new().with_folder("Empty");
    let set = resolve_candidates(&vault, &MemoryIndex::new(), &allow_all_policy());
    assert!(set.folders.is_empty());
}

#[test]
fn deletion_set_totals() {
    let vault = MemoryVault::new()
        .with_binary_file("a.png", 100)
        .with_binary_file("b.png", 150);

    let set = resolve_candidates(&vault, &MemoryIndex::new(), &allow_all_policy());
    assert_eq!(set.len(), 2);
    assert_eq!(set.total_bytes(), 250);
}
