//! Per-file keep/remove classification.
//!
//! A file is kept as soon as any check fails; it becomes a candidate only by
//! passing all of them. The bias is deliberate: whenever a rule is ambiguous
//! about a file, the file is kept.

use crate::metadata::MetadataIndex;
use crate::policy::{CleanupPolicy, FilterMode};
use crate::vault::FileInfo;
use crate::{CANVAS_EXTENSION, MARKDOWN_EXTENSION};

use std::collections::HashSet;

/// Canvas files at or above this size are never emptiness candidates. A
/// freshly created or cleared canvas is at most 28 bytes and a single node
/// needs roughly 80, so 50 separates the two cleanly.
const EMPTY_CANVAS_MAX_BYTES: u64 = 50;

/// Why a file was selected for removal. Diagnostic only; not part of the
/// deletion contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    UnusedAttachment,
    EmptyMarkdown,
    FrontmatterOnly,
    EmptyCanvas,
}

/// A file selected for removal, prior to path filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: String,
    pub size: u64,
    pub reason: RemovalReason,
}

/// The compiled extension allow-pattern. The markdown extension is always
/// implicitly part of it, and `*` stands for any non-markdown extension.
struct ExtensionPattern {
    wildcard: bool,
    extensions: HashSet<String>,
}

impl ExtensionPattern {
    fn from_policy(policy: &CleanupPolicy) -> Self {
        ExtensionPattern {
            wildcard: policy.attachment_extensions.contains("*"),
            extensions: policy
                .attachment_extensions
                .iter()
                .filter(|e| e.as_str() != "*")
                .cloned()
                .collect(),
        }
    }

    fn matches(&self, extension: &str) -> bool {
        if extension == MARKDOWN_EXTENSION {
            return true;
        }
        if self.wildcard {
            return true;
        }
        self.extensions.contains(extension)
    }
}

/// Classify every file, returning the removal candidates.
///
/// Decision order per file: extension filter, canvas-emptiness, markdown
/// emptiness/frontmatter-only, and finally the in-use check — a file present
/// in `references` is kept no matter what the emptiness rules concluded.
pub fn classify_files(
    files: &[FileInfo],
    references: &HashSet<String>,
    index: &dyn MetadataIndex,
    policy: &CleanupPolicy,
) -> Vec<FileCandidate> {
    let pattern = ExtensionPattern::from_policy(policy);

    files
        .iter()
        .filter_map(|file| {
            classify_file(file, references, index, policy, &pattern).map(|reason| FileCandidate {
                path: file.path.clone(),
                size: file.size,
                reason,
            })
        })
        .collect()
}

fn classify_file(
    file: &FileInfo,
    references: &HashSet<String>,
    index: &dyn MetadataIndex,
    policy: &CleanupPolicy,
    pattern: &ExtensionPattern,
) -> Option<RemovalReason> {
    // 1. Extension filter: allow-list semantics require a match, deny-list
    // semantics require a non-match.
    let matched = pattern.matches(&file.extension);
    let considered = match policy.attachment_mode {
        FilterMode::Include => matched,
        FilterMode::Exclude => !matched,
    };
    if !considered {
        return None;
    }

    let reason = if file.extension == CANVAS_EXTENSION {
        // 2. Canvas emptiness: anything at or above the threshold holds real
        // nodes and is kept outright.
        if file.size >= EMPTY_CANVAS_MAX_BYTES {
            return None;
        }
        RemovalReason::EmptyCanvas
    } else if file.extension == MARKDOWN_EXTENSION {
        // 3. Markdown emptiness / frontmatter-only.
        classify_markdown(&file.path, index, policy)?
    } else {
        RemovalReason::UnusedAttachment
    };

    // 4. In-use check: being referenced overrides every emptiness rule.
    if references.contains(&file.path) {
        return None;
    }

    Some(reason)
}

fn classify_markdown(
    path: &str,
    index: &dyn MetadataIndex,
    policy: &CleanupPolicy,
) -> Option<RemovalReason> {
    let sections = index.sections(path).unwrap_or_default();

    if sections.is_empty() {
        return Some(RemovalReason::EmptyMarkdown);
    }

    // Only the "single section, which is frontmatter" shape is eligible for
    // the frontmatter-only rule. Frontmatter plus any other content keeps the
    // document, even when every key is ignorable.
    if sections.len() != 1 || !sections[0].is_frontmatter() {
        return None;
    }

    if policy.ignored_frontmatter.is_empty() {
        return None;
    }

    let keys: Vec<String> = index
        .frontmatter(path)
        .map(|fm| fm.into_keys().collect())
        .unwrap_or_default();

    if keys.iter().all(|k| policy.ignored_frontmatter.contains(k)) {
        Some(RemovalReason::FrontmatterOnly)
    } else {
        None
    }
}
