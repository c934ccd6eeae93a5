//! Path-prefix filtering of the final candidate set.

use crate::policy::FilterMode;

/// Apply the excluded-folders policy to a candidate path.
///
/// Patterns are anchored at the start of the path. With exclude semantics a
/// matching candidate is dropped; with include semantics only matching
/// candidates survive. An empty pattern list passes everything through.
pub fn path_passes_filter(path: &str, patterns: &[String], mode: FilterMode) -> bool {
    if patterns.is_empty() {
        return true;
    }

    let matched = patterns.iter().any(|p| path.starts_with(p.as_str()));
    match mode {
        FilterMode::Exclude => !matched,
        FilterMode::Include => matched,
    }
}

/// Filter a list of candidate paths in place of the union step.
pub fn apply_path_filter(
    candidates: Vec<String>,
    patterns: &[String],
    mode: FilterMode,
) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|path| path_passes_filter(path, patterns, mode))
        .collect()
}
