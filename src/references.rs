//! Building the per-run reference set from every evidence source of "in use".

use crate::canvas::canvas_references;
use crate::metadata::MetadataIndex;
use crate::vault::{FileInfo, Vault};
use crate::{CANVAS_EXTENSION, MARKDOWN_EXTENSION};

use log::warn;
use rayon::prelude::*;
use std::collections::HashSet;

/// Produce the set of paths that must be preserved during one cleanup run.
///
/// Two extraction passes feed the set:
/// - the host link index, flattened across all source documents, excluding
///   markdown targets (markdown-to-markdown links do not protect a document
///   from the emptiness rules);
/// - every non-empty canvas document, parsed for `file` nodes and wikilink
///   markup inside `text` nodes.
///
/// Unreadable or malformed canvas documents are diagnosed and contribute
/// zero references; they never abort the run. Only membership matters
/// downstream, so the result is an unordered set.
pub fn build_reference_set<V>(vault: &V, index: &dyn MetadataIndex) -> HashSet<String>
where
    V: Vault + Sync,
{
    let md_suffix = format!(".{MARKDOWN_EXTENSION}");
    let mut references = HashSet::new();

    for targets in index.resolved_links().into_values() {
        for target in targets.into_keys() {
            if !target.ends_with(&md_suffix) {
                references.insert(target);
            }
        }
    }

    let canvas_files: Vec<FileInfo> = vault
        .files()
        .into_iter()
        .filter(|f| f.extension == CANVAS_EXTENSION && f.size > 0)
        .collect();

    // The canvas pass is read-only and per-file independent, so it runs in
    // parallel; results are merged afterwards.
    let canvas_refs: Vec<Vec<String>> = canvas_files
        .par_iter()
        .map(|file| match vault.read_to_string(&file.path) {
            Ok(content) => match canvas_references(&content) {
                Ok(refs) => refs,
                Err(err) => {
                    warn!("Malformed canvas content in {}: {}", file.path, err);
                    Vec::new()
                }
            },
            Err(err) => {
                warn!("Could not read canvas {}: {}", file.path, err);
                Vec::new()
            }
        })
        .collect();

    references.extend(canvas_refs.into_iter().flatten());
    references
}
