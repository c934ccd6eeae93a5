//! Canvas document parsing and wikilink extraction.
//!
//! Canvas documents are JSON with a top-level `nodes` list. Two node kinds
//! carry references: `file` nodes point at another vault entry directly, and
//! `text` nodes may embed `[[target]]` / `![[target]]` markup. Everything
//! else is ignored, and nodes that do not conform to their declared shape are
//! skipped rather than assumed.

use crate::MARKDOWN_EXTENSION;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CanvasData {
    #[serde(default)]
    nodes: Vec<CanvasNode>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum CanvasNode {
    #[serde(rename = "file")]
    File {
        #[serde(default)]
        file: Option<String>,
    },
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// A `[[target]]` or `![[target]]` occurrence in canvas text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    pub target: String,
    /// True for `![[...]]` embeds, which reference a non-document attachment.
    pub embed: bool,
}

/// Scan text for wikilink markup. Targets are taken verbatim between the
/// brackets; empty targets are dropped.
pub fn extract_wikilinks(text: &str) -> Vec<WikiLink> {
    let mut links = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    while let Some(open) = text[pos..].find("[[") {
        let open = pos + open;
        let Some(close) = text[open + 2..].find("]]") else {
            break;
        };
        let close = open + 2 + close;

        let target = &text[open + 2..close];
        if !target.is_empty() {
            links.push(WikiLink {
                target: target.to_string(),
                embed: open > 0 && bytes[open - 1] == b'!',
            });
        }
        pos = close + 2;
    }

    links
}

/// Extract every referenced path from a canvas document's content.
///
/// - `file` nodes contribute their target unless it is a markdown document.
/// - `text` nodes contribute `![[t]]` embeds verbatim and `[[t]]` page links
///   with the markdown extension appended.
///
/// Malformed JSON is non-fatal: the error is returned so the caller can
/// diagnose it and treat the document as contributing zero references.
pub fn canvas_references(content: &str) -> Result<Vec<String>, serde_json::Error> {
    let data: CanvasData = serde_json::from_str(content)?;
    let md_suffix = format!(".{MARKDOWN_EXTENSION}");
    let mut refs = Vec::new();

    for node in data.nodes {
        match node {
            CanvasNode::File { file: Some(file) } => {
                if !file.ends_with(&md_suffix) {
                    refs.push(file);
                }
            }
            CanvasNode::Text { text: Some(text) } => {
                for link in extract_wikilinks(&text) {
                    if link.embed {
                        refs.push(link.target);
                    } else {
                        refs.push(format!("{}{md_suffix}", link.target));
                    }
                }
            }
            // file/text nodes missing their payload field, and all other
            // node kinds, carry no references
            _ => {}
        }
    }

    Ok(refs)
}
