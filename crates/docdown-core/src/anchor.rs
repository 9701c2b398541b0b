//! Heading anchors
//!
//! [`generate_ids`] walks a document in document order and gives every
//! heading an anchor of the form `path#slug`, suffixing repeated slugs with
//! `-1`, `-2`, ... Nested documents share their root's path, so they share
//! its counters too and anchors stay unique across the whole tree.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Content, NodeKind, NodeRef};
use crate::error::{Error, Result};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

/// Lower-case, turn whitespace runs into `-`, drop anything outside `[a-z0-9-]`
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    NON_SLUG.replace_all(&hyphenated, "").into_owned()
}

/// Slug counters of one path scope
struct Anchors {
    path: Option<String>,
    counts: HashMap<String, usize>,
}

impl Anchors {
    fn new(path: Option<String>) -> Self {
        Self {
            path,
            counts: HashMap::new(),
        }
    }

    fn next(&mut self, text: &str) -> Option<String> {
        let path = self.path.as_deref()?;
        let slug = slugify(text);
        let count = self.counts.entry(slug.clone()).or_insert(0);
        let anchor = match *count {
            0 => format!("{path}#{slug}"),
            n => format!("{path}#{slug}-{n}"),
        };
        *count += 1;
        Some(anchor)
    }

    fn visit(&mut self, node: &NodeRef) -> usize {
        let mut anchored = 0;
        for child in node.children() {
            let mut data = child.data_mut();
            if let Content::Heading(heading) = &mut *data {
                heading.link = self.next(&heading.text);
                anchored += usize::from(heading.link.is_some());
                continue;
            }
            drop(data);
            anchored += self.visit(&child);
        }
        anchored
    }
}

/// Assign anchors to every heading of `document`, nested documents included.
///
/// A nested document is anchored through its root, since it shares the
/// root's counters. Counters start fresh on every call, so running it twice
/// on an unchanged tree gives the same anchors. Without a path every heading
/// loses its anchor.
pub fn generate_ids(document: &NodeRef) -> Result<()> {
    let kind = document.kind();
    if kind != NodeKind::Document {
        return Err(Error::NotADocument(kind.name()));
    }
    let root = document
        .root_document()
        .unwrap_or_else(|| document.clone());
    let path = root.path();
    let mut anchors = Anchors::new(path.clone());
    let anchored = anchors.visit(&root);
    tracing::debug!(path = ?path, anchored, "generated heading anchors");
    Ok(())
}

/// [`generate_ids`] over every document of a forest
pub fn generate_forest_ids(documents: &[NodeRef]) -> Result<()> {
    documents.iter().try_for_each(generate_ids)
}
