//! Placeholder syntax and the variable scanner.
//!
//! A placeholder is `{{identifier}}` where the identifier is one or more
//! word characters. Editors routinely split a placeholder across runs, so
//! scanning always works on the concatenated paragraph text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Document, Paragraph};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder regex"));

/// The literal token for `name`, e.g. `{{name}}`.
pub fn token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Identifiers referenced in a single string.
pub fn scan_text(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Identifiers referenced in one paragraph, across run boundaries.
pub fn scan_paragraph(paragraph: &Paragraph) -> BTreeSet<String> {
    let text = paragraph.text();
    scan_text(&text).map(str::to_string).collect()
}

/// Distinct identifiers referenced anywhere in the document, table cells
/// included.
pub fn scan(document: &Document) -> BTreeSet<String> {
    let mut identifiers = BTreeSet::new();
    for paragraph in document.paragraphs() {
        let text = paragraph.text();
        identifiers.extend(scan_text(&text).map(str::to_string));
    }
    identifiers
}
