//! Run-span rewriting.
//!
//! A placeholder's characters may be spread over several runs, e.g.
//! `["{{na", "me}}"]`. Replacing run by run would miss it, so each
//! occurrence is located in the concatenated paragraph text and the result
//! is projected back onto the runs:
//!
//! - the first run touched by the occurrence receives its own prefix, the
//!   value, and the suffix of the last touched run;
//! - every other touched run is emptied but kept, along with its format.
//!
//! Offsets shift after every replacement, so the offset table is rebuilt
//! for each occurrence. Text outside the occurrence is never altered.

use tracing::trace;

use crate::document::{Document, Paragraph};
use crate::placeholder::token;

/// Byte span of one run inside the concatenated paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunSpan {
    index: usize,
    start: usize,
    end: usize,
}

/// Offsets of each run in the paragraph's current concatenation.
fn run_spans(paragraph: &Paragraph) -> (String, Vec<RunSpan>) {
    let mut text = String::new();
    let mut spans = Vec::with_capacity(paragraph.runs.len());
    for (index, run) in paragraph.runs.iter().enumerate() {
        let start = text.len();
        text.push_str(&run.text);
        spans.push(RunSpan {
            index,
            start,
            end: text.len(),
        });
    }
    (text, spans)
}

/// Replace the first occurrence of `needle` at or after byte `from`.
///
/// Returns the byte offset just past the inserted value, or `None` when no
/// occurrence remains.
fn replace_once(paragraph: &mut Paragraph, needle: &str, value: &str, from: usize) -> Option<usize> {
    let (text, spans) = run_spans(paragraph);
    let mut from = from.min(text.len());
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let start = from + text[from..].find(needle)?;
    let end = start + needle.len();

    let mut touched = spans.iter().filter(|s| s.start < end && s.end > start);
    let first = *touched.next()?;
    let last = touched.last().copied().unwrap_or(first);

    let prefix = &paragraph.runs[first.index].text[..start - first.start];
    let suffix = &paragraph.runs[last.index].text[end - last.start..];
    let merged = format!("{prefix}{value}{suffix}");

    trace!(
        needle,
        first = first.index,
        last = last.index,
        "rewrote placeholder span"
    );

    for span in &spans[first.index + 1..=last.index] {
        paragraph.runs[span.index].text.clear();
    }
    paragraph.runs[first.index].text = merged;

    Some(start + value.len())
}

/// Replace every occurrence of `{{name}}` in the paragraph with `value`.
///
/// Re-scans after each replacement until no occurrence remains. Searching
/// resumes past the inserted value, so a value that itself contains the
/// token is inserted verbatim. An empty value can join the text around it
/// into a new token, so the search then backs up far enough to see it.
/// Returns the number of occurrences replaced.
pub fn rewrite_placeholder(paragraph: &mut Paragraph, name: &str, value: &str) -> usize {
    let needle = token(name);
    let mut from = 0;
    let mut count = 0;
    while let Some(next) = replace_once(paragraph, &needle, value, from) {
        from = if value.is_empty() {
            next.saturating_sub(needle.len() - 1)
        } else {
            next
        };
        count += 1;
    }
    count
}

/// Rewrite every placeholder named in `values` within one paragraph.
///
/// Names are processed in iteration order. Returns the total number of
/// occurrences replaced.
pub fn rewrite_paragraph<'a, I>(paragraph: &mut Paragraph, values: I) -> usize
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    values
        .into_iter()
        .map(|(name, value)| rewrite_placeholder(paragraph, name, value))
        .sum()
}

/// Rewrite every paragraph of the document, table cells included.
pub fn rewrite_document(document: &mut Document, values: &[(&str, &str)]) -> usize {
    document
        .paragraphs_mut()
        .map(|p| rewrite_paragraph(p, values.iter().copied()))
        .sum()
}
