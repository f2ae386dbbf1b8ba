//! Shared proptest strategies.

use proptest::prelude::*;

use crate::document::{Paragraph, Run};

/// Fragments that combine into whole, partial and nested tokens.
const ATOMS: &[&str] = &[
    "{{a}}", "{{b}}", "{{", "}}", "{", "}", "a", "b", "x", "学", " ",
];

/// A paragraph whose text is built from [`ATOMS`] and then cut into runs at
/// arbitrary character positions. Repeated cuts produce empty runs.
pub(crate) fn split_paragraph() -> impl Strategy<Value = Paragraph> {
    (
        prop::collection::vec(prop::sample::select(ATOMS), 0..16),
        prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    )
        .prop_map(|(atoms, cuts)| {
            let chars: Vec<char> = atoms.concat().chars().collect();
            let mut cuts: Vec<usize> = cuts.iter().map(|c| c.index(chars.len() + 1)).collect();
            cuts.sort_unstable();

            let mut runs = Vec::with_capacity(cuts.len() + 1);
            let mut prev = 0;
            for cut in cuts.into_iter().chain([chars.len()]) {
                runs.push(Run::plain(chars[prev..cut].iter().collect::<String>()));
                prev = cut;
            }
            Paragraph::new(runs)
        })
}
