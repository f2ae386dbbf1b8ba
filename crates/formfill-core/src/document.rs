//! In-memory rich-text document: paragraphs of formatted runs, plus tables.
//!
//! Mirrors what a word-processor container exposes. Formatting is opaque to
//! the rest of the crate: it is carried by shared handle and never inspected
//! during substitution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Character formatting of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font: Option<String>,
    /// Size in half-points, as stored by common container formats.
    pub size: Option<u32>,
    pub color: Option<String>,
}

/// A span of text sharing one formatting state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub format: Arc<RunFormat>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: Arc::default(),
        }
    }

    pub fn styled(text: impl Into<String>, format: Arc<RunFormat>) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Concatenation of all run texts in order.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

/// Top-level body element, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub body: Vec<Block>,
}

impl Document {
    pub fn new(body: Vec<Block>) -> Self {
        Self { body }
    }

    /// Every paragraph in the document: body paragraphs and the paragraphs of
    /// every table cell, in document order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().flat_map(block_paragraphs)
    }

    /// Mutable counterpart of [`paragraphs`](Self::paragraphs).
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.body.iter_mut().flat_map(block_paragraphs_mut)
    }
}

fn block_paragraphs(block: &Block) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
    match block {
        Block::Paragraph(p) => Box::new(std::iter::once(p)),
        Block::Table(t) => Box::new(
            t.rows
                .iter()
                .flatten()
                .flat_map(|cell| cell.paragraphs.iter()),
        ),
    }
}

fn block_paragraphs_mut(block: &mut Block) -> Box<dyn Iterator<Item = &mut Paragraph> + '_> {
    match block {
        Block::Paragraph(p) => Box::new(std::iter::once(p)),
        Block::Table(t) => Box::new(
            t.rows
                .iter_mut()
                .flatten()
                .flat_map(|cell| cell.paragraphs.iter_mut()),
        ),
    }
}
