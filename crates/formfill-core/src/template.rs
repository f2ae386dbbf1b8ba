//! A loaded template: its document and the identifiers it references.

use std::collections::BTreeSet;

use crate::document::Document;
use crate::placeholder::scan;
use crate::record::Record;
use crate::rewrite::rewrite_document;

/// Immutable template, shared read-only across a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    document: Document,
    identifiers: BTreeSet<String>,
}

impl Template {
    pub fn new(document: Document) -> Self {
        let identifiers = scan(&document);
        Self {
            document,
            identifiers,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Distinct placeholder identifiers found in the template.
    pub fn identifiers(&self) -> &BTreeSet<String> {
        &self.identifiers
    }

    /// Render `record` into a fresh copy of the document.
    ///
    /// Every identifier the record has a value for is substituted; tokens
    /// for fields the record lacks stay in the output verbatim.
    pub fn render(&self, record: &Record) -> Document {
        let values: Vec<(&str, &str)> = self
            .identifiers
            .iter()
            .filter_map(|name| record.get(name).map(|value| (name.as_str(), value)))
            .collect();
        let mut document = self.document.clone();
        rewrite_document(&mut document, &values);
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Cell, Paragraph, Run, Table};

    fn template() -> Template {
        Template::new(Document::new(vec![
            Block::Paragraph(Paragraph::new(vec![
                Run::plain("No. {{转档"),
                Run::plain("字号}} for {{姓名}}"),
            ])),
            Block::Table(Table {
                rows: vec![vec![Cell {
                    paragraphs: vec![Paragraph::new(vec![Run::plain("{{班级}} / {{备注}}")])],
                }]],
            }),
        ]))
    }

    #[test]
    fn identifiers_are_scanned_once() {
        let t = template();
        let names: Vec<&str> = t.identifiers().iter().map(String::as_str).collect();
        assert_eq!(names, ["备注", "姓名", "班级", "转档字号"]);
    }

    #[test]
    fn render_leaves_template_untouched() {
        let t = template();
        let before = t.document().clone();
        let record: Record = [("转档字号", "241001_CS1"), ("姓名", "张三"), ("班级", "CS1")]
            .into_iter()
            .collect();
        let out = t.render(&record);
        let texts: Vec<String> = out.paragraphs().map(Paragraph::text).collect();
        assert_eq!(texts, ["No. 241001_CS1 for 张三", "CS1 / {{备注}}"]);
        assert_eq!(t.document(), &before);
    }

    #[test]
    fn blank_values_erase_tokens() {
        let t = template();
        let record: Record = [("备注", "")].into_iter().collect();
        let out = t.render(&record);
        let texts: Vec<String> = out.paragraphs().map(Paragraph::text).collect();
        assert_eq!(texts[1], "{{班级}} / ");
    }
}
