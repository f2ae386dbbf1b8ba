//! Record preparation: row selection, derivation, and missing-field
//! resolution, all before anything is queued for rendering.

use formfill_core::{
    DateDerivation, FieldForm, FieldNames, Outcome, Record, Template, WorkflowError, derive_all,
    resolve_record,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepareError {
    #[error("row {row} is out of range (1..={total})")]
    RowOutOfRange { row: usize, total: usize },

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// A record tagged with its 1-based input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub number: usize,
    pub record: Record,
}

/// Records ready for the batch, plus the rows the user skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prepared {
    pub queue: Vec<Record>,
    pub skipped: Vec<usize>,
}

/// Pick rows by 1-based number, in the order given. `None` keeps all rows.
pub fn select_rows(records: Vec<Record>, rows: Option<&[usize]>) -> Result<Vec<Row>, PrepareError> {
    let total = records.len();
    let Some(wanted) = rows else {
        return Ok(records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Row {
                number: i + 1,
                record,
            })
            .collect());
    };
    wanted
        .iter()
        .map(|&number| {
            number
                .checked_sub(1)
                .and_then(|i| records.get(i))
                .map(|record| Row {
                    number,
                    record: record.clone(),
                })
                .ok_or(PrepareError::RowOutOfRange { row: number, total })
        })
        .collect()
}

/// Derive fields for each row, then resolve what the template still needs.
pub fn prepare(
    rows: Vec<Row>,
    template: &Template,
    fields: &FieldNames,
    form: &mut dyn FieldForm,
) -> Result<Prepared, PrepareError> {
    let mut prepared = Prepared::default();
    for Row { number, mut record } in rows {
        if let DateDerivation::Unparseable { source, .. } = derive_all(&mut record, fields) {
            debug!(row = number, source = %source, "continuing without date fields");
        }
        match resolve_record(record, number, template.identifiers(), fields, form)? {
            Outcome::Resolved(record) => prepared.queue.push(record),
            Outcome::Skipped(_) => prepared.skipped.push(number),
        }
    }
    info!(
        queued = prepared.queue.len(),
        skipped = prepared.skipped.len(),
        "records prepared"
    );
    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use formfill_core::{
        Block, DeclineChoice, Document, FillRequest, FormReply, Paragraph, Run,
    };

    fn template() -> Template {
        Template::new(Document::new(vec![Block::Paragraph(Paragraph::new(vec![
            Run::plain("{{姓名}} {{班级}} {{年}}/{{月}}/{{日}} {{转档字号}}"),
        ]))]))
    }

    /// Fills 班级 for row 1, declines everything else and skips.
    struct ClassForm;

    impl FieldForm for ClassForm {
        fn request(&mut self, request: &FillRequest) -> FormReply {
            if request.row == 1 {
                FormReply::Fill(BTreeMap::from([("班级".to_string(), "CS1".to_string())]))
            } else {
                FormReply::Decline
            }
        }

        fn on_decline(&mut self, _request: &FillRequest) -> DeclineChoice {
            DeclineChoice::Skip
        }
    }

    fn rows() -> Vec<Record> {
        vec![
            [("学号", "1001"), ("姓名", "张三"), ("提交时间", "2024/3/05 09:00")]
                .into_iter()
                .collect(),
            [("学号", "1002"), ("姓名", "李四"), ("提交时间", "bad date")]
                .into_iter()
                .collect(),
        ]
    }

    #[test]
    fn select_all_rows_numbers_from_one() {
        let selected = select_rows(rows(), None).unwrap();
        let numbers: Vec<usize> = selected.iter().map(|r| r.number).collect();
        assert_eq!(numbers, [1, 2]);
    }

    #[test]
    fn select_specific_rows() {
        let selected = select_rows(rows(), Some(&[2][..])).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].record.get("姓名"), Some("李四"));
    }

    #[test]
    fn select_out_of_range() {
        assert_eq!(
            select_rows(rows(), Some(&[0][..])).unwrap_err(),
            PrepareError::RowOutOfRange { row: 0, total: 2 }
        );
        assert!(select_rows(rows(), Some(&[3][..])).is_err());
    }

    #[test]
    fn derives_fills_and_skips() {
        let fields = FieldNames::default();
        let selected = select_rows(rows(), None).unwrap();
        let prepared = prepare(selected, &template(), &fields, &mut ClassForm).unwrap();

        assert_eq!(prepared.skipped, [2]);
        assert_eq!(prepared.queue.len(), 1);
        let record = &prepared.queue[0];
        assert_eq!(record.get("年"), Some("2024"));
        assert_eq!(record.get("日"), Some("5"));
        assert_eq!(record.get("班级"), Some("CS1"));
        assert_eq!(record.get("转档字号"), Some("241001_CS1"));
    }
}
