//! Missing-field resolution.
//!
//! Each record passes through a small state machine before it may be
//! rendered:
//!
//! ```text
//! Scanning ──(nothing missing)──────────────────────────▶ Resolved
//!    │
//!    └──▶ NeedsInput ──(confirm)────────────────────────▶ Resolved
//!              │
//!              └──(decline)──┬──(proceed with blanks)──▶ Resolved
//!                            └──(skip)─────────────────▶ Skipped
//! ```
//!
//! User interaction happens through [`FieldForm`], a request/response
//! collaborator. The composite key is never part of a request.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::derive::derive_key;
use crate::fields::FieldNames;
use crate::record::{Record, is_blank};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("cannot {action} while {stage}")]
    InvalidTransition {
        action: &'static str,
        stage: &'static str,
    },
}

/// Fields required by the template that the record does not fill.
///
/// `required − {composite key} − {non-blank record fields}`.
pub fn missing_fields(
    required: &BTreeSet<String>,
    record: &Record,
    fields: &FieldNames,
) -> BTreeSet<String> {
    required
        .iter()
        .filter(|name| !fields.is_system_derived(name))
        .filter(|name| record.filled(name).is_none())
        .cloned()
        .collect()
}

/// What the form is shown for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRequest {
    /// 1-based position of the record in its input.
    pub row: usize,
    /// Identifier field value, or `None` when blank.
    pub id: Option<String>,
    /// Name field value, or `None` when blank.
    pub name: Option<String>,
    pub missing: BTreeSet<String>,
}

/// The form's answer to a [`FillRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormReply {
    /// User confirmed; values may be blank per field.
    Fill(BTreeMap<String, String>),
    /// User cancelled the form.
    Decline,
}

/// Follow-up choice after a declined form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineChoice {
    Skip,
    ProceedBlank,
}

/// External collaborator that collects values for missing fields.
pub trait FieldForm {
    fn request(&mut self, request: &FillRequest) -> FormReply;

    /// Asked only after [`request`](Self::request) returned
    /// [`FormReply::Decline`].
    fn on_decline(&mut self, request: &FillRequest) -> DeclineChoice;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Scanning,
    NeedsInput(FillRequest),
    Resolved,
    Skipped,
}

impl Stage {
    fn label(&self) -> &'static str {
        match self {
            Stage::Scanning => "scanning",
            Stage::NeedsInput(_) => "awaiting input",
            Stage::Resolved => "resolved",
            Stage::Skipped => "skipped",
        }
    }
}

/// Final state of a record after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Ready to render.
    Resolved(Record),
    /// Excluded by the user.
    Skipped(Record),
}

/// One record moving through the resolution state machine.
#[derive(Debug, Clone)]
pub struct RecordWorkflow<'a> {
    record: Record,
    row: usize,
    stage: Stage,
    fields: &'a FieldNames,
}

impl<'a> RecordWorkflow<'a> {
    pub fn new(record: Record, row: usize, fields: &'a FieldNames) -> Self {
        Self {
            record,
            row,
            stage: Stage::Scanning,
            fields,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    fn invalid(&self, action: &'static str) -> WorkflowError {
        WorkflowError::InvalidTransition {
            action,
            stage: self.stage.label(),
        }
    }

    /// Compare the record with the template's identifiers.
    pub fn scan(&mut self, required: &BTreeSet<String>) -> Result<&Stage, WorkflowError> {
        if self.stage != Stage::Scanning {
            return Err(self.invalid("scan"));
        }
        let missing = missing_fields(required, &self.record, self.fields);
        if missing.is_empty() {
            debug!(row = self.row, "all template fields present");
            self.stage = Stage::Resolved;
        } else {
            debug!(row = self.row, ?missing, "record needs input");
            self.stage = Stage::NeedsInput(FillRequest {
                row: self.row,
                id: self.record.filled(&self.fields.id).map(str::to_string),
                name: self.record.filled(&self.fields.name).map(str::to_string),
                missing,
            });
        }
        Ok(&self.stage)
    }

    /// Merge confirmed values. Blank entries are not written; the key is
    /// re-derived when one of its inputs changed.
    pub fn confirm(&mut self, entered: BTreeMap<String, String>) -> Result<(), WorkflowError> {
        if !matches!(self.stage, Stage::NeedsInput(_)) {
            return Err(self.invalid("confirm"));
        }
        let mut key_input_changed = false;
        for (field, value) in entered {
            if is_blank(&value) || self.fields.is_system_derived(&field) {
                continue;
            }
            let changed = self.record.set(field.as_str(), value.trim());
            key_input_changed |= changed && self.fields.is_key_input(&field);
        }
        if key_input_changed {
            derive_key(&mut self.record, self.fields);
        }
        info!(row = self.row, "record completed from form input");
        self.stage = Stage::Resolved;
        Ok(())
    }

    /// Apply the user's choice after a declined form.
    ///
    /// Proceeding writes an empty value for each missing field so its
    /// placeholder renders blank.
    pub fn decline(&mut self, choice: DeclineChoice) -> Result<(), WorkflowError> {
        let Stage::NeedsInput(request) = &self.stage else {
            return Err(self.invalid("decline"));
        };
        match choice {
            DeclineChoice::Skip => {
                info!(row = self.row, "record skipped");
                self.stage = Stage::Skipped;
            }
            DeclineChoice::ProceedBlank => {
                let missing = request.missing.clone();
                for field in &missing {
                    if !self.record.contains(field) {
                        self.record.set(field.as_str(), "");
                    }
                }
                info!(row = self.row, blank = missing.len(), "record kept with blank fields");
                self.stage = Stage::Resolved;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Outcome, WorkflowError> {
        match self.stage {
            Stage::Resolved => Ok(Outcome::Resolved(self.record)),
            Stage::Skipped => Ok(Outcome::Skipped(self.record)),
            _ => Err(self.invalid("finish")),
        }
    }
}

/// Drive one record through the workflow, consulting `form` when needed.
pub fn resolve_record(
    record: Record,
    row: usize,
    required: &BTreeSet<String>,
    fields: &FieldNames,
    form: &mut dyn FieldForm,
) -> Result<Outcome, WorkflowError> {
    let mut workflow = RecordWorkflow::new(record, row, fields);
    if let Stage::NeedsInput(request) = workflow.scan(required)? {
        let request = request.clone();
        match form.request(&request) {
            FormReply::Fill(values) => workflow.confirm(values)?,
            FormReply::Decline => workflow.decline(form.on_decline(&request))?,
        }
    }
    workflow.finish()
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    const NAMES: &[&str] = &["学号", "姓名", "班级", "转档字号", "年", "A", "B", "C"];
    const VALUES: &[&str] = &["", " ", "\t", "v", " x "];

    proptest! {
        #[test]
        fn missing_is_required_minus_key_minus_filled(
            required in prop::collection::btree_set(prop::sample::select(NAMES), 0..NAMES.len()),
            values in prop::collection::vec(
                (prop::sample::select(NAMES), prop::sample::select(VALUES)),
                0..10,
            ),
        ) {
            let fields = FieldNames::default();
            let record: Record = values.into_iter().collect();
            let required: BTreeSet<String> = required.into_iter().map(String::from).collect();

            let filled: BTreeSet<String> = record
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(name, _)| name.to_string())
                .collect();
            let key = BTreeSet::from([fields.key.clone()]);
            let without_key: BTreeSet<String> = required.difference(&key).cloned().collect();
            let expected: BTreeSet<String> = without_key.difference(&filled).cloned().collect();

            prop_assert_eq!(missing_fields(&required, &record, &fields), expected);
        }
    }
}
