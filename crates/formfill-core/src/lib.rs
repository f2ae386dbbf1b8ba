//! Core of the form filler: records, the document model, placeholder
//! scanning and run-span rewriting, field derivation, and missing-field
//! resolution.

pub mod derive;
pub mod document;
pub mod fields;
pub mod naming;
pub mod placeholder;
pub mod record;
pub mod resolve;
pub mod rewrite;
pub mod template;

#[cfg(test)]
mod testing;

pub use derive::{DateDerivation, DateError, DateParts, derive_all, derive_date, derive_key};
pub use document::{Block, Cell, Document, Paragraph, Run, RunFormat, Table};
pub use fields::FieldNames;
pub use naming::{output_file_name, record_label};
pub use placeholder::scan;
pub use record::Record;
pub use resolve::{
    DeclineChoice, FieldForm, FillRequest, FormReply, Outcome, RecordWorkflow, Stage,
    WorkflowError, missing_fields, resolve_record,
};
pub use rewrite::{rewrite_document, rewrite_paragraph};
pub use template::Template;
