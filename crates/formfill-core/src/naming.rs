//! Output file naming.

use crate::fields::FieldNames;
use crate::record::Record;

/// Stand-in for a field that is absent or blank at generation time.
pub const UNKNOWN: &str = "unknown";

const ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters that are illegal in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if ILLEGAL.contains(&c) { '_' } else { c })
        .collect()
}

/// `{id}_{name}_{category}.{extension}`, sanitised.
pub fn output_file_name(record: &Record, fields: &FieldNames, extension: &str) -> String {
    let part = |field: &str| record.filled(field).unwrap_or(UNKNOWN).trim().to_string();
    let stem = format!(
        "{}_{}_{}",
        part(&fields.id),
        part(&fields.name),
        part(&fields.category)
    );
    format!("{}.{extension}", sanitize_file_name(&stem))
}

/// Short label for status messages: name, then identifier, then `unknown`.
pub fn record_label<'r>(record: &'r Record, fields: &FieldNames) -> &'r str {
    record
        .filled(&fields.name)
        .or_else(|| record.filled(&fields.id))
        .unwrap_or(UNKNOWN)
}
