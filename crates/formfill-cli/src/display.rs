//! Terminal rendering for previews and batch progress.

use std::collections::BTreeSet;

use formfill_core::{FieldNames, Record, missing_fields, record_label};
use formfill_runner::{BatchEvent, Row};

const LABEL_WIDTH: usize = 12;

// ── Preview ──

/// Print one prepared row as a card: derived fields first, then what the
/// template still lacks.
pub fn print_preview_card(row: &Row, required: &BTreeSet<String>, fields: &FieldNames) {
    let record = &row.record;
    println!("=== Row {}: {} ===", row.number, record_label(record, fields));

    for field in [&fields.id, &fields.category, &fields.year, &fields.month, &fields.day] {
        print_field(record, field);
    }
    print_field(record, &fields.key);

    let missing = missing_fields(required, record, fields);
    if missing.is_empty() {
        println!("  {:<LABEL_WIDTH$} -", "missing");
    } else {
        let names: Vec<&str> = missing.iter().map(String::as_str).collect();
        println!("  {:<LABEL_WIDTH$} {}", "missing", names.join(", "));
    }
    println!();
}

fn print_field(record: &Record, field: &str) {
    let value = record.filled(field).unwrap_or("-");
    println!("  {:<LABEL_WIDTH$} {}", field, value);
}

/// Print the template's identifiers, one per line.
pub fn print_identifiers(identifiers: &BTreeSet<String>, fields: &FieldNames) {
    for name in identifiers {
        if fields.is_system_derived(name) {
            println!("  {name}  (derived)");
        } else {
            println!("  {name}");
        }
    }
}

// ── Progress ──

/// Render a batch event on stderr, keeping progress on one line.
pub fn print_event(event: &BatchEvent) {
    match event {
        BatchEvent::Started { total } => eprintln!("  Generating {total} documents"),
        BatchEvent::Status { index, label } => eprint!("\r  [{index}] {label:<20}"),
        BatchEvent::Progress(p) => eprint!(
            "\r  Generated {}/{} ({}%)            ",
            p.completed,
            p.total,
            p.percent()
        ),
        BatchEvent::Finished { succeeded } => {
            eprintln!();
            eprintln!("  Done: {succeeded} documents written");
        }
        BatchEvent::Failed { succeeded, message } => {
            eprintln!();
            eprintln!("  Failed after {succeeded} documents: {message}");
        }
    }
}
