//! Generation pipeline: load template → import → prepare → render in the
//! background while reporting progress.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use formfill_core::{DeclineChoice, FieldForm, FieldNames, Record, derive::fill_date_if_blank};
use formfill_runner::{
    BatchContext, BatchJob, BatchReport, Prepared, Row, prepare, run_batch, select_rows,
    spawn_batch,
};
use formfill_store::{JsonFormat, LoadedTemplate, open_template, read_records};
use tracing::info;

use crate::display;
use crate::form::{MissingPolicy, PolicyForm, PromptForm};

pub struct GenerateArgs<'a> {
    pub root: &'a Path,
    pub data: &'a Path,
    pub output: PathBuf,
    pub rows: Option<&'a [usize]>,
    pub policy: MissingPolicy,
    pub fields: FieldNames,
}

/// Load the template under `root`. Fails before any record is touched.
pub fn load_template(root: &Path) -> anyhow::Result<LoadedTemplate> {
    let loaded = open_template(root, &JsonFormat)
        .with_context(|| format!("loading template under {}", root.display()))?;
    eprintln!(
        "  Template {} ({} fields)",
        loaded.path.display(),
        loaded.template.identifiers().len()
    );
    Ok(loaded)
}

fn prepare_with_policy(
    rows: Vec<Row>,
    loaded: &LoadedTemplate,
    fields: &FieldNames,
    policy: MissingPolicy,
) -> anyhow::Result<Prepared> {
    let mut form: Box<dyn FieldForm> = match policy {
        MissingPolicy::Ask => Box::new(PromptForm::new(io::stdin().lock(), io::stderr())),
        MissingPolicy::Skip => Box::new(PolicyForm(DeclineChoice::Skip)),
        MissingPolicy::Blank => Box::new(PolicyForm(DeclineChoice::ProceedBlank)),
    };
    let prepared = prepare(rows, &loaded.template, fields, form.as_mut())?;
    if !prepared.skipped.is_empty() {
        eprintln!("  Skipped rows: {:?}", prepared.skipped);
    }
    if prepared.queue.is_empty() {
        bail!("nothing to generate");
    }
    Ok(prepared)
}

/// Batch generation from a data file.
pub async fn run_generate(args: GenerateArgs<'_>) -> anyhow::Result<BatchReport> {
    let loaded = load_template(args.root)?;
    let records = read_records(args.data)
        .with_context(|| format!("importing records from {}", args.data.display()))?;
    let rows = select_rows(records, args.rows)?;
    let prepared = prepare_with_policy(rows, &loaded, &args.fields, args.policy)?;

    info!(count = prepared.queue.len(), output = %args.output.display(), "starting batch");
    let mut handle = spawn_batch(BatchJob {
        records: prepared.queue,
        template: Arc::new(loaded.template),
        output_dir: args.output,
        format: Arc::new(JsonFormat),
        fields: args.fields,
    });
    while let Some(event) = handle.next_event().await {
        display::print_event(&event);
    }
    let report = handle.finish().await.context("batch worker stopped unexpectedly")??;
    Ok(report)
}

/// Print derived fields and missing fields per row without writing.
pub fn run_preview(
    root: &Path,
    data: &Path,
    rows: Option<&[usize]>,
    fields: &FieldNames,
) -> anyhow::Result<()> {
    let loaded = load_template(root)?;
    let records = read_records(data)
        .with_context(|| format!("importing records from {}", data.display()))?;
    for mut row in select_rows(records, rows)? {
        formfill_core::derive_all(&mut row.record, fields);
        display::print_preview_card(&row, loaded.template.identifiers(), fields);
    }
    Ok(())
}

pub struct SingleArgs<'a> {
    pub root: &'a Path,
    pub values: Vec<(String, String)>,
    pub today: bool,
    pub output: PathBuf,
    pub policy: MissingPolicy,
    pub fields: FieldNames,
}

/// Generate one document from values given on the command line.
pub fn run_single(args: SingleArgs<'_>) -> anyhow::Result<PathBuf> {
    let loaded = load_template(args.root)?;
    let mut record: Record = args.values.into_iter().collect();
    if args.today {
        let today = chrono::Local::now().date_naive();
        fill_date_if_blank(&mut record, &args.fields, today);
    }

    let rows = vec![Row { number: 1, record }];
    let prepared = prepare_with_policy(rows, &loaded, &args.fields, args.policy)?;
    let ctx = BatchContext {
        template: &loaded.template,
        output_dir: &args.output,
        format: &JsonFormat,
        fields: &args.fields,
    };
    let report = run_batch(&prepared.queue, &ctx, |event| display::print_event(&event))?;
    report
        .outputs
        .into_iter()
        .next()
        .context("no document was written")
}
