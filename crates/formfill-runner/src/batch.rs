//! Sequential batch rendering.
//!
//! Records are rendered one at a time into fresh copies of the template and
//! written to the output directory. The first failure stops the batch:
//! documents already written stay on disk and the count so far is reported
//! with the error.

use std::fs;
use std::path::{Path, PathBuf};

use formfill_core::{FieldNames, Record, Template, output_file_name, record_label};
use formfill_store::{DocumentFormat, StoreError};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record {index} ({label}): {source}")]
    Persist {
        index: usize,
        label: String,
        #[source]
        source: StoreError,
    },
}

/// A batch that stopped early.
#[derive(Debug, Error)]
#[error("batch stopped after {succeeded} of {total} documents: {error}")]
pub struct BatchFailure {
    pub succeeded: usize,
    pub total: usize,
    #[source]
    pub error: RenderError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub outputs: Vec<PathBuf>,
}

/// Completed fraction of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Whole percent, 100 for an empty batch.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.completed * 100 / self.total) as u8
    }
}

/// One-way notifications from the batch to its observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started { total: usize },
    /// About to render record `index` (1-based).
    Status { index: usize, label: String },
    Progress(Progress),
    Finished { succeeded: usize },
    Failed { succeeded: usize, message: String },
}

/// Everything a batch needs besides the records.
pub struct BatchContext<'a> {
    pub template: &'a Template,
    pub output_dir: &'a Path,
    pub format: &'a dyn DocumentFormat,
    pub fields: &'a FieldNames,
}

fn abort(
    succeeded: usize,
    total: usize,
    error: RenderError,
    notify: &mut impl FnMut(BatchEvent),
) -> BatchFailure {
    error!(succeeded, total, %error, "batch aborted");
    notify(BatchEvent::Failed {
        succeeded,
        message: error.to_string(),
    });
    BatchFailure {
        succeeded,
        total,
        error,
    }
}

/// Render and persist a single record. Returns the written path.
pub fn render_one(ctx: &BatchContext<'_>, record: &Record) -> Result<PathBuf, StoreError> {
    let document = ctx.template.render(record);
    let path = ctx
        .output_dir
        .join(output_file_name(record, ctx.fields, ctx.format.extension()));
    ctx.format.write(&document, &path)?;
    Ok(path)
}

/// Render every record in order, notifying `notify` as the batch advances.
pub fn run_batch(
    records: &[Record],
    ctx: &BatchContext<'_>,
    mut notify: impl FnMut(BatchEvent),
) -> Result<BatchReport, BatchFailure> {
    let total = records.len();
    notify(BatchEvent::Started { total });

    if let Err(source) = fs::create_dir_all(ctx.output_dir) {
        let error = RenderError::OutputDir {
            path: ctx.output_dir.to_path_buf(),
            source,
        };
        return Err(abort(0, total, error, &mut notify));
    }

    let mut outputs = Vec::with_capacity(total);
    for (i, record) in records.iter().enumerate() {
        let index = i + 1;
        let label = record_label(record, ctx.fields).to_string();
        notify(BatchEvent::Status {
            index,
            label: label.clone(),
        });

        match render_one(ctx, record) {
            Ok(path) => {
                info!(index, label = %label, path = %path.display(), "generated document");
                outputs.push(path);
            }
            Err(source) => {
                let error = RenderError::Persist {
                    index,
                    label,
                    source,
                };
                return Err(abort(outputs.len(), total, error, &mut notify));
            }
        }

        notify(BatchEvent::Progress(Progress {
            completed: index,
            total,
        }));
    }

    let succeeded = outputs.len();
    info!(succeeded, "batch finished");
    notify(BatchEvent::Finished { succeeded });
    Ok(BatchReport { succeeded, outputs })
}
