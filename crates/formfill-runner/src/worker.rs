//! Background batch worker.
//!
//! The batch runs on a blocking task; the caller only observes it through
//! the event channel and the final result. Nothing is shared for mutation:
//! the worker owns the records and its counters.

use std::path::PathBuf;
use std::sync::Arc;

use formfill_core::{FieldNames, Record, Template};
use formfill_store::DocumentFormat;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::batch::{BatchContext, BatchEvent, BatchFailure, BatchReport, run_batch};

/// Inputs moved into the worker.
pub struct BatchJob {
    pub records: Vec<Record>,
    pub template: Arc<Template>,
    pub output_dir: PathBuf,
    pub format: Arc<dyn DocumentFormat>,
    pub fields: FieldNames,
}

/// Observer side of a running batch.
pub struct BatchHandle {
    events: mpsc::UnboundedReceiver<BatchEvent>,
    task: JoinHandle<Result<BatchReport, BatchFailure>>,
}

impl BatchHandle {
    /// Next notification, or `None` once the worker has finished.
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Wait for the worker's result.
    pub async fn finish(self) -> Result<Result<BatchReport, BatchFailure>, JoinError> {
        self.task.await
    }
}

/// Start `job` on a blocking worker. Must be called within a tokio runtime.
pub fn spawn_batch(job: BatchJob) -> BatchHandle {
    let (tx, events) = mpsc::unbounded_channel();
    let task = tokio::task::spawn_blocking(move || {
        let ctx = BatchContext {
            template: &job.template,
            output_dir: &job.output_dir,
            format: job.format.as_ref(),
            fields: &job.fields,
        };
        run_batch(&job.records, &ctx, |event| {
            if tx.send(event).is_err() {
                debug!("batch observer dropped");
            }
        })
    });
    BatchHandle { events, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfill_core::{Block, Document, Paragraph, Run};
    use formfill_store::JsonFormat;

    #[tokio::test]
    async fn events_stream_until_finished() {
        let tmp = tempfile::TempDir::new().unwrap();
        let template = Template::new(Document::new(vec![Block::Paragraph(Paragraph::new(
            vec![Run::plain("{{姓名}}")],
        ))]));
        let records: Vec<Record> = ["甲", "乙", "丙"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                [("学号", (i + 1).to_string()), ("姓名", name.to_string())]
                    .into_iter()
                    .collect()
            })
            .collect();

        let mut handle = spawn_batch(BatchJob {
            records,
            template: Arc::new(template),
            output_dir: tmp.path().to_path_buf(),
            format: Arc::new(JsonFormat),
            fields: FieldNames::default(),
        });

        let mut seen = Vec::new();
        while let Some(event) = handle.next_event().await {
            seen.push(event);
        }
        let report = handle.finish().await.unwrap().unwrap();

        assert_eq!(report.succeeded, 3);
        assert_eq!(seen.first(), Some(&BatchEvent::Started { total: 3 }));
        assert_eq!(seen.last(), Some(&BatchEvent::Finished { succeeded: 3 }));
        let progress: Vec<u8> = seen
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Progress(p) => Some(p.percent()),
                _ => None,
            })
            .collect();
        assert_eq!(progress, [33, 66, 100]);
        assert!(tmp.path().join("2_乙_unknown.json").is_file());
    }
}
