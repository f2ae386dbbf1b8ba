//! Runtime: record preparation, sequential batch rendering, background worker.

pub mod batch;
pub mod prepare;
pub mod worker;

pub use batch::{
    BatchContext, BatchEvent, BatchFailure, BatchReport, Progress, RenderError, render_one,
    run_batch,
};
pub use prepare::{PrepareError, Prepared, Row, prepare, select_rows};
pub use worker::{BatchHandle, BatchJob, spawn_batch};
