use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("template directory not found (looked for {0:?})")]
    TemplateDirMissing(Vec<PathBuf>),

    #[error("no .{extension} template in {dir}")]
    NoTemplate { dir: PathBuf, extension: String },

    #[error("cannot read template {path}: {reason}")]
    TemplateParse { path: PathBuf, reason: String },

    #[error("cannot import records from {path}: {reason}")]
    SourceData { path: PathBuf, reason: String },

    #[error("unsupported data file {0}: expected .csv or .json")]
    UnsupportedSource(PathBuf),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
