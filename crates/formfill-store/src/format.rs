//! Document container codec.
//!
//! The rest of the workspace only sees [`Document`]. A container format
//! knows its file extension and how to read and write that model.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use formfill_core::Document;
use tracing::debug;

use crate::StoreError;

pub trait DocumentFormat: Send + Sync {
    /// Extension without the leading dot.
    fn extension(&self) -> &str;

    fn read(&self, path: &Path) -> Result<Document, StoreError>;

    fn write(&self, document: &Document, path: &Path) -> Result<(), StoreError>;
}

/// Documents stored as JSON: a `body` of tagged paragraph and table blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl DocumentFormat for JsonFormat {
    fn extension(&self) -> &str {
        "json"
    }

    fn read(&self, path: &Path) -> Result<Document, StoreError> {
        let file = fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::TemplateParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn write(&self, document: &Document, path: &Path) -> Result<(), StoreError> {
        let file = fs::File::create(path).map_err(|e| StoreError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush().map_err(|e| StoreError::io(path, e))?;
        debug!(path = %path.display(), "wrote document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfill_core::{Block, Paragraph, Run};

    #[test]
    fn write_then_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("doc.json");
        let doc = Document::new(vec![Block::Paragraph(Paragraph::new(vec![
            Run::plain("{{a"),
            Run::plain("}}"),
        ]))]);
        JsonFormat.write(&doc, &path).unwrap();
        assert_eq!(JsonFormat.read(&path).unwrap(), doc);
    }

    #[test]
    fn corrupt_file_is_template_parse_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonFormat.read(&path).unwrap_err();
        assert!(matches!(err, StoreError::TemplateParse { .. }));
    }

    #[test]
    fn write_into_missing_directory_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("doc.json");
        let err = JsonFormat.write(&Document::default(), &path).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
