//! Template discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use formfill_core::Template;
use tracing::{info, warn};

use crate::StoreError;
use crate::format::DocumentFormat;

/// Directory names searched for the template, in order.
pub const TEMPLATE_DIRS: &[&str] = &["template", "模板"];

/// A template together with the file it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub path: PathBuf,
    pub template: Template,
}

/// The first existing template directory under `root`.
pub fn template_dir(root: &Path) -> Result<PathBuf, StoreError> {
    let candidates: Vec<PathBuf> = TEMPLATE_DIRS.iter().map(|d| root.join(d)).collect();
    candidates
        .iter()
        .find(|dir| dir.is_dir())
        .cloned()
        .ok_or(StoreError::TemplateDirMissing(candidates))
}

/// Locate the template file under `root`.
///
/// Files are considered in name order and the first one with the format's
/// extension is used. Extra candidates are logged and ignored.
pub fn discover_template(root: &Path, format: &dyn DocumentFormat) -> Result<PathBuf, StoreError> {
    let dir = template_dir(root)?;
    let extension = format.extension();

    let entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StoreError::io(&dir, e))?.path();
        let is_match = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if is_match {
            matches.push(path);
        }
    }
    matches.sort();

    let mut candidates = matches.into_iter();
    let first = candidates.next().ok_or_else(|| StoreError::NoTemplate {
        dir: dir.clone(),
        extension: extension.to_string(),
    })?;
    let ignored: Vec<PathBuf> = candidates.collect();
    if !ignored.is_empty() {
        warn!(
            chosen = %first.display(),
            ignored = ignored.len(),
            "multiple templates found, using the first"
        );
    }
    Ok(first)
}

/// Read and scan the template at `path`.
pub fn load_template(path: &Path, format: &dyn DocumentFormat) -> Result<Template, StoreError> {
    let document = format.read(path)?;
    let template = Template::new(document);
    info!(
        path = %path.display(),
        identifiers = ?template.identifiers(),
        "loaded template"
    );
    Ok(template)
}

/// Discover then load the template under `root`.
pub fn open_template(root: &Path, format: &dyn DocumentFormat) -> Result<LoadedTemplate, StoreError> {
    let path = discover_template(root, format)?;
    let template = load_template(&path, format)?;
    Ok(LoadedTemplate { path, template })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::JsonFormat;
    use formfill_core::{Block, Document, Paragraph, Run};

    fn write_doc(path: &Path, text: &str) {
        let doc = Document::new(vec![Block::Paragraph(Paragraph::new(vec![Run::plain(text)]))]);
        JsonFormat.write(&doc, path).unwrap();
    }

    #[test]
    fn missing_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = discover_template(tmp.path(), &JsonFormat).unwrap_err();
        match err {
            StoreError::TemplateDirMissing(looked) => assert_eq!(looked.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("template")).unwrap();
        fs::write(tmp.path().join("template").join("notes.txt"), "x").unwrap();
        let err = discover_template(tmp.path(), &JsonFormat).unwrap_err();
        assert!(matches!(err, StoreError::NoTemplate { .. }));
    }

    #[test]
    fn falls_back_to_localised_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("模板");
        fs::create_dir(&dir).unwrap();
        write_doc(&dir.join("form.json"), "{{姓名}}");
        let found = discover_template(tmp.path(), &JsonFormat).unwrap();
        assert_eq!(found, dir.join("form.json"));
    }

    #[test]
    fn primary_directory_wins() {
        let tmp = tempfile::TempDir::new().unwrap();
        for d in TEMPLATE_DIRS {
            fs::create_dir(tmp.path().join(d)).unwrap();
            write_doc(&tmp.path().join(d).join("form.json"), "x");
        }
        let found = discover_template(tmp.path(), &JsonFormat).unwrap();
        assert_eq!(found, tmp.path().join("template").join("form.json"));
    }

    #[test]
    fn first_in_name_order_is_used() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("template");
        fs::create_dir(&dir).unwrap();
        write_doc(&dir.join("b.json"), "{{b}}");
        write_doc(&dir.join("a.json"), "{{a}}");
        let loaded = open_template(tmp.path(), &JsonFormat).unwrap();
        assert_eq!(loaded.path, dir.join("a.json"));
        assert!(loaded.template.identifiers().contains("a"));
    }

    #[test]
    fn corrupt_template() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("template");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("form.json"), "[1, 2").unwrap();
        let err = open_template(tmp.path(), &JsonFormat).unwrap_err();
        assert!(matches!(err, StoreError::TemplateParse { .. }));
    }
}
