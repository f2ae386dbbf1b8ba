//! Field-name configuration files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use formfill_core::FieldNames;
use tracing::info;

use crate::StoreError;

/// Load field names from a JSON file. Keys left out keep their defaults.
pub fn load_field_names(path: &Path) -> Result<FieldNames, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let names: FieldNames = serde_json::from_reader(BufReader::new(file))?;
    info!(path = %path.display(), key = %names.key, "loaded field names");
    Ok(names)
}

/// Field names from `path` when given, defaults otherwise.
pub fn field_names_or_default(path: Option<&Path>) -> Result<FieldNames, StoreError> {
    match path {
        Some(p) => load_field_names(p),
        None => Ok(FieldNames::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn overrides_selected_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fields.json");
        fs::write(&path, r#"{ "key": "transfer_no", "date_sources": ["submitted"] }"#).unwrap();
        let names = load_field_names(&path).unwrap();
        assert_eq!(names.key, "transfer_no");
        assert_eq!(names.date_sources, ["submitted"]);
        assert_eq!(names.id, FieldNames::default().id);
    }

    #[test]
    fn defaults_without_path() {
        assert_eq!(field_names_or_default(None).unwrap(), FieldNames::default());
    }

    #[test]
    fn invalid_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fields.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(load_field_names(&path), Err(StoreError::Json(_))));
    }
}
