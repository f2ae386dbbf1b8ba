//! Field-name configuration.
//!
//! Input sheets name their columns in the language of the form being
//! produced. The defaults match the student transfer form the tool was built
//! for; any of them can be overridden from a JSON file where missing keys
//! keep their default.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ID_FIELD: &str = "学号";
pub const DEFAULT_NAME_FIELD: &str = "姓名";
pub const DEFAULT_CATEGORY_FIELD: &str = "班级";
/// The composite identifier. Always derived, never requested from the user.
pub const DEFAULT_KEY_FIELD: &str = "转档字号";
pub const DEFAULT_YEAR_FIELD: &str = "年";
pub const DEFAULT_MONTH_FIELD: &str = "月";
pub const DEFAULT_DAY_FIELD: &str = "日";

/// Recognised date source columns, highest priority first.
pub const DEFAULT_DATE_SOURCES: &[&str] = &[
    "提交日期",
    "提交时间",
    "日期",
    "时间",
    "创建时间",
    "更新时间",
];

/// Names of the fields the derivation engine and output naming rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Identifier field (student number). Input to the composite key.
    pub id: String,
    /// Display name, used for status labels and output names.
    pub name: String,
    /// Category field (class). Input to the composite key.
    pub category: String,
    /// Reserved composite identifier field.
    pub key: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub date_sources: Vec<String>,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID_FIELD.to_string(),
            name: DEFAULT_NAME_FIELD.to_string(),
            category: DEFAULT_CATEGORY_FIELD.to_string(),
            key: DEFAULT_KEY_FIELD.to_string(),
            year: DEFAULT_YEAR_FIELD.to_string(),
            month: DEFAULT_MONTH_FIELD.to_string(),
            day: DEFAULT_DAY_FIELD.to_string(),
            date_sources: DEFAULT_DATE_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FieldNames {
    /// Whether `field` is one of the three composite key inputs.
    pub fn is_key_input(&self, field: &str) -> bool {
        field == self.year || field == self.id || field == self.category
    }

    /// Whether `field` is computed by the system and never prompted for.
    pub fn is_system_derived(&self, field: &str) -> bool {
        field == self.key
    }
}
