//! Storage layer: template discovery, document container codec, record import.

mod error;
pub use error::StoreError;

pub mod config;
pub mod format;
pub mod import;
pub mod template;

pub use config::{field_names_or_default, load_field_names};
pub use format::{DocumentFormat, JsonFormat};
pub use import::read_records;
pub use template::{LoadedTemplate, discover_template, load_template, open_template};
