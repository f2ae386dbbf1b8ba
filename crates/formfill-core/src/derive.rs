//! Field derivation: calendar fields from a submission timestamp and the
//! composite transfer key.
//!
//! Derived fields are never authoritative. They are recomputed whenever an
//! input changes, and a failed date parse leaves the record as it was.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::{debug, warn};

use crate::fields::FieldNames;
use crate::record::{Record, is_blank};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("no '/' or '-' separator in {0:?}")]
    NoSeparator(String),
    #[error("expected three date parts in {input:?}, found {found}")]
    PartCount { input: String, found: usize },
    #[error("empty date part in {0:?}")]
    EmptyPart(String),
}

/// Year, month and day as they will be stored in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl DateParts {
    /// Parts for a calendar date, with the full four-digit year.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year().to_string(),
            month: date.month().to_string(),
            day: date.day().to_string(),
        }
    }

    /// Write the parts into the record's year, month and day fields.
    pub fn apply(&self, record: &mut Record, fields: &FieldNames) {
        record.set(fields.year.as_str(), self.year.as_str());
        record.set(fields.month.as_str(), self.month.as_str());
        record.set(fields.day.as_str(), self.day.as_str());
    }
}

/// Value of an ASCII or full-width decimal digit.
fn decimal_digit(c: char) -> Option<u32> {
    c.to_digit(10).or_else(|| {
        ('\u{FF10}'..='\u{FF19}')
            .contains(&c)
            .then(|| c as u32 - 0xFF10)
    })
}

/// Normalize a purely numeric part to ASCII without leading zeros; anything
/// else is kept.
fn strip_leading_zeros(part: &str) -> String {
    let digits: Option<String> = part
        .chars()
        .map(|c| decimal_digit(c).and_then(|d| char::from_digit(d, 10)))
        .collect();
    match digits {
        Some(digits) if !digits.is_empty() => {
            let trimmed = digits.trim_start_matches('0');
            if trimmed.is_empty() {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        }
        _ => part.to_string(),
    }
}

/// Split `YYYY/M/D` or `YYYY-M-D`, with an optional ` time` suffix.
///
/// The year is kept exactly as written. Month and day lose leading zeros
/// when numeric.
pub fn parse_date(input: &str) -> Result<DateParts, DateError> {
    let trimmed = input.trim();
    let date = trimmed.split(' ').next().unwrap_or(trimmed);

    let separator = ['/', '-']
        .into_iter()
        .find(|sep| date.contains(*sep))
        .ok_or_else(|| DateError::NoSeparator(date.to_string()))?;

    let parts: Vec<&str> = date.split(separator).map(str::trim).collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(DateError::PartCount {
            input: date.to_string(),
            found: parts.len(),
        });
    };
    if parts.iter().any(|p| p.is_empty()) {
        return Err(DateError::EmptyPart(date.to_string()));
    }

    Ok(DateParts {
        year: year.to_string(),
        month: strip_leading_zeros(month),
        day: strip_leading_zeros(day),
    })
}

/// Outcome of looking for and parsing a date source field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateDerivation {
    /// No recognised source field carried a value.
    NoSource,
    /// Year, month and day were written from `source`.
    Derived { source: String, parts: DateParts },
    /// The source value could not be parsed; the record is unchanged.
    Unparseable { source: String, error: DateError },
}

/// Fill year, month and day from the first non-blank date source field.
///
/// Sources are tried in priority order. An unparseable value is logged and
/// otherwise ignored.
pub fn derive_date(record: &mut Record, fields: &FieldNames) -> DateDerivation {
    let Some((source, value)) = fields
        .date_sources
        .iter()
        .find_map(|name| record.filled(name).map(|v| (name.clone(), v.to_string())))
    else {
        debug!("no date source field present");
        return DateDerivation::NoSource;
    };

    match parse_date(&value) {
        Ok(parts) => {
            parts.apply(record, fields);
            debug!(
                source = %source,
                year = %parts.year,
                month = %parts.month,
                day = %parts.day,
                "derived date fields"
            );
            DateDerivation::Derived { source, parts }
        }
        Err(error) => {
            warn!(source = %source, value = %value, %error, "could not derive date fields");
            DateDerivation::Unparseable { source, error }
        }
    }
}

/// Compute the composite key: last two characters of the year, the
/// identifier, `_`, then the category.
///
/// A year shorter than two characters is used whole.
pub fn composite_key(year: &str, id: &str, category: &str) -> String {
    let chars: Vec<char> = year.chars().collect();
    let suffix: String = chars[chars.len().saturating_sub(2)..].iter().collect();
    format!("{suffix}{id}_{category}")
}

/// Store the composite key when year, identifier and category are all
/// filled. Returns the key that was stored, if any.
///
/// Depends on nothing but those three fields, so calling it again with the
/// same inputs leaves the record untouched.
pub fn derive_key(record: &mut Record, fields: &FieldNames) -> Option<String> {
    let year = record.filled(&fields.year)?.trim();
    let id = record.filled(&fields.id)?.trim();
    let category = record.filled(&fields.category)?.trim();
    let key = composite_key(year, id, category);
    record.set(fields.key.as_str(), key.as_str());
    debug!(key = %key, "derived composite key");
    Some(key)
}

/// Run every derivation in dependency order: date first, then the key.
pub fn derive_all(record: &mut Record, fields: &FieldNames) -> DateDerivation {
    let date = derive_date(record, fields);
    derive_key(record, fields);
    date
}

/// Fill year, month and day from `today` unless they are already filled.
///
/// Used for manually entered records that carry no submission timestamp.
pub fn fill_date_if_blank(record: &mut Record, fields: &FieldNames, today: NaiveDate) -> bool {
    let all_blank = [&fields.year, &fields.month, &fields.day]
        .iter()
        .all(|f| record.get(f).is_none_or(is_blank));
    if all_blank {
        DateParts::from_date(today).apply(record, fields);
    }
    all_blank
}
