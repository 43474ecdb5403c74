//! Scalar field values and cast handling.
//!
//! Source rows arrive as loosely typed cells. `FieldValue` is the common
//! scalar currency of the pipeline: records are maps from field name to
//! `FieldValue`, and the formatter's final pass casts every value to its
//! display string because the template merge engine only accepts strings.
//!
//! Depot identifiers (`depot_no`, `depot_bic`) stay `Text` even when they
//! look numeric, to preserve leading zeros and formatting.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MailMergeError, Result};

/// One cell value from the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag (authorization, email preference)
    Bool(bool),
    /// Integral value (identifiers, volumes, whole amounts)
    Integer(i64),
    /// Floating point value (amounts, rates)
    Float(f64),
    /// Free text; also the normal form of empty cells (`Text("")`)
    Text(String),
    /// Explicitly absent value
    Empty,
}

impl FieldValue {
    /// Whether the value counts as empty for formatting purposes.
    ///
    /// Empty cells from the table reader normalize to `Text("")`, so both
    /// that form and `Empty` are treated as absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Whether the value is numeric (integer or float)
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    /// The display string handed to the template merge engine.
    ///
    /// Floats that carry no fractional part render without one, matching
    /// how whole numbers come out of spreadsheet cells.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Empty => String::new(),
        }
    }

    /// Interpret the value as a number, if possible
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Interpret the value as an integer, if possible
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Borrow the value as text, if it is text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A row record keyed by field name.
///
/// `BTreeMap` keeps iteration deterministic, which matters for rendering
/// and for test assertions.
pub type Record = BTreeMap<String, FieldValue>;

/// A translated, all-string record ready for the template merge engine
pub type MergeRecord = BTreeMap<String, String>;

/// How cast failures during record loading are handled.
///
/// Replaces the original silent/strict boolean toggle with an explicit
/// mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CastMode {
    /// A failed cast is an error
    Strict,
    /// A failed cast leaves the value unconverted
    #[default]
    BestEffort,
}

/// Target type of a post-load recast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastTarget {
    /// Coerce to `Integer`
    Integer,
    /// Coerce to `Float`
    Float,
}

/// Post-load conversions for client records: the data source delivers some
/// numeric columns as text, and comparisons as well as amount formatting
/// need them numeric. Depot fields are deliberately not listed.
pub const CLIENT_CASTS: &[(&str, CastTarget)] = &[
    ("client_id", CastTarget::Integer),
    ("amount", CastTarget::Float),
];

/// Recast selected fields of a record in place, according to `mode`.
///
/// Empty values are left untouched in either mode: an empty amount is a
/// legitimate state (the formatter substitutes a placeholder) rather than
/// a coercion failure. Fields absent from the record are skipped.
///
/// # Errors
/// In `Strict` mode, returns [`MailMergeError::Cast`] for the first value
/// that cannot be coerced.
pub fn cast_record(record: &mut Record, casts: &[(&str, CastTarget)], mode: CastMode) -> Result<()> {
    for (field, target) in casts {
        let Some(value) = record.get(*field) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        match cast_value(value, *target) {
            Some(cast) => {
                record.insert((*field).to_string(), cast);
            }
            None => match mode {
                CastMode::BestEffort => {
                    log::debug!("leaving field '{field}' unconverted: {value:?}");
                }
                CastMode::Strict => {
                    return Err(MailMergeError::Cast {
                        field: (*field).to_string(),
                        value: value.to_display_string(),
                        expected: match target {
                            CastTarget::Integer => "integer".to_string(),
                            CastTarget::Float => "float".to_string(),
                        },
                    });
                }
            },
        }
    }
    Ok(())
}

fn cast_value(value: &FieldValue, target: CastTarget) -> Option<FieldValue> {
    match target {
        CastTarget::Integer => match value {
            FieldValue::Integer(_) => Some(value.clone()),
            FieldValue::Float(f) if f.fract() == 0.0 => Some(FieldValue::Integer(*f as i64)),
            FieldValue::Text(s) => s.trim().parse::<i64>().ok().map(FieldValue::Integer),
            _ => None,
        },
        CastTarget::Float => match value {
            FieldValue::Float(_) => Some(value.clone()),
            FieldValue::Integer(i) => Some(FieldValue::Float(*i as f64)),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().map(FieldValue::Float),
            _ => None,
        },
    }
}
