//! JSON-workbook table reader.
//!
//! A thin [`TableReader`] over a JSON file shaped like a workbook:
//!
//! ```json
//! { "client_data": [ { "db_id": 1, "vorname": "John1" } ] }
//! ```
//!
//! Used by the driver binary; the production spreadsheet reader is an
//! external collaborator with the same contract. Normalizations per that
//! contract: only requested columns are kept, a requested column missing
//! from a row is a configuration error, and absent/null cells become
//! empty text. Dates are expected as `DD.MM.YYYY` strings already.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{MailMergeError, Result};
use crate::models::value::{FieldValue, Record};
use crate::pipeline::collaborators::TableReader;

/// Reads rows from a JSON workbook file
#[derive(Debug, Clone, Default)]
pub struct JsonTableReader;

impl JsonTableReader {
    fn cell_to_value(cell: &Value) -> FieldValue {
        match cell {
            Value::Null => FieldValue::Text(String::new()),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => n.as_i64().map_or_else(
                || FieldValue::Float(n.as_f64().unwrap_or_default()),
                FieldValue::Integer,
            ),
            Value::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl TableReader for JsonTableReader {
    fn read(&self, source: &Path, sheet: &str, columns: &[&str]) -> Result<Vec<Record>> {
        let content = fs::read_to_string(source)?;
        let workbook: BTreeMap<String, Vec<BTreeMap<String, Value>>> =
            serde_json::from_str(&content)
                .map_err(|e| MailMergeError::Source(format!("malformed workbook: {e}")))?;

        let rows = workbook.get(sheet).ok_or_else(|| {
            MailMergeError::Source(format!("sheet '{sheet}' not found in {}", source.display()))
        })?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = Record::new();
            for column in columns {
                let cell = row.get(*column).ok_or_else(|| MailMergeError::MissingColumn {
                    column: (*column).to_string(),
                    sheet: sheet.to_string(),
                })?;
                record.insert((*column).to_string(), Self::cell_to_value(cell));
            }
            records.push(record);
        }

        log::info!(
            "read {} row(s) from sheet '{sheet}' of {}",
            records.len(),
            source.display()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_normalization() {
        assert_eq!(
            JsonTableReader::cell_to_value(&Value::Null),
            FieldValue::Text(String::new())
        );
        assert_eq!(
            JsonTableReader::cell_to_value(&serde_json::json!(50000)),
            FieldValue::Integer(50000)
        );
        assert_eq!(
            JsonTableReader::cell_to_value(&serde_json::json!(0.12)),
            FieldValue::Float(0.12)
        );
        assert_eq!(
            JsonTableReader::cell_to_value(&serde_json::json!("30.06.2019")),
            FieldValue::Text("30.06.2019".to_string())
        );
    }
}
