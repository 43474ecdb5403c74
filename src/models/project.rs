//! The mail project entity and its client records.
//!
//! A [`MailProject`] is one bond-issuance campaign: the issuance
//! parameters plus the client records receiving correspondence. The
//! issuance parameters are immutable after construction; the only later
//! mutation is the one-time attachment of client records.
//!
//! Client records stay in record form (field name to value) rather than
//! becoming a struct of their own: the set of client fields is owned by
//! the field-map configuration, and everything downstream (selection,
//! formatting, merging) operates on records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MailMergeError, Result};
use crate::fieldmap::FieldMap;
use crate::models::value::{CLIENT_CASTS, CastMode, FieldValue, Record, cast_record};
use crate::selector::Criteria;

/// Wire format for dates coming from and going to external files
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// One bond-issuance mail campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailProject {
    /// Campaign identifier
    pub project_id: i64,
    /// Issuer / campaign name
    pub project_name: String,
    /// Bond issuance date
    pub date_issuance: NaiveDate,
    /// Bond maturity date
    pub date_maturity: NaiveDate,
    /// Coupon rate as a decimal fraction (0.12 = 12%)
    pub coupon_rate: f64,
    /// Commercial register number, e.g. "HRA 12345 B"
    pub commercial_register_number: String,
    /// Minimum issue volume
    pub issue_volume_min: i64,
    /// Maximum issue volume
    pub issue_volume_max: i64,
    /// Collateral description
    pub collateral_string: String,
    /// Attached client records, internal field names
    #[serde(default)]
    client_records: Vec<Record>,
}

impl MailProject {
    /// Construct a project from its issuance parameters.
    ///
    /// # Errors
    /// Returns [`MailMergeError::InvalidProject`] if
    /// `issue_volume_min > issue_volume_max`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project_id: i64,
        project_name: impl Into<String>,
        date_issuance: NaiveDate,
        date_maturity: NaiveDate,
        coupon_rate: f64,
        commercial_register_number: impl Into<String>,
        issue_volume_min: i64,
        issue_volume_max: i64,
        collateral_string: impl Into<String>,
    ) -> Result<Self> {
        if issue_volume_min > issue_volume_max {
            return Err(MailMergeError::InvalidProject(format!(
                "issue_volume_min ({issue_volume_min}) exceeds issue_volume_max ({issue_volume_max})"
            )));
        }

        Ok(Self {
            project_id,
            project_name: project_name.into(),
            date_issuance,
            date_maturity,
            coupon_rate,
            commercial_register_number: commercial_register_number.into(),
            issue_volume_min,
            issue_volume_max,
            collateral_string: collateral_string.into(),
            client_records: Vec::new(),
        })
    }

    /// Factory: one project per source row.
    ///
    /// Rows come keyed by external column names; each row is translated to
    /// internal names and turned into one instance. Always returns a
    /// sequence, even for a single row; callers index.
    ///
    /// # Errors
    /// Propagates translation errors (schema mismatch) and typed-field
    /// extraction failures.
    pub fn from_records(rows: &[Record], field_map: &FieldMap) -> Result<Vec<Self>> {
        let mut projects = Vec::with_capacity(rows.len());

        for row in rows {
            let record = field_map.to_internal(row)?;
            projects.push(Self::from_internal_record(&record)?);
        }

        log::info!("created {} project(s) from source rows", projects.len());
        Ok(projects)
    }

    /// Build one project from a record already keyed by internal names.
    ///
    /// # Errors
    /// Returns [`MailMergeError::UnknownField`] for missing fields,
    /// [`MailMergeError::Cast`] for non-numeric values in numeric fields,
    /// and date parse errors for malformed `DD.MM.YYYY` strings.
    pub fn from_internal_record(record: &Record) -> Result<Self> {
        Self::new(
            get_i64(record, "project_id")?,
            get_text(record, "project_name")?,
            get_date(record, "date_issuance")?,
            get_date(record, "date_maturity")?,
            get_f64(record, "coupon_rate")?,
            get_text(record, "commercial_register_number")?,
            get_i64(record, "issue_volume_min")?,
            get_i64(record, "issue_volume_max")?,
            get_text(record, "collateral_string")?,
        )
    }

    /// Attach client records from source rows, translating each row to
    /// internal names and recasting the numeric client fields according to
    /// `cast_mode`.
    ///
    /// A project is populated at most once.
    ///
    /// # Errors
    /// Returns [`MailMergeError::AlreadyPopulated`] (before any mutation)
    /// if records were attached earlier; propagates translation and
    /// strict-mode cast errors.
    pub fn attach_client_records(
        &mut self,
        rows: &[Record],
        field_map: &FieldMap,
        cast_mode: CastMode,
    ) -> Result<()> {
        if !self.client_records.is_empty() {
            return Err(MailMergeError::AlreadyPopulated);
        }

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = field_map.to_internal(row)?;
            cast_record(&mut record, CLIENT_CASTS, cast_mode)?;
            records.push(record);
        }

        log::info!(
            "attached {} client record(s) to project {}",
            records.len(),
            self.project_id
        );
        self.client_records = records;
        Ok(())
    }

    /// The attached client records, in source order
    #[must_use]
    pub fn client_records(&self) -> &[Record] {
        &self.client_records
    }

    /// Select the client records satisfying every criterion.
    ///
    /// # Errors
    /// Returns a schema mismatch error if a criterion names a field a
    /// client record does not carry.
    pub fn select_clients(&self, criteria: &Criteria) -> Result<Vec<&Record>> {
        crate::selector::select_clients(&self.client_records, criteria)
    }
}

impl std::fmt::Display for MailProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Project ID ({}): {}, issuance {}, maturity {}",
            self.project_id,
            self.project_name,
            self.date_issuance.format(DATE_FORMAT),
            self.date_maturity.format(DATE_FORMAT)
        )
    }
}

/// Extract a required field, erroring on absence
fn get_value<'a>(record: &'a Record, field: &str) -> Result<&'a FieldValue> {
    record.get(field).ok_or_else(|| MailMergeError::UnknownField {
        field: field.to_string(),
        context: "project record".to_string(),
    })
}

fn get_text(record: &Record, field: &str) -> Result<String> {
    Ok(get_value(record, field)?.to_display_string())
}

fn get_i64(record: &Record, field: &str) -> Result<i64> {
    let value = get_value(record, field)?;
    value.as_i64().ok_or_else(|| MailMergeError::Cast {
        field: field.to_string(),
        value: value.to_display_string(),
        expected: "integer".to_string(),
    })
}

fn get_f64(record: &Record, field: &str) -> Result<f64> {
    let value = get_value(record, field)?;
    value.as_f64().ok_or_else(|| MailMergeError::Cast {
        field: field.to_string(),
        value: value.to_display_string(),
        expected: "float".to_string(),
    })
}

fn get_date(record: &Record, field: &str) -> Result<NaiveDate> {
    let value = get_value(record, field)?;
    match value {
        FieldValue::Text(s) => Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?),
        other => Err(MailMergeError::Cast {
            field: field.to_string(),
            value: other.to_display_string(),
            expected: "date (DD.MM.YYYY)".to_string(),
        }),
    }
}
