//! Business formatting of client and project records.
//!
//! The template merge engine strips surrounding whitespace around every
//! inserted value and only accepts strings, so all visual spacing has to
//! be baked into the values here: the title is folded into the first name
//! and salutation with explicit separators, the mailing street gets a
//! trailing newline to force a line break before zip/city, and every
//! value leaves this module as its display string.
//!
//! Number rendering follows the German convention throughout: thousands
//! separated by `.`, decimals by `,` (`50000` -> `50.000,00`, coupon rate
//! `0.12` -> `12,00`).

use crate::models::MailProject;
use crate::models::value::{FieldValue, Record};

/// Fixed-width stand-in printed when no subscription amount was entered,
/// leaving a blank of consistent width for a handwritten entry
pub const AMOUNT_EMPTY_PLACEHOLDER: &str = "____________________";

/// Field consumed for folder placement only; never a template placeholder
pub const ADVISOR_FIELD: &str = "advisor";

/// Apply the client formatting rules and return a fully stringified copy.
///
/// Rules, in order:
/// 1. A non-empty title is folded into the first name
///    (`"Dr." + " " + "Jane"`) and appended to the salutation; the title
///    field itself becomes empty.
/// 2. The mailing street gets a trailing newline unless it already ends
///    with one.
/// 3. A present, non-zero amount is rendered in the German convention
///    with two fraction digits; an empty or zero amount becomes
///    [`AMOUNT_EMPTY_PLACEHOLDER`].
/// 4. Every value is cast to its display string.
///
/// Rules only touch fields the record actually carries. The input record
/// is not mutated, and the formatter is a no-op on its own output: the
/// title is empty after folding and a formatted amount is no longer
/// numeric, so no rule fires twice.
#[must_use]
pub fn format_client_record(record: &Record) -> Record {
    let mut out = record.clone();

    // Rule 1: fold the title into first name and salutation.
    let title = out
        .get("title")
        .map(FieldValue::to_display_string)
        .unwrap_or_default();
    if !title.is_empty() {
        if let Some(first_name) = out.get("first_name") {
            let folded = format!("{title} {}", first_name.to_display_string());
            out.insert("first_name".to_string(), FieldValue::Text(folded));
        }
        if let Some(salutation) = out.get("salutation") {
            let folded = format!("{} {title}", salutation.to_display_string());
            out.insert("salutation".to_string(), FieldValue::Text(folded));
        }
        out.insert("title".to_string(), FieldValue::Text(String::new()));
    }

    // Rule 2: line break between street and zip/city in the rendered letter.
    if let Some(street) = out.get("address_mailing_street") {
        let street = street.to_display_string();
        if !street.ends_with('\n') {
            out.insert(
                "address_mailing_street".to_string(),
                FieldValue::Text(format!("{street}\n")),
            );
        }
    }

    // Rule 3: amount rendering or handwriting placeholder.
    if let Some(amount) = out.get("amount") {
        let formatted = match amount.as_f64() {
            Some(value) if value != 0.0 => format_amount(value),
            Some(_) => AMOUNT_EMPTY_PLACEHOLDER.to_string(),
            None if amount.is_empty() => AMOUNT_EMPTY_PLACEHOLDER.to_string(),
            None => {
                // Best-effort cast left a non-numeric value; keep it
                // verbatim rather than hiding it behind the placeholder.
                log::debug!("non-numeric amount left unformatted: {amount:?}");
                amount.to_display_string()
            }
        };
        out.insert("amount".to_string(), FieldValue::Text(formatted));
    }

    // Rule 4: the merge engine only accepts strings.
    stringify(&mut out);
    out
}

/// Build the template-ready project record, internal field names, all
/// values stringified. The coupon rate is converted from a decimal
/// fraction to a percentage with two fraction digits and a comma decimal
/// separator. Attached client records never appear here.
#[must_use]
pub fn format_project_record(project: &MailProject) -> Record {
    let mut record = Record::new();
    record.insert(
        "project_id".to_string(),
        FieldValue::Text(project.project_id.to_string()),
    );
    record.insert(
        "project_name".to_string(),
        FieldValue::Text(project.project_name.clone()),
    );
    record.insert(
        "date_issuance".to_string(),
        FieldValue::Text(
            project
                .date_issuance
                .format(crate::models::DATE_FORMAT)
                .to_string(),
        ),
    );
    record.insert(
        "date_maturity".to_string(),
        FieldValue::Text(
            project
                .date_maturity
                .format(crate::models::DATE_FORMAT)
                .to_string(),
        ),
    );
    record.insert(
        "coupon_rate".to_string(),
        FieldValue::Text(format_coupon_rate(project.coupon_rate)),
    );
    record.insert(
        "commercial_register_number".to_string(),
        FieldValue::Text(project.commercial_register_number.clone()),
    );
    record.insert(
        "issue_volume_min".to_string(),
        FieldValue::Text(project.issue_volume_min.to_string()),
    );
    record.insert(
        "issue_volume_max".to_string(),
        FieldValue::Text(project.issue_volume_max.to_string()),
    );
    record.insert(
        "collateral_string".to_string(),
        FieldValue::Text(project.collateral_string.clone()),
    );
    record
}

/// Render an amount in the German convention: `50000` -> `"50.000,00"`
#[must_use]
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed
        .split_once('.')
        .unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    let digits: Vec<char> = integer.chars().collect();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped},{fraction}")
}

/// Render a decimal coupon rate as a percentage: `0.12` -> `"12,00"`
#[must_use]
pub fn format_coupon_rate(rate: f64) -> String {
    format!("{:.2}", rate * 100.0).replace('.', ",")
}

/// Cast every value of a record to its display string, in place
fn stringify(record: &mut Record) {
    for value in record.values_mut() {
        if !matches!(value, FieldValue::Text(_)) {
            *value = FieldValue::Text(value.to_display_string());
        }
    }
}
