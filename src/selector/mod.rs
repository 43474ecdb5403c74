//! Predicate-based client selection.
//!
//! A [`Criteria`] names one predicate per field; a client record is
//! selected when every predicate accepts the record's current value for
//! its field. Empty criteria select every client. Selection is stable,
//! order-preserving and non-mutating.

use rustc_hash::FxHashMap;

use crate::error::{MailMergeError, Result};
use crate::models::value::{FieldValue, Record};

/// A selection predicate over one field value
pub type Predicate = Box<dyn Fn(&FieldValue) -> bool>;

/// Named selection predicates, one per field.
///
/// A field without a criterion is unconstrained (always-true).
#[derive(Default)]
pub struct Criteria {
    predicates: FxHashMap<String, Predicate>,
}

impl Criteria {
    /// An empty criteria set (selects everything)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate for a field, replacing any previous one.
    ///
    /// Builder-style so criteria read as a chain.
    #[must_use]
    pub fn with<F>(mut self, field: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + 'static,
    {
        self.predicates.insert(field.into(), Box::new(predicate));
        self
    }

    /// Number of criteria
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether no criterion is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Whether a record satisfies every criterion.
    ///
    /// # Errors
    /// Returns [`MailMergeError::UnknownField`] if a criterion names a
    /// field the record does not carry; that is configuration drift, not a
    /// non-match.
    pub fn matches(&self, record: &Record) -> Result<bool> {
        for (field, predicate) in &self.predicates {
            let value = record.get(field).ok_or_else(|| MailMergeError::UnknownField {
                field: field.clone(),
                context: "selection criteria".to_string(),
            })?;

            if !predicate(value) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        fields.sort_unstable();
        f.debug_struct("Criteria").field("fields", &fields).finish()
    }
}

/// Return the sub-sequence of clients satisfying every criterion, in the
/// original order. The input is not mutated.
///
/// # Errors
/// Returns a schema mismatch error if a criterion names a field a client
/// record does not carry.
pub fn select_clients<'a>(clients: &'a [Record], criteria: &Criteria) -> Result<Vec<&'a Record>> {
    let mut selected = Vec::new();
    for client in clients {
        if criteria.matches(client)? {
            selected.push(client);
        }
    }

    log::debug!(
        "selected {} of {} client record(s) with {:?}",
        selected.len(),
        clients.len(),
        criteria
    );
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: i64, amount: FieldValue) -> Record {
        let mut record = Record::new();
        record.insert("client_id".to_string(), FieldValue::Integer(id));
        record.insert("amount".to_string(), amount);
        record
    }

    #[test]
    fn test_empty_criteria_selects_all_in_order() {
        let clients = vec![
            client(1, FieldValue::Float(50000.0)),
            client(2, FieldValue::Integer(1000)),
        ];

        let selected = select_clients(&clients, &Criteria::new()).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0], &clients[0]);
        assert_eq!(selected[1], &clients[1]);
    }

    #[test]
    fn test_numeric_amount_criterion() {
        let clients = vec![
            client(1, FieldValue::Float(50000.0)),
            client(2, FieldValue::Integer(1000)),
            client(3, FieldValue::Text(String::new())),
            client(4, FieldValue::Float(25000.0)),
        ];

        let criteria = Criteria::new().with("amount", FieldValue::is_numeric);
        let selected = select_clients(&clients, &criteria).unwrap();

        let ids: Vec<i64> = selected
            .iter()
            .map(|c| c["client_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_unknown_criterion_field_is_error() {
        let clients = vec![client(1, FieldValue::Float(50000.0))];

        let criteria = Criteria::new().with("no_such_field", |_| true);
        let err = select_clients(&clients, &criteria).unwrap_err();
        assert!(matches!(err, MailMergeError::UnknownField { .. }));
    }
}
