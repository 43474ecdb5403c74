//! Client selection: conjunction of per-field predicates, order
//! preservation, schema mismatch on unknown criterion fields.

mod common;

use dbc_mailmerge::{Criteria, FieldValue, MailMergeError, select_clients};

#[test]
fn test_empty_criteria_selects_all_unmodified() {
    let clients = common::four_clients();

    let selected = select_clients(&clients, &Criteria::new()).unwrap();

    assert_eq!(selected.len(), clients.len());
    for (selected_record, original) in selected.iter().zip(&clients) {
        assert_eq!(*selected_record, original);
    }
}

#[test]
fn test_numeric_amount_selects_three_of_four() {
    let clients = common::four_clients();

    let criteria = Criteria::new().with("amount", FieldValue::is_numeric);
    let selected = select_clients(&clients, &criteria).unwrap();

    let ids: Vec<i64> = selected
        .iter()
        .map(|c| c["client_id"].as_i64().unwrap())
        .collect();

    // Client 3 entered no amount; original relative order is kept.
    assert_eq!(ids, vec![1, 2, 4]);
}

#[test]
fn test_all_criteria_must_hold() {
    let clients = common::four_clients();

    let criteria = Criteria::new()
        .with("amount", FieldValue::is_numeric)
        .with("advisor", |v| v.as_text() == Some("Betreuer 2"));
    let selected = select_clients(&clients, &criteria).unwrap();

    let ids: Vec<i64> = selected
        .iter()
        .map(|c| c["client_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4]);
}

#[test]
fn test_omitted_criterion_is_unconstrained() {
    let clients = common::four_clients();

    let all = select_clients(&clients, &Criteria::new()).unwrap();
    let advisor_only = select_clients(
        &clients,
        &Criteria::new().with("advisor", |v| v.as_text() == Some("Betreuer 1")),
    )
    .unwrap();

    assert_eq!(all.len(), 4);
    assert_eq!(advisor_only.len(), 2);
}

#[test]
fn test_selection_does_not_mutate_clients() {
    let clients = common::four_clients();
    let copy = clients.clone();

    let criteria = Criteria::new().with("amount", FieldValue::is_numeric);
    select_clients(&clients, &criteria).unwrap();

    assert_eq!(clients, copy);
}

#[test]
fn test_unknown_criterion_field_is_schema_mismatch() {
    let clients = common::four_clients();

    let criteria = Criteria::new().with("net_worth", |_| true);
    let err = select_clients(&clients, &criteria).unwrap_err();

    assert!(matches!(err, MailMergeError::UnknownField { field, .. } if field == "net_worth"));
}
