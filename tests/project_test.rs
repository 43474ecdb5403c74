//! Project entity: construction, equality, rendering, the row factory
//! and client-record attachment.

mod common;

use chrono::NaiveDate;
use dbc_mailmerge::config::{default_client_field_map, default_project_field_map};
use dbc_mailmerge::{CastMode, FieldValue, MailMergeError, MailProject, Record};

/// External project row matching the fixture project 141
fn project_row_141() -> Record {
    let mut row = Record::new();
    row.insert("projektnummer".to_string(), FieldValue::Integer(141));
    row.insert(
        "projektname".to_string(),
        FieldValue::from("Certainly a Project GmbH & Co. KG"),
    );
    row.insert("datum_emission".to_string(), FieldValue::from("30.06.2019"));
    row.insert("datum_fälligkeit".to_string(), FieldValue::from("30.06.2022"));
    row.insert("zinssatz".to_string(), FieldValue::Float(0.12));
    row.insert(
        "handelsregisternummer".to_string(),
        FieldValue::from("HRA 12345 B"),
    );
    row.insert("emissionsvolumen_min".to_string(), FieldValue::Integer(2_000_000));
    row.insert("emissionsvolumen_max".to_string(), FieldValue::Integer(3_000_000));
    row.insert(
        "sicherheiten".to_string(),
        FieldValue::from("Land Charge and Letter of Comfort"),
    );
    row
}

/// External project row matching the fixture project 178
fn project_row_178() -> Record {
    let mut row = Record::new();
    row.insert("projektnummer".to_string(), FieldValue::Integer(178));
    row.insert("projektname".to_string(), FieldValue::from("Another Project GmbH"));
    row.insert("datum_emission".to_string(), FieldValue::from("31.12.2019"));
    row.insert("datum_fälligkeit".to_string(), FieldValue::from("31.12.2022"));
    row.insert("zinssatz".to_string(), FieldValue::Float(0.11));
    row.insert(
        "handelsregisternummer".to_string(),
        FieldValue::from("HRB 04321 A"),
    );
    row.insert("emissionsvolumen_min".to_string(), FieldValue::Integer(4_000_000));
    row.insert("emissionsvolumen_max".to_string(), FieldValue::Integer(5_000_000));
    row.insert("sicherheiten".to_string(), FieldValue::from("Letter of Comfort"));
    row
}

/// Client rows keyed by external column names
fn external_client_rows() -> Vec<Record> {
    let map = default_client_field_map();
    common::four_clients()
        .iter()
        .map(|record| map.to_external(record).unwrap())
        .collect()
}

#[test]
fn test_structural_equality() {
    let project1 = common::project_single_1();
    let project2 = common::project_single_1();
    let project3 = common::project_single_2();

    assert_eq!(project1, project2);
    assert_ne!(project1, project3);
}

#[test]
fn test_display_summary() {
    let project = common::project_single_1();

    assert_eq!(
        project.to_string(),
        "Project ID (141): Certainly a Project GmbH & Co. KG, issuance 30.06.2019, maturity 30.06.2022"
    );
}

#[test]
fn test_literal_representation_round_trips() {
    let project = common::project_single_1();

    let literal = serde_json::to_string(&project).unwrap();
    let rebuilt: MailProject = serde_json::from_str(&literal).unwrap();

    assert_eq!(rebuilt, project);
}

#[test]
fn test_volume_invariant() {
    let result = MailProject::new(
        1,
        "Inverted Volumes AG",
        NaiveDate::from_ymd_opt(2019, 6, 30).unwrap(),
        NaiveDate::from_ymd_opt(2022, 6, 30).unwrap(),
        0.1,
        "HRA 1 A",
        3_000_000,
        2_000_000,
        "None",
    );

    assert!(matches!(result, Err(MailMergeError::InvalidProject(_))));
}

#[test]
fn test_from_records_single_row_returns_sequence_of_one() {
    let map = default_project_field_map();

    let projects = MailProject::from_records(&[project_row_141()], &map).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0], common::project_single_1());
}

#[test]
fn test_from_records_multiple_rows() {
    let map = default_project_field_map();

    let projects =
        MailProject::from_records(&[project_row_141(), project_row_178()], &map).unwrap();
    assert_eq!(
        projects,
        vec![common::project_single_1(), common::project_single_2()]
    );
}

#[test]
fn test_from_records_typed_fields() {
    let map = default_project_field_map();
    let project = &MailProject::from_records(&[project_row_141()], &map).unwrap()[0];

    assert_eq!(project.project_id, 141);
    assert_eq!(
        project.date_issuance,
        NaiveDate::from_ymd_opt(2019, 6, 30).unwrap()
    );
    assert_eq!(project.coupon_rate, 0.12);
    assert_eq!(project.issue_volume_max, 3_000_000);
}

#[test]
fn test_attach_client_records() {
    let mut project = common::project_single_1();
    let map = default_client_field_map();

    project
        .attach_client_records(&external_client_rows(), &map, CastMode::BestEffort)
        .unwrap();

    let records = project.client_records();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["client_id"], FieldValue::Integer(1));
    assert_eq!(records[0]["advisor"], FieldValue::from("Betreuer 1"));
    // Depot identifiers keep their text form and leading zeros.
    assert_eq!(records[0]["depot_no"], FieldValue::from("0123456789"));
}

#[test]
fn test_attach_twice_is_rejected() {
    let mut project = common::project_single_1();
    let map = default_client_field_map();
    let rows = external_client_rows();

    project
        .attach_client_records(&rows, &map, CastMode::BestEffort)
        .unwrap();
    let err = project
        .attach_client_records(&rows, &map, CastMode::BestEffort)
        .unwrap_err();

    assert!(matches!(err, MailMergeError::AlreadyPopulated));
    assert_eq!(project.client_records().len(), 4);
}

#[test]
fn test_attach_casts_numeric_text_amounts() {
    let mut project = common::project_single_1();
    let map = default_client_field_map();

    let mut rows = external_client_rows();
    rows[0].insert("zeichnungssumme".to_string(), FieldValue::from("50000"));

    project
        .attach_client_records(&rows, &map, CastMode::Strict)
        .unwrap();
    assert_eq!(
        project.client_records()[0]["amount"],
        FieldValue::Float(50000.0)
    );
}

#[test]
fn test_attach_strict_mode_rejects_bad_amount() {
    let mut project = common::project_single_1();
    let map = default_client_field_map();

    let mut rows = external_client_rows();
    rows[1].insert("zeichnungssumme".to_string(), FieldValue::from("fifty"));

    let err = project
        .attach_client_records(&rows, &map, CastMode::Strict)
        .unwrap_err();
    assert!(matches!(err, MailMergeError::Cast { .. }));

    // Rejected before any mutation.
    assert!(project.client_records().is_empty());
}

#[test]
fn test_attach_best_effort_keeps_bad_amount() {
    let mut project = common::project_single_1();
    let map = default_client_field_map();

    let mut rows = external_client_rows();
    rows[1].insert("zeichnungssumme".to_string(), FieldValue::from("fifty"));

    project
        .attach_client_records(&rows, &map, CastMode::BestEffort)
        .unwrap();
    assert_eq!(
        project.client_records()[1]["amount"],
        FieldValue::from("fifty")
    );
}
