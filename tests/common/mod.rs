//! Shared fixtures: two projects and a four-client record set mirroring
//! the production data source (one client without an amount, one with a
//! title).

#![allow(dead_code)]

use chrono::NaiveDate;
use dbc_mailmerge::{FieldValue, MailProject, Record};

/// Project 141, the primary fixture
pub fn project_single_1() -> MailProject {
    MailProject::new(
        141,
        "Certainly a Project GmbH & Co. KG",
        NaiveDate::from_ymd_opt(2019, 6, 30).unwrap(),
        NaiveDate::from_ymd_opt(2022, 6, 30).unwrap(),
        0.12,
        "HRA 12345 B",
        2_000_000,
        3_000_000,
        "Land Charge and Letter of Comfort",
    )
    .unwrap()
}

/// Project 178, used for inequality checks
pub fn project_single_2() -> MailProject {
    MailProject::new(
        178,
        "Another Project GmbH",
        NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
        NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
        0.11,
        "HRB 04321 A",
        4_000_000,
        5_000_000,
        "Letter of Comfort",
    )
    .unwrap()
}

/// A client record keyed by internal canonical names
pub fn client(
    id: i64,
    advisor: &str,
    title: &str,
    first_name: &str,
    last_name: &str,
    amount: FieldValue,
) -> Record {
    let mut record = Record::new();
    record.insert("client_id".to_string(), FieldValue::Integer(id));
    record.insert("advisor".to_string(), FieldValue::from(advisor));
    record.insert("title".to_string(), FieldValue::from(title));
    record.insert("first_name".to_string(), FieldValue::from(first_name));
    record.insert("last_name".to_string(), FieldValue::from(last_name));
    record.insert(
        "salutation_address_field".to_string(),
        FieldValue::from(format!("Herrn/Frau {first_name} {last_name}")),
    );
    record.insert("salutation".to_string(), FieldValue::from("e Frau"));
    record.insert(
        "address_mailing_street".to_string(),
        FieldValue::from(format!("Client {id} Str. {id}")),
    );
    record.insert("address_mailing_zip".to_string(), FieldValue::from("80001"));
    record.insert("address_mailing_city".to_string(), FieldValue::from("Munich"));
    record.insert(
        "address_notify_street".to_string(),
        FieldValue::from(format!("Client {id} Str. {id}")),
    );
    record.insert("address_notify_zip".to_string(), FieldValue::from("80001"));
    record.insert("address_notify_city".to_string(), FieldValue::from("Munich"));
    record.insert("amount".to_string(), amount);
    record.insert(
        "subscription_am_authorized".to_string(),
        FieldValue::Bool(true),
    );
    record.insert("mailing_as_email".to_string(), FieldValue::Bool(false));
    record.insert("depot_no".to_string(), FieldValue::from("0123456789"));
    record.insert("depot_bic".to_string(), FieldValue::from("SOMEALPHANUMERICSTRING"));
    record
}

/// The four-client fixture: client 3 entered no amount, client 4 has a
/// title
pub fn four_clients() -> Vec<Record> {
    vec![
        client(1, "Betreuer 1", "", "John1", "Doe1", FieldValue::Float(50000.0)),
        client(2, "Betreuer 1", "", "John2", "Doe2", FieldValue::Integer(1000)),
        client(3, "Betreuer 2", "", "John3", "Doe3", FieldValue::Text(String::new())),
        client(4, "Betreuer 2", "Dr.", "Jane4", "Doe4", FieldValue::Float(25000.0)),
    ]
}
