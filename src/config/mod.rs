//! Configuration for the document assembly pipeline.
//!
//! All configuration is carried in one immutable [`PipelineConfig`] value
//! passed into the pipeline entry point; there is no process-wide mutable
//! state. [`PipelineConfig::default`] holds the production setup: the
//! document types with their template lists and attachment policy, the
//! output layout constants, and the field maps for client and project
//! records.
//!
//! The field-map defaults pair the external German column headers of the
//! data source with the internal canonical names used throughout the
//! pipeline. When a column header or template placeholder changes, only
//! this module changes.

use std::path::PathBuf;

use crate::fieldmap::FieldMap;
use crate::models::value::CastMode;

/// Name of the directory all created documents are stored under
pub const TOP_LEVEL_DIR: &str = "client_correspondence";

/// One named category of output document with its own template set and
/// standardized-attachment policy
#[derive(Debug, Clone)]
pub struct DocumentType {
    /// Category name; doubles as the per-advisor subdirectory name
    pub name: String,
    /// Template files merged for this category, in output order
    pub templates: Vec<PathBuf>,
    /// Whether standardized attachments are appended to the combined output
    pub include_standards: bool,
}

impl DocumentType {
    /// Construct a document type
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        templates: Vec<PathBuf>,
        include_standards: bool,
    ) -> Self {
        Self {
            name: name.into(),
            templates,
            include_standards,
        }
    }
}

/// Immutable configuration of the document assembly pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory name holding all output below the hierarchy root
    pub top_level_dir: String,
    /// Document types to produce per client, in order
    pub document_types: Vec<DocumentType>,
    /// External-to-internal field map for client rows
    pub client_fields: FieldMap,
    /// External-to-internal field map for project rows
    pub project_fields: FieldMap,
    /// How cast failures during client-record loading are handled
    pub cast_mode: CastMode,
    /// Extension of the final fixed output format (without dot)
    pub final_extension: String,
    /// Abort the batch on the first client/document-type failure instead
    /// of collecting failures into the report
    pub stop_on_first_error: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let templates_dir = PathBuf::from("data/templates");

        Self {
            top_level_dir: TOP_LEVEL_DIR.to_string(),
            document_types: vec![
                DocumentType::new(
                    "offer_documents",
                    vec![
                        templates_dir.join("cover_letter.docx"),
                        templates_dir.join("subscription_agreement.docx"),
                    ],
                    true,
                ),
                DocumentType::new(
                    "appropriateness_test",
                    vec![templates_dir.join("appropriateness_test.docx")],
                    false,
                ),
            ],
            client_fields: default_client_field_map(),
            project_fields: default_project_field_map(),
            cast_mode: CastMode::BestEffort,
            final_extension: "pdf".to_string(),
            stop_on_first_error: false,
        }
    }
}

/// The production client field map: data source column headers (keys in
/// the source, subject to change) to internal canonical names (stable).
///
/// # Panics
/// Never panics: the pair list is injective by construction and covered
/// by a test.
#[must_use]
pub fn default_client_field_map() -> FieldMap {
    FieldMap::new([
        ("db_id", "client_id"),
        ("betreuer", "advisor"),
        ("titel", "title"),
        ("vorname", "first_name"),
        ("nachname", "last_name"),
        ("anrede_adressfeld", "salutation_address_field"),
        ("anrede", "salutation"),
        ("post_str", "address_mailing_street"),
        ("post_plz", "address_mailing_zip"),
        ("post_ort", "address_mailing_city"),
        ("melde_str", "address_notify_street"),
        ("melde_plz", "address_notify_zip"),
        ("melde_ort", "address_notify_city"),
        ("zeichnungssumme", "amount"),
        ("in_vv", "subscription_am_authorized"),
        ("medium_email", "mailing_as_email"),
        ("depot_nummer", "depot_no"),
        ("depot_bic", "depot_bic"),
    ])
    .expect("client field map is injective")
}

/// The production project field map
///
/// # Panics
/// Never panics: the pair list is injective by construction and covered
/// by a test.
#[must_use]
pub fn default_project_field_map() -> FieldMap {
    FieldMap::new([
        ("projektnummer", "project_id"),
        ("projektname", "project_name"),
        ("datum_emission", "date_issuance"),
        ("datum_fälligkeit", "date_maturity"),
        ("zinssatz", "coupon_rate"),
        ("handelsregisternummer", "commercial_register_number"),
        ("emissionsvolumen_min", "issue_volume_min"),
        ("emissionsvolumen_max", "issue_volume_max"),
        ("sicherheiten", "collateral_string"),
    ])
    .expect("project field map is injective")
}
