//! Client correspondence generation for bond-issuance mail projects.
//!
//! Structured client and project records are translated from external
//! column names to canonical field names, filtered by selection criteria,
//! formatted according to the business rules, merged into document
//! templates, converted to a fixed final format and combined (optionally
//! with standardized attachments) into one output document per client and
//! document type, stored in a per-advisor, per-document-type folder
//! hierarchy.
//!
//! The heavyweight engines (spreadsheet reading, template merging, format
//! conversion, document combination) are external collaborators described
//! by the traits in [`pipeline::collaborators`].

pub mod config;
pub mod convert;
pub mod error;
pub mod fieldmap;
pub mod format;
pub mod hierarchy;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod readers;
pub mod selector;

// Re-export the most common types for easier use
// Core types
pub use config::{DocumentType, PipelineConfig};
pub use error::{MailMergeError, Result};
pub use models::{CastMode, FieldValue, MailProject, MergeRecord, Record};

// Translation and selection
pub use fieldmap::{Direction, FieldMap};
pub use selector::{Criteria, select_clients};

// Assembly
pub use pipeline::{AssemblyReport, ClientAssembly, DocumentPipeline};
