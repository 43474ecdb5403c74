//! Error handling for the mail merge pipeline.
//!
//! One crate-wide error enum covers the failure taxonomy: schema mismatches
//! between source data and field maps, duplicate population of a project,
//! failures of the external merge/convert/combine engines, and strict-mode
//! cast failures. Schema and population errors are fatal immediately;
//! engine failures are fatal for one client/document-type combination and
//! are collected by the pipeline rather than aborting the batch.

use std::path::PathBuf;

/// Specialized error type for the mail merge pipeline
#[derive(Debug, thiserror::Error)]
pub enum MailMergeError {
    /// Error reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record key has no entry in the (possibly reversed) field map,
    /// or a selection criterion names a field the record does not carry.
    /// Indicates configuration drift between the data source and the code.
    #[error("unknown field '{field}' ({context})")]
    UnknownField {
        /// The offending field name
        field: String,
        /// Where the lookup happened
        context: String,
    },

    /// A field map assigns the same name twice, so reversal is ill-defined
    #[error("field map is not injective: '{name}' appears more than once")]
    NonInjectiveFieldMap {
        /// The duplicated name
        name: String,
    },

    /// Client records were attached to a project that already has some
    #[error("at least one client has already been added to this project")]
    AlreadyPopulated,

    /// The data source could not be parsed or lacks the requested sheet
    #[error("invalid data source: {0}")]
    Source(String),

    /// A requested column is missing from the data source
    #[error("column '{column}' not found in sheet '{sheet}'")]
    MissingColumn {
        /// The missing column name
        column: String,
        /// The sheet it was requested from
        sheet: String,
    },

    /// A value could not be coerced to its expected type in strict mode
    #[error("cannot cast field '{field}' value '{value}' to {expected}")]
    Cast {
        /// Field being cast
        field: String,
        /// Display form of the offending value
        value: String,
        /// Target type name
        expected: String,
    },

    /// Project construction violated an invariant
    #[error("invalid project: {0}")]
    InvalidProject(String),

    /// A date string did not match the `DD.MM.YYYY` wire format
    #[error("date parse error: {0}")]
    Date(#[from] chrono::ParseError),

    /// The template merge engine failed
    #[error("template merge failed for {}: {message}", template.display())]
    Merge {
        /// Template being merged
        template: PathBuf,
        /// Engine diagnostic
        message: String,
    },

    /// The format conversion engine produced unparseable output or timed out
    #[error("format conversion failed for {}: {message}", source_path.display())]
    Conversion {
        /// File being converted
        source_path: PathBuf,
        /// Engine diagnostic
        message: String,
    },

    /// The document combination engine failed
    #[error("combining documents into {}: {message}", target.display())]
    Combine {
        /// Intended combined output
        target: PathBuf,
        /// Engine diagnostic
        message: String,
    },
}

/// Result type for mail merge operations
pub type Result<T> = std::result::Result<T, MailMergeError>;
