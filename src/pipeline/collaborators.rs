//! Interfaces of the external engines the pipeline drives.
//!
//! Tabular ingestion, template merging, format conversion and document
//! combination are external collaborators: the pipeline only depends on
//! these traits, and production wires in the real engines (spreadsheet
//! reader, docx merge engine, LibreOffice, a PDF combiner) while tests
//! substitute doubles.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{MailMergeError, Result};
use crate::models::value::{MergeRecord, Record};

/// Reads rows from a tabular data source.
///
/// Implementations select only the requested columns; a missing requested
/// column is a configuration error, empty cells normalize to empty text,
/// and date-typed cells normalize to `DD.MM.YYYY` strings.
pub trait TableReader {
    /// Read the rows of one sheet, projected to `columns`.
    ///
    /// # Errors
    /// Returns [`MailMergeError::MissingColumn`] if a requested column is
    /// absent from the sheet.
    fn read(&self, source: &Path, sheet: &str, columns: &[&str]) -> Result<Vec<Record>>;
}

/// A merged document held in memory, ready to be persisted
pub trait MergedDocument {
    /// Persist the merged document.
    fn write(&self, path: &Path) -> Result<()>;
}

/// Substitutes placeholders in a document template.
///
/// Placeholder names not present in the merge record are a fatal error;
/// the engine must not silently leave placeholders unfilled.
pub trait TemplateMerger {
    /// The in-memory merged document type
    type Document: MergedDocument;

    /// Merge a record into a template.
    fn merge(&self, template: &Path, record: &MergeRecord) -> Result<Self::Document>;
}

/// Converts a merged document into the final fixed output format.
///
/// This is the single long-latency operation of the pipeline; conversion
/// failures are not assumed transient and are never retried.
pub trait FormatConverter {
    /// Convert `source` and return the path of the converted file.
    fn convert(&self, source: &Path) -> Result<PathBuf>;
}

/// Concatenates several final-format files into one.
///
/// Inputs are appended in the given order (customized documents first,
/// then standardized attachments); all input file handles are closed on
/// completion, success or failure.
pub trait DocumentCombiner {
    /// Combine `inputs` into one file at `target`.
    fn combine(&self, inputs: &[PathBuf], target: &Path) -> Result<()>;
}

/// Byte-appending combiner for text-like final formats.
///
/// Correct whenever the final format allows plain concatenation (and for
/// tests); production PDF combination is supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ConcatCombiner;

impl DocumentCombiner for ConcatCombiner {
    fn combine(&self, inputs: &[PathBuf], target: &Path) -> Result<()> {
        let mut out = fs::File::create(target)?;

        for input in inputs {
            let mut file = fs::File::open(input).map_err(|e| MailMergeError::Combine {
                target: target.to_path_buf(),
                message: format!("cannot open input {}: {e}", input.display()),
            })?;

            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            out.write_all(&buffer)?;
        }

        out.flush()?;
        Ok(())
    }
}
