//! The document assembly pipeline.
//!
//! Per selected client and per configured document type, the pipeline
//! runs the merge -> convert -> collect -> combine -> cleanup state
//! machine: every template of the document type is merged with the
//! client+project record and converted to the final format; the converted
//! files (plus standardized attachments, when the document type opts in)
//! are combined into one output per client and document type; the
//! intermediate files are deleted only after a successful combine.
//!
//! Failure semantics: a merge or convert failure aborts that one
//! client/document-type combination (possibly leaving its partial temp
//! file behind); a combine failure additionally leaves the per-template
//! converted files on disk so an operator can recover them. Failures are
//! collected into the [`AssemblyReport`] instead of aborting the batch,
//! unless [`PipelineConfig::stop_on_first_error`] is set.

pub mod collaborators;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DocumentType, PipelineConfig};
use crate::error::{MailMergeError, Result};
use crate::fieldmap::FieldMap;
use crate::format::{ADVISOR_FIELD, format_client_record, format_project_record};
use crate::hierarchy;
use crate::models::MailProject;
use crate::models::value::{FieldValue, MergeRecord, Record};

use collaborators::{DocumentCombiner, FormatConverter, MergedDocument, TemplateMerger};

/// The prepared per-client assembly input: where the output goes and the
/// template-ready merge record
#[derive(Debug, Clone)]
pub struct ClientAssembly {
    /// Advisor the output is filed under
    pub advisor: String,
    /// Output filename stem, e.g. `Nr._141_Doe1_John1_1`
    pub stem: String,
    /// External-named, all-string record for the template merger
    pub merge_record: MergeRecord,
}

/// One failed client/document-type combination
#[derive(Debug)]
pub struct AssemblyFailure {
    /// Filename stem of the affected client
    pub stem: String,
    /// Advisor the output would have been filed under
    pub advisor: String,
    /// Document type that failed
    pub document_type: String,
    /// The underlying error
    pub error: MailMergeError,
}

/// Outcome of a batch run: what was written and what failed
#[derive(Debug, Default)]
pub struct AssemblyReport {
    /// Combined output files, in creation order
    pub created: Vec<PathBuf>,
    /// Failed client/document-type combinations
    pub failures: Vec<AssemblyFailure>,
}

/// Orchestrates document assembly over the three external engines
pub struct DocumentPipeline<'a, M, C, B>
where
    M: TemplateMerger,
    C: FormatConverter,
    B: DocumentCombiner,
{
    config: &'a PipelineConfig,
    merger: M,
    converter: C,
    combiner: B,
}

impl<'a, M, C, B> DocumentPipeline<'a, M, C, B>
where
    M: TemplateMerger,
    C: FormatConverter,
    B: DocumentCombiner,
{
    /// Wire a pipeline to its configuration and engines
    pub fn new(config: &'a PipelineConfig, merger: M, converter: C, combiner: B) -> Self {
        Self {
            config,
            merger,
            converter,
            combiner,
        }
    }

    /// Build the per-client assembly inputs.
    ///
    /// The formatter runs exactly once per client here; the assembly loop
    /// below reuses the prepared merge records. The client's advisor field
    /// is consumed for folder placement and removed from the merge record
    /// (it is not a template placeholder), then client and project data
    /// are translated back to external placeholder names and merged.
    ///
    /// # Errors
    /// Translation failures (schema drift between field maps and records)
    /// are fatal for the whole batch.
    pub fn prepare(
        &self,
        project: &MailProject,
        selected_clients: &[&Record],
    ) -> Result<Vec<ClientAssembly>> {
        let project_fragment =
            externalize(&format_project_record(project), &self.config.project_fields)?;

        let mut assemblies = Vec::with_capacity(selected_clients.len());
        for client in selected_clients {
            let advisor = field_as_string(client, ADVISOR_FIELD)?;
            let stem = filename_stem(project.project_id, client)?;

            let mut formatted = format_client_record(client);
            formatted.remove(ADVISOR_FIELD);

            let mut merge_record = externalize(&formatted, &self.config.client_fields)?;
            merge_record.extend(project_fragment.clone());

            assemblies.push(ClientAssembly {
                advisor,
                stem,
                merge_record,
            });
        }

        Ok(assemblies)
    }

    /// Create all documents for the selected clients under `root`.
    ///
    /// Materializes the advisor x document-type folder hierarchy first,
    /// then assembles each client/document-type combination sequentially.
    ///
    /// # Arguments
    /// * `project` - The campaign the clients belong to
    /// * `selected_clients` - Output of the client selection
    /// * `root` - Existing directory to store the hierarchy in
    /// * `standard_attachments` - Final-format files appended to document
    ///   types that opt into standardized inclusion
    ///
    /// # Errors
    /// Schema mismatches and hierarchy-creation failures are fatal.
    /// Engine failures are collected into the report unless
    /// `stop_on_first_error` is configured.
    pub fn create_client_documents(
        &self,
        project: &MailProject,
        selected_clients: &[&Record],
        root: &Path,
        standard_attachments: &[PathBuf],
    ) -> Result<AssemblyReport> {
        let assemblies = self.prepare(project, selected_clients)?;

        let advisors: BTreeSet<&str> = assemblies.iter().map(|a| a.advisor.as_str()).collect();
        let levels = vec![
            advisors.iter().map(ToString::to_string).collect(),
            self.config
                .document_types
                .iter()
                .map(|d| d.name.clone())
                .collect(),
        ];
        hierarchy::materialize(root, &self.config.top_level_dir, &levels)?;

        let mut report = AssemblyReport::default();
        for assembly in &assemblies {
            for document_type in &self.config.document_types {
                match self.assemble_one(assembly, document_type, root, standard_attachments) {
                    Ok(target) => {
                        log::info!("created {}", target.display());
                        report.created.push(target);
                    }
                    Err(error) => {
                        log::error!(
                            "assembly failed for {} / {}: {error}",
                            assembly.stem,
                            document_type.name
                        );
                        if self.config.stop_on_first_error {
                            return Err(error);
                        }
                        report.failures.push(AssemblyFailure {
                            stem: assembly.stem.clone(),
                            advisor: assembly.advisor.clone(),
                            document_type: document_type.name.clone(),
                            error,
                        });
                    }
                }
            }
        }

        log::info!(
            "assembly finished: {} created, {} failed",
            report.created.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// One client/document-type combination: merge and convert every
    /// template, combine, clean up intermediates.
    fn assemble_one(
        &self,
        assembly: &ClientAssembly,
        document_type: &DocumentType,
        root: &Path,
        standard_attachments: &[PathBuf],
    ) -> Result<PathBuf> {
        let out_dir = root
            .join(&self.config.top_level_dir)
            .join(&assembly.advisor)
            .join(&document_type.name);

        let mut converted_paths = Vec::with_capacity(document_type.templates.len());
        for template in &document_type.templates {
            let document = self.merger.merge(template, &assembly.merge_record)?;

            let temp_path = out_dir.join(temp_filename(&assembly.stem, template));
            document.write(&temp_path)?;

            // Conversion failure leaves the merged temp file behind; the
            // combination below is abandoned anyway.
            let converted = self.converter.convert(&temp_path)?;
            fs::remove_file(&temp_path)?;
            converted_paths.push(converted);
        }

        let mut inputs = converted_paths.clone();
        if document_type.include_standards {
            inputs.extend_from_slice(standard_attachments);
        }

        let target = out_dir.join(format!("{}.{}", assembly.stem, self.config.final_extension));
        // On combine failure the per-template converted files stay on disk
        // so an operator can recover them.
        self.combiner.combine(&inputs, &target)?;

        for path in &converted_paths {
            fs::remove_file(path)?;
        }

        Ok(target)
    }
}

/// Output filename stem: `Nr._{project_id}_{last_name}_{first_name}_{client_id}`,
/// spaces replaced by underscores
fn filename_stem(project_id: i64, client: &Record) -> Result<String> {
    let last_name = field_as_string(client, "last_name")?;
    let first_name = field_as_string(client, "first_name")?;
    let client_id = field_as_string(client, "client_id")?;

    Ok(format!("Nr._{project_id}_{last_name}_{first_name}_{client_id}").replace(' ', "_"))
}

/// Temp filename for one merged template, keeping the template's extension
fn temp_filename(stem: &str, template: &Path) -> String {
    let template_stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = template
        .extension()
        .map_or_else(|| "docx".to_string(), |e| e.to_string_lossy().into_owned());

    format!("{stem}_{template_stem}.{extension}")
}

/// Translate an internal-named record to external names and flatten it to
/// the all-string merge form
fn externalize(record: &Record, field_map: &FieldMap) -> Result<MergeRecord> {
    let external = field_map.to_external(record)?;
    Ok(external
        .into_iter()
        .map(|(key, value)| (key, value.to_display_string()))
        .collect())
}

fn field_as_string(record: &Record, field: &str) -> Result<String> {
    record
        .get(field)
        .map(FieldValue::to_display_string)
        .ok_or_else(|| MailMergeError::UnknownField {
            field: field.to_string(),
            context: "client record".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::value::FieldValue;

    #[test]
    fn test_filename_stem_replaces_spaces() {
        let mut client = Record::new();
        client.insert("last_name".to_string(), FieldValue::from("van Doe"));
        client.insert("first_name".to_string(), FieldValue::from("John"));
        client.insert("client_id".to_string(), FieldValue::Integer(7));

        let stem = filename_stem(141, &client).unwrap();
        assert_eq!(stem, "Nr._141_van_Doe_John_7");
    }

    #[test]
    fn test_temp_filename_keeps_template_extension() {
        let name = temp_filename("Nr._141_Doe1_John1_1", Path::new("data/templates/cover_letter.docx"));
        assert_eq!(name, "Nr._141_Doe1_John1_1_cover_letter.docx");
    }
}
