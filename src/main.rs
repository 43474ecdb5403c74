//! Non-interactive driver for the mail merge pipeline.
//!
//! Loads project and client rows from a JSON workbook, selects the
//! clients that entered a subscription amount, and either prints the
//! assembly plan or runs the full pipeline with the text template merger,
//! the LibreOffice converter and the byte-appending combiner.
//!
//! ```text
//! dbc-mailmerge <workbook.json> <project_sheet> <client_sheet> <output_root> [--assemble] [standard_attachment ...]
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use log::info;

use dbc_mailmerge::merge::TextTemplateMerger;
use dbc_mailmerge::pipeline::collaborators::{ConcatCombiner, TableReader};
use dbc_mailmerge::convert::SofficeConverter;
use dbc_mailmerge::readers::JsonTableReader;
use dbc_mailmerge::{Criteria, DocumentPipeline, FieldValue, MailProject, PipelineConfig};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 4 {
        bail!(
            "usage: dbc-mailmerge <workbook.json> <project_sheet> <client_sheet> <output_root> [--assemble] [standard_attachment ...]"
        );
    }

    let workbook = PathBuf::from(&args[0]);
    let project_sheet = &args[1];
    let client_sheet = &args[2];
    let output_root = PathBuf::from(&args[3]);
    let assemble = args.get(4).is_some_and(|a| a == "--assemble");
    let standard_attachments: Vec<PathBuf> = args
        .iter()
        .skip(if assemble { 5 } else { 4 })
        .map(PathBuf::from)
        .collect();

    let config = PipelineConfig::default();
    let reader = JsonTableReader;

    // Project rows
    let project_columns = config.project_fields.external_names();
    let project_rows = reader
        .read(&workbook, project_sheet, &project_columns)
        .with_context(|| format!("reading project sheet '{project_sheet}'"))?;
    let projects = MailProject::from_records(&project_rows, &config.project_fields)?;
    let Some(mut project) = projects.into_iter().next() else {
        bail!("project sheet '{project_sheet}' holds no rows");
    };
    info!("{project}");

    // Client rows
    let client_columns = config.client_fields.external_names();
    let client_rows = reader
        .read(&workbook, client_sheet, &client_columns)
        .with_context(|| format!("reading client sheet '{client_sheet}'"))?;
    project.attach_client_records(&client_rows, &config.client_fields, config.cast_mode)?;

    // Documents are only created for clients that entered an amount.
    let criteria = Criteria::new().with("amount", FieldValue::is_numeric);
    let selected = project.select_clients(&criteria)?;
    info!(
        "selected {} of {} client record(s)",
        selected.len(),
        project.client_records().len()
    );

    let merger = TextTemplateMerger;
    let converter = SofficeConverter::new(config.final_extension.clone());
    let combiner = ConcatCombiner;
    let pipeline = DocumentPipeline::new(&config, merger, converter, combiner);

    if !assemble {
        print_plan(&pipeline, &project, &selected, &output_root, &config)?;
        return Ok(());
    }

    let start = Instant::now();
    let report =
        pipeline.create_client_documents(&project, &selected, &output_root, &standard_attachments)?;
    info!(
        "created {} document(s), {} failure(s) in {:?}",
        report.created.len(),
        report.failures.len(),
        start.elapsed()
    );

    for failure in &report.failures {
        log::error!(
            "failed: {} / {} ({})",
            failure.stem,
            failure.document_type,
            failure.error
        );
    }

    Ok(())
}

/// Print what the assembly would produce, without driving the engines
fn print_plan<M, C, B>(
    pipeline: &DocumentPipeline<'_, M, C, B>,
    project: &MailProject,
    selected: &[&dbc_mailmerge::Record],
    output_root: &Path,
    config: &PipelineConfig,
) -> anyhow::Result<()>
where
    M: dbc_mailmerge::pipeline::collaborators::TemplateMerger,
    C: dbc_mailmerge::pipeline::collaborators::FormatConverter,
    B: dbc_mailmerge::pipeline::collaborators::DocumentCombiner,
{
    let assemblies = pipeline.prepare(project, selected)?;

    for assembly in &assemblies {
        for document_type in &config.document_types {
            let target = output_root
                .join(&config.top_level_dir)
                .join(&assembly.advisor)
                .join(&document_type.name)
                .join(format!("{}.{}", assembly.stem, config.final_extension));
            println!("{}", target.display());
        }
    }

    info!(
        "plan: {} client(s) x {} document type(s)",
        assemblies.len(),
        config.document_types.len()
    );
    Ok(())
}
