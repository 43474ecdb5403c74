//! Plain-text template merging.
//!
//! A [`TemplateMerger`] over UTF-8 text templates with `{{name}}`
//! placeholders. It honors the same contract as the production word
//! processing engine: a placeholder without a corresponding merge-record
//! entry is a fatal error (never silently left unfilled), and inserted
//! values carry no implicit surrounding whitespace. Used by the driver
//! binary and the test suite; production wires in a docx-capable engine.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{MailMergeError, Result};
use crate::models::value::MergeRecord;
use crate::pipeline::collaborators::{MergedDocument, TemplateMerger};

/// A merged text document held in memory
#[derive(Debug, Clone)]
pub struct TextDocument {
    content: String,
}

impl TextDocument {
    /// The merged content
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl MergedDocument for TextDocument {
    fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.content)?;
        Ok(())
    }
}

/// Merges records into `{{name}}` placeholders of text templates
#[derive(Debug, Clone, Default)]
pub struct TextTemplateMerger;

impl TemplateMerger for TextTemplateMerger {
    type Document = TextDocument;

    fn merge(&self, template: &Path, record: &MergeRecord) -> Result<Self::Document> {
        let raw = fs::read_to_string(template).map_err(|e| MailMergeError::Merge {
            template: template.to_path_buf(),
            message: format!("cannot read template: {e}"),
        })?;

        let placeholder = Regex::new(r"\{\{([^{}]+)\}\}").map_err(|e| MailMergeError::Merge {
            template: template.to_path_buf(),
            message: format!("bad placeholder pattern: {e}"),
        })?;

        let mut missing: Option<String> = None;
        let content = placeholder
            .replace_all(&raw, |caps: &regex::Captures<'_>| {
                let name = caps[1].trim();
                match record.get(name) {
                    Some(value) => value.clone(),
                    None => {
                        missing.get_or_insert_with(|| name.to_string());
                        String::new()
                    }
                }
            })
            .into_owned();

        if let Some(name) = missing {
            return Err(MailMergeError::Merge {
                template: template.to_path_buf(),
                message: format!("placeholder '{name}' not present in merge record"),
            });
        }

        Ok(TextDocument { content })
    }
}
