//! Bidirectional field-name translation.
//!
//! External files (data source columns, template placeholders) use names
//! that change from time to time; the pipeline uses stable internal names.
//! A [`FieldMap`] is the validated bijective table between the two. Records
//! are translated to internal names right after ingestion and back to
//! external names just before template merging. If an external name
//! changes, only the map changes.
//!
//! Translation is a hard failure on unknown keys: a record carrying a
//! field the map does not know means the source schema and the
//! configuration have drifted apart.

use rustc_hash::FxHashMap;

use crate::error::{MailMergeError, Result};
use crate::models::value::Record;

/// Direction of a record translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// External (source/template) names to internal canonical names
    ToInternal,
    /// Internal canonical names back to external names
    ToExternal,
}

/// A validated one-to-one mapping between external and internal field names.
///
/// The reverse table is derived once at construction; the map is immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct FieldMap {
    /// Pairs in declaration order, external name first
    pairs: Vec<(String, String)>,
    forward: FxHashMap<String, String>,
    reverse: FxHashMap<String, String>,
}

impl FieldMap {
    /// Build a field map from `(external, internal)` name pairs.
    ///
    /// # Errors
    /// Returns [`MailMergeError::NonInjectiveFieldMap`] if any external or
    /// internal name appears more than once; a non-injective map cannot be
    /// reversed.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut pairs = Vec::new();
        let mut forward = FxHashMap::default();
        let mut reverse = FxHashMap::default();

        for (external, internal) in entries {
            let external = external.into();
            let internal = internal.into();

            if forward.contains_key(&external) {
                return Err(MailMergeError::NonInjectiveFieldMap { name: external });
            }
            if reverse.contains_key(&internal) {
                return Err(MailMergeError::NonInjectiveFieldMap { name: internal });
            }

            forward.insert(external.clone(), internal.clone());
            reverse.insert(internal.clone(), external.clone());
            pairs.push((external, internal));
        }

        Ok(Self {
            pairs,
            forward,
            reverse,
        })
    }

    /// Number of field pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the map holds no pairs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// External column names in declaration order (the column projection
    /// requested from the table reader)
    #[must_use]
    pub fn external_names(&self) -> Vec<&str> {
        self.pairs.iter().map(|(e, _)| e.as_str()).collect()
    }

    /// Look up the internal name for an external one
    #[must_use]
    pub fn internal_name(&self, external: &str) -> Option<&str> {
        self.forward.get(external).map(String::as_str)
    }

    /// Look up the external name for an internal one
    #[must_use]
    pub fn external_name(&self, internal: &str) -> Option<&str> {
        self.reverse.get(internal).map(String::as_str)
    }

    /// Produce a copy of `record` with every key translated in the given
    /// direction. The input is never mutated.
    ///
    /// Applying `ToInternal` and then `ToExternal` returns the original
    /// record (round-trip law).
    ///
    /// # Errors
    /// Returns [`MailMergeError::UnknownField`] if a record key has no
    /// entry in the map for the requested direction.
    pub fn translate(&self, record: &Record, direction: Direction) -> Result<Record> {
        let table = match direction {
            Direction::ToInternal => &self.forward,
            Direction::ToExternal => &self.reverse,
        };

        let mut translated = Record::new();
        for (key, value) in record {
            let new_key = table.get(key).ok_or_else(|| MailMergeError::UnknownField {
                field: key.clone(),
                context: format!("field map translation {direction:?}"),
            })?;
            translated.insert(new_key.clone(), value.clone());
        }

        Ok(translated)
    }

    /// Convenience for [`Self::translate`] with [`Direction::ToInternal`]
    pub fn to_internal(&self, record: &Record) -> Result<Record> {
        self.translate(record, Direction::ToInternal)
    }

    /// Convenience for [`Self::translate`] with [`Direction::ToExternal`]
    pub fn to_external(&self, record: &Record) -> Result<Record> {
        self.translate(record, Direction::ToExternal)
    }
}
