//! Domain models: field values, records and the mail project entity.

pub mod project;
pub mod value;

pub use project::{DATE_FORMAT, MailProject};
pub use value::{CastMode, FieldValue, MergeRecord, Record};
