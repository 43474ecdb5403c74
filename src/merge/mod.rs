//! Template merge adapters.

pub mod text;

pub use text::TextTemplateMerger;
