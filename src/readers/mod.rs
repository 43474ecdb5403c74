//! Tabular row sources.

pub mod json;

pub use json::JsonTableReader;
