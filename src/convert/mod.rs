//! Format conversion adapters.

pub mod soffice;

pub use soffice::SofficeConverter;
