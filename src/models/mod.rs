//! Data model for receipt extraction.

pub mod config;
mod record;

pub use record::{
    AmountField, DateTimeField, Diagnostics, ExtractionRecord, FieldId, OcrLine, RawMatch,
    TextField,
};
