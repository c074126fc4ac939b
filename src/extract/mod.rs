//! Receipt field extraction: labels, value location, rule cascades, engine.

pub mod labels;
pub mod locate;
pub mod rules;

mod engine;

pub use engine::ReceiptEngine;
pub use labels::{LabelSpec, LabelTable};
pub use locate::locate_value;

use crate::models::{ExtractionRecord, OcrLine};

/// Trait for receipt field extraction.
pub trait ReceiptExtractor {
    /// Extract a structured record from ordered OCR lines.
    fn extract(&self, lines: &[OcrLine]) -> ExtractionRecord;
}
