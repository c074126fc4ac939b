//! Structured field extraction from Vietnamese mobile-payment receipt OCR
//! text.
//!
//! This crate turns the noisy, ordered line output of an external OCR
//! collaborator into a typed transaction record:
//! - accent- and spacing-tolerant label detection over configurable
//!   surface variants (Vietnamese and English)
//! - ordered value location: same-line suffix, two-line join, bounded
//!   lookahead
//! - per-field normalization: amounts to đồng, date/times to a canonical
//!   `HH:MM-DD/MM/YYYY` form, accounts to digit-only strings
//! - fuzzy identity matching for OCR-noisy names, with a configurable
//!   threshold and measure set
//!
//! Extraction is total: any line list yields a well-formed record with
//! unresolved fields as `None`, and never panics.
//!
//! ```
//! use saoke::{OcrLine, ReceiptEngine};
//!
//! let engine = ReceiptEngine::new();
//! let record = engine.extract(&[
//!     OcrLine::new(0, "Số tiền: 1.200.000đ"),
//!     OcrLine::new(1, "Thời gian: 22:25 - 22/09/2025"),
//! ]);
//! assert_eq!(record.amount.value, Some(1_200_000));
//! assert_eq!(record.datetime.month, Some(9));
//! ```

pub mod error;
pub mod extract;
pub mod identity;
pub mod models;
pub mod ocr;
pub mod text;
pub mod verify;

pub use error::{ConfigError, OcrError, Result, SaokeError};
pub use extract::rules::{format_amount, is_current_month_vn, parse_amount};
pub use extract::{LabelTable, ReceiptEngine, ReceiptExtractor};
pub use identity::{SimilarityMeasure, names_match, similarity};
pub use models::config::{
    AmountConfig, DateTimeConfig, EngineConfig, IdentityConfig, LabelConfig,
};
pub use models::{
    AmountField, DateTimeField, Diagnostics, ExtractionRecord, FieldId, OcrLine, RawMatch,
    TextField,
};
pub use ocr::{LineSource, RecognizerOutput, SharedRecognizer};
pub use verify::{ExpectedReceipt, MatchReport};
