//! OCR input lines and the extraction result record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One recognized text line from the OCR collaborator.
///
/// Ordering is significant: value location looks ahead over neighboring
/// lines, so `index` must reflect the recognizer's reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    /// Recognized text content.
    pub text: String,

    /// Position in the recognizer output.
    pub index: usize,

    /// Recognition confidence, when the engine reports one.
    pub confidence: Option<f32>,
}

impl OcrLine {
    /// Create a line without a confidence score.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            index,
            confidence: None,
        }
    }

    /// Attach a recognition confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Receipt fields the engine knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Amount,
    DateTime,
    Sender,
    Recipient,
    Memo,
    TxnId,
    Account,
}

impl FieldId {
    /// All fields in configuration order. Label-match ties resolve to the
    /// earliest entry.
    pub const ALL: [FieldId; 7] = [
        FieldId::Amount,
        FieldId::DateTime,
        FieldId::Sender,
        FieldId::Recipient,
        FieldId::Memo,
        FieldId::TxnId,
        FieldId::Account,
    ];

    /// Stable lowercase name, used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Amount => "amount",
            FieldId::DateTime => "datetime",
            FieldId::Sender => "sender",
            FieldId::Recipient => "recipient",
            FieldId::Memo => "memo",
            FieldId::TxnId => "txn_id",
            FieldId::Account => "account",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located-but-unparsed field value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    /// Field the value belongs to.
    pub field: FieldId,

    /// Source line index; `None` for whole-text fallback matches.
    pub line_index: Option<usize>,

    /// Raw located text.
    pub raw: String,
}

/// Amount field: canonical display text plus the integer value in đồng.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountField {
    /// Canonical display form, e.g. `1.200.000đ`.
    pub raw: Option<String>,

    /// Integer count of the smallest currency unit; sign retained.
    pub value: Option<i64>,
}

/// Date/time field: canonical `HH:MM-DD/MM/YYYY` text plus month and year.
///
/// Only month and year are validated and consumed downstream; the day digit
/// tolerates OCR noise unless strict checking is configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateTimeField {
    /// Canonical display form, e.g. `22:25-22/09/2025`.
    pub raw: Option<String>,

    /// Month in [1, 12].
    pub month: Option<u32>,

    /// Four-digit year (two-digit years are expanded).
    pub year: Option<i32>,
}

impl DateTimeField {
    /// True when the extracted month and year equal the given pair.
    pub fn is_in_month(&self, month: u32, year: i32) -> bool {
        self.month == Some(month) && self.year == Some(year)
    }
}

/// Free-text field (sender, recipient, memo, transaction id, account).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    /// Located value in its original casing.
    pub raw: Option<String>,

    /// Lookup key: accent-stripped and lowercased, or digit-only for
    /// account numbers.
    pub normalized: Option<String>,
}

/// Extraction diagnostics, populated on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Wall-clock extraction time in milliseconds.
    pub elapsed_ms: u64,

    /// Echo of the input lines, truncated to the configured cap.
    pub lines: Vec<String>,
}

/// Result of one extraction call.
///
/// Created once per call, immutable after construction, owned by the
/// caller. Every unresolved field is `None`; the engine never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub amount: AmountField,
    pub datetime: DateTimeField,
    pub sender: TextField,
    pub recipient: TextField,
    pub memo: TextField,
    pub txn_id: TextField,
    pub account: TextField,
    pub diagnostics: Diagnostics,
}

impl ExtractionRecord {
    /// Raw located text for a field, if any.
    pub fn raw(&self, field: FieldId) -> Option<&str> {
        match field {
            FieldId::Amount => self.amount.raw.as_deref(),
            FieldId::DateTime => self.datetime.raw.as_deref(),
            FieldId::Sender => self.sender.raw.as_deref(),
            FieldId::Recipient => self.recipient.raw.as_deref(),
            FieldId::Memo => self.memo.raw.as_deref(),
            FieldId::TxnId => self.txn_id.raw.as_deref(),
            FieldId::Account => self.account.raw.as_deref(),
        }
    }

    /// True when no field resolved.
    pub fn is_empty(&self) -> bool {
        FieldId::ALL.iter().all(|&f| self.raw(f).is_none())
    }
}

impl fmt::Display for ExtractionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn shown(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("-")
        }

        writeln!(f, "Số tiền: {}", shown(&self.amount.raw))?;
        writeln!(f, "Thời gian: {}", shown(&self.datetime.raw))?;
        writeln!(f, "Người thực hiện: {}", shown(&self.sender.raw))?;
        writeln!(f, "Người nhận: {}", shown(&self.recipient.raw))?;
        writeln!(f, "Số tài khoản: {}", shown(&self.account.raw))?;
        writeln!(f, "Nội dung: {}", shown(&self.memo.raw))?;
        writeln!(f, "Mã giao dịch: {}", shown(&self.txn_id.raw))?;
        write!(
            f,
            "(ocr {}ms, {} dòng)",
            self.diagnostics.elapsed_ms,
            self.diagnostics.lines.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_reports_empty() {
        let record = ExtractionRecord::default();
        assert!(record.is_empty());
        assert_eq!(record.raw(FieldId::Amount), None);
    }

    #[test]
    fn raw_accessor_covers_all_fields() {
        let record = ExtractionRecord {
            amount: AmountField {
                raw: Some("120.000đ".into()),
                value: Some(120_000),
            },
            memo: TextField {
                raw: Some("Gop quy".into()),
                normalized: Some("gop quy".into()),
            },
            ..Default::default()
        };
        assert_eq!(record.raw(FieldId::Amount), Some("120.000đ"));
        assert_eq!(record.raw(FieldId::Memo), Some("Gop quy"));
        assert!(!record.is_empty());
    }

    #[test]
    fn is_in_month_compares_month_and_year_only() {
        let field = DateTimeField {
            raw: Some("22:25-22/09/2025".into()),
            month: Some(9),
            year: Some(2025),
        };
        assert!(field.is_in_month(9, 2025));
        assert!(!field.is_in_month(10, 2025));
        assert!(!field.is_in_month(9, 2024));
        assert!(!DateTimeField::default().is_in_month(9, 2025));
    }

    #[test]
    fn display_substitutes_dash_for_missing() {
        let record = ExtractionRecord::default();
        let rendered = record.to_string();
        assert!(rendered.contains("Số tiền: -"));
        assert!(rendered.contains("(ocr 0ms, 0 dòng)"));
    }

    #[test]
    fn record_serializes_round_trip() {
        let record = ExtractionRecord {
            amount: AmountField {
                raw: Some("1.200.000đ".into()),
                value: Some(1_200_000),
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ExtractionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
