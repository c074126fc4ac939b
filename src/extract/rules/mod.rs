//! Data-driven extraction rules.
//!
//! Every field owns an ordered list of strategies consumed by one generic
//! resolver. Strategies carry their compiled patterns; the label variants,
//! currency tokens, and separator sets they are built from are
//! configuration, so supporting a new receipt layout is a data change.

pub mod amount;
pub mod datetime;
pub mod digits;
pub mod patterns;

pub use amount::{
    AmountRules, BareAmount, LabeledAmount, canonical_amount_text, format_amount, parse_amount,
};
pub use datetime::{
    CombinedDateTime, DateTimeRules, LabeledDateTime, SplitDateTime, current_month_vn,
    is_current_month_vn, vn_now,
};
pub use digits::{account_digits, digits_only};

use crate::models::{FieldId, OcrLine};
use crate::text;

use super::labels::LabelTable;
use super::locate;

/// Prepared view of one extraction call, shared by all strategies.
#[derive(Debug, Clone, Copy)]
pub struct LineView<'a> {
    /// Input lines in reading order.
    pub lines: &'a [OcrLine],
    /// Normalization keys, parallel to `lines`.
    pub keys: &'a [String],
    /// Newline-joined keys, for whole-text fallbacks.
    pub joined: &'a str,
    /// Label table built from the active configuration.
    pub table: &'a LabelTable,
}

/// Where a pattern strategy searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Each line independently.
    Line,
    /// The newline-joined text of all lines.
    FullText,
}

/// Outcome of a successful strategy run, before record assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Amount {
        raw: String,
        value: i64,
    },
    DateTime {
        raw: String,
        month: u32,
        year: i32,
    },
    Text {
        raw: String,
        normalized: String,
    },
}

/// One extraction attempt. Strategies must not panic and must return `None`
/// on any input they cannot handle.
pub trait Strategy: Send + Sync {
    fn run(&self, view: &LineView<'_>) -> Option<Candidate>;
}

/// A field's ordered strategy cascade.
pub struct FieldRule {
    pub field: FieldId,
    pub strategies: Vec<Box<dyn Strategy>>,
}

impl FieldRule {
    /// First strategy that produces a candidate wins.
    pub fn resolve(&self, view: &LineView<'_>) -> Option<Candidate> {
        self.strategies.iter().find_map(|s| s.run(view))
    }
}

/// How a label-located value is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Free text: the lookup key is the normalization key.
    Plain,
    /// Digit-only values (accounts, phone numbers).
    Digits,
}

/// Label scan plus value location for free-text and digit fields.
///
/// Label lines that yield no usable value are skipped and later label
/// lines for the same field are tried.
#[derive(Debug, Clone)]
pub struct LabeledValue {
    field: FieldId,
    kind: TextKind,
}

impl LabeledValue {
    pub fn new(field: FieldId, kind: TextKind) -> Self {
        Self { field, kind }
    }
}

impl Strategy for LabeledValue {
    fn run(&self, view: &LineView<'_>) -> Option<Candidate> {
        for (i, key) in view.keys.iter().enumerate() {
            if view.table.match_key(key) != Some(self.field) {
                continue;
            }
            let Some(located) = locate::locate_value(view.lines, i, self.field, view.table) else {
                continue;
            };
            match self.kind {
                TextKind::Plain => {
                    return Some(Candidate::Text {
                        normalized: text::normalize(&located.raw),
                        raw: located.raw,
                    });
                }
                TextKind::Digits => {
                    if let Some(digits) = account_digits(&located.raw) {
                        return Some(Candidate::Text {
                            raw: located.raw,
                            normalized: digits,
                        });
                    }
                }
            }
        }
        None
    }
}
