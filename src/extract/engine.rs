//! Receipt extraction orchestrator.
//!
//! Runs every configured field rule against the full line list and
//! assembles the result record. The engine is total: any line list,
//! including an empty one, yields a well-formed record with diagnostics.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::models::config::EngineConfig;
use crate::models::{
    AmountField, DateTimeField, Diagnostics, ExtractionRecord, FieldId, OcrLine, TextField,
};
use crate::text;

use super::ReceiptExtractor;
use super::labels::LabelTable;
use super::rules::{
    AmountRules, BareAmount, Candidate, CombinedDateTime, DateTimeRules, FieldRule, LabeledAmount,
    LabeledDateTime, LabeledValue, LineView, Scope, SplitDateTime, TextKind,
};

/// Receipt field extraction engine.
///
/// Construction compiles the configured label variants and pattern tokens;
/// extraction itself is pure and side-effect-free, so a single engine can
/// be shared across threads.
pub struct ReceiptEngine {
    config: EngineConfig,
    table: LabelTable,
    rules: Vec<FieldRule>,
}

impl ReceiptEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default()).expect("default configuration is valid")
    }

    /// Create an engine from a validated configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = LabelTable::from_config(&config.labels);
        let rules = build_rules(&config, &table)?;
        Ok(Self {
            config,
            table,
            rules,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extract a structured record from ordered OCR lines. Never fails;
    /// unresolved fields are `None` and diagnostics are always populated.
    pub fn extract(&self, lines: &[OcrLine]) -> ExtractionRecord {
        let start = Instant::now();
        debug!("extracting fields from {} OCR lines", lines.len());

        let keys: Vec<String> = lines.iter().map(|l| text::normalize(&l.text)).collect();
        let joined = keys.join("\n");
        let view = LineView {
            lines,
            keys: &keys,
            joined: &joined,
            table: &self.table,
        };

        let mut record = ExtractionRecord::default();
        for rule in &self.rules {
            match rule.resolve(&view) {
                Some(Candidate::Amount { raw, value }) => {
                    debug!("amount resolved to {}", raw);
                    record.amount = AmountField {
                        raw: Some(raw),
                        value: Some(value),
                    };
                }
                Some(Candidate::DateTime { raw, month, year }) => {
                    debug!("datetime resolved to {}", raw);
                    record.datetime = DateTimeField {
                        raw: Some(raw),
                        month: Some(month),
                        year: Some(year),
                    };
                }
                Some(Candidate::Text { raw, normalized }) => {
                    debug!("{} resolved to {}", rule.field, raw);
                    let value = TextField {
                        raw: Some(raw),
                        normalized: Some(normalized),
                    };
                    match rule.field {
                        FieldId::Sender => record.sender = value,
                        FieldId::Recipient => record.recipient = value,
                        FieldId::Memo => record.memo = value,
                        FieldId::TxnId => record.txn_id = value,
                        FieldId::Account => record.account = value,
                        FieldId::Amount | FieldId::DateTime => {}
                    }
                }
                None => debug!("field {} unresolved", rule.field),
            }
        }

        record.diagnostics = Diagnostics {
            elapsed_ms: start.elapsed().as_millis() as u64,
            lines: lines
                .iter()
                .take(self.config.echo_limit)
                .map(|l| l.text.clone())
                .collect(),
        };
        info!(
            "extraction finished in {}ms",
            record.diagnostics.elapsed_ms
        );
        record
    }
}

impl Default for ReceiptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for ReceiptEngine {
    fn extract(&self, lines: &[OcrLine]) -> ExtractionRecord {
        ReceiptEngine::extract(self, lines)
    }
}

/// Build the per-field strategy table from configuration.
fn build_rules(config: &EngineConfig, table: &LabelTable) -> Result<Vec<FieldRule>, ConfigError> {
    let amount = AmountRules::from_config(table.variants(FieldId::Amount), &config.amount)?;
    let datetime = DateTimeRules::from_config(&config.datetime)?;

    Ok(vec![
        FieldRule {
            field: FieldId::Amount,
            strategies: vec![
                Box::new(LabeledAmount::new(amount.clone())),
                Box::new(BareAmount::new(amount.clone(), Scope::Line)),
                Box::new(BareAmount::new(amount, Scope::FullText)),
            ],
        },
        FieldRule {
            field: FieldId::DateTime,
            strategies: vec![
                Box::new(LabeledDateTime::new(datetime.clone())),
                Box::new(CombinedDateTime::new(datetime.clone(), Scope::Line)),
                Box::new(CombinedDateTime::new(datetime.clone(), Scope::FullText)),
                Box::new(SplitDateTime::new(datetime)),
            ],
        },
        FieldRule {
            field: FieldId::Sender,
            strategies: vec![Box::new(LabeledValue::new(FieldId::Sender, TextKind::Plain))],
        },
        FieldRule {
            field: FieldId::Recipient,
            strategies: vec![Box::new(LabeledValue::new(
                FieldId::Recipient,
                TextKind::Plain,
            ))],
        },
        FieldRule {
            field: FieldId::Memo,
            strategies: vec![Box::new(LabeledValue::new(FieldId::Memo, TextKind::Plain))],
        },
        FieldRule {
            field: FieldId::TxnId,
            strategies: vec![Box::new(LabeledValue::new(FieldId::TxnId, TextKind::Plain))],
        },
        FieldRule {
            field: FieldId::Account,
            strategies: vec![Box::new(LabeledValue::new(
                FieldId::Account,
                TextKind::Digits,
            ))],
        },
    ])
}
