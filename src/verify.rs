//! Expected-vs-extracted scoring.
//!
//! Downstream confirmation flows hold an expected transaction (the fund
//! amount, the payer's registered name, an account number) and need a soft
//! comparison against what OCR actually produced. Each requested check
//! scores in [0, 100]; the overall score is the mean of the requested
//! checks only. Scores are recomputed on demand and never persisted.

use serde::{Deserialize, Serialize};

use crate::extract::rules::digits_only;
use crate::identity;
use crate::models::ExtractionRecord;
use crate::models::config::IdentityConfig;
use crate::text;

/// Expected transaction values to check an extraction against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedReceipt {
    /// Exact amount in đồng.
    pub amount: Option<i64>,

    /// Beneficiary account number, in any spacing.
    pub account: Option<String>,

    /// Counterparty name, compared through the identity matcher.
    pub name: Option<String>,

    /// Memo text, compared with substring-tolerant similarity.
    pub memo: Option<String>,

    /// Require a date/time to have been extracted at all.
    pub require_datetime: bool,
}

/// Per-check scores in [0, 100]; `None` for checks that were not requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub amount: Option<f64>,
    pub account: Option<f64>,
    pub name: Option<f64>,
    pub memo: Option<f64>,
    pub datetime_present: Option<f64>,

    /// Mean of the requested checks; 0 when nothing was requested.
    pub overall: f64,
}

impl MatchReport {
    /// True when every requested check reaches `threshold`.
    pub fn passed(&self, threshold: f64) -> bool {
        self.checks().iter().all(|score| *score >= threshold)
    }

    fn checks(&self) -> Vec<f64> {
        [
            self.amount,
            self.account,
            self.name,
            self.memo,
            self.datetime_present,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Score an extraction record against expected values.
pub fn score(
    record: &ExtractionRecord,
    expected: &ExpectedReceipt,
    identity: &IdentityConfig,
) -> MatchReport {
    let mut report = MatchReport::default();

    if let Some(amount) = expected.amount {
        report.amount = Some(if record.amount.value == Some(amount) {
            100.0
        } else {
            0.0
        });
    }

    if let Some(account) = &expected.account {
        let wanted = digits_only(account);
        let got = record.account.normalized.clone().unwrap_or_default();
        report.account = Some(if wanted.is_empty() || got.is_empty() {
            0.0
        } else {
            identity::partial_similarity(&wanted, &got)
        });
    }

    if let Some(name) = &expected.name {
        // the receipt's counterparty line, whichever side was printed
        let got = record
            .recipient
            .raw
            .as_deref()
            .or(record.sender.raw.as_deref())
            .unwrap_or("");
        report.name = Some(identity::similarity(name, got, identity));
    }

    if let Some(memo) = &expected.memo {
        let wanted = text::normalize(memo);
        let got = record
            .memo
            .raw
            .as_deref()
            .map(text::normalize)
            .unwrap_or_default();
        report.memo = Some(if wanted.is_empty() || got.is_empty() {
            0.0
        } else {
            identity::partial_similarity(&wanted, &got)
        });
    }

    if expected.require_datetime {
        report.datetime_present = Some(if record.datetime.raw.is_some() {
            100.0
        } else {
            0.0
        });
    }

    let checks = report.checks();
    report.overall = if checks.is_empty() {
        0.0
    } else {
        checks.iter().sum::<f64>() / checks.len() as f64
    };
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ReceiptEngine;
    use crate::models::OcrLine;

    fn record(texts: &[&str]) -> ExtractionRecord {
        let lines: Vec<OcrLine> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| OcrLine::new(i, *t))
            .collect();
        ReceiptEngine::new().extract(&lines)
    }

    #[test]
    fn exact_amount_scores_full() {
        let record = record(&["Số tiền: 120.000đ"]);
        let expected = ExpectedReceipt {
            amount: Some(120_000),
            ..Default::default()
        };
        let report = score(&record, &expected, &IdentityConfig::default());
        assert_eq!(report.amount, Some(100.0));
        assert_eq!(report.overall, 100.0);
        assert!(report.passed(67.0));
    }

    #[test]
    fn wrong_amount_scores_zero() {
        let record = record(&["Số tiền: 100.000đ"]);
        let expected = ExpectedReceipt {
            amount: Some(120_000),
            ..Default::default()
        };
        let report = score(&record, &expected, &IdentityConfig::default());
        assert_eq!(report.amount, Some(0.0));
        assert!(!report.passed(67.0));
    }

    #[test]
    fn name_goes_through_identity_matcher() {
        let record = record(&["Người thực hiện: NGUYEN VAN A"]);
        let expected = ExpectedReceipt {
            name: Some("Nguyễn Văn A".into()),
            ..Default::default()
        };
        let report = score(&record, &expected, &IdentityConfig::default());
        assert_eq!(report.name, Some(100.0));
    }

    #[test]
    fn overall_averages_requested_checks_only() {
        let record = record(&["Số tiền: 120.000đ"]);
        let expected = ExpectedReceipt {
            amount: Some(120_000),
            require_datetime: true,
            ..Default::default()
        };
        let report = score(&record, &expected, &IdentityConfig::default());
        assert_eq!(report.amount, Some(100.0));
        assert_eq!(report.datetime_present, Some(0.0));
        assert_eq!(report.name, None);
        assert_eq!(report.overall, 50.0);
    }

    #[test]
    fn nothing_requested_scores_zero_overall() {
        let record = record(&[]);
        let report = score(
            &record,
            &ExpectedReceipt::default(),
            &IdentityConfig::default(),
        );
        assert_eq!(report.overall, 0.0);
        assert_eq!(report.amount, None);
        // vacuously true: nothing was requested
        assert!(report.passed(100.0));
    }

    #[test]
    fn account_tolerates_spacing_differences() {
        let record = record(&["STK: 0123 456 789"]);
        let expected = ExpectedReceipt {
            account: Some("0123456789".into()),
            ..Default::default()
        };
        let report = score(&record, &expected, &IdentityConfig::default());
        assert_eq!(report.account, Some(100.0));
    }

    #[test]
    fn memo_uses_substring_similarity() {
        let record = record(&["Nội dung: CK den Gop quy thang 9"]);
        let expected = ExpectedReceipt {
            memo: Some("gop quy thang 9".into()),
            ..Default::default()
        };
        let report = score(&record, &expected, &IdentityConfig::default());
        assert_eq!(report.memo, Some(100.0));
    }
}
