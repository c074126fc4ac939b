//! Engine configuration: label variants, pattern tokens, and thresholds.
//!
//! Everything the cascade logic branches on is data here, so supporting a
//! new receipt layout or label spelling is a configuration change.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::identity::SimilarityMeasure;
use crate::models::FieldId;

/// Main configuration for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Label surface variants per field.
    pub labels: LabelConfig,

    /// Amount pattern tokens.
    pub amount: AmountConfig,

    /// Date/time pattern tokens and strictness.
    pub datetime: DateTimeConfig,

    /// Identity matching threshold and measure set.
    pub identity: IdentityConfig,

    /// Cap on echoed diagnostic lines.
    pub echo_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            labels: LabelConfig::default(),
            amount: AmountConfig::default(),
            datetime: DateTimeConfig::default(),
            identity: IdentityConfig::default(),
            echo_limit: 100,
        }
    }
}

/// Label surface variants per field.
///
/// Variants may be given in any accent/case form; they are normalized when
/// the label table is built. Order matters within a list only for prefix
/// stripping (longer variants win); field precedence follows
/// [`FieldId::ALL`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub amount: Vec<String>,
    pub datetime: Vec<String>,
    pub sender: Vec<String>,
    pub recipient: Vec<String>,
    pub memo: Vec<String>,
    pub txn_id: Vec<String>,
    pub account: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            amount: list(&["số tiền", "tổng tiền", "amount", "total"]),
            datetime: list(&["thời gian", "ngày giao dịch", "time", "date"]),
            sender: list(&["người thực hiện", "người gửi", "sender", "from"]),
            recipient: list(&[
                "tên người nhận",
                "người nhận",
                "chủ tài khoản",
                "beneficiary name",
            ]),
            memo: list(&[
                "chi tiết",
                "nội dung",
                "ghi chú",
                "content",
                "detail",
                "description",
            ]),
            txn_id: list(&["mã giao dịch", "transaction id", "reference", "ref"]),
            account: list(&["stk", "số tài khoản", "tài khoản nhận", "account no"]),
        }
    }
}

impl LabelConfig {
    /// Variant list for one field.
    pub fn variants(&self, field: FieldId) -> &[String] {
        match field {
            FieldId::Amount => &self.amount,
            FieldId::DateTime => &self.datetime,
            FieldId::Sender => &self.sender,
            FieldId::Recipient => &self.recipient,
            FieldId::Memo => &self.memo,
            FieldId::TxnId => &self.txn_id,
            FieldId::Account => &self.account,
        }
    }
}

/// Amount pattern configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountConfig {
    /// Currency suffix tokens accepted after a digit group and stripped
    /// during value normalization.
    pub currency_suffixes: Vec<String>,
}

impl Default for AmountConfig {
    fn default() -> Self {
        Self {
            currency_suffixes: vec![
                "vnd".to_string(),
                "vnđ".to_string(),
                "đ".to_string(),
                "d".to_string(),
            ],
        }
    }
}

/// Date/time pattern configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTimeConfig {
    /// Separators accepted between hour and minute, e.g. `22:25` / `22h25`.
    pub time_separators: Vec<char>,

    /// Separators accepted between date components, e.g. `22/09` / `22-09`.
    pub date_separators: Vec<char>,

    /// Require the day to be in [1, 31]. Off by default: only month and
    /// year feed downstream checks, and the day digit is the most frequent
    /// OCR casualty.
    pub strict_day: bool,
}

impl Default for DateTimeConfig {
    fn default() -> Self {
        Self {
            time_separators: vec![':', 'h'],
            date_separators: vec!['/', '-'],
            strict_day: false,
        }
    }
}

/// Identity matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Acceptance threshold on the best similarity score, in [0, 100].
    pub threshold: f64,

    /// Similarity measures to evaluate; the maximum wins.
    pub measures: Vec<SimilarityMeasure>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            threshold: 67.0,
            measures: vec![
                SimilarityMeasure::Levenshtein,
                SimilarityMeasure::Partial,
                SimilarityMeasure::TokenSort,
                SimilarityMeasure::TokenSet,
                SimilarityMeasure::CommonSubsequence,
            ],
        }
    }
}

impl EngineConfig {
    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in FieldId::ALL {
            if self.labels.variants(field).is_empty() {
                return Err(ConfigError::EmptyVariants(field.as_str()));
            }
        }
        if self.amount.currency_suffixes.is_empty() {
            return Err(ConfigError::EmptySuffixes);
        }
        if self.datetime.time_separators.is_empty() {
            return Err(ConfigError::EmptySeparators("time"));
        }
        if self.datetime.date_separators.is_empty() {
            return Err(ConfigError::EmptySeparators("date"));
        }
        if !(0.0..=100.0).contains(&self.identity.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.identity.threshold));
        }
        if self.identity.measures.is_empty() {
            return Err(ConfigError::EmptyMeasures);
        }
        if self.echo_limit == 0 {
            return Err(ConfigError::ZeroEchoLimit);
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_variants_rejected() {
        let mut config = EngineConfig::default();
        config.labels.memo.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyVariants("memo"))
        ));
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let mut config = EngineConfig::default();
        config.identity.threshold = 120.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
    }

    #[test]
    fn zero_echo_limit_rejected() {
        let mut config = EngineConfig::default();
        config.echo_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroEchoLimit)));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.identity.threshold, config.identity.threshold);
        assert_eq!(back.labels.amount, config.labels.amount);
        assert_eq!(back.echo_limit, config.echo_limit);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"identity": {"threshold": 90.0}}"#).unwrap();
        assert_eq!(config.identity.threshold, 90.0);
        assert!(!config.identity.measures.is_empty());
        assert_eq!(config.echo_limit, 100);
    }
}
