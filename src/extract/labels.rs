//! Label detection against normalized surface variants.
//!
//! Receipt labels occupy the left portion of a layout column, so detection
//! is a starts-with test on the normalization key. Variants are curated to
//! be mutually exclusive prefixes; ties still resolve deterministically to
//! the first configured field.

use crate::models::FieldId;
use crate::models::config::LabelConfig;
use crate::text::normalize;

/// One field's label surface variants, stored normalized.
#[derive(Debug, Clone)]
pub struct LabelSpec {
    pub field: FieldId,
    pub variants: Vec<String>,
}

/// All label specs in configuration order.
#[derive(Debug, Clone)]
pub struct LabelTable {
    specs: Vec<LabelSpec>,
}

impl LabelTable {
    /// Build the table from configuration, normalizing every variant.
    pub fn from_config(config: &LabelConfig) -> Self {
        let specs = FieldId::ALL
            .iter()
            .map(|&field| LabelSpec {
                field,
                variants: config
                    .variants(field)
                    .iter()
                    .map(|v| normalize(v))
                    .filter(|v| !v.is_empty())
                    .collect(),
            })
            .collect();
        Self { specs }
    }

    /// Match a raw line against the table. First configured field wins.
    pub fn match_label(&self, line: &str) -> Option<FieldId> {
        self.match_key(&normalize(line))
    }

    /// Match an already-normalized key against the table.
    pub fn match_key(&self, key: &str) -> Option<FieldId> {
        if key.is_empty() {
            return None;
        }
        self.specs
            .iter()
            .find(|spec| spec.variants.iter().any(|v| key.starts_with(v.as_str())))
            .map(|spec| spec.field)
    }

    /// Longest variant of `field` that prefixes the key.
    pub fn longest_prefix_variant(&self, key: &str, field: FieldId) -> Option<&str> {
        self.variants(field)
            .iter()
            .filter(|v| key.starts_with(v.as_str()))
            .max_by_key(|v| v.len())
            .map(String::as_str)
    }

    /// Normalized variants for one field.
    pub fn variants(&self, field: FieldId) -> &[String] {
        self.specs
            .iter()
            .find(|spec| spec.field == field)
            .map(|spec| spec.variants.as_slice())
            .unwrap_or(&[])
    }

    /// All specs in configuration order.
    pub fn specs(&self) -> &[LabelSpec] {
        &self.specs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LabelTable {
        LabelTable::from_config(&LabelConfig::default())
    }

    #[test]
    fn matches_accented_and_plain_forms() {
        let table = table();
        assert_eq!(table.match_label("Số tiền: 120.000đ"), Some(FieldId::Amount));
        assert_eq!(table.match_label("SO TIEN 120.000"), Some(FieldId::Amount));
        assert_eq!(
            table.match_label("Thời gian: 22:25"),
            Some(FieldId::DateTime)
        );
        assert_eq!(
            table.match_label("nguoi thuc hien"),
            Some(FieldId::Sender)
        );
    }

    #[test]
    fn label_must_anchor_at_line_start() {
        let table = table();
        assert_eq!(table.match_label("tong so tien la 120.000"), None);
        assert_eq!(table.match_label("xem chi tiet giao dich"), None);
    }

    #[test]
    fn non_label_lines_return_none() {
        let table = table();
        assert_eq!(table.match_label("Nguyen Van A"), None);
        assert_eq!(table.match_label(""), None);
        assert_eq!(table.match_label("   "), None);
    }

    #[test]
    fn ties_resolve_to_first_configured_field() {
        let mut config = LabelConfig::default();
        // overlapping prefix in a later field loses to the earlier one
        config.memo.push("số tiền".to_string());
        let table = LabelTable::from_config(&config);
        assert_eq!(table.match_label("Số tiền: x"), Some(FieldId::Amount));
    }

    #[test]
    fn longest_prefix_variant_prefers_longer() {
        let table = table();
        // both "người nhận" and "tên người nhận" prefix this key
        let key = normalize("Tên người nhận: NGUYEN VAN A");
        assert_eq!(
            table.longest_prefix_variant(&key, FieldId::Recipient),
            Some("ten nguoi nhan")
        );
    }

    #[test]
    fn account_labels_do_not_shadow_amount() {
        let table = table();
        assert_eq!(
            table.match_label("Số tài khoản: 0123456789"),
            Some(FieldId::Account)
        );
        assert_eq!(table.match_label("STK: 0123456789"), Some(FieldId::Account));
    }
}
