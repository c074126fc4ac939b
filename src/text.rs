//! Accent-insensitive text normalization.
//!
//! OCR output for Vietnamese receipts arrives with unreliable diacritics and
//! spacing; every label comparison in the engine happens on the normalization
//! key produced here.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Remove diacritical marks: decompose to base letter plus combining marks,
/// drop the marks, recompose.
///
/// `đ`/`Đ` carry no combining mark and pass through unchanged; amount and
/// name handling account for that separately.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalization key: accent-stripped, lowercased, whitespace-collapsed.
///
/// Total and idempotent; empty input yields an empty string.
pub fn normalize(s: &str) -> String {
    collapse_whitespace(&strip_accents(s).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_vietnamese_accents() {
        assert_eq!(strip_accents("Số tiền"), "So tien");
        assert_eq!(strip_accents("Thời gian"), "Thoi gian");
        assert_eq!(strip_accents("Nguyễn Văn A"), "Nguyen Van A");
    }

    #[test]
    fn dong_sign_survives_stripping() {
        // U+0111 has no canonical decomposition
        assert_eq!(strip_accents("đ"), "đ");
        assert_eq!(strip_accents("VNĐ"), "VNĐ");
    }

    #[test]
    fn normalize_folds_case_and_whitespace() {
        assert_eq!(normalize("  Số   TIỀN : "), "so tien :");
        assert_eq!(normalize("Người\tthực\nhiện"), "nguoi thuc hien");
    }

    #[test]
    fn normalize_is_total() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n  "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "Số tiền: 1.200.000đ",
            "THỜI GIAN  22:25 - 22/09/2025",
            "Nguyễn   Văn A",
            "đã thanh toán",
            "",
            "plain ascii",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
