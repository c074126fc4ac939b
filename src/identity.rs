//! Fuzzy identity matching between OCR names and reference names.
//!
//! OCR mangles accents, casing, and spacing, so a single edit-distance
//! ratio is too brittle. Several measures run side by side and the best
//! score wins; the acceptance threshold and the measure set are
//! configuration, not code.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

use crate::models::config::IdentityConfig;
use crate::text;

/// Similarity measures available to the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMeasure {
    /// Plain normalized edit-distance ratio.
    Levenshtein,
    /// Best edit-distance ratio of the shorter string against a sliding
    /// window of the longer one.
    Partial,
    /// Edit-distance ratio after sorting tokens.
    TokenSort,
    /// Edit-distance ratio over token-set intersections and remainders.
    TokenSet,
    /// Longest-common-subsequence length ratio.
    CommonSubsequence,
}

/// Comparison key for a name: normalization key with `đ` folded to `d` and
/// punctuation dropped.
pub fn name_key(s: &str) -> String {
    let normalized = text::normalize(s);
    let folded: String = normalized
        .chars()
        .map(|c| if c == 'đ' { 'd' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    text::collapse_whitespace(&folded)
}

/// Best similarity score between two names over the configured measures,
/// in [0, 100]. Exact key equality short-circuits to 100.
pub fn similarity(a: &str, b: &str, config: &IdentityConfig) -> f64 {
    let (ka, kb) = (name_key(a), name_key(b));
    if ka.is_empty() || kb.is_empty() {
        return 0.0;
    }
    if ka == kb {
        return 100.0;
    }
    config
        .measures
        .iter()
        .map(|m| measure(*m, &ka, &kb))
        .fold(0.0, f64::max)
}

/// True when the best similarity reaches the configured threshold.
/// Empty names never match.
pub fn names_match(a: &str, b: &str, config: &IdentityConfig) -> bool {
    similarity(a, b, config) >= config.threshold
}

fn measure(kind: SimilarityMeasure, a: &str, b: &str) -> f64 {
    match kind {
        SimilarityMeasure::Levenshtein => ratio(a, b),
        SimilarityMeasure::Partial => partial_similarity(a, b),
        SimilarityMeasure::TokenSort => token_sort_ratio(a, b),
        SimilarityMeasure::TokenSet => token_set_ratio(a, b),
        SimilarityMeasure::CommonSubsequence => lcs_ratio(a, b),
    }
}

fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Substring-tolerant ratio: the shorter string slides over the longer one
/// and the best window score wins.
pub fn partial_similarity(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_chars: Vec<char> = short.chars().collect();
    let long_chars: Vec<char> = long.chars().collect();
    if short_chars.is_empty() {
        return 0.0;
    }
    if short_chars.len() == long_chars.len() {
        return ratio(short, long);
    }

    let mut best = 0.0f64;
    for start in 0..=(long_chars.len() - short_chars.len()) {
        let window: String = long_chars[start..start + short_chars.len()].iter().collect();
        best = best.max(ratio(short, &window));
    }
    best
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let common: String = set_a
        .intersection(&set_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let only_a: String = set_a
        .difference(&set_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let only_b: String = set_b
        .difference(&set_a)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let combined_a = join_nonempty(&common, &only_a);
    let combined_b = join_nonempty(&common, &only_b);

    ratio(&common, &combined_a)
        .max(ratio(&common, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

fn lcs_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let mut prev = vec![0usize; b_chars.len() + 1];
    let mut row = vec![0usize; b_chars.len() + 1];
    for &ca in &a_chars {
        for (j, &cb) in b_chars.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(row[j])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }

    let lcs = prev[b_chars.len()] as f64;
    200.0 * lcs / (a_chars.len() + b_chars.len()) as f64
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(threshold: f64) -> IdentityConfig {
        IdentityConfig {
            threshold,
            ..IdentityConfig::default()
        }
    }

    #[test]
    fn name_key_folds_accents_and_punctuation() {
        assert_eq!(name_key("Nguyễn Văn A."), "nguyen van a");
        assert_eq!(name_key("ĐOÀN  NHẬT MINH"), "doan nhat minh");
        assert_eq!(name_key("Trần–Thị B"), "tranthi b");
    }

    #[test]
    fn accent_and_case_variants_match() {
        let cfg = config(67.0);
        assert!(names_match("Nguyễn Văn A", "NGUYEN VAN A", &cfg));
        assert_eq!(similarity("Nguyễn Văn A", "NGUYEN VAN A", &cfg), 100.0);
    }

    #[test]
    fn unrelated_names_do_not_match() {
        let cfg = config(67.0);
        assert!(!names_match("Nguyen Van A", "Tran Thi B", &cfg));
    }

    #[test]
    fn empty_names_never_match() {
        let cfg = config(0.0);
        assert!(!names_match("", "Nguyen Van A", &cfg));
        assert!(!names_match("Nguyen Van A", "   ", &cfg));
    }

    #[test]
    fn token_subset_scores_high() {
        let cfg = config(67.0);
        // OCR often drops or appends a token
        assert!(names_match("Nguyen Van A", "Nguyen Van A GD 123", &cfg));
    }

    #[test]
    fn reordered_tokens_score_high() {
        let cfg = config(90.0);
        assert!(names_match("Van A Nguyen", "Nguyen Van A", &cfg));
    }

    #[test]
    fn thresholds_gate_borderline_pairs() {
        // one character off in a short name
        let loose = config(67.0);
        let strict = config(99.0);
        assert!(names_match("Nguyen Van A", "Nguyen Van 4", &loose));
        assert!(!names_match("Nguyen Van A", "Nguyen Van 4", &strict));
    }

    #[test]
    fn measure_set_is_honored() {
        // substring overlap only counts when Partial is configured
        let only_plain = IdentityConfig {
            threshold: 90.0,
            measures: vec![SimilarityMeasure::Levenshtein],
        };
        let only_partial = IdentityConfig {
            threshold: 90.0,
            measures: vec![SimilarityMeasure::Partial],
        };
        let (a, b) = ("Nguyen Van A", "GD: Nguyen Van A 09/2025");
        assert!(!names_match(a, b, &only_plain));
        assert!(names_match(a, b, &only_partial));
    }

    #[test]
    fn partial_similarity_finds_embedded_name() {
        let score = partial_similarity("nguyen van a", "ck den nguyen van a so tien");
        assert_eq!(score, 100.0);
    }

    #[test]
    fn lcs_ratio_bounds() {
        assert_eq!(lcs_ratio("abc", "abc"), 100.0);
        assert_eq!(lcs_ratio("abc", "xyz"), 0.0);
    }
}
