//! Amount extraction and Vietnamese currency normalization.
//!
//! Amounts print as dot-grouped thousands with a trailing currency token
//! (`1.200.000đ`, `1.200.000 VND`); the dot groups, not decimals. The
//! normalized value is the integer count of đồng.

use regex::Regex;

use crate::error::ConfigError;
use crate::models::config::AmountConfig;

use super::patterns::{self, CANONICAL_AMOUNT, GROUPED_DIGITS};
use super::{Candidate, LineView, Scope, Strategy};

/// Compiled amount patterns plus the configured currency tokens.
#[derive(Debug, Clone)]
pub struct AmountRules {
    labeled: Regex,
    bare: Regex,
    suffixes: Vec<String>,
}

impl AmountRules {
    /// Compile from normalized label variants and amount configuration.
    pub fn from_config(labels: &[String], config: &AmountConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            labeled: patterns::labeled_amount(labels, &config.currency_suffixes)?,
            bare: patterns::bare_amount(&config.currency_suffixes)?,
            suffixes: config.currency_suffixes.clone(),
        })
    }

    /// Build a candidate from a pattern hit, preferring the original line
    /// text for the display form.
    fn candidate(&self, line_text: Option<&str>, matched: &str) -> Option<Candidate> {
        let raw = line_text
            .and_then(|t| canonical_amount_text(t, &self.suffixes))
            .or_else(|| canonical_amount_text(matched, &self.suffixes))?;
        let value = parse_amount(&raw, &self.suffixes)?;
        Some(Candidate::Amount { raw, value })
    }
}

/// Label-anchored amount pattern, per line.
#[derive(Debug, Clone)]
pub struct LabeledAmount {
    rules: AmountRules,
}

impl LabeledAmount {
    pub fn new(rules: AmountRules) -> Self {
        Self { rules }
    }
}

impl Strategy for LabeledAmount {
    fn run(&self, view: &LineView<'_>) -> Option<Candidate> {
        for (i, key) in view.keys.iter().enumerate() {
            if let Some(m) = self.rules.labeled.find(key) {
                if let Some(candidate) = self.rules.candidate(Some(&view.lines[i].text), m.as_str())
                {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

/// Bare amount with a mandatory currency suffix, per line or across the
/// whole joined text.
#[derive(Debug, Clone)]
pub struct BareAmount {
    rules: AmountRules,
    scope: Scope,
}

impl BareAmount {
    pub fn new(rules: AmountRules, scope: Scope) -> Self {
        Self { rules, scope }
    }
}

impl Strategy for BareAmount {
    fn run(&self, view: &LineView<'_>) -> Option<Candidate> {
        match self.scope {
            Scope::Line => {
                for (i, key) in view.keys.iter().enumerate() {
                    if let Some(m) = self.rules.bare.find(key) {
                        if let Some(candidate) =
                            self.rules.candidate(Some(&view.lines[i].text), m.as_str())
                        {
                            return Some(candidate);
                        }
                    }
                }
                None
            }
            Scope::FullText => {
                let m = self.rules.bare.find(view.joined)?;
                self.rules.candidate(None, m.as_str())
            }
        }
    }
}

/// Canonical display form of an amount token: currency words folded to `đ`,
/// spaces removed, sign retained. `None` when no dot-grouped run survives.
pub fn canonical_amount_text(token: &str, suffixes: &[String]) -> Option<String> {
    let mut upper = token.to_uppercase();

    let mut folded: Vec<&String> = suffixes.iter().filter(|s| s.chars().count() > 1).collect();
    folded.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
    for suffix in folded {
        upper = upper.replace(&suffix.to_uppercase(), "đ");
    }

    let compact: String = upper.split_whitespace().collect();
    if let Some(m) = CANONICAL_AMOUNT.find(&compact) {
        return Some(m.as_str().replace(['D', 'Đ'], "đ"));
    }
    GROUPED_DIGITS
        .find(&compact)
        .map(|m| format!("{}đ", m.as_str()))
}

/// Normalize any amount token to đồng: strip currency tokens and grouping
/// separators, keep a leading sign, parse the digits. Total; `None` when no
/// digit survives.
pub fn parse_amount(token: &str, suffixes: &[String]) -> Option<i64> {
    let mut upper = token.to_uppercase();

    let mut sorted: Vec<&String> = suffixes.iter().collect();
    sorted.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
    for suffix in sorted {
        upper = upper.replace(&suffix.to_uppercase(), "");
    }

    let trimmed = upper.trim();
    let negative = trimmed.starts_with('-');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Render đồng back into the grouped display form, e.g. `1.200.000đ`.
pub fn format_amount(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{grouped}đ")
    } else {
        format!("{grouped}đ")
    }
}
