//! Regex patterns for receipt field extraction.
//!
//! Fixed token shapes live in the `lazy_static` block; anything that
//! depends on configured label variants, currency suffixes, or separator
//! sets is compiled once at engine construction by the builders below.
//! All patterns run against normalization keys (lowercased,
//! accent-stripped, single-spaced).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Signed, dot-grouped digit run with a currency letter, searched in
    /// space-stripped uppercase text: `1.200.000Đ`, `-120.000D`.
    pub static ref CANONICAL_AMOUNT: Regex =
        Regex::new(r"[+\-]?\d{1,3}(?:\.\d{3})+\s*[đĐdD]").unwrap();

    /// Dot-grouped digit run without a currency letter.
    pub static ref GROUPED_DIGITS: Regex =
        Regex::new(r"\d{1,3}(?:\.\d{3})+").unwrap();
}

/// Compiled date/time token patterns.
#[derive(Debug, Clone)]
pub struct DateTimePatterns {
    /// Combined token in either order, with named `t`/`d` halves.
    pub combined: Regex,
    /// Bare time token with hour/minute/second groups.
    pub time: Regex,
    /// Bare date token with day/month/year groups.
    pub date: Regex,
}

/// Build the date/time patterns from configured separator sets.
pub fn datetime_patterns(
    time_separators: &[char],
    date_separators: &[char],
) -> Result<DateTimePatterns, regex::Error> {
    let ts = char_class(time_separators);
    let ds = char_class(date_separators);

    let time_token = format!(r"\d{{1,2}}{ts}\d{{2}}(?::\d{{2}})?");
    let date_token = format!(r"\d{{1,2}}{ds}\d{{1,2}}{ds}(?:\d{{4}}|\d{{2}})");

    let combined = Regex::new(&format!(
        r"\b(?:(?P<t1>{time_token})\s*-\s*(?P<d1>{date_token})|(?P<d2>{date_token})\s+(?P<t2>{time_token}))\b"
    ))?;
    let time = Regex::new(&format!(
        r"\b(\d{{1,2}}){ts}(\d{{2}})(?::(\d{{2}}))?\b"
    ))?;
    let date = Regex::new(&format!(
        r"\b(\d{{1,2}}){ds}(\d{{1,2}}){ds}(\d{{4}}|\d{{2}})\b"
    ))?;

    Ok(DateTimePatterns {
        combined,
        time,
        date,
    })
}

/// `<label><sep>?<grouped digits><currency suffix>?`, for normalized lines.
pub fn labeled_amount(
    labels: &[String],
    suffixes: &[String],
) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?:{})\s*[:\-]?\s*([+\-]?\d{{1,3}}(?:[. ]\d{{3}})+)\s*(?:{})?",
        alternation(labels),
        alternation_longest_first(suffixes),
    ))
}

/// Grouped digits with a mandatory currency suffix, anywhere in a line.
pub fn bare_amount(suffixes: &[String]) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"([+\-]?\s*\d{{1,3}}(?:[. ]\d{{3}})+)\s*(?:{})\b",
        alternation_longest_first(suffixes),
    ))
}

fn alternation(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

/// Alternation with longer tokens first, so `vnd` wins over `d`.
fn alternation_longest_first(tokens: &[String]) -> String {
    let mut sorted: Vec<&String> = tokens.iter().collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    sorted
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

fn char_class(chars: &[char]) -> String {
    let escaped: String = chars.iter().map(|c| regex::escape(&c.to_string())).collect();
    format!("[{escaped}]")
}
