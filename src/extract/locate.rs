//! Value location relative to a label-matched line.
//!
//! Receipt layouts place a value on the same line as its label, on the
//! next line (two-column layouts that OCR splits), or a few lines below.
//! The lookup protocol is ordered and deterministic: same-line suffix,
//! two-line join, then a bounded lookahead.

use crate::models::{FieldId, OcrLine, RawMatch};
use crate::text::{collapse_whitespace, normalize};

use super::labels::LabelTable;

/// How many following lines the lookahead step inspects.
const LOOKAHEAD: usize = 3;

/// Separator characters trimmed from value edges.
const EDGE_SEPARATORS: [char; 6] = [' ', ':', '|', '-', '–', '—'];

/// Locate the value belonging to the label on `label_index`.
///
/// `line_index` on the returned match is the line the value was read from:
/// the label line itself for same-line and two-line hits, a later line for
/// lookahead hits.
pub fn locate_value(
    lines: &[OcrLine],
    label_index: usize,
    field: FieldId,
    table: &LabelTable,
) -> Option<RawMatch> {
    let current = lines.get(label_index)?;

    // 1. same-line suffix
    if let Some(value) = suffix_after_label(&current.text, field, table) {
        return Some(RawMatch {
            field,
            line_index: Some(label_index),
            raw: value,
        });
    }

    // 2. two-line join, for label/value pairs OCR split across a column gap
    if let Some(next) = lines.get(label_index + 1) {
        let joined = format!("{} {}", current.text.trim(), next.text.trim());
        if let Some(value) = suffix_after_label(&joined, field, table) {
            // a misjoined neighboring label is not a value
            if table.match_label(&value).is_none() {
                return Some(RawMatch {
                    field,
                    line_index: Some(label_index),
                    raw: value,
                });
            }
        }
    }

    // 3. lookahead over the next few lines, skipping other label lines
    for (offset, line) in lines
        .iter()
        .enumerate()
        .skip(label_index + 1)
        .take(LOOKAHEAD)
    {
        if table.match_label(&line.text).is_some() {
            continue;
        }
        if let Some(value) = clean_value(&line.text) {
            return Some(RawMatch {
                field,
                line_index: Some(offset),
                raw: value,
            });
        }
    }

    None
}

/// Strip the matched label from the front of `line` and clean what remains.
fn suffix_after_label(line: &str, field: FieldId, table: &LabelTable) -> Option<String> {
    let key = normalize(line);
    let variant = table.longest_prefix_variant(&key, field)?;
    let rest = strip_label_prefix(line, variant)?;
    clean_value(rest)
}

/// Consume the label prefix from the original-cased line.
///
/// Walks char boundaries until the normalization of the consumed prefix
/// equals the variant, then returns the remainder. Normalized length grows
/// monotonically with the prefix, so the walk stops early once it passes
/// the variant length.
fn strip_label_prefix<'a>(line: &'a str, variant: &str) -> Option<&'a str> {
    let boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(std::iter::once(line.len()));

    for end in boundaries {
        let prefix = normalize(&line[..end]);
        if prefix == variant {
            return Some(&line[end..]);
        }
        if prefix.len() > variant.len() {
            break;
        }
    }
    None
}

/// Trim separator characters from both edges and collapse inner whitespace.
/// Returns `None` when nothing survives.
fn clean_value(s: &str) -> Option<String> {
    let trimmed = s.trim_matches(|c: char| EDGE_SEPARATORS.contains(&c));
    let collapsed = collapse_whitespace(trimmed);
    (!collapsed.is_empty()).then_some(collapsed)
}
