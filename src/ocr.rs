//! OCR collaborator boundary.
//!
//! The recognizer is an external collaborator; this module owns the only
//! two things the engine needs from it: resolving its historical output
//! shapes into one ordered [`OcrLine`] list, and a one-time initialization
//! barrier for a shared recognizer instance. The extraction core never
//! branches on recognizer shape.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::OcrError;
use crate::models::OcrLine;
use crate::text::collapse_whitespace;

/// Raw recognizer output.
///
/// Depending on the engine generation, recognition returns either a list
/// of items carrying per-item confidence or a bare list of text strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecognizerOutput {
    /// Items with text and optional confidence.
    Items(Vec<RecognizedItem>),
    /// Bare text lines.
    Texts(Vec<String>),
}

/// One recognized item from the item-list shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizedItem {
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RecognizerOutput {
    /// Resolve into the ordered line list: collapse whitespace, drop empty
    /// lines, assign positions.
    pub fn into_lines(self) -> Vec<OcrLine> {
        let items: Vec<(String, Option<f32>)> = match self {
            RecognizerOutput::Items(items) => items
                .into_iter()
                .map(|item| (item.text, item.confidence))
                .collect(),
            RecognizerOutput::Texts(texts) => {
                texts.into_iter().map(|text| (text, None)).collect()
            }
        };

        items
            .into_iter()
            .map(|(text, confidence)| (collapse_whitespace(&text), confidence))
            .filter(|(text, _)| !text.is_empty())
            .enumerate()
            .map(|(index, (text, confidence))| OcrLine {
                text,
                index,
                confidence,
            })
            .collect()
    }

    /// Resolve a JSON payload in either shape.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, OcrError> {
        serde_json::from_value(value.clone()).map_err(|_| OcrError::UnknownShape)
    }
}

/// Source of OCR lines, injected by the calling application.
pub trait LineSource {
    /// Recognize an image into raw recognizer output.
    fn recognize(&self, image: &[u8]) -> Result<RecognizerOutput, OcrError>;
}

/// One-time initialization barrier for a shared recognizer instance.
///
/// Recognizer construction is expensive (model loading), so callers hold
/// one of these in shared state and build the instance on first use. No
/// ambient global is involved; the cell is owned by whoever creates it.
pub struct SharedRecognizer<S> {
    cell: OnceLock<S>,
}

impl<S> SharedRecognizer<S> {
    /// Create an empty barrier.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Get the recognizer, constructing it on the first call. Concurrent
    /// callers block until the single initialization finishes.
    pub fn get_or_init(&self, init: impl FnOnce() -> S) -> &S {
        self.cell.get_or_init(init)
    }

    /// Get the recognizer if it was already initialized.
    pub fn get(&self) -> Option<&S> {
        self.cell.get()
    }
}

impl<S> Default for SharedRecognizer<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_shapes_resolve_to_the_same_lines() {
        let items = RecognizerOutput::Items(vec![
            RecognizedItem {
                text: "Số tiền:  120.000đ".into(),
                confidence: Some(0.93),
            },
            RecognizedItem {
                text: "   ".into(),
                confidence: Some(0.1),
            },
            RecognizedItem {
                text: "Gop quy".into(),
                confidence: None,
            },
        ]);
        let texts = RecognizerOutput::Texts(vec![
            "Số tiền:  120.000đ".into(),
            "   ".into(),
            "Gop quy".into(),
        ]);

        let from_items = items.into_lines();
        let from_texts = texts.into_lines();

        let texts_only =
            |lines: &[OcrLine]| lines.iter().map(|l| l.text.clone()).collect::<Vec<_>>();
        assert_eq!(texts_only(&from_items), texts_only(&from_texts));
        assert_eq!(from_items.len(), 2);
        assert_eq!(from_items[0].text, "Số tiền: 120.000đ");
        assert_eq!(from_items[0].index, 0);
        assert_eq!(from_items[0].confidence, Some(0.93));
        assert_eq!(from_items[1].index, 1);
    }

    #[test]
    fn json_payloads_resolve_by_shape() {
        let items = serde_json::json!([
            {"text": "Gop quy", "confidence": 0.9},
            {"text": "120.000đ"}
        ]);
        let texts = serde_json::json!(["Gop quy", "120.000đ"]);

        let from_items = RecognizerOutput::from_json(&items).unwrap().into_lines();
        let from_texts = RecognizerOutput::from_json(&texts).unwrap().into_lines();
        assert_eq!(from_items.len(), 2);
        assert_eq!(from_items[0].confidence, Some(0.9));
        assert_eq!(from_texts[1].text, "120.000đ");
    }

    #[test]
    fn unknown_payload_shape_is_an_error() {
        let bad = serde_json::json!({"unexpected": true});
        assert!(matches!(
            RecognizerOutput::from_json(&bad),
            Err(OcrError::UnknownShape)
        ));
    }

    #[test]
    fn shared_recognizer_initializes_once() {
        let shared: SharedRecognizer<u32> = SharedRecognizer::new();
        assert!(shared.get().is_none());
        assert_eq!(*shared.get_or_init(|| 7), 7);
        assert_eq!(*shared.get_or_init(|| 9), 7);
        assert_eq!(shared.get(), Some(&7));
    }
}
