//! OCR collaborator interface.
//!
//! The engines themselves are external black boxes; this module defines the
//! token types they produce and the trait the scanner drives them through.

pub mod crop;

#[cfg(feature = "remote")]
pub mod vision;
#[cfg(feature = "remote")]
pub mod worker;

pub use crop::{CropConfig, EdgeCropper, RegionCropper};

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A recognized text fragment from one OCR pass.
///
/// Immutable once produced; bounding geometry is passed through for
/// diagnostics but unused by the extraction logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrToken {
    /// Raw recognized text.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0), when the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Axis-aligned bounding box (x, y, width, height).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f32; 4]>,
}

impl OcrToken {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
            bbox: None,
        }
    }
}

/// One recognition result: the token sequence plus the engine's full text
/// blob with inter-token spacing preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognizedText {
    /// Recognized tokens in engine order.
    pub tokens: Vec<OcrToken>,

    /// Whitespace-joined full text.
    pub full_text: String,
}

impl RecognizedText {
    /// An empty result, used when the engine found no text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from plain token strings; the full text is the
    /// space-join of the tokens.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let full_text = tokens.join(" ");
        Self {
            tokens: tokens.into_iter().map(OcrToken::new).collect(),
            full_text,
        }
    }

    /// Build a result from a full text blob; tokens are its whitespace
    /// splits.
    pub fn from_text(full_text: impl Into<String>) -> Self {
        let full_text = full_text.into();
        let tokens = full_text
            .split_whitespace()
            .map(OcrToken::new)
            .collect();
        Self { tokens, full_text }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.full_text.trim().is_empty()
    }

    /// Borrowed view of the token texts.
    pub fn token_texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// An OCR engine over in-memory image bytes.
///
/// Implementations must treat "no text found" as an empty [`RecognizedText`],
/// reserving `Err` for transport, auth, and service failures.
pub trait OcrEngine: Send + Sync {
    /// Short engine name, recorded in scan metadata.
    fn name(&self) -> &str;

    /// Run one recognition pass over the image bytes.
    fn recognize(&self, image: &[u8]) -> std::result::Result<RecognizedText, OcrError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens_joins_full_text() {
        let rec = RecognizedText::from_tokens(vec!["DK".into(), "HG30202".into()]);
        assert_eq!(rec.full_text, "DK HG30202");
        assert_eq!(rec.token_texts(), vec!["DK", "HG30202"]);
    }

    #[test]
    fn test_from_text_splits_tokens() {
        let rec = RecognizedText::from_text("WVWZZZ1JZXW000001 KM 135116");
        assert_eq!(rec.tokens.len(), 3);
        assert_eq!(rec.tokens[1].text, "KM");
    }

    #[test]
    fn test_empty() {
        assert!(RecognizedText::empty().is_empty());
        assert!(!RecognizedText::from_text("a").is_empty());
    }
}
