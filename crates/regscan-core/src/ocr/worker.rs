//! Embedded OCR worker engine (engine A).
//!
//! Talks to the EasyOCR worker service: one multipart POST per image, the
//! response carries the recognized tokens as `raw_text`.

use reqwest::blocking::multipart;
use serde::Deserialize;
use tracing::debug;

use super::{OcrEngine, RecognizedText};
use crate::error::OcrError;

/// Client for the OCR worker service.
///
/// Holds one blocking HTTP client for the process lifetime; the connection
/// pool amortizes setup across requests.
pub struct WorkerOcr {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WorkerResponse {
    #[serde(default)]
    raw_text: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

impl WorkerOcr {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl OcrEngine for WorkerOcr {
    fn name(&self) -> &str {
        "worker"
    }

    fn recognize(&self, image: &[u8]) -> Result<RecognizedText, OcrError> {
        let part = multipart::Part::bytes(image.to_vec())
            .file_name("scan.jpg")
            .mime_str("image/jpeg")?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .multipart(form)
            .send()?
            .error_for_status()?;

        let body: WorkerResponse = response
            .json()
            .map_err(|e| OcrError::Decode(e.to_string()))?;

        let recognized = collect_text(body)?;
        debug!(tokens = recognized.tokens.len(), "worker OCR pass complete");
        Ok(recognized)
    }
}

/// A body-carried `error` field reports a worker-side failure even under
/// HTTP 200; it takes precedence over any tokens in the same body.
fn collect_text(body: WorkerResponse) -> Result<RecognizedText, OcrError> {
    if let Some(message) = body.error {
        return Err(OcrError::Service(message));
    }
    Ok(RecognizedText::from_tokens(body.raw_text))
}
