//! Cloud text-detection engine (engine B).
//!
//! One JSON POST per image against the annotate endpoint, image bytes
//! base64-encoded inline. A response-carried error means "no text found";
//! only transport and auth failures become `Err`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{OcrEngine, OcrToken, RecognizedText};
use crate::error::OcrError;

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Client for the cloud vision annotate API.
pub struct VisionOcr {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AnnotateBody {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    error: Option<AnnotateError>,
    #[serde(default)]
    text_annotations: Vec<Annotation>,
}

#[derive(Debug, Deserialize)]
struct AnnotateError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Annotation {
    #[serde(default)]
    description: String,
}

impl VisionOcr {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the annotate endpoint, for tests and proxies.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

fn auth_failure(status: StatusCode) -> Option<OcrError> {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        .then(|| OcrError::Auth(format!("vision API rejected credentials ({status})")))
}

/// Turn one annotate response into recognized text. A response-carried
/// error or an empty annotation list both mean "no text found".
fn collect_text(annotate: AnnotateResponse) -> RecognizedText {
    if let Some(error) = annotate.error {
        warn!(message = %error.message, "vision API reported a soft error");
        return RecognizedText::empty();
    }

    // First annotation is the full text blob, the rest are word tokens
    let mut annotations = annotate.text_annotations.into_iter();
    let Some(full) = annotations.next() else {
        return RecognizedText::empty();
    };

    let tokens: Vec<OcrToken> = annotations.map(|a| OcrToken::new(a.description)).collect();
    RecognizedText {
        tokens,
        full_text: full.description,
    }
}

impl OcrEngine for VisionOcr {
    fn name(&self) -> &str {
        "vision"
    }

    fn recognize(&self, image: &[u8]) -> Result<RecognizedText, OcrError> {
        let request = json!({
            "requests": [{
                "image": { "content": BASE64.encode(image) },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()?;

        if let Some(rejected) = auth_failure(response.status()) {
            return Err(rejected);
        }
        let response = response.error_for_status()?;

        let body: AnnotateBody = response
            .json()
            .map_err(|e| OcrError::Decode(e.to_string()))?;

        let recognized = body
            .responses
            .into_iter()
            .next()
            .map(collect_text)
            .unwrap_or_else(RecognizedText::empty);

        debug!(tokens = recognized.tokens.len(), "vision OCR pass complete");
        Ok(recognized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn annotation(text: &str) -> Annotation {
        Annotation {
            description: text.to_string(),
        }
    }

    #[test]
    fn test_collect_text_splits_full_blob_from_tokens() {
        let annotate = AnnotateResponse {
            error: None,
            text_annotations: vec![
                annotation("DK HG30202"),
                annotation("DK"),
                annotation("HG30202"),
            ],
        };

        let recognized = collect_text(annotate);
        assert_eq!(recognized.full_text, "DK HG30202");
        assert_eq!(recognized.token_texts(), vec!["DK", "HG30202"]);
    }

    #[test]
    fn test_response_error_means_no_text() {
        let annotate = AnnotateResponse {
            error: Some(AnnotateError {
                message: "image too large".to_string(),
            }),
            text_annotations: vec![annotation("DK HG30202")],
        };

        assert!(collect_text(annotate).is_empty());
    }

    #[test]
    fn test_no_annotations_means_no_text() {
        let annotate = AnnotateResponse {
            error: None,
            text_annotations: Vec::new(),
        };
        assert!(collect_text(annotate).is_empty());
    }

    #[test]
    fn test_annotate_body_field_names() {
        let body: AnnotateBody = serde_json::from_str(
            r#"{"responses":[{"textAnnotations":[
                {"description":"WVWZZZ1JZXW000001"},
                {"description":"WVWZZZ1JZXW000001"}
            ]}]}"#,
        )
        .unwrap();

        let annotate = body.responses.into_iter().next().unwrap();
        let recognized = collect_text(annotate);
        assert_eq!(recognized.full_text, "WVWZZZ1JZXW000001");
        assert_eq!(recognized.tokens.len(), 1);
    }

    #[test]
    fn test_auth_failure_statuses() {
        assert!(matches!(
            auth_failure(StatusCode::UNAUTHORIZED),
            Some(OcrError::Auth(_))
        ));
        assert!(matches!(
            auth_failure(StatusCode::FORBIDDEN),
            Some(OcrError::Auth(_))
        ));
        assert!(auth_failure(StatusCode::OK).is_none());
        assert!(auth_failure(StatusCode::INTERNAL_SERVER_ERROR).is_none());
    }
}
