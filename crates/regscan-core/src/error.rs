//! Error types for the regscan-core library.

use thiserror::Error;

/// Main error type for the regscan library.
#[derive(Error, Debug)]
pub enum RegscanError {
    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Motor registry lookup error.
    #[cfg(feature = "remote")]
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Image decode or encode error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the OCR collaborator.
///
/// An engine returning no text is not an error; these cover transport,
/// auth, and service-level failures only.
#[derive(Error, Debug)]
pub enum OcrError {
    /// HTTP transport failure reaching the engine.
    #[cfg(feature = "remote")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Engine rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Engine-side failure reported in the response body.
    #[error("engine failure: {0}")]
    Service(String),

    /// The response could not be decoded.
    #[error("malformed engine response: {0}")]
    Decode(String),
}

/// Errors from the Danish motor register client.
#[cfg(feature = "remote")]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No API token configured.
    #[error("no registry API token configured (set registry.api_token or MOTORAPI_KEY)")]
    MissingToken,

    /// No vehicle registered under the plate.
    #[error("no vehicle found for plate {0}")]
    NotFound(String),

    /// Token rejected by the registry.
    #[error("registry rejected the API token")]
    Unauthorized,

    /// Any other non-success status.
    #[error("registry returned status {0}")]
    Status(u16),

    /// HTTP transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type for the regscan library.
pub type Result<T> = std::result::Result<T, RegscanError>;
