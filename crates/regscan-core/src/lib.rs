//! Core library for Danish vehicle registration OCR.
//!
//! This crate provides:
//! - the token normalizer and the plate/VIN/odometer extractors
//! - the configurable disambiguation policy and pipeline
//! - OCR engine clients (worker service and cloud vision) and the
//!   plate-region pre-crop
//! - the Danish motor register lookup client

pub mod error;
pub mod models;
pub mod ocr;
#[cfg(feature = "remote")]
pub mod registry;
pub mod scanner;
pub mod vehicle;

pub use error::{OcrError, RegscanError, Result};
pub use models::config::RegscanConfig;
pub use models::scan::{OdometerReading, ScanMetadata, VehicleScan};
pub use ocr::{EdgeCropper, OcrEngine, OcrToken, RecognizedText, RegionCropper};
pub use scanner::Scanner;
pub use vehicle::{ScanPipeline, ScanPolicy};

#[cfg(feature = "remote")]
pub use error::RegistryError;
#[cfg(feature = "remote")]
pub use ocr::{vision::VisionOcr, worker::WorkerOcr};
#[cfg(feature = "remote")]
pub use registry::MotorRegistry;
