//! End-to-end image scan: optional pre-crop, one OCR call, extraction.

use std::borrow::Cow;
use std::io::Cursor;
use std::time::Instant;

use image::ImageFormat;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::scan::VehicleScan;
use crate::ocr::crop::RegionCropper;
use crate::ocr::OcrEngine;
use crate::vehicle::pipeline::ScanPipeline;
use crate::vehicle::policy::ScanPolicy;

/// One scanner per process: the engine handle and compiled pipeline are
/// built once and reused read-only across requests.
pub struct Scanner {
    engine: Box<dyn OcrEngine>,
    cropper: Option<Box<dyn RegionCropper>>,
    pipeline: ScanPipeline,
}

impl Scanner {
    pub fn new(engine: Box<dyn OcrEngine>, policy: ScanPolicy) -> Self {
        Self {
            engine,
            cropper: None,
            pipeline: ScanPipeline::new(policy),
        }
    }

    /// Attach a plate-region cropper; its absence, or a crop miss, falls
    /// back to the full image.
    pub fn with_cropper(mut self, cropper: Box<dyn RegionCropper>) -> Self {
        self.cropper = Some(cropper);
        self
    }

    /// Scan one image, given as in-memory bytes.
    pub fn scan(&self, image: &[u8]) -> Result<VehicleScan> {
        let start = Instant::now();

        // Decode only when a cropper wants pixels; the engines take the
        // carrier bytes as-is
        let mut cropped = false;
        let mut payload: Cow<'_, [u8]> = Cow::Borrowed(image);
        if let Some(cropper) = &self.cropper {
            let decoded = image::load_from_memory(image)?;
            if let Some(region) = cropper.locate_plate_region(&decoded) {
                let mut buffer = Cursor::new(Vec::new());
                region.write_to(&mut buffer, ImageFormat::Png)?;
                payload = Cow::Owned(buffer.into_inner());
                cropped = true;
            }
        }

        let recognized = self.engine.recognize(&payload)?;
        debug!(
            engine = self.engine.name(),
            tokens = recognized.tokens.len(),
            cropped,
            "recognition complete"
        );

        let mut scan = self.pipeline.scan(&recognized);
        scan.metadata.engine = Some(self.engine.name().to_string());
        scan.metadata.plate_region_cropped = cropped;
        scan.metadata.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            plate = scan.plate.as_deref().unwrap_or("-"),
            vin = scan.vin.as_deref().unwrap_or("-"),
            odometer = %scan.odometer.as_ref().map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
            "scan complete"
        );

        Ok(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::models::scan::OdometerReading;
    use crate::ocr::RecognizedText;
    use image::DynamicImage;

    struct FixedEngine {
        tokens: Vec<String>,
    }

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, _image: &[u8]) -> std::result::Result<RecognizedText, OcrError> {
            Ok(RecognizedText::from_tokens(self.tokens.clone()))
        }
    }

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _image: &[u8]) -> std::result::Result<RecognizedText, OcrError> {
            Err(OcrError::Service("engine down".to_string()))
        }
    }

    struct AlwaysCrops;

    impl RegionCropper for AlwaysCrops {
        fn locate_plate_region(&self, image: &DynamicImage) -> Option<DynamicImage> {
            Some(image.crop_imm(0, 0, image.width() / 2, image.height()))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(200, 50);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_scan_records_engine_metadata() {
        let scanner = Scanner::new(
            Box::new(FixedEngine {
                tokens: vec!["DK".to_string(), "HG30202".to_string()],
            }),
            ScanPolicy::default(),
        );

        let scan = scanner.scan(&png_bytes()).unwrap();
        assert_eq!(scan.plate.as_deref(), Some("HG30202"));
        assert_eq!(scan.metadata.engine.as_deref(), Some("fixed"));
        assert!(!scan.metadata.plate_region_cropped);
    }

    #[test]
    fn test_crop_is_recorded() {
        let scanner = Scanner::new(
            Box::new(FixedEngine {
                tokens: vec!["151517".to_string()],
            }),
            ScanPolicy::default(),
        )
        .with_cropper(Box::new(AlwaysCrops));

        let scan = scanner.scan(&png_bytes()).unwrap();
        assert!(scan.metadata.plate_region_cropped);
        assert_eq!(scan.odometer, Some(OdometerReading::Total(151517)));
    }

    #[test]
    fn test_engine_failure_surfaces_as_error() {
        let scanner = Scanner::new(Box::new(FailingEngine), ScanPolicy::default());
        assert!(scanner.scan(&png_bytes()).is_err());
    }

    #[test]
    fn test_undecodable_bytes_fail_only_when_cropping() {
        let garbage = b"not an image";

        let plain = Scanner::new(
            Box::new(FixedEngine { tokens: vec![] }),
            ScanPolicy::default(),
        );
        assert!(plain.scan(garbage).is_ok());

        let cropping = Scanner::new(
            Box::new(FixedEngine { tokens: vec![] }),
            ScanPolicy::default(),
        )
        .with_cropper(Box::new(AlwaysCrops));
        assert!(cropping.scan(garbage).is_err());
    }
}
