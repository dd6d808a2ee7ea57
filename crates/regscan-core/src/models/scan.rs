//! Scan result models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The result of one extraction pass.
///
/// Only legitimately found fields are populated; the disambiguation policy
/// guarantees no digit run is attributed to two fields at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleScan {
    /// Recognized license plate, letters and digits with no separator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,

    /// Recognized odometer or trip-meter reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer: Option<OdometerReading>,

    /// Recognized 17-character chassis number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,

    /// Raw OCR tokens, kept for diagnostics.
    pub raw_text: Vec<String>,

    /// Scan metadata.
    pub metadata: ScanMetadata,
}

impl VehicleScan {
    /// True when no identifier was recognized at all.
    pub fn is_empty(&self) -> bool {
        self.plate.is_none() && self.odometer.is_none() && self.vin.is_none()
    }
}

/// An odometer value: either the cumulative total or an instantaneous
/// trip-meter reading.
///
/// Serialized untagged, so JSON carries a plain number for totals and a
/// decimal string for trip readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OdometerReading {
    /// Cumulative reading in whole kilometers.
    Total(u32),
    /// Trip-meter reading with its fractional part.
    Trip(Decimal),
}

impl std::fmt::Display for OdometerReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Total(km) => write!(f, "{km}"),
            Self::Trip(km) => write!(f, "{km}"),
        }
    }
}

/// Metadata attached to every scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// Name of the OCR engine that produced the tokens, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// When the scan ran.
    pub scanned_at: DateTime<Utc>,

    /// Total processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Whether the plate-region pre-crop was applied.
    pub plate_region_cropped: bool,

    /// Extraction warnings.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_odometer_reading_serializes_untagged() {
        let total = serde_json::to_string(&OdometerReading::Total(84213)).unwrap();
        assert_eq!(total, "84213");

        let trip =
            serde_json::to_string(&OdometerReading::Trip(Decimal::from_str("19.3").unwrap()))
                .unwrap();
        assert_eq!(trip, "\"19.3\"");
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let scan = VehicleScan {
            plate: Some("HG30202".to_string()),
            odometer: None,
            vin: None,
            raw_text: vec!["DK".to_string(), "HG30202".to_string()],
            metadata: ScanMetadata {
                engine: None,
                scanned_at: Utc::now(),
                processing_time_ms: 0,
                plate_region_cropped: false,
                warnings: Vec::new(),
            },
        };

        let json = serde_json::to_string(&scan).unwrap();
        assert!(json.contains("\"plate\":\"HG30202\""));
        assert!(!json.contains("odometer"));
        assert!(!json.contains("vin"));
    }
}
