//! The disambiguation pipeline.
//!
//! Runs the extractors in policy order over one recognition result and
//! assembles the scan record. Pure and infallible: a stage finding nothing
//! is a normal outcome, never an error.

use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::models::scan::{ScanMetadata, VehicleScan};
use crate::ocr::RecognizedText;

use super::policy::{ScanPolicy, Stage};
use super::rules::odometer::OdometerExtractor;
use super::rules::plate::{PlateExtractor, plate_digits};
use super::rules::vin::VinExtractor;
use super::rules::FieldExtractor;

/// Compiled extraction pipeline for one policy.
///
/// Shape patterns compile once at construction; `scan` holds no locks and
/// mutates no shared state, so one pipeline serves concurrent callers.
pub struct ScanPipeline {
    policy: ScanPolicy,
    plate: PlateExtractor,
    vin: VinExtractor,
    odometer: OdometerExtractor,
}

impl ScanPipeline {
    pub fn new(policy: ScanPolicy) -> Self {
        let plate = PlateExtractor::with_shapes(&policy.plate_shapes)
            .with_compact_fallback(policy.compact_plate_fallback);
        let odometer = OdometerExtractor::new(policy.odometer_selection, policy.odometer_floor);
        Self {
            policy,
            plate,
            vin: VinExtractor::new(),
            odometer,
        }
    }

    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// Run the extractors in policy order over one recognition result.
    pub fn scan(&self, recognized: &RecognizedText) -> VehicleScan {
        let start = Instant::now();
        let token_texts = recognized.token_texts();

        let mut plate: Option<String> = None;
        let mut vin: Option<String> = None;
        let mut odometer = None;
        let mut warnings = Vec::new();

        for stage in &self.policy.stages {
            match stage {
                Stage::Plate => {
                    plate = self.plate.extract(&recognized.full_text).map(|m| {
                        debug!(plate = %m.value, rule = %m.rule, "plate matched");
                        m.value
                    });
                }
                Stage::Vin => {
                    vin = self.vin.extract(&recognized.full_text).map(|m| {
                        debug!(vin = %m.value, "vin matched");
                        m.value
                    });
                }
                Stage::Odometer => {
                    if self.policy.gate_odometer && (plate.is_some() || vin.is_some()) {
                        debug!("odometer stage gated: higher-priority field found");
                        continue;
                    }
                    let claimed = if self.policy.suppress_plate_digits {
                        plate.as_deref().map(plate_digits)
                    } else {
                        None
                    };
                    odometer = self
                        .odometer
                        .extract(&token_texts, &recognized.full_text, claimed);
                }
            }
        }

        // No character run may be attributed to two fields: a compact-rule
        // plate carved out of the VIN's own characters is not a plate
        let plate_claimed_by_vin =
            matches!((&plate, &vin), (Some(p), Some(v)) if v.contains(p.as_str()));
        if plate_claimed_by_vin {
            debug!("plate suppressed: characters claimed by vin");
            plate = None;
        }

        if plate.is_none() && vin.is_none() && odometer.is_none() && !recognized.is_empty() {
            warnings.push("no vehicle identifiers found in recognized text".to_string());
        }

        VehicleScan {
            plate,
            odometer,
            vin,
            raw_text: token_texts.iter().map(|s| s.to_string()).collect(),
            metadata: ScanMetadata {
                engine: None,
                scanned_at: Utc::now(),
                processing_time_ms: start.elapsed().as_millis() as u64,
                plate_region_cropped: false,
                warnings,
            },
        }
    }

    /// Run the pipeline over bare token strings.
    pub fn scan_tokens(&self, tokens: &[String]) -> VehicleScan {
        self.scan(&RecognizedText::from_tokens(tokens.to_vec()))
    }
}

impl Default for ScanPipeline {
    fn default() -> Self {
        Self::new(ScanPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scan::OdometerReading;
    use pretty_assertions::assert_eq;

    fn scan_tokens(tokens: &[&str]) -> VehicleScan {
        ScanPipeline::default().scan_tokens(
            &tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_plate_from_split_tokens() {
        let scan = scan_tokens(&["DK", "HG30202"]);
        assert_eq!(scan.plate.as_deref(), Some("HG30202"));
        assert_eq!(scan.odometer, None);
        assert_eq!(scan.vin, None);
        assert_eq!(scan.raw_text, vec!["DK", "HG30202"]);
    }

    #[test]
    fn test_odometer_when_no_plate() {
        let scan = scan_tokens(&["151517"]);
        assert_eq!(scan.plate, None);
        assert_eq!(scan.odometer, Some(OdometerReading::Total(151517)));
    }

    #[test]
    fn test_vin_gates_odometer() {
        let scan = ScanPipeline::default()
            .scan(&RecognizedText::from_text("WVWZZZ1JZXW000001 KM 135116"));
        assert_eq!(scan.vin.as_deref(), Some("WVWZZZ1JZXW000001"));
        assert_eq!(scan.odometer, None);
    }

    #[test]
    fn test_vin_characters_never_become_a_plate() {
        // The compact rule would carve "XW00000" out of the VIN's own
        // characters; the pipeline suppresses it
        let scan = ScanPipeline::default().scan(&RecognizedText::from_text("WVWZZZ1JZXW000001"));
        assert_eq!(scan.vin.as_deref(), Some("WVWZZZ1JZXW000001"));
        assert_eq!(scan.plate, None);
    }

    #[test]
    fn test_plate_gates_odometer() {
        let scan = scan_tokens(&["HG30202", "84213"]);
        assert_eq!(scan.plate.as_deref(), Some("HG30202"));
        assert_eq!(scan.odometer, None);
    }

    #[test]
    fn test_trip_mode() {
        let scan = scan_tokens(&["2", "19.3", "km"]);
        assert_eq!(scan.odometer.map(|r| r.to_string()).as_deref(), Some("19.3"));
    }

    #[test]
    fn test_range_filter_picks_largest_plausible() {
        let scan = scan_tokens(&["2024", "84213", "7"]);
        assert_eq!(scan.odometer, Some(OdometerReading::Total(84213)));
    }

    #[test]
    fn test_ungated_policy_suppresses_plate_digits() {
        let mut policy = ScanPolicy::default();
        policy.gate_odometer = false;
        let pipeline = ScanPipeline::new(policy);

        // Plate digits 30202 would be a plausible reading; suppressed
        let scan = pipeline.scan(&RecognizedText::from_text("HG30202"));
        assert_eq!(scan.plate.as_deref(), Some("HG30202"));
        assert_eq!(scan.odometer, None);
    }

    #[test]
    fn test_vision_profile_finds_vin_first() {
        let pipeline = ScanPipeline::new(ScanPolicy::vision_profile());
        let scan = pipeline.scan(&RecognizedText::from_text("WVWZZZ1JZXW000001"));
        assert_eq!(scan.vin.as_deref(), Some("WVWZZZ1JZXW000001"));
    }

    #[test]
    fn test_worker_profile_compact_plate() {
        let pipeline = ScanPipeline::new(ScanPolicy::worker_profile());
        let scan = pipeline.scan_tokens(&["DK".to_string(), "HG30202".to_string()]);
        assert_eq!(scan.plate.as_deref(), Some("HG30202"));
    }

    #[test]
    fn test_absent_stage_never_runs() {
        let mut policy = ScanPolicy::default();
        policy.stages = vec![Stage::Plate];
        let pipeline = ScanPipeline::new(policy);

        let scan = pipeline.scan(&RecognizedText::from_text("151517"));
        assert_eq!(scan.odometer, None);
    }

    #[test]
    fn test_empty_input_has_no_warning() {
        let scan = ScanPipeline::default().scan(&RecognizedText::empty());
        assert!(scan.is_empty());
        assert!(scan.metadata.warnings.is_empty());
    }

    #[test]
    fn test_nothing_found_warns() {
        let scan = scan_tokens(&["hello", "world"]);
        assert!(scan.is_empty());
        assert_eq!(scan.metadata.warnings.len(), 1);
    }
}
