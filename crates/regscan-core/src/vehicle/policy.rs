//! Disambiguation policy configuration.
//!
//! The historical extractor variants differed only in priority order,
//! pattern lists, and thresholds; one policy struct reproduces any of them
//! by configuration.

use serde::{Deserialize, Serialize};

use super::rules::odometer::OdometerSelection;
use super::rules::plate::PlateShape;

/// One extraction stage. A stage absent from the policy's list is never
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Plate,
    Vin,
    Odometer,
}

/// Configurable disambiguation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPolicy {
    /// Extractor invocation order.
    pub stages: Vec<Stage>,

    /// Ordered plate shape list; empty means spaced shapes are skipped.
    pub plate_shapes: Vec<PlateShape>,

    /// Whether the compact `[A-Z]{2}[0-9]{5}` pattern runs on stripped text.
    pub compact_plate_fallback: bool,

    /// Run the odometer stage only if every earlier stage found nothing. A
    /// photo with a clear plate or VIN is not an odometer photo.
    pub gate_odometer: bool,

    /// Cumulative-reading selection strategy.
    pub odometer_selection: OdometerSelection,

    /// Reject cumulative candidates below this value.
    pub odometer_floor: Option<u32>,

    /// Suppress an odometer candidate equal to the plate's digit portion.
    pub suppress_plate_digits: bool,
}

impl Default for ScanPolicy {
    /// The union profile: plate first, strict filters on.
    fn default() -> Self {
        Self {
            stages: vec![Stage::Plate, Stage::Vin, Stage::Odometer],
            plate_shapes: PlateShape::danish_defaults(),
            compact_plate_fallback: true,
            gate_odometer: true,
            odometer_selection: OdometerSelection::default(),
            odometer_floor: Some(1000),
            suppress_plate_digits: true,
        }
    }
}

impl ScanPolicy {
    /// The chassis-scanner variant: VIN before plate, range-filtered
    /// odometer, no extra filters.
    pub fn vision_profile() -> Self {
        Self {
            stages: vec![Stage::Vin, Stage::Plate, Stage::Odometer],
            plate_shapes: PlateShape::danish_defaults(),
            compact_plate_fallback: false,
            gate_odometer: true,
            odometer_selection: OdometerSelection::default(),
            odometer_floor: None,
            suppress_plate_digits: false,
        }
    }

    /// The embedded-worker variant: compact plate only, first-run odometer.
    pub fn worker_profile() -> Self {
        Self {
            stages: vec![Stage::Plate, Stage::Odometer],
            plate_shapes: Vec::new(),
            compact_plate_fallback: true,
            gate_odometer: true,
            odometer_selection: OdometerSelection::FirstRun,
            odometer_floor: None,
            suppress_plate_digits: false,
        }
    }
}
