//! Odometer and trip-meter extraction.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::normalize::digits_only;
use super::patterns::{DECIMAL_NUMBER, DIGIT_RUN_3_7, DIGIT_RUN_5_7};
use crate::models::scan::OdometerReading;

/// How a cumulative odometer candidate is selected from the digit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum OdometerSelection {
    /// First 5-7 digit run in the per-token digit concatenation.
    FirstRun,
    /// All 3-7 digit runs across the raw text, keep those strictly inside
    /// the range, return the largest. Smaller numbers are more likely to be
    /// years, dates, or partial reads.
    LargestPlausible { min: u32, max: u32 },
}

impl Default for OdometerSelection {
    fn default() -> Self {
        Self::LargestPlausible {
            min: 5000,
            max: 500_000,
        }
    }
}

/// Odometer field extractor.
///
/// A standalone "KM" unit token switches it into trip-meter mode; otherwise
/// it hunts for a plausible cumulative reading among the digit runs.
pub struct OdometerExtractor {
    selection: OdometerSelection,
    floor: Option<u32>,
}

impl OdometerExtractor {
    pub fn new(selection: OdometerSelection, floor: Option<u32>) -> Self {
        Self { selection, floor }
    }

    /// Extract a reading from the token sequence and raw text.
    ///
    /// `claimed_plate_digits` is the digit portion already attributed to the
    /// plate; a candidate exactly equal to it is suppressed (string
    /// comparison, leading zeros significant).
    pub fn extract(
        &self,
        tokens: &[&str],
        raw_text: &str,
        claimed_plate_digits: Option<&str>,
    ) -> Option<OdometerReading> {
        if let Some(unit_index) = tokens
            .iter()
            .position(|t| t.trim().eq_ignore_ascii_case("km"))
        {
            return self.extract_trip(&tokens[..unit_index]);
        }
        self.extract_total(tokens, raw_text, claimed_plate_digits)
    }

    /// Trip-meter mode: find the decimal reading among the tokens preceding
    /// the unit token.
    ///
    /// The display often splits a reading at the decimal point into two
    /// adjacent tokens ("219." and "3"), so when no preceding token carries
    /// an intact decimal the last two are glued and searched first.
    fn extract_trip(&self, preceding: &[&str]) -> Option<OdometerReading> {
        let has_intact_decimal = preceding.iter().any(|t| DECIMAL_NUMBER.is_match(t));

        if !has_intact_decimal && preceding.len() >= 2 {
            let glued = format!(
                "{}{}",
                preceding[preceding.len() - 2],
                preceding[preceding.len() - 1]
            );
            if let Some(m) = DECIMAL_NUMBER.find(&glued) {
                debug!(reading = m.as_str(), "trip reading recovered from glued tokens");
                return Decimal::from_str(m.as_str()).ok().map(OdometerReading::Trip);
            }
        }

        // Nearest the unit token wins
        let joined = preceding.join(" ");
        let m = DECIMAL_NUMBER.find_iter(&joined).last()?;
        Decimal::from_str(m.as_str()).ok().map(OdometerReading::Trip)
    }

    /// Odometer mode: pick a cumulative reading per the selection strategy.
    fn extract_total(
        &self,
        tokens: &[&str],
        raw_text: &str,
        claimed_plate_digits: Option<&str>,
    ) -> Option<OdometerReading> {
        let runs: Vec<String> = match self.selection {
            OdometerSelection::FirstRun => {
                let digits = digits_only(tokens);
                DIGIT_RUN_5_7
                    .find(&digits)
                    .map(|m| vec![m.as_str().to_string()])
                    .unwrap_or_default()
            }
            OdometerSelection::LargestPlausible { min, max } => DIGIT_RUN_3_7
                .find_iter(raw_text)
                .map(|m| m.as_str().to_string())
                .filter(|run| {
                    run.parse::<u32>()
                        .is_ok_and(|value| value > min && value < max)
                })
                .collect(),
        };

        let mut best: Option<u32> = None;
        for run in &runs {
            if claimed_plate_digits == Some(run.as_str()) {
                debug!(run, "odometer candidate suppressed: digits claimed by plate");
                continue;
            }
            let Ok(value) = run.parse::<u32>() else {
                continue;
            };
            if let Some(floor) = self.floor {
                if value < floor {
                    debug!(value, floor, "odometer candidate below floor");
                    continue;
                }
            }
            best = Some(best.map_or(value, |b| b.max(value)));
        }

        best.map(OdometerReading::Total)
    }
}

impl Default for OdometerExtractor {
    fn default() -> Self {
        Self::new(OdometerSelection::default(), Some(1000))
    }
}

/// Extract an odometer reading with the default selection and floor.
pub fn extract_odometer(tokens: &[&str], raw_text: &str) -> Option<OdometerReading> {
    OdometerExtractor::default().extract(tokens, raw_text, None)
}
