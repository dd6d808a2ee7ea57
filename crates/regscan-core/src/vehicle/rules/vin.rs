//! VIN (chassis number) extraction.

use tracing::debug;

use super::patterns::{
    ALL_DIGITS, KM_PREFIX_RUN, SPEED_KMH, SPEED_KMT, STANDALONE_DIGIT_RUN, VIN_CANDIDATE,
};
use super::{FieldExtractor, RuleMatch};

/// VIN field extractor.
///
/// Strips the dashboard noise that surrounds a chassis number on an
/// instrument-cluster photo, then matches the fixed 17-character alphabet
/// (A-Z without I/O/Q, plus digits).
pub struct VinExtractor;

impl VinExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Upper-case, strip all whitespace, then remove noise runs in fixed
    /// order: KM-prefixed runs, standalone 4-7 digit runs (candidate
    /// odometer values), speed annotations, and the STOP/TRIP indicators.
    fn strip_noise(text: &str) -> String {
        let compact: String = text
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let stripped = KM_PREFIX_RUN.replace_all(&compact, "");
        let stripped = STANDALONE_DIGIT_RUN.replace_all(&stripped, "");
        let stripped = SPEED_KMH.replace_all(&stripped, "");
        let stripped = SPEED_KMT.replace_all(&stripped, "");
        stripped.replace("STOP", "").replace("TRIP", "")
    }
}

impl Default for VinExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VinExtractor {
    type Output = RuleMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let stripped = Self::strip_noise(text);
        let mut results = Vec::new();

        for m in VIN_CANDIDATE.find_iter(&stripped) {
            // A long dashboard digit run masquerading as a VIN after noise
            // stripping failed
            if ALL_DIGITS.is_match(m.as_str()) {
                debug!(candidate = m.as_str(), "rejected all-digit VIN candidate");
                continue;
            }
            results.push(RuleMatch::new(m.as_str().to_string(), "vin17"));
        }

        results
    }
}

/// Extract a VIN from text.
pub fn extract_vin(text: &str) -> Option<String> {
    VinExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_vin() {
        assert_eq!(
            extract_vin("WVWZZZ1JZXW000001"),
            Some("WVWZZZ1JZXW000001".to_string())
        );
    }

    #[test]
    fn test_vin_next_to_km_annotation() {
        // The KM-prefixed run is stripped even when glued to the VIN after
        // whitespace removal
        assert_eq!(
            extract_vin("WVWZZZ1JZXW000001 KM 135116"),
            Some("WVWZZZ1JZXW000001".to_string())
        );
    }

    #[test]
    fn test_vin_split_across_lines() {
        assert_eq!(
            extract_vin("WVWZZZ1JZ\nXW000001"),
            Some("WVWZZZ1JZXW000001".to_string())
        );
    }

    #[test]
    fn test_speed_annotations_stripped() {
        assert_eq!(extract_vin("120KMH STOP TRIP"), None);
        assert_eq!(extract_vin("80 KM/T"), None);
    }

    #[test]
    fn test_excluded_letters_break_the_match() {
        // I, O, and Q are not part of the VIN alphabet
        assert_eq!(extract_vin("WVWZZZ1JZIW0000012"), None);
    }

    #[test]
    fn test_never_purely_numeric() {
        assert_eq!(extract_vin("12345678901234567"), None);
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(extract_vin("WVWZZZ1JZXW00001"), None);
    }

    #[test]
    fn test_lowercase_input() {
        assert_eq!(
            extract_vin("wvwzzz1jzxw000001"),
            Some("WVWZZZ1JZXW000001".to_string())
        );
    }
}
