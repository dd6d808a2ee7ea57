//! Danish license plate extraction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::{COMPACT_PLATE, TRIP_ANNOTATION};
use super::{FieldExtractor, RuleMatch};

/// One plate shape rule: a letter prefix followed by ordered digit groups.
///
/// Static configuration; the extractor compiles each shape to a regex once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateShape {
    /// Shape label, recorded on matches.
    pub label: String,
    /// Number of leading letters.
    pub letters: usize,
    /// Sizes of the digit groups, in order.
    pub digit_groups: Vec<usize>,
}

impl PlateShape {
    pub fn new(label: impl Into<String>, letters: usize, digit_groups: Vec<usize>) -> Self {
        Self {
            label: label.into(),
            letters,
            digit_groups,
        }
    }

    /// The Danish shapes in descending specificity. Order encodes
    /// precedence: a text carrying both a 2+2+3 and a 2+3 shape must
    /// resolve to the former.
    pub fn danish_defaults() -> Vec<PlateShape> {
        vec![
            PlateShape::new("standard", 2, vec![2, 3]),
            PlateShape::new("commercial", 2, vec![2, 2]),
            PlateShape::new("motorcycle", 2, vec![3]),
            PlateShape::new("export", 2, vec![4]),
        ]
    }

    fn pattern(&self) -> String {
        let mut pattern = format!(r"\b([A-Z]{{{}}})", self.letters);
        for group in &self.digit_groups {
            pattern.push_str(&format!(r"\s*([0-9]{{{group}}})"));
        }
        pattern.push_str(r"\b");
        pattern
    }
}

struct CompiledShape {
    shape: PlateShape,
    regex: Regex,
}

/// Plate field extractor.
///
/// Tries the configured shapes in order against the raw text (spacing
/// preserved), then optionally the compact `[A-Z]{2}[0-9]{5}` pattern
/// against the fully stripped text.
pub struct PlateExtractor {
    shapes: Vec<CompiledShape>,
    compact_fallback: bool,
}

impl PlateExtractor {
    /// Extractor with the Danish default shapes and the compact fallback.
    pub fn new() -> Self {
        Self::with_shapes(&PlateShape::danish_defaults())
    }

    /// Extractor over an explicit shape list.
    pub fn with_shapes(shapes: &[PlateShape]) -> Self {
        let shapes = shapes
            .iter()
            .map(|shape| CompiledShape {
                // Generated from group counts, always a valid pattern
                regex: Regex::new(&shape.pattern()).expect("plate shape pattern"),
                shape: shape.clone(),
            })
            .collect();
        Self {
            shapes,
            compact_fallback: true,
        }
    }

    /// Extractor using only the compact pattern, for engines that lose
    /// inter-group spacing.
    pub fn compact_only() -> Self {
        Self {
            shapes: Vec::new(),
            compact_fallback: true,
        }
    }

    /// Enable or disable the compact fallback stage.
    pub fn with_compact_fallback(mut self, enabled: bool) -> Self {
        self.compact_fallback = enabled;
        self
    }

    /// Upper-case and drop trip/odometer annotations like "213.3 KM" so a
    /// kilometer display can never pass as a plate fragment.
    fn prepare(text: &str) -> String {
        let upper = text.to_uppercase();
        TRIP_ANNOTATION.replace_all(&upper, " ").into_owned()
    }
}

impl Default for PlateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PlateExtractor {
    type Output = RuleMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let prepared = Self::prepare(text);
        let mut results: Vec<Self::Output> = Vec::new();

        for compiled in &self.shapes {
            for caps in compiled.regex.captures_iter(&prepared) {
                let letters = &caps[1];
                // The odometer unit token leaking through as a pseudo-plate;
                // skip the candidate, keep scanning
                if letters == "KM" {
                    debug!(shape = %compiled.shape.label, "rejected KM-prefixed plate candidate");
                    continue;
                }

                let mut plate = letters.to_string();
                for group in caps.iter().skip(2).flatten() {
                    plate.push_str(group.as_str());
                }

                if results.iter().any(|r| r.value == plate) {
                    continue;
                }

                let full = caps.get(0).expect("capture 0 always present");
                results.push(
                    RuleMatch::new(plate, &compiled.shape.label)
                        .with_span(full.start(), full.end()),
                );
            }
        }

        if self.compact_fallback {
            let stripped = super::normalize::normalize([prepared.as_str()]).combined;

            for m in COMPACT_PLATE.find_iter(&stripped) {
                if m.as_str().starts_with("KM") {
                    debug!("rejected KM-prefixed compact plate candidate");
                    continue;
                }
                if results.iter().any(|r| r.value == m.as_str()) {
                    continue;
                }
                results.push(RuleMatch::new(m.as_str().to_string(), "compact"));
            }
        }

        results
    }
}

/// Extract a plate from text with the default shapes.
pub fn extract_plate(text: &str) -> Option<String> {
    PlateExtractor::new().extract(text).map(|m| m.value)
}

/// Digit portion of an extracted plate, used for collision suppression.
pub fn plate_digits(plate: &str) -> &str {
    plate.trim_start_matches(|c: char| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_plate_with_spacing() {
        assert_eq!(extract_plate("DK HG 30 202"), Some("HG30202".to_string()));
    }

    #[test]
    fn test_compact_plate_from_combined_tokens() {
        assert_eq!(extract_plate("DKHG30202"), Some("HG30202".to_string()));
    }

    #[test]
    fn test_shape_order_encodes_precedence() {
        // Both a 2+2+3 and a 2+3 shape are present; the more specific wins
        let text = "AB 12 345 CD 678";
        assert_eq!(extract_plate(text), Some("AB12345".to_string()));
    }

    #[test]
    fn test_motorcycle_shape() {
        assert_eq!(extract_plate("CD 678"), Some("CD678".to_string()));
    }

    #[test]
    fn test_export_shape() {
        assert_eq!(extract_plate("XP 1234"), Some("XP1234".to_string()));
    }

    #[test]
    fn test_trip_annotation_never_becomes_plate() {
        assert_eq!(extract_plate("213.3 KM"), None);
        assert_eq!(extract_plate("135116 KM"), None);
    }

    #[test]
    fn test_km_prefix_is_rejected_not_fatal() {
        // The KM candidate is skipped; a later candidate of the same shape
        // must still be found
        let text = "KM 12 345 AB 12 345";
        assert_eq!(extract_plate(text), Some("AB12345".to_string()));
    }

    #[test]
    fn test_no_km_prefixed_result() {
        for text in ["KM 12 345", "KM12345", "km 12 345"] {
            if let Some(plate) = extract_plate(text) {
                assert!(!plate.starts_with("KM"), "got {plate} from {text:?}");
            }
        }
    }

    #[test]
    fn test_round_trip_stability() {
        let plate = extract_plate("DK HG 30 202").unwrap();
        assert_eq!(extract_plate(&plate), Some(plate.clone()));
    }

    #[test]
    fn test_lowercase_input() {
        assert_eq!(extract_plate("dk hg 30 202"), Some("HG30202".to_string()));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_plate("just some words"), None);
        assert_eq!(extract_plate(""), None);
    }

    #[test]
    fn test_compact_only_profile() {
        let extractor = PlateExtractor::compact_only();
        let found = extractor.extract("DKHG30202").map(|m| m.value);
        assert_eq!(found, Some("HG30202".to_string()));
    }

    #[test]
    fn test_extract_all_dedupes() {
        let extractor = PlateExtractor::new();
        // The spaced shape and the compact fallback both see this plate
        let all = extractor.extract_all("HG30202");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, "HG30202");
    }

    #[test]
    fn test_plate_digits() {
        assert_eq!(plate_digits("HG30202"), "30202");
        assert_eq!(plate_digits("CD678"), "678");
    }
}
