//! Rule-based extractors for Danish vehicle identifiers.

pub mod normalize;
pub mod odometer;
pub mod patterns;
pub mod plate;
pub mod vin;

pub use normalize::{NormalizedText, digits_only, normalize};
pub use odometer::{OdometerExtractor, OdometerSelection, extract_odometer};
pub use patterns::*;
pub use plate::{PlateExtractor, PlateShape, extract_plate};
pub use vin::{VinExtractor, extract_vin};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A single rule hit, with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the shape or pattern that matched.
    pub rule: String,
    /// Position in source text.
    pub span: Option<(usize, usize)>,
}

impl<T> RuleMatch<T> {
    pub fn new(value: T, rule: impl Into<String>) -> Self {
        Self {
            value,
            rule: rule.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }
}
