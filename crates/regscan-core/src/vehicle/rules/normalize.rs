//! Token normalization - the shared substrate all extractors build on.
//!
//! Extractor profiles are allowed to differ in their patterns, never in how
//! tokens are normalized, so every variant sees the same cleaned text.

/// Read-only views derived from one OCR token sequence.
///
/// `cleaned` keeps the input length and order; `combined` is the
/// concatenation of all cleaned tokens with no separators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    pub cleaned: Vec<String>,
    pub combined: String,
}

/// Normalize a token sequence: strip every character outside `[A-Za-z0-9]`
/// from each token and upper-case the remainder.
///
/// Pure and order-preserving. Empty input yields empty outputs, and the
/// function is idempotent over its own output.
pub fn normalize<I, S>(tokens: I) -> NormalizedText
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cleaned: Vec<String> = tokens
        .into_iter()
        .map(|token| clean_token(token.as_ref()))
        .collect();
    let combined = cleaned.concat();

    NormalizedText { cleaned, combined }
}

/// Strip non-digits from every token and concatenate the remainders.
///
/// Used by the odometer's first-run selection, where the display splits a
/// reading across adjacent tokens.
pub fn digits_only<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens.into_iter().fold(String::new(), |mut digits, token| {
        digits.extend(token.as_ref().chars().filter(char::is_ascii_digit));
        digits
    })
}

fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
