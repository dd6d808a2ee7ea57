//! Common regex patterns for Danish vehicle identifier extraction.
//!
//! Every rule the extractors apply lives here as data, so the pattern set
//! can be audited and tested independently of the extraction functions.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Odometer annotations like "213.3 KM" or "135116 KM" that would
    // otherwise be mistaken for plate fragments
    pub static ref TRIP_ANNOTATION: Regex = Regex::new(
        r"\b\d+[.,]?\d*\s*KM\b"
    ).unwrap();

    // Compact plate profile: two letters immediately followed by five
    // digits, matched against whitespace-stripped normalized text
    pub static ref COMPACT_PLATE: Regex = Regex::new(
        r"[A-Z]{2}[0-9]{5}"
    ).unwrap();

    // VIN: exactly 17 chars over A-Z without I/O/Q, plus digits
    pub static ref VIN_CANDIDATE: Regex = Regex::new(
        r"\b[A-HJ-NPR-Z0-9]{17}\b"
    ).unwrap();

    pub static ref ALL_DIGITS: Regex = Regex::new(
        r"^\d{5,}$"
    ).unwrap();

    // Dashboard noise stripped before VIN matching. KM_PREFIX_RUN is
    // deliberately unanchored: by the time it runs whitespace is gone and
    // the run may be glued to its neighbours ("...001KM135116")
    pub static ref KM_PREFIX_RUN: Regex = Regex::new(
        r"KM[0-9A-Z]*"
    ).unwrap();

    pub static ref STANDALONE_DIGIT_RUN: Regex = Regex::new(
        r"\b[0-9]{4,7}\b"
    ).unwrap();

    pub static ref SPEED_KMH: Regex = Regex::new(
        r"[0-9]{1,3}KMH"
    ).unwrap();

    pub static ref SPEED_KMT: Regex = Regex::new(
        r"[0-9]{1,3}KM/?T"
    ).unwrap();

    // Odometer digit runs
    pub static ref DECIMAL_NUMBER: Regex = Regex::new(
        r"\d+\.\d+"
    ).unwrap();

    pub static ref DIGIT_RUN_5_7: Regex = Regex::new(
        r"[0-9]{5,7}"
    ).unwrap();

    pub static ref DIGIT_RUN_3_7: Regex = Regex::new(
        r"[0-9]{3,7}"
    ).unwrap();
}
