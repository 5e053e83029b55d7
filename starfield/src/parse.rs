//! Permissive numeric parsing for legacy catalog fields
//!
//! Older catalog exports carry right ascension and declination as sexagesimal
//! strings and magnitudes as free text. Parsing never fails: unusable input
//! turns into `NaN` (or `0` for absent values) and downstream filters decide
//! what to do with it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Longest numeric prefix accepted for free-text magnitudes
    static ref LEADING_FLOAT: Regex =
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("leading float pattern is valid");
}

/// Parse one sexagesimal component.
///
/// Missing component -> NaN, blank component -> 0, anything unparsable -> NaN.
fn sexagesimal_component(part: Option<&str>) -> f64 {
    match part.map(str::trim) {
        None => f64::NAN,
        Some("") => 0.0,
        Some(text) => text.parse().unwrap_or(f64::NAN),
    }
}

/// Sum of `a + b/60 + c/3600` over the first three colon separated components.
fn sexagesimal_value(text: &str) -> f64 {
    let mut parts = text.split(':');
    let whole = sexagesimal_component(parts.next());
    let minutes = sexagesimal_component(parts.next());
    let seconds = sexagesimal_component(parts.next());
    whole + minutes / 60.0 + seconds / 3600.0
}

/// Convert right ascension "HH:MM:SS" to decimal degrees.
///
/// An empty string is treated as an absent value and yields 0.
///
/// # Examples
/// ```
/// use starfield::parse::ra_hms_to_deg;
/// assert_eq!(ra_hms_to_deg("06:00:00"), 90.0);
/// ```
pub fn ra_hms_to_deg(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    sexagesimal_value(text) * 15.0
}

/// Convert declination "±DD:MM:SS" to decimal degrees.
///
/// The sign applies to the whole value, so "-00:30:00" is -0.5. An empty string
/// yields 0.
pub fn dec_dms_to_deg(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let sign = if text.starts_with('-') { -1.0 } else { 1.0 };
    let unsigned = text.replacen('+', "", 1).replacen('-', "", 1);
    sign * sexagesimal_value(&unsigned)
}

/// Parse the longest leading decimal number of `text`, ignoring leading whitespace.
///
/// `"4.5V"` parses as 4.5; text with no numeric prefix yields NaN.
pub fn parse_leading_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let Some(found) = LEADING_FLOAT.find(trimmed) else {
        return f64::NAN;
    };
    match found.as_str() {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        number => number.parse().unwrap_or(f64::NAN),
    }
}
