//! # Quantity Module
//!
//! Parsing and formatting of Danish-locale ingredient quantities.
//!
//! ## Features
//!
//! - Comma as decimal separator ("1,5")
//! - Unicode fractions with an optional integer part ("2 ½", "¾")
//! - ASCII fractions as emitted by the extraction service ("1/2", "1 1/2")
//! - Ranges collapse to their midpoint ("3-5" -> 4)
//! - Anything else is [`Amount::Unknown`], never zero
//!
//! ## Usage
//!
//! ```rust
//! use madplan::quantity::{format_quantity, parse_quantity, Amount};
//!
//! assert_eq!(parse_quantity("2 ½"), Amount::Value(2.5));
//! assert_eq!(parse_quantity("efter smag"), Amount::Unknown);
//! assert_eq!(format_quantity(0.25), "0,25");
//! ```

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for a quantity present in the source but not machine-parseable
pub const UNKNOWN_MARKER: &str = "?";

lazy_static! {
    static ref GLYPH_FRACTION: Regex =
        Regex::new(r"^(?:(\d+)\s*)?([½¼¾])$").expect("Glyph fraction pattern should be valid");
    static ref ASCII_FRACTION: Regex =
        Regex::new(r"^(?:(\d+)\s+)?(\d+)/(\d+)$").expect("ASCII fraction pattern should be valid");
    static ref RANGE: Regex = Regex::new(r"^(\d+(?:[.,]\d+)?)\s*[-–]\s*(\d+(?:[.,]\d+)?)$")
        .expect("Range pattern should be valid");
}

/// A parsed quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Amount {
    /// A real, non-negative number
    Value(f64),
    /// Present in the source text but not parseable
    Unknown,
}

impl Amount {
    /// Numeric value, if known
    pub fn value(&self) -> Option<f64> {
        match self {
            Amount::Value(v) => Some(*v),
            Amount::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Amount::Unknown)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Value(v) => write!(f, "{}", format_quantity(*v)),
            Amount::Unknown => write!(f, "{UNKNOWN_MARKER}"),
        }
    }
}

/// Parse a free-text quantity
///
/// Rules are tried in order: empty/marker, fraction glyphs, ASCII fractions,
/// ranges, plain locale numbers. The first rule that matches decides.
pub fn parse_quantity(text: &str) -> Amount {
    let text = text.trim();
    if text.is_empty() || text == UNKNOWN_MARKER {
        return Amount::Unknown;
    }

    if let Some(captures) = GLYPH_FRACTION.captures(text) {
        let whole = captures
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        let fraction = captures
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .map(glyph_value)
            .unwrap_or(0.0);
        return Amount::Value(whole + fraction);
    }

    if let Some(captures) = ASCII_FRACTION.captures(text) {
        let whole = captures
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        let numerator: f64 = captures[2].parse().unwrap_or(0.0);
        let denominator: f64 = captures[3].parse().unwrap_or(0.0);
        if denominator == 0.0 {
            trace!("Zero denominator in quantity '{}'", text);
            return Amount::Unknown;
        }
        return Amount::Value(whole + numerator / denominator);
    }

    if let Some(captures) = RANGE.captures(text) {
        if let (Some(low), Some(high)) = (
            parse_locale_number(&captures[1]),
            parse_locale_number(&captures[2]),
        ) {
            return Amount::Value((low + high) / 2.0);
        }
    }

    match parse_locale_number(text) {
        Some(value) => Amount::Value(value),
        None => {
            trace!("Quantity '{}' is not parseable, marking unknown", text);
            Amount::Unknown
        }
    }
}

/// Parse a number using comma as decimal separator
fn parse_locale_number(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn glyph_value(glyph: char) -> f64 {
    match glyph {
        '½' => 0.5,
        '¼' => 0.25,
        '¾' => 0.75,
        _ => 0.0,
    }
}

/// Format a number for display with comma decimals
///
/// Precision depends on magnitude: (0,1) three digits, [1,10) two,
/// [10,100) one, 100 and above none. Trailing fractional zeros are trimmed.
pub fn format_quantity(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    let text = if magnitude < 1.0 {
        let fixed = format!("{value:.3}");
        let trimmed = fixed.trim_end_matches('0');
        if trimmed.ends_with('.') {
            format!("{trimmed}0")
        } else {
            trimmed.to_string()
        }
    } else {
        let digits = if magnitude < 10.0 {
            2
        } else if magnitude < 100.0 {
            1
        } else {
            0
        };
        let fixed = format!("{:.*}", digits, value);
        if digits == 0 {
            fixed
        } else {
            fixed
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        }
    };

    text.replace('.', ",")
}

/// Display tolerance of [`format_quantity`] for a value
pub fn format_tolerance(value: f64) -> f64 {
    let magnitude = value.abs();
    if magnitude < 1.0 {
        0.0005
    } else if magnitude < 10.0 {
        0.005
    } else if magnitude < 100.0 {
        0.05
    } else {
        0.5
    }
}
