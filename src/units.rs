//! # Units Module
//!
//! Danish unit tables and unit normalization.
//!
//! Abbreviations such as "spsk" or "stk" are expanded to their full words.
//! Pantry units with no useful long form ("fed", "knivspids", ...) are kept
//! verbatim and checked before the abbreviation table.

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

/// Units that are never expanded or converted
pub const NON_CONVERTIBLE_UNITS: &[&str] = &[
    "fed", "håndfuld", "håndfulde", "knivspids", "pind", "pose", "bundt", "bundle", "neve",
    "klat", "skive", "klump",
];

/// Abbreviation -> canonical unit
pub const UNIT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("spsk", "spiseske"),
    ("tsk", "teske"),
    ("stk", "stykker"),
    ("pk", "pakke"),
    ("dl", "deciliter"),
    ("g", "gram"),
    ("kg", "kilogram"),
    ("l", "liter"),
    ("ml", "milliliter"),
    ("cl", "centiliter"),
    ("ds", "dåse"),
];

const SPOON_UNITS: &[&str] = &["spiseske", "teske"];
const COUNTABLE_UNITS: &[&str] = &["stykker", "pakke", "dåse"];
const WEIGHT_UNITS: &[&str] = &["gram", "kilogram"];
const VOLUME_UNITS: &[&str] = &["deciliter", "liter", "milliliter", "centiliter"];

/// Broad unit families used by scaling and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Teaspoon/tablespoon family
    Spoon,
    /// Discrete countable items and the non-convertible pantry units
    Piece,
    Weight,
    Volume,
    /// Unknown or empty unit
    Other,
}

lazy_static! {
    /// Matches a unit word at the start of text, longest alternatives first
    pub static ref LEADING_UNIT_REGEX: Regex = {
        let mut words: Vec<&str> = UNIT_ABBREVIATIONS
            .iter()
            .flat_map(|(short, long)| [*short, *long])
            .chain(NON_CONVERTIBLE_UNITS.iter().copied())
            .collect();
        words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
        words.dedup();
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)^({alternation})\b")).expect("Unit pattern should be valid")
    };
}

/// Normalize a raw unit to its canonical form
///
/// # Examples
///
/// ```rust
/// use madplan::units::normalize_unit;
///
/// assert_eq!(normalize_unit("stk"), "stykker");
/// assert_eq!(normalize_unit("fed"), "fed");
/// assert_eq!(normalize_unit("bakke"), "bakke");
/// assert_eq!(normalize_unit(""), "");
/// ```
pub fn normalize_unit(raw: &str) -> String {
    let unit = raw.trim().to_lowercase();
    if unit.is_empty() {
        return String::new();
    }

    if NON_CONVERTIBLE_UNITS.contains(&unit.as_str()) {
        return unit;
    }

    match UNIT_ABBREVIATIONS.iter().find(|(short, _)| *short == unit) {
        Some((_, long)) => {
            trace!("Expanded unit '{}' -> '{}'", unit, long);
            (*long).to_string()
        }
        None => unit,
    }
}

/// Classify a unit; raw abbreviations are normalized first
pub fn unit_kind(unit: &str) -> UnitKind {
    let unit = normalize_unit(unit);
    let unit = unit.as_str();
    if SPOON_UNITS.contains(&unit) {
        UnitKind::Spoon
    } else if COUNTABLE_UNITS.contains(&unit) || NON_CONVERTIBLE_UNITS.contains(&unit) {
        UnitKind::Piece
    } else if WEIGHT_UNITS.contains(&unit) {
        UnitKind::Weight
    } else if VOLUME_UNITS.contains(&unit) {
        UnitKind::Volume
    } else {
        UnitKind::Other
    }
}

pub fn is_spoon_unit(unit: &str) -> bool {
    unit_kind(unit) == UnitKind::Spoon
}

/// Countable items, including the non-convertible set
pub fn is_piece_unit(unit: &str) -> bool {
    unit_kind(unit) == UnitKind::Piece
}

pub fn is_weight_unit(unit: &str) -> bool {
    unit_kind(unit) == UnitKind::Weight
}
