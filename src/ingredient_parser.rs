//! # Ingredient Parser
//!
//! This module parses free-text ingredient lines, typed by hand or read back
//! from OCR output, into raw `{name, amount, unit}` triples.
//!
//! ## Features
//!
//! - Leading amounts: integers, decimals with comma, fraction glyphs ("2 ½"),
//!   ASCII fractions ("1 1/2"), ranges ("3-5") and the unknown marker "?"
//! - Longest known unit word on a word boundary ("håndfulde" before "håndfuld")
//! - Word-level corrections for common OCR misreadings of Danish text
//! - Instruction lines ("Bland det hele sammen") are skipped
//!
//! ## Usage
//!
//! ```rust
//! use madplan::ingredient_parser::parse_ingredient_list;
//!
//! let text = "2 fed hviøg, presset\n500 g kartofier\nKog kartoflerne møre";
//! let parsed = parse_ingredient_list(text);
//!
//! assert_eq!(parsed.len(), 2);
//! assert_eq!(parsed[0].name, "hvidløg, presset");
//! assert_eq!(parsed[1].unit, "g");
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::ingredient_model::RawIngredient;
use crate::quantity::UNKNOWN_MARKER;
use crate::units::LEADING_UNIT_REGEX;

/// Lines with more words than this are treated as instructions
pub const MAX_INGREDIENT_LINE_WORDS: usize = 10;

/// Lines shorter than this (in characters) are ignored
pub const MIN_INGREDIENT_LINE_CHARS: usize = 3;

/// Verbs that mark a line as a cooking instruction
pub const INSTRUCTION_VERBS: &[&str] = &[
    "bland", "tilsæt", "hæld", "kog", "steg", "varm", "server", "rør", "kom",
];

/// Word-level OCR misreadings and their corrections
pub const OCR_CORRECTIONS: &[(&str, &str)] = &[
    ("ræsk", "græsk"),
    ("yohurt", "yoghurt"),
    ("hviøg", "hvidløg"),
    ("kyllinebryst", "kyllingebryst"),
    ("spisesked", "spiseske"),
    ("tesked", "teske"),
    ("stykher", "stykker"),
    ("pakher", "pakker"),
    ("daser", "dåser"),
    ("dose", "dåse"),
    ("øg", "løg"),
    ("røøg", "rødløg"),
    ("citroner", "citron"),
    ("kartofier", "kartofler"),
    ("guierod", "gulerod"),
    ("guierødder", "gulerødder"),
    ("tomatcr", "tomater"),
    ("basilikuni", "basilikum"),
    ("persilje", "persille"),
];

/// Leading amount, most specific alternatives first
static LEADING_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+\s*[½¼¾]|[½¼¾]|\d+(?:[.,]\d+)?\s*[-–]\s*\d+(?:[.,]\d+)?|\d+\s+\d+/\d+|\d+/\d+|\d+(?:[.,]\d+)?|\?)",
    )
    .expect("Leading amount pattern should be valid")
});

static INSTRUCTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = INSTRUCTION_VERBS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
        .expect("Instruction verb pattern should be valid")
});

/// Lowercase a line and fix known OCR misreadings word by word
pub fn correct_ocr_text(line: &str) -> String {
    line.trim()
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            let core = word.trim_end_matches(|c: char| c.is_ascii_punctuation());
            let trailing = &word[core.len()..];
            let corrected = OCR_CORRECTIONS
                .iter()
                .find(|(wrong, _)| *wrong == core)
                .map(|(_, right)| *right)
                .unwrap_or(core);
            format!("{corrected}{trailing}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check whether a line reads like a cooking instruction
pub fn is_instruction_line(line: &str) -> bool {
    line.split_whitespace().count() > MAX_INGREDIENT_LINE_WORDS || INSTRUCTION_REGEX.is_match(line)
}

/// Parse a single ingredient line
///
/// A missing amount becomes the unknown marker. Returns `None` when nothing
/// is left for the name once amount and unit are taken off.
pub fn parse_ingredient_line(line: &str) -> Option<RawIngredient> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (amount, rest) = match LEADING_AMOUNT.find(line) {
        Some(m) => (m.as_str().trim(), line[m.end()..].trim_start()),
        None => (UNKNOWN_MARKER, line),
    };

    let (unit, name) = match LEADING_UNIT_REGEX.find(rest) {
        Some(m) => (m.as_str(), rest[m.end()..].trim()),
        None => ("", rest.trim()),
    };

    if name.is_empty() {
        log::trace!("No ingredient name left in line '{}'", line);
        return None;
    }

    Some(RawIngredient::new(name, amount, unit))
}

/// Parse a block of text, one ingredient per line
pub fn parse_ingredient_list(text: &str) -> Vec<RawIngredient> {
    let mut ingredients = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.chars().count() < MIN_INGREDIENT_LINE_CHARS {
            continue;
        }

        if is_instruction_line(line) {
            log::debug!("Skipping instruction line: {}", line);
            continue;
        }

        let corrected = correct_ocr_text(line);
        match parse_ingredient_line(&corrected) {
            Some(ingredient) => ingredients.push(ingredient),
            None => log::debug!("Could not parse ingredient line: {}", line),
        }
    }

    log::info!("Parsed {} ingredient lines", ingredients.len());
    ingredients
}
