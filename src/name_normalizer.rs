//! # Name Normalizer Module
//!
//! Turns raw ingredient text into a canonical ingredient name, or rejects it.
//!
//! ## Pipeline
//!
//! 1. Lowercase and trim
//! 2. Strip narrow instruction phrases ("saft og fintrevet skal heraf", "kun saften")
//! 3. Strip parenthetical content
//! 4. Strip a leading numeric quantity ("2 fed hvidløg" -> "fed hvidløg")
//! 5. Remove whole-word preparation terms, then tidy whitespace and punctuation
//! 6. Reject non-ingredient words (including water, salt and pepper)
//! 7. Map known variants to their headword ("fed hvidløg" -> "hvidløg")
//!
//! The pipeline never extracts a "last word": multi-word names are kept intact.
//! Callers comparing ingredient names must compare cleaned forms.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

/// Preparation vocabulary removed as whole words
pub const PREPARATION_TERMS: &[&str] = &[
    "finthakkede", "fintrevet", "hakket", "finsnittet", "opskåret", "skårne", "skåret", "delte",
    "opdelte", "smuldret", "fintsnittet", "groftrevet", "kogte", "ristede", "sautéede",
    "opvarmede", "grillede", "stegte", "blancherede", "røget", "skrællede", "rensede",
    "pressede", "presset", "finthakket", "grofthakket", "knust", "knuste", "revet", "smeltet",
];

/// Cleaned texts that are never ingredients
pub const NON_INGREDIENT_WORDS: &[&str] = &[
    "styrke", "mere", "mindre", "efter", "smag", "behov", "ønske", "cirka", "ca", "evt",
    "eventuelt", "til", "som", "eller", "og", "af", "med", "uden", "for", "servering", "pynt",
    "garnering", "side", "ekstra", "let", "god", "fin", "stor", "lille",
    // Kitchen staples that never go on the shopping list
    "vand", "koldt vand", "varmt vand", "kogende vand", "salt", "peber", "salt og peber",
    "peber og salt", "salt & peber", "vand og salt", "salt og vand", "vand, salt og peber",
];

/// Canonical headword -> exact variants mapped to it
pub const INGREDIENT_CORE_MAPPING: &[(&str, &[&str])] = &[
    ("hvidløg", &["hvidløgsfed", "fed hvidløg"]),
    ("persille", &["bredbladet persille", "bladpersille"]),
    ("basilikum", &["frisk basilikum"]),
    ("tomater", &["hakkede tomater", "cherry tomater", "cocktail tomater"]),
];

lazy_static! {
    static ref INSTRUCTION_PHRASES: Vec<Regex> = vec![
        Regex::new(r"(?i),?\s*saft og .*skal.*").expect("Juice and zest pattern should be valid"),
        Regex::new(r"(?i),?\s*kun saften").expect("Juice only pattern should be valid"),
    ];
    static ref PARENTHETICAL: Regex =
        Regex::new(r"\([^)]*\)?").expect("Parenthetical pattern should be valid");
    static ref LEADING_QUANTITY: Regex =
        Regex::new(r"^[\d½¼¾][\d½¼¾.,/\s–-]*\s+").expect("Leading quantity pattern should be valid");
    static ref PREPARATION_REGEX: Regex = {
        let alternation = PREPARATION_TERMS
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
            .expect("Preparation term pattern should be valid")
    };
    static ref SPACE_BEFORE_PUNCTUATION: Regex =
        Regex::new(r"\s+([,.;:])").expect("Punctuation spacing pattern should be valid");
    static ref REPEATED_SEPARATORS: Regex =
        Regex::new(r"([,;:])[\s,;:]*[,;:]").expect("Separator pattern should be valid");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

fn is_edge_punctuation(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '.' | '-' | ';' | ':' | '–')
}

/// Clean a raw ingredient name
///
/// Returns `None` when the text is empty after cleaning or is a known
/// non-ingredient word.
///
/// # Examples
///
/// ```rust
/// use madplan::name_normalizer::clean_ingredient_name;
///
/// assert_eq!(clean_ingredient_name("2 fed hvidløg, presset"), Some("hvidløg".to_string()));
/// assert_eq!(clean_ingredient_name("Bredbladet persille (ca. 1 bundt)"), Some("persille".to_string()));
/// assert_eq!(clean_ingredient_name("efter smag"), None);
/// ```
pub fn clean_ingredient_name(raw_name: &str) -> Option<String> {
    let mut name = raw_name.trim().to_lowercase();

    for phrase in INSTRUCTION_PHRASES.iter() {
        name = phrase.replace_all(&name, "").into_owned();
    }

    name = PARENTHETICAL.replace_all(&name, "").into_owned();

    // Removing a preparation term can expose a new leading quantity
    loop {
        let stripped = LEADING_QUANTITY.replace(name.trim_start(), "");
        let next = tidy(&PREPARATION_REGEX.replace_all(&stripped, ""));
        if next == name {
            break;
        }
        name = next;
    }

    if name.is_empty() {
        trace!("Ingredient name '{}' is empty after cleaning", raw_name);
        return None;
    }

    if NON_INGREDIENT_WORDS.contains(&name.as_str()) {
        debug!("Rejected non-ingredient '{}' (raw '{}')", name, raw_name);
        return None;
    }

    if let Some((headword, _)) = INGREDIENT_CORE_MAPPING
        .iter()
        .find(|(_, variants)| variants.contains(&name.as_str()))
    {
        trace!("Mapped ingredient variant '{}' -> '{}'", name, headword);
        return Some((*headword).to_string());
    }

    Some(name)
}

/// Canonical comparison key for a name
///
/// Uses the cleaned form, falling back to trimmed lowercase text when the
/// cleaner rejects the name.
pub fn canonical_key(name: &str) -> String {
    clean_ingredient_name(name).unwrap_or_else(|| name.trim().to_lowercase())
}

fn tidy(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "$1");
    let text = REPEATED_SEPARATORS.replace_all(&text, "$1");
    text.trim_matches(is_edge_punctuation).to_string()
}
