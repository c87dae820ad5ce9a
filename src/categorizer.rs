//! # Categorizer Module
//!
//! Assigns shopping-list categories using ordered keyword rules.
//!
//! Keywords match as substrings so that short words also hit Danish compound
//! nouns ("kylling" in "kyllingebryst"). The first rule in declared order wins.
//! Items measured by weight or counted in pieces are tested against the
//! meat/fish bucket first.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::name_normalizer::canonical_key;
use crate::units::{is_piece_unit, is_weight_unit};

/// Shopping list buckets in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    MeatFish,
    Dairy,
    Pantry,
    Produce,
    Uncategorized,
}

impl Category {
    /// All categories in declared order
    pub const ALL: [Category; 5] = [
        Category::MeatFish,
        Category::Dairy,
        Category::Pantry,
        Category::Produce,
        Category::Uncategorized,
    ];

    /// Danish display label
    pub fn label(&self) -> &'static str {
        match self {
            Category::MeatFish => "Kød & fisk",
            Category::Dairy => "Mejeri",
            Category::Pantry => "Kolonial",
            Category::Produce => "Frugt & grønt",
            Category::Uncategorized => "Ukategoriseret",
        }
    }

    /// Key used for the localized label
    pub fn message_key(&self) -> &'static str {
        match self {
            Category::MeatFish => "category-meat-fish",
            Category::Dairy => "category-dairy",
            Category::Pantry => "category-pantry",
            Category::Produce => "category-produce",
            Category::Uncategorized => "category-uncategorized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

const MEAT_FISH_KEYWORDS: &[&str] = &[
    "kylling", "oksekød", "svinekød", "kalvekød", "lammekød", "hakket kød", "kødfars", "bacon",
    "skinke", "pølse", "medister", "kalkun", "laks", "torsk", "rejer", "tun", "makrel",
    "sild", "fisk", "rødspætte", "muslinger", "kød",
];

const DAIRY_KEYWORDS: &[&str] = &[
    "mælk", "fløde", "smør", "ost", "yoghurt", "skyr", "creme fraiche", "cremefraiche",
    "parmesan", "mozzarella", "feta", "kvark", "æg",
];

const PANTRY_KEYWORDS: &[&str] = &[
    "mel", "sukker", "ris", "pasta", "spaghetti", "nudler", "olie", "eddike", "bouillon",
    "paprika", "karry", "spidskommen", "kanel", "oregano", "timian", "soja", "honning",
    "dåse", "tomatpuré", "linser", "kikærter", "bønner", "havregryn", "bagepulver", "gær",
    "nødder", "mandler",
];

const PRODUCE_KEYWORDS: &[&str] = &[
    "løg", "hvidløg", "gulerod", "gulerødder", "kartof", "tomat", "agurk", "salat", "citron",
    "lime", "æble", "pære", "banan", "peberfrugt", "persille", "basilikum", "koriander",
    "porre", "squash", "champignon", "svampe", "spinat", "broccoli", "blomkål", "kål",
    "ingefær", "chili", "selleri", "rødbede", "avocado", "ærter", "majs", "purløg", "dild",
];

/// Cut words that signal meat only when the item is weighed or counted
const WEIGHED_MEAT_HINTS: &[&str] = &[
    "filet", "bryst", "lår", "mørbrad", "kotelet", "culotte", "tykkam", "schnitzel",
];

/// Ordered (category, keywords) rules, evaluated top to bottom
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::MeatFish, MEAT_FISH_KEYWORDS),
    (Category::Dairy, DAIRY_KEYWORDS),
    (Category::Pantry, PANTRY_KEYWORDS),
    (Category::Produce, PRODUCE_KEYWORDS),
];

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}

/// Categorize an ingredient by name and unit
///
/// # Examples
///
/// ```rust
/// use madplan::categorizer::{categorize, Category};
///
/// assert_eq!(categorize("Kyllingebryst", "g"), Category::MeatFish);
/// assert_eq!(categorize("fed hvidløg", "fed"), Category::Produce);
/// assert_eq!(categorize("kanelstang", "stk"), Category::Pantry);
/// assert_eq!(categorize("chokolade", "g"), Category::Uncategorized);
/// ```
pub fn categorize(name: &str, unit: &str) -> Category {
    let name = canonical_key(name);

    if (is_weight_unit(unit) || is_piece_unit(unit))
        && (contains_any(&name, MEAT_FISH_KEYWORDS) || contains_any(&name, WEIGHED_MEAT_HINTS))
    {
        return Category::MeatFish;
    }

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&name, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Uncategorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order() {
        assert_eq!(Category::ALL[0], Category::MeatFish);
        assert_eq!(Category::ALL[4], Category::Uncategorized);
        let rule_order: Vec<Category> = CATEGORY_RULES.iter().map(|(c, _)| *c).collect();
        assert_eq!(rule_order, Category::ALL[..4].to_vec());
    }

    #[test]
    fn test_substring_matches_compound_nouns() {
        assert_eq!(categorize("kyllingelår", "stk"), Category::MeatFish);
        assert_eq!(categorize("sødmælk", "dl"), Category::Dairy);
        assert_eq!(categorize("hvedemel", "g"), Category::Pantry);
        assert_eq!(categorize("kartofler", "kg"), Category::Produce);
    }

    #[test]
    fn test_weight_units_bias_cut_words_to_meat() {
        assert_eq!(categorize("svinefilet", "g"), Category::MeatFish);
        assert_eq!(categorize("andebryst", "stk"), Category::MeatFish);
        // Without a weight or piece unit the cut word alone decides nothing
        assert_eq!(categorize("filetspids", "dl"), Category::Uncategorized);
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "smør" (dairy) is declared before "mel" (pantry)
        assert_eq!(categorize("smørbar mel", "dl"), Category::Dairy);
    }

    #[test]
    fn test_name_is_cleaned_before_matching() {
        assert_eq!(categorize("Løg, finthakket", ""), Category::Produce);
        assert_eq!(categorize("hakkede tomater", "dåse"), Category::Produce);
    }

    #[test]
    fn test_uncategorized_fallback() {
        assert_eq!(categorize("vaniljestang", "stk"), Category::Uncategorized);
        assert_eq!(Category::Uncategorized.label(), "Ukategoriseret");
    }
}
