//! # Ingredient Data Model
//!
//! This module defines the ingredient records that flow through the planner.
//!
//! ## Core Concepts
//!
//! - **RawIngredient**: a `{name, amount, unit}` triple exactly as produced by an
//!   extraction service, the line parser, or manual entry
//! - **NormalizedIngredient**: a cleaned copy with a canonical name, a canonical
//!   unit, and an amount that is either parseable or the unknown marker
//!
//! ## Usage
//!
//! ```rust
//! use madplan::ingredient_model::RawIngredient;
//!
//! let raw = RawIngredient::new("2 fed hvidløg, presset", "2", "stk");
//! let normalized = raw.normalize().expect("garlic is an ingredient");
//!
//! assert_eq!(normalized.name, "hvidløg");
//! assert_eq!(normalized.unit, "stykker");
//! assert_eq!(normalized.amount, "2");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::name_normalizer::clean_ingredient_name;
use crate::quantity::{parse_quantity, UNKNOWN_MARKER};
use crate::units::normalize_unit;

/// An ingredient as received from a source, never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIngredient {
    /// Free-text ingredient name (e.g. "løg, finthakket")
    pub name: String,
    /// Free-text amount (e.g. "2 ½", "3-5", "?")
    #[serde(default)]
    pub amount: String,
    /// Raw unit, possibly abbreviated (e.g. "spsk")
    #[serde(default)]
    pub unit: String,
}

/// A cleaned ingredient stored on a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIngredient {
    /// Canonical ingredient name, never empty and never a stopword
    pub name: String,
    /// Parseable quantity text or [`UNKNOWN_MARKER`]
    pub amount: String,
    /// Canonical unit, empty when the source had none
    pub unit: String,
}

impl RawIngredient {
    pub fn new(name: &str, amount: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            amount: amount.to_string(),
            unit: unit.to_string(),
        }
    }

    /// Produce a normalized copy, or `None` when the name is rejected
    pub fn normalize(&self) -> Option<NormalizedIngredient> {
        let name = clean_ingredient_name(&self.name)?;
        let amount = self.amount.trim();
        let amount = if parse_quantity(amount).is_unknown() {
            UNKNOWN_MARKER.to_string()
        } else {
            amount.to_string()
        };

        Some(NormalizedIngredient {
            name,
            amount,
            unit: normalize_unit(&self.unit),
        })
    }
}

impl NormalizedIngredient {
    /// Deduplication key within a recipe
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.unit)
    }

    /// Check if the amount could not be parsed
    pub fn has_unknown_amount(&self) -> bool {
        self.amount == UNKNOWN_MARKER
    }
}

/// Normalize a batch, dropping rejected names and duplicate (name, unit) pairs
///
/// The first occurrence of each key wins and insertion order is preserved.
pub fn normalize_batch(raw: &[RawIngredient]) -> Vec<NormalizedIngredient> {
    let mut normalized: Vec<NormalizedIngredient> = Vec::with_capacity(raw.len());

    for ingredient in raw {
        let Some(candidate) = ingredient.normalize() else {
            log::debug!("Dropped non-ingredient '{}'", ingredient.name);
            continue;
        };

        if normalized.iter().any(|existing| existing.key() == candidate.key()) {
            log::info!(
                "Skipping duplicate ingredient: {} ({})",
                candidate.name,
                candidate.unit
            );
            continue;
        }

        normalized.push(candidate);
    }

    normalized
}

impl fmt::Display for RawIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = [self.amount.trim(), self.unit.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if prefix.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", prefix, self.name)
        }
    }
}

impl fmt::Display for NormalizedIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{} {}", self.amount, self.name)
        } else {
            write!(f, "{} {} {}", self.amount, self.unit, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_parseable_amount_text() {
        let normalized = RawIngredient::new("Mælk", " 2,5 ", "dl").normalize().unwrap();
        assert_eq!(normalized.name, "mælk");
        assert_eq!(normalized.amount, "2,5");
        assert_eq!(normalized.unit, "deciliter");
    }

    #[test]
    fn test_unparseable_amount_becomes_marker() {
        let normalized = RawIngredient::new("persille", "en god håndfuld", "")
            .normalize()
            .unwrap();
        assert_eq!(normalized.amount, "?");
        assert!(normalized.has_unknown_amount());

        let empty = RawIngredient::new("persille", "", "").normalize().unwrap();
        assert_eq!(empty.amount, "?");
    }

    #[test]
    fn test_rejected_names_produce_nothing() {
        assert!(RawIngredient::new("efter smag", "1", "").normalize().is_none());
        assert!(RawIngredient::new("   ", "1", "").normalize().is_none());
    }

    #[test]
    fn test_batch_deduplicates_on_name_and_unit() {
        let raw = vec![
            RawIngredient::new("hvidløgsfed", "2", "stk"),
            RawIngredient::new("fed hvidløg", "3", "stykker"),
            RawIngredient::new("hvidløg", "1", "fed"),
            RawIngredient::new("salt", "1", "tsk"),
        ];
        let batch = normalize_batch(&raw);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].name, "hvidløg");
        assert_eq!(batch[0].amount, "2");
        assert_eq!(batch[0].unit, "stykker");
        assert_eq!(batch[1].unit, "fed");
    }

    #[test]
    fn test_display_formatting() {
        let raw = RawIngredient::new("løg", "2", "stk");
        assert_eq!(raw.to_string(), "2 stk løg");

        let normalized = raw.normalize().unwrap();
        assert_eq!(normalized.to_string(), "2 stykker løg");
    }
}
