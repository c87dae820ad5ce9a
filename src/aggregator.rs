//! # Aggregator Module
//!
//! Merges scaled ingredients from every recipe and day into a
//! category-grouped shopping list.

use serde::Serialize;
use std::collections::HashMap;

use crate::categorizer::{categorize, Category};
use crate::name_normalizer::canonical_key;
use crate::quantity::{format_quantity, Amount, UNKNOWN_MARKER};
use crate::scaling::ScaledIngredient;
use crate::units::normalize_unit;

/// One line on the shopping list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    /// Display name of the first occurrence
    pub name: String,
    pub unit: String,
    /// Sum of all parseable contributions
    pub total: f64,
}

impl ShoppingItem {
    /// Total for display; zero shows as the unknown marker
    pub fn display_total(&self) -> String {
        if self.total == 0.0 {
            UNKNOWN_MARKER.to_string()
        } else {
            format_quantity(self.total)
        }
    }
}

/// Items belonging to one category, in first-encountered order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub items: Vec<ShoppingItem>,
}

/// Category-grouped shopping list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingList {
    /// Non-empty groups in declared category order
    pub groups: Vec<CategoryGroup>,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct (name, unit) lines
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn group(&self, category: Category) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    /// Look up an item by category and canonical (name, unit)
    pub fn find(&self, category: Category, name: &str, unit: &str) -> Option<&ShoppingItem> {
        let key = item_key(name, unit);
        self.group(category)?
            .items
            .iter()
            .find(|item| item_key(&item.name, &item.unit) == key)
    }
}

fn item_key(name: &str, unit: &str) -> (String, String) {
    (canonical_key(name), normalize_unit(unit))
}

/// Aggregate scaled ingredients into a shopping list
///
/// Unknown amounts never contribute to a total, but their key still gets a
/// line so the item is not lost from the list.
pub fn aggregate(ingredients: &[ScaledIngredient]) -> ShoppingList {
    let mut buckets: HashMap<Category, Vec<ShoppingItem>> = HashMap::new();
    let mut index: HashMap<(Category, String, String), usize> = HashMap::new();

    for ingredient in ingredients {
        let category = categorize(&ingredient.name, &ingredient.unit);
        let (name_key, unit_key) = item_key(&ingredient.name, &ingredient.unit);
        let items = buckets.entry(category).or_default();

        let position = *index
            .entry((category, name_key, unit_key))
            .or_insert_with(|| {
                items.push(ShoppingItem {
                    name: ingredient.name.clone(),
                    unit: ingredient.unit.clone(),
                    total: 0.0,
                });
                items.len() - 1
            });

        if let Amount::Value(value) = ingredient.scaled_value() {
            items[position].total += value;
        }
    }

    let groups = Category::ALL
        .iter()
        .filter_map(|category| {
            buckets.remove(category).map(|items| CategoryGroup {
                category: *category,
                items,
            })
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Aggregated {} scaled ingredients into {} groups",
        ingredients.len(),
        groups.len()
    );

    ShoppingList { groups }
}
