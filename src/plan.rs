//! # Week Plan Module
//!
//! The fixed five-day week, its per-day headcounts and the recipes cooked on
//! each day.
//!
//! ## Features
//!
//! - Exactly five days (Mandag to Fredag), created together and never removed
//! - Recipes addressed by a UUID v4 across the whole week
//! - Transient per-day messages with an expiry instant, never persisted
//! - Scaled ingredient views and the shopping list are derived on demand
//!
//! ## Usage
//!
//! ```rust
//! use madplan::ingredient_model::RawIngredient;
//! use madplan::plan::{Headcount, Recipe, WeekPlan, Weekday};
//!
//! let mut plan = WeekPlan::new();
//! plan.set_headcount(Weekday::Monday, Headcount::new(4, 0, 0));
//!
//! let recipe = Recipe::from_raw(
//!     "Kartoffelsuppe",
//!     2,
//!     &[RawIngredient::new("kartofler", "500", "g")],
//! );
//! plan.add_recipe(Weekday::Monday, recipe);
//!
//! let scaled = plan.scaled_ingredients();
//! assert_eq!(scaled[0].scaled_amount, "1000 gram");
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::aggregator::{aggregate, ShoppingList};
use crate::ingredient_model::{normalize_batch, NormalizedIngredient, RawIngredient};
use crate::scaling::{scale, ScaledIngredient};

/// Longest accepted recipe name, in bytes
pub const MAX_RECIPE_NAME_LENGTH: usize = 255;

/// A day of the working week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Danish day name
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mandag",
            Weekday::Tuesday => "Tirsdag",
            Weekday::Wednesday => "Onsdag",
            Weekday::Thursday => "Torsdag",
            Weekday::Friday => "Fredag",
        }
    }

    /// Key used for the localized day name
    pub fn message_key(&self) -> &'static str {
        match self {
            Weekday::Monday => "day-monday",
            Weekday::Tuesday => "day-tuesday",
            Weekday::Wednesday => "day-wednesday",
            Weekday::Thursday => "day-thursday",
            Weekday::Friday => "day-friday",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Weekday {
    type Err = anyhow::Error;

    /// Accepts Danish or English day names, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mandag" | "monday" | "man" | "mon" => Ok(Weekday::Monday),
            "tirsdag" | "tuesday" | "tir" | "tue" => Ok(Weekday::Tuesday),
            "onsdag" | "wednesday" | "ons" | "wed" => Ok(Weekday::Wednesday),
            "torsdag" | "thursday" | "tor" | "thu" => Ok(Weekday::Thursday),
            "fredag" | "friday" | "fre" | "fri" => Ok(Weekday::Friday),
            other => Err(anyhow::anyhow!("Unknown weekday '{}'", other)),
        }
    }
}

/// How many people eat on a given day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount {
    pub adults: u32,
    pub kids: u32,
    pub teens: u32,
}

impl Headcount {
    pub fn new(adults: u32, kids: u32, teens: u32) -> Self {
        Self {
            adults,
            kids,
            teens,
        }
    }

    /// Portions needed: kids and teens count as half an adult
    pub fn weighted(&self) -> f64 {
        f64::from(self.adults) + 0.5 * f64::from(self.kids) + 0.5 * f64::from(self.teens)
    }

    /// People present regardless of age
    pub fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.kids)
            .saturating_add(self.teens)
    }
}

/// A recipe scheduled on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    /// Servings the recipe was written for; zero disables scaling
    pub servings: u32,
    pub ingredients: Vec<NormalizedIngredient>,
}

impl Recipe {
    /// Build a recipe from raw triples, normalizing and deduplicating them
    pub fn from_raw(name: &str, servings: u32, raw: &[RawIngredient]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            servings,
            ingredients: normalize_batch(raw),
        }
    }
}

/// Severity of a transient message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Info,
    Error,
}

/// A status message shown on a day until it expires
#[derive(Debug, Clone, PartialEq)]
pub struct TransientMessage {
    pub kind: MessageKind,
    pub text: String,
    pub expires_at: DateTime<Utc>,
}

impl TransientMessage {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// One day of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub weekday: Weekday,
    #[serde(default)]
    pub headcount: Headcount,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(skip)]
    pub message: Option<TransientMessage>,
}

impl Day {
    fn new(weekday: Weekday) -> Self {
        Self {
            weekday,
            headcount: Headcount::default(),
            recipes: Vec::new(),
            message: None,
        }
    }

    /// Scaled views of every ingredient cooked on this day
    pub fn scaled_ingredients(&self) -> Vec<ScaledIngredient> {
        let target = self.headcount.weighted();
        self.recipes
            .iter()
            .flat_map(|recipe| {
                recipe.ingredients.iter().map(move |ingredient| {
                    scale(ingredient, target, recipe.servings).within(self.weekday, &recipe.name)
                })
            })
            .collect()
    }
}

/// The fixed five-day week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredWeek")]
pub struct WeekPlan {
    days: [Day; 5],
}

/// Deserialized form of a week, checked before it becomes a [`WeekPlan`]
#[derive(Deserialize)]
struct StoredWeek {
    days: [Day; 5],
}

impl TryFrom<StoredWeek> for WeekPlan {
    type Error = anyhow::Error;

    /// Days must appear once each, Monday to Friday
    fn try_from(stored: StoredWeek) -> Result<Self, Self::Error> {
        for (day, expected) in stored.days.iter().zip(Weekday::ALL) {
            anyhow::ensure!(
                day.weekday == expected,
                "Expected {} at position {} but found {}",
                expected,
                expected.index() + 1,
                day.weekday
            );
        }
        Ok(Self { days: stored.days })
    }
}

impl Default for WeekPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl WeekPlan {
    pub fn new() -> Self {
        Self {
            days: Weekday::ALL.map(Day::new),
        }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day(&self, weekday: Weekday) -> &Day {
        &self.days[weekday.index()]
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut Day {
        &mut self.days[weekday.index()]
    }

    pub fn set_headcount(&mut self, weekday: Weekday, headcount: Headcount) {
        self.day_mut(weekday).headcount = headcount;
    }

    /// Append a recipe to a day and return its id
    pub fn add_recipe(&mut self, weekday: Weekday, recipe: Recipe) -> Uuid {
        let id = recipe.id;
        log::info!(
            "Added recipe '{}' ({} ingredients) to {}",
            recipe.name,
            recipe.ingredients.len(),
            weekday
        );
        self.day_mut(weekday).recipes.push(recipe);
        id
    }

    pub fn remove_recipe(&mut self, id: Uuid) -> Option<Recipe> {
        self.days.iter_mut().find_map(|day| {
            let position = day.recipes.iter().position(|r| r.id == id)?;
            Some(day.recipes.remove(position))
        })
    }

    /// Rename a recipe; invalid names leave it unchanged
    pub fn rename_recipe(&mut self, id: Uuid, name: &str) -> bool {
        let Ok(name) = validate_recipe_name(name) else {
            log::debug!("Rejected recipe name '{}'", name);
            return false;
        };
        match self.recipe_mut(id) {
            Some(recipe) => {
                recipe.name = name;
                true
            }
            None => false,
        }
    }

    pub fn set_servings(&mut self, id: Uuid, servings: u32) -> bool {
        match self.recipe_mut(id) {
            Some(recipe) => {
                recipe.servings = servings;
                true
            }
            None => false,
        }
    }

    pub fn recipe(&self, id: Uuid) -> Option<&Recipe> {
        self.days
            .iter()
            .flat_map(|day| day.recipes.iter())
            .find(|recipe| recipe.id == id)
    }

    fn recipe_mut(&mut self, id: Uuid) -> Option<&mut Recipe> {
        self.days
            .iter_mut()
            .flat_map(|day| day.recipes.iter_mut())
            .find(|recipe| recipe.id == id)
    }

    /// Day a recipe is scheduled on
    pub fn weekday_of(&self, id: Uuid) -> Option<Weekday> {
        self.days
            .iter()
            .find(|day| day.recipes.iter().any(|r| r.id == id))
            .map(|day| day.weekday)
    }

    /// Replace the day's message, visible until `now + ttl`
    pub fn set_message(
        &mut self,
        weekday: Weekday,
        kind: MessageKind,
        text: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) {
        self.day_mut(weekday).message = Some(TransientMessage {
            kind,
            text: text.into(),
            expires_at: now + ttl,
        });
    }

    /// The day's message if it has not expired yet
    pub fn visible_message(&self, weekday: Weekday, now: DateTime<Utc>) -> Option<&TransientMessage> {
        self.day(weekday)
            .message
            .as_ref()
            .filter(|message| !message.is_expired(now))
    }

    /// Drop expired messages; returns how many were cleared
    pub fn clear_expired_messages(&mut self, now: DateTime<Utc>) -> usize {
        let mut cleared = 0;
        for day in self.days.iter_mut() {
            if day.message.as_ref().is_some_and(|m| m.is_expired(now)) {
                day.message = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Scaled views for all days in weekday order
    pub fn scaled_ingredients(&self) -> Vec<ScaledIngredient> {
        self.days.iter().flat_map(Day::scaled_ingredients).collect()
    }

    pub fn shopping_list(&self) -> ShoppingList {
        aggregate(&self.scaled_ingredients())
    }

    pub fn recipe_count(&self) -> usize {
        self.days.iter().map(|day| day.recipes.len()).sum()
    }
}

/// Validates a recipe name input
pub fn validate_recipe_name(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.len() > MAX_RECIPE_NAME_LENGTH {
        return Err("too_long");
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup() -> Recipe {
        Recipe::from_raw(
            "Suppe",
            4,
            &[
                RawIngredient::new("løg", "2", "stk"),
                RawIngredient::new("Løg, hakket", "5", "stk"),
                RawIngredient::new("salt", "1", "tsk"),
                RawIngredient::new("bouillon", "1", "l"),
            ],
        )
    }

    #[test]
    fn test_week_has_five_days_in_order() {
        let plan = WeekPlan::new();
        let labels: Vec<&str> = plan.days().iter().map(|d| d.weekday.label()).collect();
        assert_eq!(labels, vec!["Mandag", "Tirsdag", "Onsdag", "Torsdag", "Fredag"]);
    }

    #[test]
    fn test_weighted_headcount() {
        let headcount = Headcount::new(2, 3, 1);
        assert_eq!(headcount.weighted(), 4.0);
        assert_eq!(headcount.total(), 6);
    }

    #[test]
    fn test_total_headcount_saturates() {
        let headcount = Headcount::new(u32::MAX, 2, 1);
        assert_eq!(headcount.total(), u32::MAX);
    }

    #[test]
    fn test_week_rejects_days_out_of_order() {
        let mut value = serde_json::to_value(WeekPlan::new()).unwrap();
        value["days"].as_array_mut().unwrap().swap(0, 1);

        let err = serde_json::from_value::<WeekPlan>(value).unwrap_err();
        assert!(err.to_string().contains("Expected Mandag at position 1"));
    }

    #[test]
    fn test_weekday_from_str() {
        assert_eq!("Mandag".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert!("lørdag".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_from_raw_normalizes_and_deduplicates() {
        let recipe = soup();
        // Duplicate onion and salt are gone
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].amount, "2");
        assert_eq!(recipe.ingredients[1].unit, "liter");
    }

    #[test]
    fn test_recipe_lifecycle() {
        let mut plan = WeekPlan::new();
        let id = plan.add_recipe(Weekday::Wednesday, soup());

        assert_eq!(plan.weekday_of(id), Some(Weekday::Wednesday));
        assert!(plan.rename_recipe(id, "  Løgsuppe "));
        assert_eq!(plan.recipe(id).unwrap().name, "Løgsuppe");
        assert!(!plan.rename_recipe(id, "   "));
        assert_eq!(plan.recipe(id).unwrap().name, "Løgsuppe");

        assert!(plan.set_servings(id, 2));
        assert_eq!(plan.recipe(id).unwrap().servings, 2);

        let removed = plan.remove_recipe(id).unwrap();
        assert_eq!(removed.name, "Løgsuppe");
        assert!(plan.recipe(id).is_none());
        assert!(!plan.set_servings(id, 3));
        assert!(plan.remove_recipe(id).is_none());
    }

    #[test]
    fn test_scaled_ingredients_follow_headcount() {
        let mut plan = WeekPlan::new();
        plan.add_recipe(Weekday::Monday, soup());
        plan.set_headcount(Weekday::Monday, Headcount::new(8, 0, 0));

        let scaled = plan.scaled_ingredients();
        assert_eq!(scaled[0].scaled_amount, "4 stykker");
        assert_eq!(scaled[0].day, Some(Weekday::Monday));
        assert_eq!(scaled[0].recipe_name, "Suppe");

        // Changing the headcount is reflected immediately
        plan.set_headcount(Weekday::Monday, Headcount::new(2, 0, 0));
        assert_eq!(plan.scaled_ingredients()[0].scaled_amount, "1 stykker");
    }

    #[test]
    fn test_messages_expire() {
        let mut plan = WeekPlan::new();
        let now = Utc::now();
        plan.set_message(
            Weekday::Tuesday,
            MessageKind::Info,
            "Opskrift tilføjet",
            now,
            Duration::seconds(5),
        );

        assert!(plan.visible_message(Weekday::Tuesday, now).is_some());
        assert!(plan
            .visible_message(Weekday::Tuesday, now + Duration::seconds(5))
            .is_none());

        assert_eq!(plan.clear_expired_messages(now), 0);
        assert_eq!(plan.clear_expired_messages(now + Duration::seconds(6)), 1);
        assert!(plan.day(Weekday::Tuesday).message.is_none());
    }

    #[test]
    fn test_messages_are_not_serialized() {
        let mut plan = WeekPlan::new();
        plan.set_message(
            Weekday::Monday,
            MessageKind::Error,
            "fejl",
            Utc::now(),
            Duration::seconds(5),
        );
        let json = serde_json::to_string(&plan).unwrap();
        let restored: WeekPlan = serde_json::from_str(&json).unwrap();
        assert!(restored.day(Weekday::Monday).message.is_none());
    }

    #[test]
    fn test_recipe_name_validation() {
        assert!(validate_recipe_name("Frikadeller med kartofler").is_ok());
        assert_eq!(validate_recipe_name("  Lasagne  ").unwrap(), "Lasagne");
        assert!(validate_recipe_name("").is_err());
        assert!(validate_recipe_name("   ").is_err());
        assert!(validate_recipe_name(&"a".repeat(256)).is_err());
    }
}
