//! # Scaling Engine
//!
//! Computes scaled ingredient quantities for a target headcount.
//!
//! Scaled values are always derived on demand from a [`NormalizedIngredient`],
//! the owning recipe's servings and the owning day's headcount. Nothing here
//! is cached, so a shopping list always reflects the latest headcounts.

use serde::Serialize;

use crate::ingredient_model::NormalizedIngredient;
use crate::plan::Weekday;
use crate::quantity::{format_quantity, parse_quantity, Amount, UNKNOWN_MARKER};
use crate::units::{is_piece_unit, is_spoon_unit};

/// Smallest spoon measure a scaled seasoning may shrink to
pub const SPOON_MINIMUM: f64 = 0.25;

/// Why a scaled amount deviates from the normal computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScaleNote {
    /// The recipe states zero servings, so no factor can be computed
    ZeroServings,
}

impl ScaleNote {
    /// Localization key for this note
    pub fn message_key(&self) -> &'static str {
        match self {
            ScaleNote::ZeroServings => "note-zero-servings",
        }
    }
}

/// Per-render view of one ingredient after scaling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledIngredient {
    pub name: String,
    pub unit: String,
    /// Original amount joined with the unit
    pub original_amount: String,
    /// Scaled, rounded and formatted amount joined with the unit
    pub scaled_amount: String,
    /// Target headcount divided by original servings
    pub scaling_factor: Option<f64>,
    pub day: Option<Weekday>,
    pub recipe_name: String,
    pub note: Option<ScaleNote>,
}

impl ScaledIngredient {
    /// Attach the day and recipe this ingredient was scaled for
    pub fn within(mut self, day: Weekday, recipe_name: &str) -> Self {
        self.day = Some(day);
        self.recipe_name = recipe_name.to_string();
        self
    }

    /// The scaled amount without its unit suffix
    pub fn scaled_amount_text(&self) -> &str {
        strip_unit(&self.scaled_amount, &self.unit)
    }

    /// Parsed scaled amount
    pub fn scaled_value(&self) -> Amount {
        parse_quantity(self.scaled_amount_text())
    }
}

/// Scale one ingredient
///
/// # Arguments
///
/// * `ingredient` - The normalized ingredient from a recipe
/// * `target_people` - Weighted headcount of the day the recipe is cooked
/// * `original_servings` - Servings the recipe was written for
///
/// # Examples
///
/// ```rust
/// use madplan::ingredient_model::RawIngredient;
/// use madplan::scaling::scale;
///
/// let sugar = RawIngredient::new("sukker", "2 ½", "tsk").normalize().unwrap();
/// let scaled = scale(&sugar, 1.0, 10);
///
/// assert_eq!(scaled.scaled_amount, "0,25 teske");
/// assert_eq!(scaled.scaling_factor, Some(0.1));
/// ```
pub fn scale(
    ingredient: &NormalizedIngredient,
    target_people: f64,
    original_servings: u32,
) -> ScaledIngredient {
    let unit = ingredient.unit.as_str();
    let amount_text = ingredient.amount.trim();
    let base = ScaledIngredient {
        name: ingredient.name.clone(),
        unit: unit.to_string(),
        original_amount: with_unit(amount_text, unit),
        scaled_amount: with_unit(amount_text, unit),
        scaling_factor: None,
        day: None,
        recipe_name: String::new(),
        note: None,
    };

    if amount_text.is_empty() || amount_text == UNKNOWN_MARKER {
        return unknown(base);
    }

    if original_servings == 0 {
        return ScaledIngredient {
            note: Some(ScaleNote::ZeroServings),
            ..base
        };
    }

    let factor = target_people / f64::from(original_servings);
    let original = match parse_quantity(amount_text) {
        Amount::Value(value) => value,
        Amount::Unknown => {
            return ScaledIngredient {
                scaling_factor: Some(factor),
                ..unknown(base)
            }
        }
    };

    let scaled = round_for_unit(unit, original, original * factor);
    ScaledIngredient {
        scaled_amount: with_unit(&format_quantity(scaled), unit),
        scaling_factor: Some(factor),
        ..base
    }
}

/// Apply the unit-specific rounding policy to a raw scaled amount
pub fn round_for_unit(unit: &str, original: f64, scaled: f64) -> f64 {
    if is_spoon_unit(unit) && original >= SPOON_MINIMUM && scaled < SPOON_MINIMUM {
        SPOON_MINIMUM
    } else if is_piece_unit(unit) {
        (scaled * 2.0).round() / 2.0
    } else {
        scaled
    }
}

fn unknown(base: ScaledIngredient) -> ScaledIngredient {
    let marker = with_unit(UNKNOWN_MARKER, &base.unit);
    ScaledIngredient {
        original_amount: marker.clone(),
        scaled_amount: marker,
        ..base
    }
}

/// Join an amount and a unit for display
pub fn with_unit(amount: &str, unit: &str) -> String {
    if unit.is_empty() {
        amount.to_string()
    } else {
        format!("{amount} {unit}")
    }
}

/// Remove a trailing unit from a display amount
pub fn strip_unit<'a>(display: &'a str, unit: &str) -> &'a str {
    let display = display.trim();
    if unit.is_empty() {
        return display;
    }
    display
        .strip_suffix(unit)
        .map(str::trim_end)
        .unwrap_or(display)
}
