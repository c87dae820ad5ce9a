//! # Meal Planner Service
//!
//! Applies user actions and extraction outcomes to a [`WeekPlan`].
//!
//! Every import ends in a localized transient message on the affected day,
//! whether ingredients were added or not. Extraction failures never escape
//! as errors; they are reported through [`ImportReport`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use madplan::config::PlannerConfig;
//! use madplan::extraction::HttpExtractionClient;
//! use madplan::plan::{WeekPlan, Weekday};
//! use madplan::planner::MealPlanner;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = PlannerConfig::from_env()?;
//! let client = HttpExtractionClient::new(config.extraction.clone())?;
//! let mut planner = MealPlanner::new(WeekPlan::new(), client, config)?;
//!
//! let report = planner
//!     .import_from_url(Weekday::Monday, "https://example.com/opskrift")
//!     .await;
//! println!("{report:?}");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::extraction::{ExtractionOutcome, IngredientSource};
use crate::extraction_errors::ExtractionError;
use crate::ingredient_model::RawIngredient;
use crate::ingredient_parser::parse_ingredient_list;
use crate::localization::Localizer;
use crate::plan::{validate_recipe_name, MessageKind, Recipe, WeekPlan, Weekday};

/// Result of adding a recipe to a day
#[derive(Debug, Clone, PartialEq)]
pub enum ImportReport {
    /// A recipe with at least one ingredient was added
    Added {
        recipe_id: Uuid,
        ingredient_count: usize,
    },
    /// The source could not find a recipe
    NotFound,
    /// A recipe was found but no usable ingredients survived
    Empty,
    /// The source could not be reached or rejected the request
    Failed { reason: String },
}

impl ImportReport {
    pub fn recipe_id(&self) -> Option<Uuid> {
        match self {
            ImportReport::Added { recipe_id, .. } => Some(*recipe_id),
            _ => None,
        }
    }
}

/// Owns the week plan and drives imports through an ingredient source
#[derive(Debug)]
pub struct MealPlanner<S: IngredientSource> {
    plan: WeekPlan,
    source: S,
    localizer: Localizer,
    config: PlannerConfig,
}

impl<S: IngredientSource> MealPlanner<S> {
    pub fn new(plan: WeekPlan, source: S, config: PlannerConfig) -> anyhow::Result<Self> {
        let localizer = Localizer::new(config.language)?;
        Ok(Self {
            plan,
            source,
            localizer,
            config,
        })
    }

    pub fn plan(&self) -> &WeekPlan {
        &self.plan
    }

    pub fn plan_mut(&mut self) -> &mut WeekPlan {
        &mut self.plan
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Import a recipe from a web page onto a day
    pub async fn import_from_url(&mut self, weekday: Weekday, url: &str) -> ImportReport {
        info!(day = %weekday, url, "Importing recipe from URL");
        let result = self.source.from_url(url).await;
        self.apply_outcome(weekday, result, Utc::now())
    }

    /// Import a recipe from a photo onto a day
    pub async fn import_from_image(&mut self, weekday: Weekday, path: &Path) -> ImportReport {
        info!(day = %weekday, path = %path.display(), "Importing recipe from image");
        let result = self.source.from_image(path).await;
        self.apply_outcome(weekday, result, Utc::now())
    }

    /// Add a recipe from manually entered triples
    pub fn add_manual_recipe(
        &mut self,
        weekday: Weekday,
        name: &str,
        servings: u32,
        raw: &[RawIngredient],
    ) -> ImportReport {
        let name = validate_recipe_name(name).unwrap_or_else(|_| self.default_recipe_name(weekday));
        let recipe = Recipe::from_raw(&name, servings, raw);
        self.add_with_message(weekday, recipe, Utc::now())
    }

    /// Add a recipe from free text, one ingredient per line
    pub fn add_recipe_from_text(
        &mut self,
        weekday: Weekday,
        name: &str,
        servings: u32,
        text: &str,
    ) -> ImportReport {
        let raw = parse_ingredient_list(text);
        self.add_manual_recipe(weekday, name, servings, &raw)
    }

    /// Clear messages that have expired
    pub fn sweep_messages(&mut self) -> usize {
        self.plan.clear_expired_messages(Utc::now())
    }

    /// Localized fallback recipe name for a day
    pub fn default_recipe_name(&self, weekday: Weekday) -> String {
        let day = self.localizer.t(weekday.message_key());
        self.localizer
            .get_message_with_args("default-recipe-name", &[("day", day.as_str())])
    }

    /// Turn an extraction result into plan changes and a day message
    pub fn apply_outcome(
        &mut self,
        weekday: Weekday,
        result: Result<ExtractionOutcome, ExtractionError>,
        now: DateTime<Utc>,
    ) -> ImportReport {
        match result {
            Ok(ExtractionOutcome::Found {
                ingredients,
                recipe_name,
            }) => {
                let name = recipe_name
                    .and_then(|name| validate_recipe_name(&name).ok())
                    .unwrap_or_else(|| self.default_recipe_name(weekday));
                let recipe = Recipe::from_raw(&name, self.config.default_servings, &ingredients);
                self.add_with_message(weekday, recipe, now)
            }
            Ok(ExtractionOutcome::NotFound {
                recipe_name,
                reason,
            }) => {
                info!(day = %weekday, ?recipe_name, ?reason, "Source found no recipe");
                let text = match reason.as_deref().map(str::trim) {
                    Some(reason) if !reason.is_empty() => self
                        .localizer
                        .get_message_with_args("import-not-found-reason", &[("reason", reason)]),
                    _ => self.localizer.t("import-not-found"),
                };
                self.notify(weekday, MessageKind::Error, text, now);
                ImportReport::NotFound
            }
            Ok(ExtractionOutcome::Empty { recipe_name }) => {
                let name = recipe_name.unwrap_or_else(|| self.default_recipe_name(weekday));
                self.report_empty(weekday, &name, now)
            }
            Err(err) => {
                warn!(day = %weekday, error = %err, "Recipe import failed");
                let text = match &err {
                    ExtractionError::CircuitOpen => self.localizer.t("import-unavailable"),
                    other => {
                        let error = other.to_string();
                        self.localizer
                            .get_message_with_args("import-failed", &[("error", error.as_str())])
                    }
                };
                self.notify(weekday, MessageKind::Error, text, now);
                ImportReport::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn add_with_message(&mut self, weekday: Weekday, recipe: Recipe, now: DateTime<Utc>) -> ImportReport {
        if recipe.ingredients.is_empty() {
            return self.report_empty(weekday, &recipe.name, now);
        }

        let ingredient_count = recipe.ingredients.len();
        let count = ingredient_count.to_string();
        let text = self.localizer.get_message_with_args(
            "recipe-added",
            &[("recipe", recipe.name.as_str()), ("count", count.as_str())],
        );
        let recipe_id = self.plan.add_recipe(weekday, recipe);
        self.notify(weekday, MessageKind::Info, text, now);

        info!(day = %weekday, %recipe_id, ingredient_count, "Recipe added");
        ImportReport::Added {
            recipe_id,
            ingredient_count,
        }
    }

    fn report_empty(&mut self, weekday: Weekday, recipe_name: &str, now: DateTime<Utc>) -> ImportReport {
        info!(day = %weekday, recipe_name, "No usable ingredients");
        let text = self
            .localizer
            .get_message_with_args("import-empty", &[("recipe", recipe_name)]);
        self.notify(weekday, MessageKind::Error, text, now);
        ImportReport::Empty
    }

    fn notify(&mut self, weekday: Weekday, kind: MessageKind, text: String, now: DateTime<Utc>) {
        self.plan
            .set_message(weekday, kind, text, now, self.config.message_ttl);
    }
}
