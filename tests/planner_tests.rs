//! # Planner Tests
//!
//! Import flows through the planner with a scripted ingredient source.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use madplan::config::PlannerConfig;
use madplan::extraction::{ExtractionOutcome, IngredientSource};
use madplan::extraction_errors::ExtractionError;
use madplan::ingredient_model::RawIngredient;
use madplan::localization::Language;
use madplan::plan::{Headcount, MessageKind, WeekPlan, Weekday};
use madplan::planner::{ImportReport, MealPlanner};
use std::path::Path;

/// Answers every request with the same scripted result
struct ScriptedSource {
    result: Result<ExtractionOutcome, ExtractionError>,
}

#[async_trait]
impl IngredientSource for ScriptedSource {
    async fn from_url(&self, _url: &str) -> Result<ExtractionOutcome, ExtractionError> {
        self.result.clone()
    }

    async fn from_image(&self, _path: &Path) -> Result<ExtractionOutcome, ExtractionError> {
        self.result.clone()
    }
}

fn planner_with(result: Result<ExtractionOutcome, ExtractionError>) -> MealPlanner<ScriptedSource> {
    MealPlanner::new(
        WeekPlan::new(),
        ScriptedSource { result },
        PlannerConfig::default(),
    )
    .expect("Failed to create planner")
}

fn lasagne() -> ExtractionOutcome {
    ExtractionOutcome::Found {
        ingredients: vec![
            RawIngredient::new("hakket oksekød", "500", "g"),
            RawIngredient::new("lasagneplader", "12", "stk"),
            RawIngredient::new("salt", "1", "tsk"),
            RawIngredient::new("mælk", "5", "dl"),
        ],
        recipe_name: Some("Lasagne".to_string()),
    }
}

#[tokio::test]
async fn test_url_import_adds_recipe_with_default_servings() {
    let mut planner = planner_with(Ok(lasagne()));

    let report = planner
        .import_from_url(Weekday::Wednesday, "https://example.com/lasagne")
        .await;

    assert!(matches!(
        report,
        ImportReport::Added {
            ingredient_count: 3,
            ..
        }
    ));
    let recipe_id = report.recipe_id().unwrap();

    let recipe = planner.plan().recipe(recipe_id).unwrap();
    assert_eq!(recipe.name, "Lasagne");
    assert_eq!(recipe.servings, 4);
    assert_eq!(planner.plan().weekday_of(recipe_id), Some(Weekday::Wednesday));

    let message = planner
        .plan()
        .visible_message(Weekday::Wednesday, Utc::now())
        .unwrap();
    assert_eq!(message.kind, MessageKind::Info);
    assert!(message.text.contains("Lasagne"));
    assert!(message.text.contains('3'));
}

#[tokio::test]
async fn test_imported_recipe_scales_with_headcount() {
    let mut planner = planner_with(Ok(lasagne()));
    planner
        .plan_mut()
        .set_headcount(Weekday::Monday, Headcount::new(6, 4, 0));
    planner.import_from_url(Weekday::Monday, "https://example.com").await;

    let scaled = planner.plan().day(Weekday::Monday).scaled_ingredients();
    let beef = scaled.iter().find(|i| i.name == "oksekød").unwrap();
    assert_eq!(beef.scaling_factor, Some(2.0));
    assert_eq!(beef.scaled_amount, "1000 gram");
    assert_eq!(beef.recipe_name, "Lasagne");
}

#[tokio::test]
async fn test_not_found_leaves_plan_unchanged() {
    let mut planner = planner_with(Ok(ExtractionOutcome::NotFound {
        recipe_name: None,
        reason: Some("Siden indeholder ingen opskrift".to_string()),
    }));

    let report = planner.import_from_url(Weekday::Monday, "https://example.com").await;

    assert_eq!(report, ImportReport::NotFound);
    assert_eq!(planner.plan().recipe_count(), 0);
    let message = planner
        .plan()
        .visible_message(Weekday::Monday, Utc::now())
        .unwrap();
    assert_eq!(message.kind, MessageKind::Error);
    assert!(message.text.contains("Siden indeholder ingen opskrift"));
}

#[tokio::test]
async fn test_empty_outcome_is_reported() {
    let mut planner = planner_with(Ok(ExtractionOutcome::Empty {
        recipe_name: Some("Suppe".to_string()),
    }));

    let report = planner
        .import_from_image(Weekday::Tuesday, Path::new("opskrift.jpg"))
        .await;

    assert_eq!(report, ImportReport::Empty);
    assert_eq!(planner.plan().recipe_count(), 0);
    let message = planner
        .plan()
        .visible_message(Weekday::Tuesday, Utc::now())
        .unwrap();
    assert_eq!(message.text, "Ingen ingredienser fundet i \"Suppe\"");
}

#[tokio::test]
async fn test_service_failure_is_reported_not_raised() {
    let mut planner = planner_with(Err(ExtractionError::Service {
        status: 502,
        detail: "Bad gateway".to_string(),
    }));

    let report = planner.import_from_url(Weekday::Friday, "https://example.com").await;

    match report {
        ImportReport::Failed { reason } => assert!(reason.contains("Bad gateway")),
        other => panic!("expected failure, got {other:?}"),
    }
    let message = planner
        .plan()
        .visible_message(Weekday::Friday, Utc::now())
        .unwrap();
    assert_eq!(message.kind, MessageKind::Error);
    assert!(message.text.starts_with("Kunne ikke hente opskriften"));
}

#[test]
fn test_messages_expire_after_ttl() {
    let mut planner = planner_with(Ok(lasagne()));
    let now = Utc::now();
    planner.apply_outcome(Weekday::Thursday, Ok(lasagne()), now);

    let ttl = planner.config().message_ttl;
    assert!(planner.plan().visible_message(Weekday::Thursday, now).is_some());
    assert!(planner
        .plan()
        .visible_message(Weekday::Thursday, now + ttl)
        .is_none());

    assert_eq!(planner.plan_mut().clear_expired_messages(now + ttl + Duration::seconds(1)), 1);
    assert!(planner.plan().day(Weekday::Thursday).message.is_none());
}

#[test]
fn test_messages_are_localized() {
    let config = PlannerConfig {
        language: Language::English,
        ..Default::default()
    };
    let mut planner = MealPlanner::new(
        WeekPlan::new(),
        ScriptedSource {
            result: Err(ExtractionError::CircuitOpen),
        },
        config,
    )
    .unwrap();

    let now = Utc::now();
    planner.apply_outcome(Weekday::Monday, Err(ExtractionError::CircuitOpen), now);
    let message = planner.plan().visible_message(Weekday::Monday, now).unwrap();
    assert!(message.text.contains("temporarily unavailable"));
    assert_eq!(planner.default_recipe_name(Weekday::Monday), "Recipe for Monday");
}

#[test]
fn test_typed_recipe_text() {
    let mut planner = planner_with(Err(ExtractionError::CircuitOpen));

    let report = planner.add_recipe_from_text(
        Weekday::Monday,
        "Kartoffelsuppe",
        2,
        "1 kg kartofler\n2 porrer\n1 l vand\nKog det hele i 20 minutter",
    );

    let recipe_id = report.recipe_id().unwrap();
    let recipe = planner.plan().recipe(recipe_id).unwrap();
    let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["kartofler", "porrer"]);
    assert_eq!(recipe.servings, 2);
}

#[test]
fn test_recipe_management() {
    let mut planner = planner_with(Err(ExtractionError::CircuitOpen));
    let id = planner
        .add_manual_recipe(
            Weekday::Friday,
            "Fiskefrikadeller",
            4,
            &[RawIngredient::new("torsk", "400", "g")],
        )
        .recipe_id()
        .unwrap();

    let plan = planner.plan_mut();
    assert!(plan.rename_recipe(id, "Fiskefrikadeller med remoulade"));
    assert!(!plan.rename_recipe(id, "   "));
    assert!(plan.set_servings(id, 6));
    assert_eq!(plan.recipe(id).unwrap().servings, 6);
    assert_eq!(plan.recipe(id).unwrap().name, "Fiskefrikadeller med remoulade");

    assert!(plan.remove_recipe(id).is_some());
    assert!(plan.remove_recipe(id).is_none());
    assert_eq!(plan.recipe_count(), 0);
}
