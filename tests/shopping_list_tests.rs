//! # Shopping List Tests
//!
//! End-to-end checks from recipes on a week plan to the aggregated shopping
//! list and the spreadsheet export.

use madplan::categorizer::Category;
use madplan::export::{export_csv, ExportSettings, BOM};
use madplan::ingredient_model::RawIngredient;
use madplan::plan::{Headcount, Recipe, WeekPlan, Weekday};
use madplan::storage::{load_plan, save_plan};
use tempfile::TempDir;

fn chicken_soup() -> Recipe {
    Recipe::from_raw(
        "Kyllingesuppe",
        4,
        &[
            RawIngredient::new("løg, finthakket", "2", "stk"),
            RawIngredient::new("kyllingebryst", "600", "g"),
            RawIngredient::new("fløde", "2", "dl"),
            RawIngredient::new("salt", "1", "tsk"),
        ],
    )
}

fn potato_bake() -> Recipe {
    Recipe::from_raw(
        "Kartoffelfad",
        2,
        &[
            RawIngredient::new("løg", "1", "stk"),
            RawIngredient::new("fløde", "1", "dl"),
            RawIngredient::new("kartofler", "1 ½", "kg"),
        ],
    )
}

fn week() -> WeekPlan {
    let mut plan = WeekPlan::new();
    plan.set_headcount(Weekday::Monday, Headcount::new(4, 0, 0));
    plan.set_headcount(Weekday::Tuesday, Headcount::new(2, 2, 0));
    plan.add_recipe(Weekday::Monday, chicken_soup());
    plan.add_recipe(Weekday::Tuesday, potato_bake());
    plan
}

#[test]
fn test_week_aggregates_across_days() {
    let list = week().shopping_list();

    let categories: Vec<Category> = list.groups.iter().map(|g| g.category).collect();
    assert_eq!(
        categories,
        [Category::MeatFish, Category::Dairy, Category::Produce]
    );

    let onions = list.find(Category::Produce, "løg", "stykker").unwrap();
    assert_eq!(onions.total, 3.5);
    assert_eq!(onions.display_total(), "3,5");

    let cream = list.find(Category::Dairy, "fløde", "deciliter").unwrap();
    assert_eq!(cream.total, 3.5);

    let chicken = list.find(Category::MeatFish, "kyllingebryst", "gram").unwrap();
    assert_eq!(chicken.display_total(), "600");

    let potatoes = list.find(Category::Produce, "kartofler", "kilogram").unwrap();
    assert_eq!(potatoes.display_total(), "2,25");

    let produce: Vec<&str> = list
        .group(Category::Produce)
        .unwrap()
        .items
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(produce, ["løg", "kartofler"]);
}

#[test]
fn test_totals_are_additive_over_recipes() {
    let mut monday_only = WeekPlan::new();
    monday_only.set_headcount(Weekday::Monday, Headcount::new(4, 0, 0));
    monday_only.add_recipe(Weekday::Monday, chicken_soup());

    let mut tuesday_only = WeekPlan::new();
    tuesday_only.set_headcount(Weekday::Tuesday, Headcount::new(2, 2, 0));
    tuesday_only.add_recipe(Weekday::Tuesday, potato_bake());

    let combined = week().shopping_list();
    let first = monday_only.shopping_list();
    let second = tuesday_only.shopping_list();

    for group in &combined.groups {
        for item in &group.items {
            let part = |list: &madplan::aggregator::ShoppingList| {
                list.find(group.category, &item.name, &item.unit)
                    .map(|i| i.total)
                    .unwrap_or(0.0)
            };
            let sum = part(&first) + part(&second);
            assert!((item.total - sum).abs() < 1e-9, "{} {}", item.name, item.unit);
        }
    }
}

#[test]
fn test_headcount_change_rescales_on_next_render() {
    let mut plan = week();
    plan.set_headcount(Weekday::Monday, Headcount::new(6, 4, 0));

    let chicken = plan
        .shopping_list()
        .find(Category::MeatFish, "kyllingebryst", "gram")
        .cloned()
        .unwrap();
    assert_eq!(chicken.total, 1200.0);
}

#[test]
fn test_removing_a_recipe_drops_its_items() {
    let mut plan = week();
    let id = plan.day(Weekday::Tuesday).recipes[0].id;
    plan.remove_recipe(id).unwrap();

    let list = plan.shopping_list();
    assert!(list.find(Category::Produce, "kartofler", "kilogram").is_none());
    assert_eq!(list.find(Category::Produce, "løg", "stykker").unwrap().total, 2.0);
}

#[test]
fn test_unknown_amounts_keep_their_line() {
    let mut plan = WeekPlan::new();
    plan.set_headcount(Weekday::Friday, Headcount::new(2, 0, 0));
    plan.add_recipe(
        Weekday::Friday,
        Recipe::from_raw("Salat", 2, &[RawIngredient::new("persille", "en håndfuld", "")]),
    );

    let list = plan.shopping_list();
    let parsley = list.find(Category::Produce, "persille", "").unwrap();
    assert_eq!(parsley.total, 0.0);
    assert_eq!(parsley.display_total(), "?");
}

#[test]
fn test_export_of_populated_week() {
    let document = export_csv(&week(), &ExportSettings::default()).unwrap();
    assert!(document.starts_with(BOM));

    assert!(document.contains("Mandag;4;0;0;4;1;160,00\n"));
    assert!(document.contains("Tirsdag;2;2;0;4;1;120,00\n"));
    assert!(document.contains("Onsdag;0;0;0;0;0;0,00\n"));
    assert!(document.contains("Mandag;Kyllingesuppe;4;kyllingebryst;600;gram\n"));
    assert!(document.contains("Tirsdag;Kartoffelfad;2;kartofler;1 ½;kilogram\n"));
    assert!(document.contains("Kød & fisk;kyllingebryst;gram;600\n"));
    assert!(document.contains("Frugt & grønt;løg;stykker;3,5\n"));
    assert!(!document.contains("salt"));
}

#[test]
fn test_export_uses_custom_settings() {
    let settings = ExportSettings {
        seats_per_table: 3,
        price_per_portion: 25.5,
    };
    let document = export_csv(&week(), &settings).unwrap();
    assert!(document.contains("Mandag;4;0;0;4;2;102,00\n"));
}

#[test]
fn test_plan_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uge").join("madplan.json");

    let plan = week();
    save_plan(&path, &plan).unwrap();
    let loaded = load_plan(&path).unwrap();

    assert_eq!(loaded, plan);
    assert_eq!(loaded.shopping_list(), plan.shopping_list());
}
