//! # Export Module
//!
//! Produces the spreadsheet document for a week plan: a headcount and cost
//! overview per day, the per-recipe ingredient breakdown, and the aggregated
//! shopping list.
//!
//! Fields are separated by `;` because Danish spreadsheets use the comma as
//! decimal separator. The document starts with a UTF-8 byte order mark so
//! "æ", "ø" and "å" survive being opened in a spreadsheet application.

use anyhow::{Context, Result};

use crate::plan::WeekPlan;

/// UTF-8 byte order mark
pub const BOM: &str = "\u{feff}";

pub const OVERVIEW_TITLE: &str = "Oversigt";
pub const RECIPES_TITLE: &str = "Opskrifter";
pub const SHOPPING_LIST_TITLE: &str = "Indkøbsliste";

pub const OVERVIEW_HEADER: [&str; 7] =
    ["Dag", "Voksne", "Børn", "Unge", "Personer i alt", "Borde", "Pris"];
pub const RECIPES_HEADER: [&str; 6] =
    ["Dag", "Opskrift", "Antal personer", "Ingrediens", "Mængde", "Enhed"];
pub const SHOPPING_LIST_HEADER: [&str; 4] = ["Kategori", "Ingrediens", "Enhed", "Total"];

/// Settings for the overview section
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Seats at one table
    pub seats_per_table: u32,
    /// Price of one adult portion
    pub price_per_portion: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            seats_per_table: 8,
            price_per_portion: 40.0,
        }
    }
}

/// Tables needed to seat everyone
pub fn tables_needed(people: u32, seats_per_table: u32) -> u32 {
    if seats_per_table == 0 {
        return 0;
    }
    people.div_ceil(seats_per_table)
}

/// Format an amount of money with two decimals and a decimal comma
pub fn format_price(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

fn section_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush export section: {}", e))?;
    String::from_utf8(bytes).context("Export section is not valid UTF-8")
}

fn overview_section(plan: &WeekPlan, settings: &ExportSettings) -> Result<String> {
    let mut writer = section_writer();
    writer.write_record([OVERVIEW_TITLE])?;
    writer.write_record(OVERVIEW_HEADER)?;

    for day in plan.days() {
        let headcount = day.headcount;
        let total = headcount.total();
        writer.write_record([
            day.weekday.label().to_string(),
            headcount.adults.to_string(),
            headcount.kids.to_string(),
            headcount.teens.to_string(),
            total.to_string(),
            tables_needed(total, settings.seats_per_table).to_string(),
            format_price(headcount.weighted() * settings.price_per_portion),
        ])?;
    }

    finish(writer)
}

fn recipes_section(plan: &WeekPlan) -> Result<String> {
    let mut writer = section_writer();
    writer.write_record([RECIPES_TITLE])?;
    writer.write_record(RECIPES_HEADER)?;

    for day in plan.days() {
        for recipe in &day.recipes {
            for ingredient in &recipe.ingredients {
                writer.write_record([
                    day.weekday.label(),
                    recipe.name.as_str(),
                    recipe.servings.to_string().as_str(),
                    ingredient.name.as_str(),
                    ingredient.amount.as_str(),
                    ingredient.unit.as_str(),
                ])?;
            }
        }
    }

    finish(writer)
}

fn shopping_list_section(plan: &WeekPlan) -> Result<String> {
    let mut writer = section_writer();
    writer.write_record([SHOPPING_LIST_TITLE])?;
    writer.write_record(SHOPPING_LIST_HEADER)?;

    for group in plan.shopping_list().groups {
        for item in &group.items {
            writer.write_record([
                group.category.label(),
                item.name.as_str(),
                item.unit.as_str(),
                item.display_total().as_str(),
            ])?;
        }
    }

    finish(writer)
}

/// Render the full export document
///
/// # Examples
///
/// ```rust
/// use madplan::export::{export_csv, ExportSettings};
/// use madplan::plan::WeekPlan;
///
/// let document = export_csv(&WeekPlan::new(), &ExportSettings::default()).unwrap();
/// assert!(document.starts_with('\u{feff}'));
/// assert!(document.contains("Dag;Voksne;Børn;Unge;Personer i alt;Borde;Pris"));
/// ```
pub fn export_csv(plan: &WeekPlan, settings: &ExportSettings) -> Result<String> {
    let sections = [
        overview_section(plan, settings).context("Failed to write overview")?,
        recipes_section(plan).context("Failed to write recipe breakdown")?,
        shopping_list_section(plan).context("Failed to write shopping list")?,
    ];

    log::info!(
        "Exported {} recipes across {} days",
        plan.recipe_count(),
        plan.days().len()
    );

    Ok(format!("{BOM}{}", sections.join("\n")))
}
