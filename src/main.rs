//! # Madplan CLI
//!
//! Operate a week plan stored as a JSON file: set headcounts, add or import
//! recipes, print the shopping list and export the spreadsheet document.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use madplan::config::PlannerConfig;
use madplan::export::export_csv;
use madplan::extraction::{HttpExtractionClient, IngredientSource};
use madplan::plan::{Headcount, MessageKind, Weekday};
use madplan::planner::{ImportReport, MealPlanner};
use madplan::scaling::{with_unit, ScaleNote};
use madplan::storage;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "madplan", version, about = "Weekly meal planner and shopping list builder")]
struct Cli {
    /// Plan file (JSON); a missing file starts an empty week
    #[arg(long, global = true, default_value = "madplan.json")]
    plan: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set how many people eat on a day
    Headcount {
        /// Weekday (mandag..fredag or monday..friday)
        day: Weekday,
        #[arg(long, default_value_t = 0)]
        adults: u32,
        #[arg(long, default_value_t = 0)]
        kids: u32,
        #[arg(long, default_value_t = 0)]
        teens: u32,
    },

    /// Add a recipe from ingredient lines ("2 fed hvidløg", "500 g kartofler")
    Add {
        day: Weekday,
        /// Recipe name (defaults to a name with the weekday)
        #[arg(long, default_value = "")]
        name: String,
        /// Servings the recipe is written for
        #[arg(long)]
        servings: Option<u32>,
        /// Read ingredient lines from a file instead of arguments or stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Ingredient lines
        lines: Vec<String>,
    },

    /// Import a recipe from a web page through the extraction service
    ImportUrl { day: Weekday, url: String },

    /// Import a recipe from a photo through the extraction service
    ImportImage { day: Weekday, path: PathBuf },

    /// Rename a recipe
    Rename { id: Uuid, name: String },

    /// Change the servings a recipe is written for
    Servings { id: Uuid, servings: u32 },

    /// Remove a recipe
    Remove { id: Uuid },

    /// Print the recipes per day and the shopping list
    List,

    /// Write the spreadsheet export
    Export {
        #[arg(short, long, default_value = "madplan.csv")]
        output: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = PlannerConfig::from_env()?;
    let plan = storage::load_plan(&cli.plan)?;
    let client = HttpExtractionClient::new(config.extraction.clone())?;
    let mut planner = MealPlanner::new(plan, client, config)?;

    tracing::info!(plan = %cli.plan.display(), command = ?cli.command, "Running command");

    if run(&mut planner, cli.command).await? {
        storage::save_plan(&cli.plan, planner.plan())?;
    }

    Ok(())
}

/// Execute one command; returns whether the plan changed
async fn run<S: IngredientSource>(planner: &mut MealPlanner<S>, command: Command) -> Result<bool> {
    match command {
        Command::Headcount {
            day,
            adults,
            kids,
            teens,
        } => {
            planner
                .plan_mut()
                .set_headcount(day, Headcount::new(adults, kids, teens));
            let localizer = planner.localizer();
            let day_name = localizer.t(day.message_key());
            println!(
                "{}",
                localizer.get_message_with_args(
                    "headcount-updated",
                    &[
                        ("day", day_name.as_str()),
                        ("adults", adults.to_string().as_str()),
                        ("kids", kids.to_string().as_str()),
                        ("teens", teens.to_string().as_str()),
                    ],
                )
            );
            Ok(true)
        }

        Command::Add {
            day,
            name,
            servings,
            file,
            lines,
        } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None if !lines.is_empty() => lines.join("\n"),
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("Failed to read ingredient lines from stdin")?;
                    text
                }
            };
            let servings = servings.unwrap_or(planner.config().default_servings);
            let report = planner.add_recipe_from_text(day, &name, servings, &text);
            Ok(report_outcome(planner, day, &report))
        }

        Command::ImportUrl { day, url } => {
            let report = planner.import_from_url(day, &url).await;
            Ok(report_outcome(planner, day, &report))
        }

        Command::ImportImage { day, path } => {
            let report = planner.import_from_image(day, &path).await;
            Ok(report_outcome(planner, day, &report))
        }

        Command::Rename { id, name } => {
            ensure_recipe(planner, id)?;
            if !planner.plan_mut().rename_recipe(id, &name) {
                bail!(planner.localizer().t("recipe-name-invalid"));
            }
            println!(
                "{}",
                planner
                    .localizer()
                    .get_message_with_args("recipe-renamed", &[("recipe", name.trim())])
            );
            Ok(true)
        }

        Command::Servings { id, servings } => {
            ensure_recipe(planner, id)?;
            planner.plan_mut().set_servings(id, servings);
            let recipe_name = planner
                .plan()
                .recipe(id)
                .map(|recipe| recipe.name.clone())
                .unwrap_or_default();
            println!(
                "{}",
                planner.localizer().get_message_with_args(
                    "servings-updated",
                    &[
                        ("recipe", recipe_name.as_str()),
                        ("servings", servings.to_string().as_str()),
                    ],
                )
            );
            Ok(true)
        }

        Command::Remove { id } => {
            ensure_recipe(planner, id)?;
            if let Some(recipe) = planner.plan_mut().remove_recipe(id) {
                println!(
                    "{}",
                    planner
                        .localizer()
                        .get_message_with_args("recipe-removed", &[("recipe", recipe.name.as_str())])
                );
            }
            Ok(true)
        }

        Command::List => {
            print_plan(planner);
            Ok(false)
        }

        Command::Export { output } => {
            let document = export_csv(planner.plan(), &planner.config().export)?;
            std::fs::write(&output, document)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            let path = output.display().to_string();
            println!(
                "{}",
                planner
                    .localizer()
                    .get_message_with_args("export-written", &[("path", path.as_str())])
            );
            Ok(false)
        }
    }
}

fn ensure_recipe<S: IngredientSource>(planner: &MealPlanner<S>, id: Uuid) -> Result<()> {
    if planner.plan().recipe(id).is_none() {
        let id = id.to_string();
        bail!(planner
            .localizer()
            .get_message_with_args("recipe-not-found", &[("id", id.as_str())]));
    }
    Ok(())
}

/// Print the day's message; returns whether a recipe was added
fn report_outcome<S: IngredientSource>(
    planner: &MealPlanner<S>,
    day: Weekday,
    report: &ImportReport,
) -> bool {
    if let Some(message) = planner.plan().visible_message(day, Utc::now()) {
        match message.kind {
            MessageKind::Info => println!("{}", message.text),
            MessageKind::Error => eprintln!("{}", message.text),
        }
    }

    match report {
        ImportReport::Added { recipe_id, .. } => {
            println!("{recipe_id}");
            true
        }
        _ => false,
    }
}

fn print_plan<S: IngredientSource>(planner: &MealPlanner<S>) {
    let localizer = planner.localizer();
    let plan = planner.plan();

    for day in plan.days() {
        if day.recipes.is_empty() {
            continue;
        }
        let headcount = day.headcount;
        println!(
            "{} ({}/{}/{})",
            localizer.t(day.weekday.message_key()),
            headcount.adults,
            headcount.kids,
            headcount.teens
        );
        for recipe in &day.recipes {
            println!("  {}  {} ({})", recipe.id, recipe.name, recipe.servings);
            if recipe.servings == 0 {
                println!("    {}", localizer.t(ScaleNote::ZeroServings.message_key()));
            }
        }
    }

    let list = plan.shopping_list();
    println!();
    if list.is_empty() {
        println!("{}", localizer.t("shopping-list-empty"));
        return;
    }

    println!("{}", localizer.t("shopping-list-title"));
    for group in &list.groups {
        println!();
        println!("{}", localizer.t(group.category.message_key()));
        for item in &group.items {
            println!("  {}  {}", with_unit(&item.display_total(), &item.unit), item.name);
        }
    }
}
