//! Plan file persistence.
//!
//! The week plan is stored as pretty-printed JSON. Transient day messages are
//! not part of the file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::plan::WeekPlan;

/// Load a plan file, or start an empty week when the file does not exist
pub fn load_plan(path: &Path) -> Result<WeekPlan> {
    if !path.exists() {
        log::info!("Plan file {} not found, starting an empty week", path.display());
        return Ok(WeekPlan::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    let plan: WeekPlan = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse plan file {}", path.display()))?;

    log::debug!("Loaded {} recipes from {}", plan.recipe_count(), path.display());
    Ok(plan)
}

/// Write a plan file, replacing any previous content
pub fn save_plan(path: &Path, plan: &WeekPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, json).with_context(|| format!("Failed to write plan file {}", path.display()))?;
    log::debug!("Saved {} recipes to {}", plan.recipe_count(), path.display());
    Ok(())
}
