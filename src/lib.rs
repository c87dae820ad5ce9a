//! # Madplan
//!
//! A weekly meal planner for households and communal kitchens. Recipes are
//! collected per weekday from recipe web pages, photos or typed ingredient
//! lines, scaled to each day's headcount and merged into one categorized
//! shopping list.
//!
//! The engine (`quantity`, `units`, `name_normalizer`, `scaling`,
//! `categorizer`, `aggregator`) is pure and synchronous. Network access is
//! confined to the `extraction` client.

pub mod aggregator;
pub mod categorizer;
pub mod circuit_breaker;
pub mod config;
pub mod export;
pub mod extraction;
pub mod extraction_config;
pub mod extraction_errors;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod localization;
pub mod name_normalizer;
pub mod plan;
pub mod planner;
pub mod quantity;
pub mod scaling;
pub mod storage;
pub mod units;
