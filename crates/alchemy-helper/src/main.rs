//! # Alchemy Helper
//!
//! Command line companion for the game-side alchemy plugin.
//!
//! Imports the effect and inventory logs the plugin writes, then lists the
//! most valuable potions the current inventory can brew and crafts them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod commands;
mod config;
mod import;
mod storage;

use std::path::PathBuf;

use alchemy_common::RecipeId;
use alchemy_core::CraftQuantity;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::{log_path, App};
use crate::config::AppConfig;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "alchemy-helper", version, about = "Find and craft the most valuable potions")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import ingredient and effect definitions from the effects log
    ImportEffects {
        /// Log file to read instead of the configured one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Replace the inventory with the contents of the inventory log
    ImportInventory {
        /// Log file to read instead of the configured one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List brewable recipes, most valuable first
    Recipes {
        /// Maximum number of recipes to list
        #[arg(short, long)]
        limit: Option<usize>,
        /// Only recipes producing this effect
        #[arg(long)]
        effect: Option<String>,
        /// Only recipes using this ingredient
        #[arg(long)]
        ingredient: Option<String>,
        /// Only recipes worth at least this much
        #[arg(long, default_value_t = 0)]
        min_value: u64,
    },
    /// Craft a recipe, consuming its ingredients
    Craft {
        /// Recipe key as listed by `recipes`
        recipe: String,
        /// Craft as many potions as the inventory allows
        #[arg(long, conflicts_with = "count")]
        max: bool,
        /// Number of potions to craft
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },
    /// List known ingredients and the value of their effects
    Ingredients,
    /// List owned ingredients
    Inventory,
    /// Show or change settings
    Settings {
        /// Directory the game plugin writes its logs to
        #[arg(long)]
        data_location: Option<PathBuf>,
        /// Directory holding imported data
        #[arg(long)]
        storage_dir: Option<PathBuf>,
    },
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("alchemy_helper=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load_from(&config_path);

    run(cli.command, config, &config_path)
}

fn run(command: Command, mut config: AppConfig, config_path: &std::path::Path) -> Result<()> {
    match command {
        Command::ImportEffects { file } => {
            let path = log_path(file, config.effects_log_path());
            let report = App::load(&config).import_effects(&path)?;
            println!(
                "Effects: {} added, {} updated. Ingredients: {} added, {} updated, {} rejected.",
                report.effects_added,
                report.effects_updated,
                report.ingredients_added,
                report.ingredients_updated,
                report.errors.len()
            );
            for error in &report.errors {
                println!("  {error}");
            }
        },
        Command::ImportInventory { file } => {
            let path = log_path(file, config.inventory_log_path());
            let count = App::load(&config).import_inventory(&path)?;
            println!("Inventory holds {count} ingredients.");
        },
        Command::Recipes {
            limit,
            effect,
            ingredient,
            min_value,
        } => {
            let mut app = App::load(&config);
            let filter = app.filter(effect.as_deref(), ingredient.as_deref(), min_value)?;
            let recipes = app.recipes(&filter, limit.unwrap_or(config.recipe_limit));
            if recipes.is_empty() {
                println!("No recipes can be brewed from the current inventory.");
            }
            for recipe in &recipes {
                println!(
                    "{:>6}  x{:<4} {:<12} {}  [{}]",
                    recipe.value,
                    recipe.max_potions,
                    recipe.id,
                    app.describe_effects(recipe),
                    app.describe_ingredients(recipe)
                );
            }
        },
        Command::Craft { recipe, max, count } => {
            let quantity = match (max, count) {
                (true, _) => CraftQuantity::Max,
                (false, Some(count)) => CraftQuantity::Exact(count),
                (false, None) => CraftQuantity::One,
            };
            let mut app = App::load(&config);
            let (recipe, amount) = app.craft(&RecipeId::from(recipe), quantity)?;
            println!(
                "Crafted {amount} x {} ({} each).",
                app.describe_effects(&recipe),
                recipe.value
            );
        },
        Command::Ingredients => {
            let app = App::load(&config);
            for ingredient in app.catalog().ingredients() {
                let values = app
                    .catalog()
                    .ingredient_effect_values(ingredient.id)
                    .unwrap_or_default();
                let effects: Vec<String> = values
                    .iter()
                    .map(|(effect, value)| {
                        let name = app
                            .catalog()
                            .effect(*effect)
                            .map_or_else(|| effect.to_string(), |e| e.name.clone());
                        format!("{name} ({value})")
                    })
                    .collect();
                println!("{}  {}: {}", ingredient.id, ingredient.name, effects.join(", "));
            }
        },
        Command::Inventory => {
            let app = App::load(&config);
            for item in app.inventory().items() {
                let name = app
                    .catalog()
                    .ingredient(item.ingredient)
                    .map_or_else(|| item.ingredient.to_string(), |i| i.name.clone());
                println!("{:>5}  {}", item.count, name);
            }
        },
        Command::Settings {
            data_location,
            storage_dir,
        } => {
            let changed = data_location.is_some() || storage_dir.is_some();
            if let Some(dir) = data_location {
                config.data_location = dir;
            }
            if let Some(dir) = storage_dir {
                config.storage_dir = dir;
            }
            if changed {
                config
                    .save_to(config_path)
                    .with_context(|| format!("Failed to save {}", config_path.display()))?;
                info!("Settings updated");
            }
            println!("Config file:   {}", config_path.display());
            println!("Data location: {}", config.data_location.display());
            println!("Storage dir:   {}", config.storage_dir.display());
            println!("Effects log:   {}", config.effects_log_path().display());
            println!("Inventory log: {}", config.inventory_log_path().display());
        },
    }

    Ok(())
}
