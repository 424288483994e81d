//! Import of the logs written by the game-side plugin.
//!
//! This module provides:
//! - Parsing of the ingredient effects log into a [`CatalogBatch`]
//! - Parsing of the inventory log into an [`Inventory`]
//!
//! Both logs are line oriented with `;` separated fields. Names are the last
//! field and may themselves contain `;`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alchemy_common::{EffectId, IngredientId};
use alchemy_core::{Catalog, CatalogBatch, Effect, Ingredient, IngredientEffect, Inventory};
use thiserror::Error;
use tracing::{debug, info};

/// Line prefix introducing an ingredient (spelled as the plugin writes it).
pub const INGREDIENT_PREFIX: &str = "Ingridient: ";

/// Line prefix introducing an effect of the current ingredient.
pub const EFFECT_PREFIX: &str = "Effect: ";

/// Number of `;` separated fields on an effect line, name included.
const EFFECT_FIELDS: usize = 9;

/// Errors that can occur while importing logs.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Failed to read the log file.
    #[error("Failed to read log file {path}: {source}")]
    Read {
        /// Log file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A line that is not in the expected format.
    #[error("Invalid data in log file at line {line}: {reason}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// An effect line before any ingredient line.
    #[error("Effect at line {line} does not belong to an ingredient")]
    EffectWithoutIngredient {
        /// 1-based line number.
        line: usize,
    },

    /// Inventory entry for an ingredient missing from the catalog.
    #[error("Unknown ingredient {id} at line {line}")]
    UnknownIngredient {
        /// 1-based line number.
        line: usize,
        /// Raw ingredient id.
        id: u32,
    },
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Reads a log file into memory.
pub fn read_log(path: &Path) -> ImportResult<String> {
    debug!("Reading log file: {:?}", path);
    fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(line: usize, reason: impl Into<String>) -> ImportError {
    ImportError::InvalidLine {
        line,
        reason: reason.into(),
    }
}

fn parse_number<T: FromStr>(raw: &str, line: usize, field: &str) -> ImportResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(line, format!("{field} is not a valid number: {raw:?}")))
}

fn parse_float(raw: &str, line: usize, field: &str) -> ImportResult<f64> {
    let value: f64 = parse_number(raw, line, field)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(line, format!("{field} is not finite: {raw:?}")))
    }
}

fn parse_bool(raw: &str, line: usize, field: &str) -> ImportResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(line, format!("{field} is not a boolean: {raw:?}"))),
    }
}

/// Numbered, non-blank lines.
fn lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(index, row)| (index + 1, row.trim_end_matches('\r')))
        .filter(|(_, row)| !row.trim().is_empty())
}

fn parse_effect_line(
    rest: &str,
    line: usize,
    effects: &mut BTreeMap<EffectId, Effect>,
) -> ImportResult<IngredientEffect> {
    let fields: Vec<&str> = rest.splitn(EFFECT_FIELDS, ';').collect();
    if fields.len() < EFFECT_FIELDS - 1 {
        return Err(invalid(
            line,
            format!("expected {EFFECT_FIELDS} fields, found {}", fields.len()),
        ));
    }

    let id = EffectId::new(parse_number(fields[0], line, "effect id")?);
    let duration: i32 = parse_number(fields[1], line, "duration")?;
    let magnitude = parse_float(fields[2], line, "magnitude")?;

    if !effects.contains_key(&id) {
        let mut effect = Effect::new(
            id,
            fields.get(8).copied().unwrap_or_default(),
            parse_float(fields[3], line, "base cost")?,
        );
        effect.with_duration = !parse_bool(fields[4], line, "without duration")?;
        effect.with_magnitude = !parse_bool(fields[5], line, "without magnitude")?;
        effect.power_affects_duration = parse_bool(fields[6], line, "power affects duration")?;
        effect.power_affects_magnitude = parse_bool(fields[7], line, "power affects magnitude")?;
        effects.insert(id, effect);
    }

    Ok(IngredientEffect::new(id, duration, magnitude))
}

/// Parses the ingredient effects log.
///
/// The first sighting of an effect id defines the effect; later sightings
/// only contribute the ingredient's applied duration and magnitude. Effects
/// and ingredients come back ordered by id.
pub fn parse_effects_log(content: &str) -> ImportResult<CatalogBatch> {
    let mut effects: BTreeMap<EffectId, Effect> = BTreeMap::new();
    let mut ingredients: BTreeMap<IngredientId, Ingredient> = BTreeMap::new();
    let mut current: Option<Ingredient> = None;

    for (line, row) in lines(content) {
        if let Some(rest) = row.strip_prefix(INGREDIENT_PREFIX) {
            if let Some(done) = current.take() {
                ingredients.insert(done.id, done);
            }
            let (raw_id, name) = rest.split_once(';').unwrap_or((rest, ""));
            let id = IngredientId::new(parse_number(raw_id, line, "ingredient id")?);
            current = Some(Ingredient::new(id, name));
        } else if let Some(rest) = row.strip_prefix(EFFECT_PREFIX) {
            let ingredient = current
                .as_mut()
                .ok_or(ImportError::EffectWithoutIngredient { line })?;
            let entry = parse_effect_line(rest, line, &mut effects)?;
            ingredient.effects.push(entry);
        } else {
            return Err(invalid(line, "unrecognized line"));
        }
    }

    if let Some(done) = current.take() {
        ingredients.insert(done.id, done);
    }

    info!(
        "Parsed {} effects and {} ingredients from effects log",
        effects.len(),
        ingredients.len()
    );

    Ok(CatalogBatch {
        effects: effects.into_values().collect(),
        ingredients: ingredients.into_values().collect(),
    })
}

/// Parses the inventory log against a catalog.
///
/// Every listed ingredient must be known. Zero counts are dropped and a
/// repeated id keeps its last count.
pub fn parse_inventory_log(content: &str, catalog: &Catalog) -> ImportResult<Inventory> {
    let mut inventory = Inventory::new();

    for (line, row) in lines(content) {
        let rest = row
            .strip_prefix(INGREDIENT_PREFIX)
            .ok_or_else(|| invalid(line, "unrecognized line"))?;
        let mut fields = rest.split(';');
        let raw_id = fields.next().unwrap_or_default();
        let raw_count = fields
            .next()
            .ok_or_else(|| invalid(line, "missing count"))?;

        let raw: u32 = parse_number(raw_id, line, "ingredient id")?;
        let id = IngredientId::new(raw);
        if catalog.ingredient(id).is_none() {
            return Err(ImportError::UnknownIngredient { line, id: raw });
        }

        inventory.set(id, parse_number(raw_count, line, "count")?);
    }

    info!("Parsed {} inventory entries", inventory.len());
    Ok(inventory)
}
