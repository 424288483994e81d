//! Persistence of the catalog and inventory between runs.
//!
//! This module provides:
//! - One JSON file per collection, tagged with its schema version
//! - Atomic writes (temp file + rename)
//! - Lenient loading: unreadable files and invalid entries are skipped

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use alchemy_common::{AlchemyError, AlchemyResult, IngredientId, SchemaVersion};
use alchemy_core::{Catalog, Effect, Ingredient, Inventory};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Stored effect definitions.
pub const EFFECTS_FILE: &str = "effects.json";

/// Stored ingredient definitions.
pub const INGREDIENTS_FILE: &str = "ingredients.json";

/// Stored inventory counts.
pub const INVENTORY_FILE: &str = "inventory.json";

/// On-disk layout of every stored collection.
#[derive(Debug, Serialize, Deserialize)]
struct StoredFile<T> {
    version: SchemaVersion,
    entries: Vec<T>,
}

/// One stored inventory stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Owned ingredient
    pub ingredient: IngredientId,
    /// Owned count
    pub count: u32,
}

/// Reads and writes the stored collections under one directory.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Creates storage rooted at `dir`. Nothing is touched until a save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Loads the stored catalog, falling back to whatever could be read.
    pub fn load_catalog(&self) -> Catalog {
        let mut catalog = Catalog::new();

        for effect in self.load_entries::<Effect>(EFFECTS_FILE, SchemaVersion::EFFECTS) {
            catalog.insert_effect(effect);
        }

        for ingredient in self.load_entries::<Ingredient>(INGREDIENTS_FILE, SchemaVersion::INGREDIENTS) {
            if let Err(e) = catalog.insert_ingredient(ingredient) {
                warn!("Skipping stored ingredient: {}", e);
            }
        }

        info!(
            "Loaded {} effects and {} ingredients from {}",
            catalog.effect_count(),
            catalog.ingredient_count(),
            self.dir.display()
        );
        catalog
    }

    /// Loads the stored inventory. Ingredients missing from `catalog` are dropped.
    pub fn load_inventory(&self, catalog: &Catalog) -> Inventory {
        self.load_entries::<InventoryRecord>(INVENTORY_FILE, SchemaVersion::INVENTORY)
            .into_iter()
            .filter(|record| {
                let known = catalog.ingredient(record.ingredient).is_some();
                if !known {
                    warn!("Dropping stored inventory entry for unknown ingredient {}", record.ingredient);
                }
                known
            })
            .map(|record| (record.ingredient, record.count))
            .collect()
    }

    /// Saves effect and ingredient definitions.
    pub fn save_catalog(&self, catalog: &Catalog) -> AlchemyResult<()> {
        self.write_entries(EFFECTS_FILE, SchemaVersion::EFFECTS, catalog.effects().collect())?;
        self.write_entries(
            INGREDIENTS_FILE,
            SchemaVersion::INGREDIENTS,
            catalog.ingredients().collect(),
        )
    }

    /// Saves inventory counts.
    pub fn save_inventory(&self, inventory: &Inventory) -> AlchemyResult<()> {
        let records = inventory
            .items()
            .map(|item| InventoryRecord {
                ingredient: item.ingredient,
                count: item.count,
            })
            .collect();
        self.write_entries(INVENTORY_FILE, SchemaVersion::INVENTORY, records)
    }

    fn load_entries<T: DeserializeOwned>(&self, file: &str, expected: SchemaVersion) -> Vec<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            debug!("No stored data at {}", path.display());
            return Vec::new();
        }

        let stored = match Self::read_file(&path, expected) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                return Vec::new();
            },
        };

        stored
            .entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping invalid entry {} in {}: {}", index, file, e);
                    None
                },
            })
            .collect()
    }

    fn read_file(path: &Path, expected: SchemaVersion) -> AlchemyResult<StoredFile<serde_json::Value>> {
        let reader = BufReader::new(File::open(path)?);
        let stored: StoredFile<serde_json::Value> = serde_json::from_reader(reader)
            .map_err(|e| AlchemyError::Deserialization(e.to_string()))?;

        if !expected.can_read(&stored.version) {
            return Err(AlchemyError::VersionMismatch {
                expected: expected.to_string(),
                actual: stored.version.to_string(),
            });
        }

        Ok(stored)
    }

    fn write_entries<T: Serialize>(
        &self,
        file: &str,
        version: SchemaVersion,
        entries: Vec<T>,
    ) -> AlchemyResult<()> {
        fs::create_dir_all(&self.dir)?;

        let final_path = self.dir.join(file);
        let temp_path = self.dir.join(format!("{file}.tmp"));
        let count = entries.len();

        if let Err(e) = Self::write_temp(&temp_path, &StoredFile { version, entries }) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            AlchemyError::AtomicWriteFailed(e.to_string())
        })?;

        debug!("Wrote {} entries to {}", count, final_path.display());
        Ok(())
    }

    fn write_temp<T: Serialize>(path: &Path, stored: &StoredFile<T>) -> AlchemyResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, stored)
            .map_err(|e| AlchemyError::Serialization(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchemy_common::EffectId;
    use tempfile::TempDir;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_effect(Effect::new(EffectId::new(1), "Restore Health", 0.5).with_magnitude());
        catalog.insert_effect(Effect::new(EffectId::new(2), "Paralysis", 500.0).with_duration());
        catalog
            .insert_ingredient(
                Ingredient::new(IngredientId::new(10), "Blue Mountain Flower")
                    .effect(EffectId::new(1), 0, 2.0)
                    .effect(EffectId::new(2), 1, 0.0),
            )
            .expect("valid ingredient");
        catalog
            .insert_ingredient(Ingredient::new(IngredientId::new(11), "Wheat").effect(EffectId::new(1), 0, 4.0))
            .expect("valid ingredient");
        catalog
    }

    #[test]
    fn test_catalog_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::new(temp_dir.path().join("store"));
        let catalog = sample_catalog();

        storage.save_catalog(&catalog).expect("save");
        assert!(!temp_dir.path().join("store").join("effects.json.tmp").exists());

        let loaded = storage.load_catalog();
        assert_eq!(loaded.effect_count(), 2);
        assert_eq!(loaded.ingredient_count(), 2);
        assert_eq!(
            loaded.ingredient(IngredientId::new(10)),
            catalog.ingredient(IngredientId::new(10))
        );
        assert_eq!(loaded.effect(EffectId::new(2)), catalog.effect(EffectId::new(2)));
    }

    #[test]
    fn test_inventory_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::new(temp_dir.path());
        let catalog = sample_catalog();
        let inventory: Inventory = [(IngredientId::new(10), 3), (IngredientId::new(11), 12)]
            .into_iter()
            .collect();

        storage.save_inventory(&inventory).expect("save");
        assert_eq!(storage.load_inventory(&catalog), inventory);
    }

    #[test]
    fn test_missing_files_load_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::new(temp_dir.path());

        let catalog = storage.load_catalog();
        assert_eq!(catalog.effect_count(), 0);
        assert!(storage.load_inventory(&catalog).is_empty());
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::new(temp_dir.path());
        storage.save_catalog(&sample_catalog()).expect("save");

        fs::write(
            temp_dir.path().join(INVENTORY_FILE),
            r#"{
                "version": { "major": 1, "minor": 0, "patch": 0 },
                "entries": [
                    { "ingredient": 10, "count": 2 },
                    { "ingredient": "ten", "count": 2 },
                    { "ingredient": 11 },
                    { "ingredient": 999, "count": 5 }
                ]
            }"#,
        )
        .expect("write");

        let catalog = storage.load_catalog();
        let inventory = storage.load_inventory(&catalog);
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.count(IngredientId::new(10)), 2);
    }

    #[test]
    fn test_corrupt_or_incompatible_file_ignored() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::new(temp_dir.path());

        fs::write(temp_dir.path().join(EFFECTS_FILE), "{ not json").expect("write");
        fs::write(
            temp_dir.path().join(INGREDIENTS_FILE),
            r#"{ "version": { "major": 2, "minor": 0, "patch": 0 }, "entries": [] }"#,
        )
        .expect("write");

        let catalog = storage.load_catalog();
        assert_eq!(catalog.effect_count(), 0);
        assert_eq!(catalog.ingredient_count(), 0);
    }

    /// Fails to serialize, after part of the document has been written.
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::new(temp_dir.path());

        let result = storage.write_entries(INVENTORY_FILE, SchemaVersion::INVENTORY, vec![Unserializable]);
        assert!(matches!(result, Err(AlchemyError::Serialization(_))));
        assert!(!temp_dir.path().join(format!("{INVENTORY_FILE}.tmp")).exists());
        assert!(!temp_dir.path().join(INVENTORY_FILE).exists());
    }

    #[test]
    fn test_dangling_stored_ingredient_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Storage::new(temp_dir.path());
        storage.save_catalog(&sample_catalog()).expect("save");
        fs::remove_file(temp_dir.path().join(EFFECTS_FILE)).expect("remove");

        let catalog = storage.load_catalog();
        assert_eq!(catalog.ingredient_count(), 0);
    }
}
