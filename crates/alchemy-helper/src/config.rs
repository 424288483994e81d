//! Application configuration.
//!
//! Holds where the game-side plugin writes its logs and where imported data
//! is stored. Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Settings file name.
const CONFIG_FILE: &str = "alchemy-helper.toml";

/// Directory name under the platform config/data directories.
const APP_DIR: &str = "alchemy-helper";

/// Application configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the game plugin writes its logs to
    pub data_location: PathBuf,
    /// Directory holding the stored catalog and inventory
    pub storage_dir: PathBuf,
    /// File name of the ingredient effects log
    pub effects_log: String,
    /// File name of the inventory log
    pub inventory_log: String,
    /// Number of recipes listed by default
    pub recipe_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_location: PathBuf::new(),
            storage_dir: default_storage_dir(),
            effects_log: "AlchemyHelperEffects.0.log".to_string(),
            inventory_log: "AlchemyHelperIngridients.0.log".to_string(),
            recipe_limit: 50,
        }
    }
}

impl AppConfig {
    /// Reads the settings file at `path`.
    ///
    /// A missing or unreadable file is not an error: the defaults are used and
    /// the problem is logged.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                return Self::default();
            },
            Err(e) => {
                warn!("Cannot read settings {}: {e}", path.display());
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&text) {
            Ok(mut config) => {
                config.validate();
                debug!("Settings loaded from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Ignoring malformed settings {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Writes the settings to `path`, creating missing directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let text = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, text)?;

        info!("Settings written to {}", path.display());
        Ok(())
    }

    /// `alchemy-helper/alchemy-helper.toml` under the platform config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join(APP_DIR).join(CONFIG_FILE),
        )
    }

    /// Clamps values read from disk into their supported ranges.
    pub fn validate(&mut self) {
        self.recipe_limit = self.recipe_limit.clamp(1, 10_000);
    }

    /// Full path of the ingredient effects log.
    #[must_use]
    pub fn effects_log_path(&self) -> PathBuf {
        self.data_location.join(&self.effects_log)
    }

    /// Full path of the inventory log.
    #[must_use]
    pub fn inventory_log_path(&self) -> PathBuf {
        self.data_location.join(&self.inventory_log)
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("data"), |dir| dir.join(APP_DIR))
}
