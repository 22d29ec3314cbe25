use std::env::VarError;
use std::path::PathBuf;

use log::info;

use crate::catalog::Catalog;
use crate::error::{CatalogError, ConfigError, StorageError};
use crate::preferences::{JsonFileStorage, Preferences, Storage};

pub const CATALOG_ENV: &str = "HELLO_IOS_CATALOG";
pub const PREFERENCES_ENV: &str = "HELLO_IOS_PREFERENCES";
pub const DEFAULT_PREFERENCES_PATH: &str = "preferences.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// External catalog document; the built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub preferences_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name))
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Result<String, VarError>) -> Result<Self, ConfigError> {
        let read = |name: &'static str| match lookup(name) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(PathBuf::from(value))),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
        };

        let defaults = Self::default();
        Ok(Self {
            catalog_path: read(CATALOG_ENV)?,
            preferences_path: read(PREFERENCES_ENV)?.unwrap_or(defaults.preferences_path),
        })
    }

    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => {
                info!("Using catalog {}", path.display());
                Catalog::from_path(path)
            }
            None => Catalog::builtin(),
        }
    }

    pub fn open_preferences(&self, catalog: &Catalog) -> Result<Preferences, StorageError> {
        let storage = JsonFileStorage::open(&self.preferences_path)?;
        Ok(Preferences::load(storage.erase(), catalog))
    }
}
