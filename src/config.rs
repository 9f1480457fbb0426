use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use toml;

use crate::error::SyncError;

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SyncConfig {
    pub id: String,
    pub collection: String,
    pub catalog_url: String,
    pub mirror_url: String,
    pub output_dir: Option<PathBuf>,
    pub max_dates: Option<usize>,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl SyncConfig {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<(), SyncError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_template(table: &toml::Table) -> Self {
        let config: Self = toml::from_str(&table.to_string()).expect("Error serializing template");
        config
    }

    pub fn template() -> toml::Table {
        toml::toml! {
            id = "epic.natural"

            collection = "natural"

            catalog_url = "https://api.nasa.gov/EPIC"

            mirror_url = "http://localhost:8080"

            concurrency = 4

            timeout_secs = 30

            log_level = "info"
        }
    }

    pub fn output_dir(self: &Self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => env::temp_dir().join("epic-sync"),
        }
    }

    pub fn timeout(self: &Self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE_PATH: &str = "/tmp/epic_sync_config.toml";

    #[test]
    fn test_template() {
        let config = SyncConfig::from_template(&SyncConfig::template());
        assert_eq!(config.id, "epic.natural");
        assert_eq!(config.collection, "natural");
        assert_eq!(config.max_dates, None);
        assert_eq!(config.concurrency, 4);
    }

    #[test]
    fn test_write_toml() {
        let path = Path::new(TEMPLATE_PATH);
        let config = SyncConfig::from_template(&SyncConfig::template());
        assert_eq!(config.write(path).is_ok(), true)
    }

    #[test]
    fn test_read_toml() {
        let path = Path::new(TEMPLATE_PATH);
        let config = SyncConfig::from_template(&SyncConfig::template());
        config.write(path).unwrap();

        let config = SyncConfig::read(path).unwrap();
        assert_eq!(config.id, "epic.natural");
        assert_eq!(config.catalog_url, "https://api.nasa.gov/EPIC");
    }

    #[test]
    fn test_output_dir_defaults_to_temp() {
        let config = SyncConfig::from_template(&SyncConfig::template());
        assert!(config.output_dir().ends_with("epic-sync"));
    }
}
