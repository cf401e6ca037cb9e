//! Configuration management for Tally
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (TALLY_* prefix, `__` between nested keys)
//! 2. tally.local.toml (gitignored, local overrides)
//! 3. tally.toml (git-tracked, project config)
//! 4. ~/.config/tally/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! CLI flags are applied on top by the binary after loading.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tally_types::{Category, HistoricalWindow, QuotaTable};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main Tally configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    pub generator: GeneratorConfig,
    pub window: WindowConfig,
    pub quotas: Vec<QuotaEntry>,
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum records produced per scheduler tick.
    pub batch_size: usize,
    /// Milliseconds between scheduler ticks.
    pub interval_ms: u64,
    /// Fixed RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 46,
            interval_ms: 2000,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start_year: 2018,
            end_year: 2025,
        }
    }
}

/// One `[[quotas]]` entry.
///
/// Quotas are an array of tables rather than a map so that category names
/// keep their exact spelling and a project file replaces the defaults
/// wholesale instead of merging into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaEntry {
    pub category: String,
    pub target: i64,
}

impl QuotaEntry {
    pub fn new(category: impl Into<String>, target: i64) -> Self {
        Self {
            category: category.into(),
            target,
        }
    }
}

/// Department targets shipped with the demo.
pub fn default_quotas() -> Vec<QuotaEntry> {
    vec![
        QuotaEntry::new("Software Engineer", 3500),
        QuotaEntry::new("Firmware Engineer", 3500),
        QuotaEntry::new("IT", 3000),
        QuotaEntry::new("Mechanical Engineer", 2000),
        QuotaEntry::new("Marketing", 1000),
        QuotaEntry::new("HR", 700),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON-lines record file.
    pub path: PathBuf,
    /// Clear all records before the scheduler starts.
    pub reset_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".tally/records.jsonl"),
            reset_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Year shown by the monthly trend; the window's last year when unset.
    pub year: Option<i32>,
    /// Snapshots buffered for slow subscribers.
    pub broadcast_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            year: None,
            broadcast_capacity: 64,
        }
    }
}

impl TallyConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Built-in defaults with the demo department quotas filled in.
    pub fn demo() -> Self {
        Self {
            quotas: default_quotas(),
            ..Default::default()
        }
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.storage.path.is_relative() {
            self.storage.path = base.join(&self.storage.path);
        }
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generator.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "generator.batch_size must be at least 1".to_string(),
            ));
        }
        if self.generator.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "generator.interval_ms must be at least 1".to_string(),
            ));
        }

        let window = self.window()?;

        if let Some(year) = self.dashboard.year {
            if !window.contains_year(year) {
                return Err(ConfigError::ValidationError(format!(
                    "dashboard.year {year} is outside {}..={}",
                    window.start_year(),
                    window.end_year()
                )));
            }
        }

        if self.dashboard.broadcast_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard.broadcast_capacity must be at least 1".to_string(),
            ));
        }

        for entry in &self.quotas {
            let category = Category::new(entry.category.as_str());
            if category.is_blank() {
                return Err(ConfigError::ValidationError(
                    "quota category names must not be empty".to_string(),
                ));
            }
            if category.is_other() {
                return Err(ConfigError::ValidationError(format!(
                    "'{}' is reserved and cannot carry a quota",
                    Category::OTHER
                )));
            }
        }

        Ok(())
    }

    /// The generation window.
    pub fn window(&self) -> Result<HistoricalWindow, ConfigError> {
        HistoricalWindow::new(self.window.start_year, self.window.end_year)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// The quota table, falling back to the demo quotas when none are set.
    ///
    /// A category listed more than once keeps its last target.
    pub fn quota_table(&self) -> QuotaTable {
        let entries = if self.quotas.is_empty() {
            default_quotas()
        } else {
            self.quotas.clone()
        };
        entries
            .into_iter()
            .map(|e| (Category::new(e.category), e.target))
            .collect()
    }

    /// Year displayed by the monthly trend.
    pub fn dashboard_year(&self) -> i32 {
        self.dashboard.year.unwrap_or(self.window.end_year)
    }

    /// Renders this configuration as a TOML document.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Writes this configuration as `tally.toml` in `project_dir`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_project_file(
        &self,
        project_dir: impl AsRef<Path>,
        force: bool,
    ) -> Result<PathBuf, ConfigError> {
        let path = Paths::project_config_file(project_dir);
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path));
        }
        let content = self.to_toml()?;
        std::fs::write(&path, content).map_err(|source| ConfigError::WriteError {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
