//! CLI command implementations.

pub mod generate;
pub mod init;
pub mod list;
pub mod report;
pub mod reset;
pub mod run;
pub mod version;

use anyhow::{Context, Result};
use tally::{Generator, JsonlStore, SimRng};
use tally_config::TallyConfig;
use tracing::debug;

/// Loads the layered configuration for a project directory.
fn load_config(project: &str) -> Result<TallyConfig> {
    TallyConfig::load_from_dir(project)
        .with_context(|| format!("Failed to load configuration for project '{project}'"))
}

/// Opens the configured JSON-lines record file.
fn open_store(config: &TallyConfig) -> Result<JsonlStore> {
    JsonlStore::open(config.storage.path.clone()).with_context(|| {
        format!(
            "Failed to open record store at {}",
            config.storage.path.display()
        )
    })
}

/// Converts a validated `1..` count argument to `usize`.
fn count_arg(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

/// Builds a generator from the configured quotas, window, and seed.
fn build_generator(config: &TallyConfig) -> Result<Generator> {
    let window = config.window()?;
    let rng = SimRng::from_seed_or_entropy(config.generator.seed);
    debug!(seed = rng.seed(), "generator seeded");
    Ok(Generator::new(config.quota_table(), window, rng))
}
