//! Reset command - deletes every stored record.

use anyhow::{Context, Result};
use tally::RecordStore;
use tracing::warn;

use crate::style::{colors::SemanticStyle, print_success};

pub fn run(project: &str) -> Result<()> {
    let config = super::load_config(project)?;
    let store = super::open_store(&config)?;

    // A corrupt file can still be cleared; it just cannot be counted.
    let removed = match store.fetch_all() {
        Ok(records) => Some(records.len()),
        Err(e) => {
            warn!(error = %e, "could not count records before reset");
            None
        }
    };
    store.clear().context("Failed to clear record store")?;

    let path = store.path().display().to_string().code();
    match removed {
        Some(count) => print_success(&format!("Removed {count} record(s) from {path}")),
        None => print_success(&format!("Cleared unreadable record store at {path}")),
    }
    Ok(())
}
