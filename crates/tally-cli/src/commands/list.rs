//! List command - prints stored records, newest registrations first.

use anyhow::{Context, Result};
use tally::RecordStore;

use crate::style::{self, colors::SemanticStyle, print_hint, print_warn};

pub fn run(project: &str, limit: Option<u64>) -> Result<()> {
    let config = super::load_config(project)?;
    let store = super::open_store(&config)?;

    let mut records = store.fetch_all().context("Failed to read records")?;
    if records.is_empty() {
        print_warn("No records yet.");
        print_hint("Generate some with `tally run` or `tally generate`.");
        return Ok(());
    }

    let total = records.len();
    records.sort_by(|a, b| b.registered_on.cmp(&a.registered_on));
    records.truncate(limit.map_or(total, super::count_arg));

    println!("{}", style::records_table(&records));
    println!("{}", format!("({} of {total} records)", records.len()).muted());
    Ok(())
}
