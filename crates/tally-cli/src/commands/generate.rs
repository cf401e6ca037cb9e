//! Generate command - runs one batch against the configured store.

use anyhow::{Context, Result};
use tally::{CategoryCounts, RecordStore, remaining_capacity};

use crate::style::{self, print_spacer, print_success};

pub fn run(project: &str, count: Option<u64>) -> Result<()> {
    let config = super::load_config(project)?;
    let store = super::open_store(&config)?;
    let mut generator = super::build_generator(&config)?;

    let requested = count.map_or(config.generator.batch_size, super::count_arg);
    let inserted = generator
        .generate_batch(&store, requested)
        .context("Generation batch failed")?;

    if inserted == 0 {
        print_success("All quotas already satisfied; nothing generated.");
        return Ok(());
    }
    print_success(&format!("Inserted {inserted} record(s)"));

    let records = store.fetch_all().context("Failed to read records")?;
    let counts = CategoryCounts::from_records(&records, generator.quotas());
    let entries: Vec<(&str, String)> = generator
        .quotas()
        .categories()
        .map(|category| {
            let remaining = remaining_capacity(&counts, generator.quotas(), category.as_str());
            (category.as_str(), format!("{remaining} remaining"))
        })
        .collect();

    print_spacer();
    println!("{}", style::info_table(&entries));
    Ok(())
}
