//! Run command - generates on a schedule until every quota is met.

use std::sync::Arc;

use anyhow::{Context, Result};
use tally::{
    DashboardEvent, DashboardSnapshot, GenerationScheduler, MemoryStore, RecordStore,
    SchedulerConfig, SnapshotBroadcast, YearCursor,
};
use tally_config::TallyConfig;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::style::{
    colors::SemanticStyle, print_error, print_labeled, print_spacer, print_success, print_warn,
};

pub fn run(project: &str, ephemeral: bool) -> Result<()> {
    let config = super::load_config(project)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run_scheduler(config, ephemeral))
}

async fn run_scheduler(config: TallyConfig, ephemeral: bool) -> Result<()> {
    let store: Arc<dyn RecordStore> = if ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(super::open_store(&config)?)
    };

    if config.storage.reset_on_start && !ephemeral {
        store.clear().context("Failed to reset record store")?;
        info!(path = %config.storage.path.display(), "record store reset");
    }

    let generator = super::build_generator(&config)?;
    let quotas = generator.quotas().clone();
    let cursor = YearCursor::at(generator.window(), config.dashboard_year())
        .unwrap_or_else(|| YearCursor::new(generator.window()));

    let broadcast = SnapshotBroadcast::new(config.dashboard.broadcast_capacity);
    let mut events = broadcast.subscribe();

    print_spacer();
    println!("{}", "Tally - quota-driven record generation".header());
    print_spacer();
    if ephemeral {
        print_labeled("Store", "in-memory (ephemeral)");
    } else {
        print_labeled("Store", &config.storage.path.display().to_string());
    }
    print_labeled("Interval", &format!("{} ms", config.generator.interval_ms));
    print_labeled("Batch size", &config.generator.batch_size.to_string());
    print_labeled("Departments", &generator.quotas().len().to_string());
    print_spacer();
    println!("Generating. Press Ctrl+C to stop.");
    print_spacer();

    let scheduler = GenerationScheduler::start(
        generator,
        Arc::clone(&store),
        broadcast,
        SchedulerConfig {
            interval: config.generator.interval(),
            batch_size: config.generator.batch_size,
            dashboard_year: cursor.year(),
        },
    );

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                print_spacer();
                print_warn("Received Ctrl+C, stopping generation...");
                break;
            }
            event = events.recv() => {
                match event {
                    Ok(DashboardEvent::Refreshed { inserted, snapshot }) => {
                        if inserted > 0 {
                            print_refresh(inserted, &snapshot);
                        }
                    }
                    Ok(DashboardEvent::BatchFailed { inserted, error }) => {
                        print_error(&format!("Batch failed after {inserted} record(s): {error}"));
                    }
                    Ok(DashboardEvent::Completed) => {
                        print_spacer();
                        print_success("All quotas satisfied");
                        break;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "dashboard subscriber lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    let exit = scheduler.shutdown().await;
    debug!(?exit, "generation scheduler exited");

    let records = store.fetch_all().context("Failed to read records")?;
    let snapshot = DashboardSnapshot::build(&records, &quotas, cursor.year());
    super::report::print_snapshot(&snapshot, cursor);

    Ok(())
}

/// One line per productive batch.
fn print_refresh(inserted: usize, snapshot: &DashboardSnapshot) {
    let met = snapshot
        .target_achievement
        .iter()
        .filter(|p| p.is_met())
        .count();
    println!(
        "{} {:>4} records  {} {:>6}  {} {}/{}",
        "+".success(),
        inserted,
        "total".muted(),
        snapshot.total_records,
        "targets met".muted(),
        met,
        snapshot.target_achievement.len(),
    );
}
