//! Report command - prints the dashboard aggregates.

use anyhow::{Context, Result};
use tally::{DashboardSnapshot, RecordStore, YearCursor};

use crate::style::{
    self, colors::SemanticStyle, print_hint, print_labeled, print_spacer, print_warn,
};

pub fn run(project: &str, year: Option<i32>, json: bool) -> Result<()> {
    let config = super::load_config(project)?;
    let window = config.window()?;

    let year = year.unwrap_or_else(|| config.dashboard_year());
    let cursor = YearCursor::at(window, year).with_context(|| {
        format!(
            "Year {year} is outside the configured window {}..={}",
            window.start_year(),
            window.end_year()
        )
    })?;

    let store = super::open_store(&config)?;
    let records = store.fetch_all().context("Failed to read records")?;
    let snapshot = DashboardSnapshot::build(&records, &config.quota_table(), cursor.year());

    if json {
        let rendered =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{rendered}");
        return Ok(());
    }

    print_snapshot(&snapshot, cursor);
    Ok(())
}

/// Prints every chart in `snapshot` as a table.
pub fn print_snapshot(snapshot: &DashboardSnapshot, cursor: YearCursor) {
    print_spacer();
    print_labeled("Total records", &snapshot.total_records.to_string());
    print_labeled("Active records", &snapshot.active_records.to_string());
    print_labeled("Departments", &snapshot.department_count.to_string());

    if snapshot.total_records == 0 {
        print_spacer();
        print_warn("No records yet.");
        print_hint("Generate some with `tally run` or `tally generate`.");
        return;
    }

    print_spacer();
    println!("{}", "Registration Growth".header());
    println!("{}", style::growth_table(&snapshot.registrations_by_year));

    print_spacer();
    println!("{}", "Department Distribution".header());
    println!("{}", style::distribution_table(&snapshot.department_distribution));

    print_spacer();
    println!("{}", cursor.label().header());
    println!("{}", style::trend_table(&snapshot.monthly_trend));

    let (mut previous, mut next) = (cursor, cursor);
    let mut nav = Vec::new();
    if previous.previous() {
        nav.push(format!("--year {} for the previous year", previous.year()));
    }
    if next.next() {
        nav.push(format!("--year {} for the next year", next.year()));
    }
    if !nav.is_empty() {
        print_hint(&nav.join(", "));
    }

    print_spacer();
    println!("{}", "Target Achievement".header());
    println!("{}", style::target_table(&snapshot.target_achievement));
    if snapshot.all_targets_met() {
        println!("{}", "Every department target is met.".success());
    }
}
