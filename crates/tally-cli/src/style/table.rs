//! Dashboard and record tables using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tally::Record;
use tally::dashboard::{CategoryShare, MonthlyTrend, TargetProgress, YearCount};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Creates a table with a bold header row.
fn styled_table(columns: &[&str]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            if super::no_color() {
                Cell::new(col)
            } else {
                Cell::new(col)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            }
        })
        .collect();
    table.set_header(header_cells);

    table
}

fn count_cell(count: impl ToString) -> Cell {
    Cell::new(count.to_string()).set_alignment(CellAlignment::Right)
}

/// Creates a key-value info table (two columns: key and value).
pub fn info_table(entries: &[(&str, String)]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }

    table
}

/// Active registrations per year.
pub fn growth_table(years: &[YearCount]) -> Table {
    let mut table = styled_table(&["Year", "Registrations"]);
    for entry in years {
        table.add_row(vec![Cell::new(entry.year), count_cell(entry.count)]);
    }
    table
}

/// Active records per department bucket.
pub fn distribution_table(shares: &[CategoryShare]) -> Table {
    let mut table = styled_table(&["Department", "Active"]);
    for share in shares {
        table.add_row(vec![Cell::new(&share.category), count_cell(share.count)]);
    }
    table
}

/// One row per department, one column per month.
pub fn trend_table(trend: &MonthlyTrend) -> Table {
    let mut columns = vec!["Department"];
    columns.extend(MONTHS);
    let mut table = styled_table(&columns);

    for series in &trend.series {
        let mut row = vec![Cell::new(&series.category)];
        row.extend(series.counts.iter().map(count_cell));
        table.add_row(row);
    }
    table
}

/// Progress toward each department target.
pub fn target_table(progress: &[TargetProgress]) -> Table {
    let mut table = styled_table(&["Department", "Actual", "Target", "Achieved"]);
    for entry in progress {
        let percent =
            Cell::new(format!("{:.1}%", entry.percent)).set_alignment(CellAlignment::Right);
        let percent = if super::no_color() || entry.percent < 100.0 {
            percent
        } else {
            percent.fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(&entry.category),
            count_cell(entry.actual),
            count_cell(entry.target),
            percent,
        ]);
    }
    table
}

/// One row per record: id, name, department, level, date, active flag.
pub fn records_table(records: &[Record]) -> Table {
    let mut table = styled_table(&[
        "Id",
        "Name",
        "Department",
        "Experience",
        "Registered",
        "Active",
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(&record.name),
            Cell::new(&record.category),
            Cell::new(record.experience),
            Cell::new(record.registered_on.format("%Y-%m-%d")),
            Cell::new(if record.active { "yes" } else { "no" }),
        ]);
    }
    table
}
