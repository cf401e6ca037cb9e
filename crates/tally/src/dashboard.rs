//! Chart-ready aggregates over the full record set.
//!
//! Every function here is pure: it takes the records and the quota table
//! and returns owned series. The scheduler rebuilds a [`DashboardSnapshot`]
//! after each productive batch and publishes it; nothing is updated in
//! place.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

use chrono::Datelike;
use serde::Serialize;
use tally_types::{Category, HistoricalWindow, QuotaTable, Record};

/// Active registrations in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Active records in one category bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub count: usize,
}

/// Registrations per month (January first) for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySeries {
    pub category: Category,
    pub counts: [usize; 12],
}

/// Monthly registrations for one year, one series per category present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub series: Vec<MonthlySeries>,
}

/// Progress of one category toward its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetProgress {
    pub category: Category,
    pub actual: usize,
    pub target: i64,
    /// Percentage of the target reached, capped at 100.
    pub percent: f64,
}

impl TargetProgress {
    /// True once the active count reaches the target. Non-positive targets
    /// are always met.
    pub fn is_met(&self) -> bool {
        i64::try_from(self.actual).is_ok_and(|actual| actual >= self.target)
    }
}

impl Display for TargetProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.0}%)", self.actual, self.target, self.percent)
    }
}

/// Immutable view of every chart, built from one read of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub total_records: usize,
    pub active_records: usize,
    /// Distinct raw category names across all records, before bucketing.
    pub department_count: usize,
    pub registrations_by_year: Vec<YearCount>,
    pub department_distribution: Vec<CategoryShare>,
    pub monthly_trend: MonthlyTrend,
    pub target_achievement: Vec<TargetProgress>,
}

impl DashboardSnapshot {
    /// Aggregates `records`; the monthly trend covers `year`.
    pub fn build(records: &[Record], quotas: &QuotaTable, year: i32) -> Self {
        let department_count = records
            .iter()
            .map(|r| r.category.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            total_records: records.len(),
            active_records: records.iter().filter(|r| r.active).count(),
            department_count,
            registrations_by_year: registration_growth(records),
            department_distribution: department_distribution(records, quotas),
            monthly_trend: monthly_trend(records, quotas, year),
            target_achievement: target_achievement(records, quotas),
        }
    }

    /// True when every quota category has reached its target.
    pub fn all_targets_met(&self) -> bool {
        self.target_achievement.iter().all(TargetProgress::is_met)
    }
}

/// Active records per creation year, ascending.
pub fn registration_growth(records: &[Record]) -> Vec<YearCount> {
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.active) {
        *per_year.entry(record.registered_on.year()).or_default() += 1;
    }
    per_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Active records per category bucket, ordered by category name.
pub fn department_distribution(records: &[Record], quotas: &QuotaTable) -> Vec<CategoryShare> {
    let mut per_category: BTreeMap<Category, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.active) {
        *per_category.entry(quotas.bucket(&record.category)).or_default() += 1;
    }
    per_category
        .into_iter()
        .map(|(category, count)| CategoryShare { category, count })
        .collect()
}

/// Monthly registrations in `year` per category bucket.
///
/// Counts every record created that year, active or not; categories with no
/// records that year get no series.
pub fn monthly_trend(records: &[Record], quotas: &QuotaTable, year: i32) -> MonthlyTrend {
    let mut per_category: BTreeMap<Category, [usize; 12]> = BTreeMap::new();
    for record in records.iter().filter(|r| r.registered_on.year() == year) {
        let month = record.registered_on.month0() as usize;
        per_category
            .entry(quotas.bucket(&record.category))
            .or_insert([0; 12])[month] += 1;
    }
    MonthlyTrend {
        year,
        series: per_category
            .into_iter()
            .map(|(category, counts)| MonthlySeries { category, counts })
            .collect(),
    }
}

/// Active count against target for every quota category except `Other`.
pub fn target_achievement(records: &[Record], quotas: &QuotaTable) -> Vec<TargetProgress> {
    quotas
        .iter()
        .filter(|(category, _)| !category.is_other())
        .map(|(category, target)| {
            let actual = records
                .iter()
                .filter(|r| r.active && quotas.bucket(&r.category) == *category)
                .count();
            let percent = (100.0 * actual as f64 / target.max(1) as f64).min(100.0);
            TargetProgress {
                category: category.clone(),
                actual,
                target,
                percent,
            }
        })
        .collect()
}

/// Selected year for the monthly trend, bounded by the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCursor {
    window: HistoricalWindow,
    year: i32,
}

impl YearCursor {
    /// Starts at the window's last year.
    pub fn new(window: HistoricalWindow) -> Self {
        Self {
            window,
            year: window.end_year(),
        }
    }

    /// Starts at `year`, or `None` if it lies outside the window.
    pub fn at(window: HistoricalWindow, year: i32) -> Option<Self> {
        window.contains_year(year).then_some(Self { window, year })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Steps back one year. Returns false at the first year.
    pub fn previous(&mut self) -> bool {
        if self.year > self.window.start_year() {
            self.year -= 1;
            true
        } else {
            false
        }
    }

    /// Steps forward one year. Returns false at the last year.
    pub fn next(&mut self) -> bool {
        if self.year < self.window.end_year() {
            self.year += 1;
            true
        } else {
            false
        }
    }

    pub fn label(&self) -> String {
        format!("{} Registration Growth", self.year)
    }
}
