//! # tally-types: Core types for `Tally`
//!
//! This crate contains shared types used across the `Tally` system:
//! - Entity IDs ([`RecordId`])
//! - Classification keys ([`Category`], [`ExperienceLevel`])
//! - Synthetic records ([`Record`])
//! - Quota bookkeeping ([`QuotaTable`], [`CategoryCounts`])
//! - Temporal bounds ([`HistoricalWindow`])

use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fmt::{Debug, Display},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Entity IDs
// ============================================================================

/// Opaque unique identifier for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// Category - department-like classification key
// ============================================================================

/// A department-like classification key used for quotas and chart bucketing.
///
/// Categories are compared by their exact name. Records carrying an empty or
/// unknown category are counted under [`Category::OTHER`], which is never a
/// quota target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Name of the reserved catch-all bucket.
    pub const OTHER: &'static str = "Other";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the reserved catch-all bucket.
    pub fn other() -> Self {
        Self(Self::OTHER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved catch-all bucket (case-insensitive).
    pub fn is_other(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::OTHER)
    }

    /// True when the name is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Experience level - secondary classification tag
// ============================================================================

/// Secondary classification tag attached to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    /// Every level, in seniority order.
    pub const ALL: [ExperienceLevel; 3] = [Self::Junior, Self::Mid, Self::Senior];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
        }
    }
}

impl Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Record
// ============================================================================

/// One synthetic user record.
///
/// Immutable once created, except for `active`, which nothing in the
/// generator ever flips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub category: Category,
    pub experience: ExperienceLevel,
    pub registered_on: NaiveDate,
    pub active: bool,
}

impl Record {
    /// Creates an active record with a fresh identifier.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        experience: ExperienceLevel,
        registered_on: NaiveDate,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            category,
            experience,
            registered_on,
            active: true,
        }
    }

    /// Returns a copy with the given active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

// ============================================================================
// Quota table
// ============================================================================

/// Target record count per category. Fixed at startup.
///
/// Targets are signed so that misconfigured values (zero or negative) can be
/// represented; such categories are treated as already satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaTable(BTreeMap<Category, i64>);

impl QuotaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a target, builder style.
    pub fn with(mut self, category: impl Into<Category>, target: i64) -> Self {
        self.0.insert(category.into(), target);
        self
    }

    pub fn target(&self, category: &str) -> Option<i64> {
        self.0.get(category).copied()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, i64)> {
        self.0.iter().map(|(c, t)| (c, *t))
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Maps a record's raw category onto its counting bucket.
    ///
    /// Known quota categories map to themselves; empty or unrecognized names
    /// map to [`Category::OTHER`].
    pub fn bucket(&self, raw: &Category) -> Category {
        if raw.is_blank() || !self.contains(raw.as_str()) {
            Category::other()
        } else {
            raw.clone()
        }
    }
}

impl FromIterator<(Category, i64)> for QuotaTable {
    fn from_iter<I: IntoIterator<Item = (Category, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Category count snapshot
// ============================================================================

/// Point-in-time count of active records per category bucket.
///
/// Always derived fresh from a full record set; the generator only mutates
/// its own copy for the duration of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts(BTreeMap<Category, u64>);

impl CategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts active records, bucketing unknown categories under `Other`.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a Record>,
        quotas: &QuotaTable,
    ) -> Self {
        let mut counts = Self::new();
        for record in records.into_iter().filter(|r| r.active) {
            counts.increment(&quotas.bucket(&record.category));
        }
        counts
    }

    /// Returns the count for a category, or `None` if it was never seen.
    pub fn get(&self, category: &str) -> Option<u64> {
        self.0.get(category).copied()
    }

    /// Increments the count for a category, returning the new value.
    pub fn increment(&mut self, category: &Category) -> u64 {
        let count = self.0.entry(category.clone()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> {
        self.0.iter().map(|(c, n)| (c, *n))
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl FromIterator<(Category, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (Category, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Historical window
// ============================================================================

/// Error returned when a window's bounds are inverted or out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid historical window: {start_year}..={end_year}")]
pub struct InvalidWindow {
    pub start_year: i32,
    pub end_year: i32,
}

/// Inclusive range of calendar years that synthetic creation dates fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalWindow {
    start_year: i32,
    end_year: i32,
}

impl HistoricalWindow {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, InvalidWindow> {
        // Every month of the last year needs a following month so that
        // `days_in_month` is defined for it.
        let valid = start_year <= end_year
            && NaiveDate::from_ymd_opt(start_year, 1, 1).is_some()
            && end_year
                .checked_add(1)
                .and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1))
                .is_some();
        if valid {
            Ok(Self {
                start_year,
                end_year,
            })
        } else {
            Err(InvalidWindow {
                start_year,
                end_year,
            })
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Number of distinct years in the window.
    pub fn year_count(&self) -> usize {
        (self.end_year - self.start_year + 1) as usize
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_year(date.year())
    }
}

/// Number of days in `month` (1-12) of `year`, honoring leap years.
///
/// Returns `None` for an out-of-range month or year.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}
