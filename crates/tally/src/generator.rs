//! Quota-constrained synthetic record generation.
//!
//! A batch reads the store once, counts active records per category, and
//! then inserts up to `requested` records. Every insert picks uniformly from
//! the categories that are *currently* under quota, and the available set is
//! recomputed after each insert so it shrinks as categories fill.

use chrono::NaiveDate;
use tally_types::{
    Category, CategoryCounts, ExperienceLevel, HistoricalWindow, QuotaTable, Record,
    days_in_month,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::quota::available_categories;
use crate::rng::{Rng, SimRng};
use crate::store::RecordStore;

/// Builds individual synthetic records.
#[derive(Debug, Clone, Copy)]
pub struct RecordSynthesizer {
    window: HistoricalWindow,
}

impl RecordSynthesizer {
    /// Lowest display-name suffix (inclusive).
    pub const NAME_MIN: u32 = 1000;
    /// Highest display-name suffix (exclusive).
    pub const NAME_MAX: u32 = 9999;

    pub fn new(window: HistoricalWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> HistoricalWindow {
        self.window
    }

    /// Synthesizes an active record in `category`.
    pub fn synthesize<R: Rng>(&self, category: Category, rng: &mut R) -> Record {
        let name = format!("User{}", rng.next_u32_range(Self::NAME_MIN, Self::NAME_MAX));
        let experience = ExperienceLevel::ALL[rng.next_usize(ExperienceLevel::ALL.len())];
        let registered_on = self.random_date(rng);
        Record::new(name, category, experience, registered_on)
    }

    /// Draws a year in the window, then a month, then a day valid for both.
    pub fn random_date<R: Rng>(&self, rng: &mut R) -> NaiveDate {
        let year = rng.next_i32_inclusive(self.window.start_year(), self.window.end_year());
        let month = rng.next_u32_range(1, 13);
        let days = days_in_month(year, month)
            .expect("HistoricalWindow::new rejects years without a following January");
        let day = rng.next_u32_range(1, days + 1);
        NaiveDate::from_ymd_opt(year, month, day).expect("day is within the month")
    }
}

/// Generates batches of records against a fixed quota table.
///
/// Owns its random stream; `generate_batch` takes `&mut self`, so a single
/// generator never runs two batches at once.
#[derive(Debug)]
pub struct Generator<R: Rng = SimRng> {
    quotas: QuotaTable,
    synthesizer: RecordSynthesizer,
    rng: R,
}

impl<R: Rng> Generator<R> {
    pub fn new(quotas: QuotaTable, window: HistoricalWindow, rng: R) -> Self {
        Self {
            quotas,
            synthesizer: RecordSynthesizer::new(window),
            rng,
        }
    }

    pub fn quotas(&self) -> &QuotaTable {
        &self.quotas
    }

    pub fn window(&self) -> HistoricalWindow {
        self.synthesizer.window()
    }

    /// Counts active records in `records` against this generator's quotas.
    pub fn snapshot(&self, records: &[Record]) -> CategoryCounts {
        CategoryCounts::from_records(records, &self.quotas)
    }

    /// Inserts up to `requested` records and returns how many were inserted.
    ///
    /// Returns `Ok(0)` when every quota is already met; callers treat that as
    /// the signal to stop generating. A failed insert aborts the batch with
    /// [`Error::BatchAborted`]; earlier inserts are not rolled back.
    pub fn generate_batch<S>(&mut self, store: &S, requested: usize) -> Result<usize>
    where
        S: RecordStore + ?Sized,
    {
        let records = store.fetch_all()?;
        let mut counts = self.snapshot(&records);

        let mut available = available_categories(&counts, &self.quotas);
        if available.is_empty() {
            debug!("all quotas met, nothing to generate");
            return Ok(0);
        }

        let mut inserted = 0;
        for _ in 0..requested {
            let index = self.rng.next_usize(available.len());
            let Some(category) = available.iter().nth(index).cloned() else {
                break;
            };

            let record = self.synthesizer.synthesize(category.clone(), &mut self.rng);
            store
                .insert(record)
                .map_err(|source| Error::BatchAborted { inserted, source })?;
            inserted += 1;

            counts.increment(&category);
            available = available_categories(&counts, &self.quotas);
            if available.is_empty() {
                break;
            }
        }

        debug!(
            requested,
            inserted,
            remaining_categories = available.len(),
            "batch complete"
        );
        Ok(inserted)
    }
}

impl Generator<SimRng> {
    /// Forks a generator with the same quotas and an independent stream.
    pub fn fork(&mut self) -> Self {
        Self {
            quotas: self.quotas.clone(),
            synthesizer: self.synthesizer,
            rng: self.rng.fork(),
        }
    }
}
