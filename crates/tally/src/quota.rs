//! Quota tracking: which categories still accept new records.

use std::collections::BTreeSet;

use tally_types::{Category, CategoryCounts, QuotaTable};

/// Returns the categories that have not yet reached their target.
///
/// A category is available when its count is absent or strictly below its
/// target. Targets of zero or less count as already satisfied. An empty
/// result means every quota is met.
pub fn available_categories(counts: &CategoryCounts, quotas: &QuotaTable) -> BTreeSet<Category> {
    quotas
        .iter()
        .filter(|(category, target)| {
            let count = counts.get(category.as_str()).unwrap_or(0);
            *target > 0 && i64::try_from(count).is_ok_and(|count| count < *target)
        })
        .map(|(category, _)| category.clone())
        .collect()
}

/// Records still needed by `category`, zero when it is full or unknown.
pub fn remaining_capacity(counts: &CategoryCounts, quotas: &QuotaTable, category: &str) -> u64 {
    let Some(target) = quotas.target(category) else {
        return 0;
    };
    let count = counts.get(category).unwrap_or(0);
    u64::try_from(target).map_or(0, |target| target.saturating_sub(count))
}
