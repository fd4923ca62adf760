//! Per-category alert storage for one session.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tidemark_core::{AlertRecord, AlertSensitivity, ScanCategory};

/// Most recent alert sequence per scan category.
///
/// `store` replaces the whole sequence under a single write lock, so readers
/// never observe a partial overwrite.
#[derive(Debug, Default)]
pub struct AlertStore {
    alerts: RwLock<HashMap<ScanCategory, Vec<AlertRecord>>>,
}

impl AlertStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous sequence for `category`.
    pub fn store(&self, category: ScanCategory, records: Vec<AlertRecord>) {
        let count = records.len();
        self.alerts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, records);
        tracing::debug!(category = %category, count, "alerts stored");
    }

    /// The stored sequence for `category`, or empty.
    #[must_use]
    pub fn get(&self, category: ScanCategory) -> Vec<AlertRecord> {
        self.alerts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    /// Stored alerts whose impact level the sensitivity admits, in stored order.
    #[must_use]
    pub fn get_filtered(
        &self,
        category: ScanCategory,
        sensitivity: AlertSensitivity,
    ) -> Vec<AlertRecord> {
        self.alerts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&category)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| sensitivity.admits(r.impact_level))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_populated(&self, category: ScanCategory) -> bool {
        self.alerts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&category)
    }

    /// Populated categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<ScanCategory> {
        let mut categories: Vec<ScanCategory> = self
            .alerts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        categories.sort();
        categories
    }

    /// Session reset: every category returns to empty.
    pub fn clear(&self) {
        self.alerts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
