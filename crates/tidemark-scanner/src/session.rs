//! Session scope: the alert store plus any pending context trigger.

use std::sync::{Mutex, PoisonError};

use tidemark_core::ContextTrigger;

use crate::store::AlertStore;

/// State that lives as long as one user session and is passed explicitly to
/// every scan.
#[derive(Debug, Default)]
pub struct ScanSession {
    alerts: AlertStore,
    pending_trigger: Mutex<Option<ContextTrigger>>,
}

impl ScanSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn alerts(&self) -> &AlertStore {
        &self.alerts
    }

    /// Queues a trigger for the next scan, replacing any unconsumed one.
    pub fn set_trigger(&self, trigger: ContextTrigger) {
        tracing::debug!(name = %trigger.name, category = %trigger.category, "context trigger queued");
        *self
            .pending_trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(trigger);
    }

    /// Removes and returns the pending trigger.
    pub fn take_trigger(&self) -> Option<ContextTrigger> {
        self.pending_trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    #[must_use]
    pub fn has_pending_trigger(&self) -> bool {
        self.pending_trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drops all stored alerts and any pending trigger.
    pub fn reset(&self) {
        self.alerts.clear();
        self.take_trigger();
    }
}
