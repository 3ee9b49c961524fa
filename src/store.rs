//! Persistence seam.
//!
//! The scheduling core emits [`DateUpdate`] instructions and performs
//! no I/O itself. [`apply_updates`] is the bridge: it attempts every
//! write independently — no transaction spans the batch, so a partial
//! failure leaves some tasks updated and others not. That trade-off is
//! deliberate: it stays compatible with connection-pooled stores that
//! forbid prepared statements inside transactions.
//!
//! Failures are collected per task and returned, never swallowed.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::DateUpdate;

/// External store capable of persisting task dates.
///
/// Implemented by the caller over whatever backend holds the task
/// records (SQL store, in-memory snapshot in tests).
pub trait ScheduleStore {
    /// Applies one date update. Each call is independent.
    fn apply(&mut self, update: &DateUpdate) -> Result<(), String>;
}

/// A write that failed during batch application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteFailure {
    /// Task whose write failed.
    pub task_id: String,
    /// Store-reported reason.
    pub reason: String,
}

/// Applies a batch of updates, attempting every write.
///
/// A failed write is logged and recorded, and the remaining writes
/// still run. Returns the per-task failure list; empty means all
/// writes landed.
pub fn apply_updates<S: ScheduleStore>(store: &mut S, updates: &[DateUpdate]) -> Vec<WriteFailure> {
    let mut failures = Vec::new();

    for update in updates {
        if let Err(reason) = store.apply(update) {
            error!(task_id = %update.task_id, %reason, "failed to persist task dates");
            failures.push(WriteFailure {
                task_id: update.task_id.clone(),
                reason,
            });
        }
    }

    failures
}
