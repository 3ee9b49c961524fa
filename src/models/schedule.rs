//! Schedule (solution) model and persistence instructions.
//!
//! A [`CpmSchedule`] is the result of one CPM run over a fixed task
//! snapshot: per-task timing offsets plus anchored dates. It is built
//! fresh on every scheduling request, never mutated in place, and
//! superseded entirely by the next run.
//!
//! The core performs no I/O; persisting paths emit [`DateUpdate`]
//! instructions for an external store to apply.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timing values for one task from a single CPM run.
///
/// Offsets are working hours from the schedule anchor; `start`/`end`
/// are the same offsets anchored to a concrete timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTiming {
    /// Earliest start (hours from anchor).
    pub early_start_h: i64,
    /// Earliest finish (hours from anchor).
    pub early_finish_h: i64,
    /// Latest start without delaying the project (hours from anchor).
    pub late_start_h: i64,
    /// Latest finish without delaying the project (hours from anchor).
    pub late_finish_h: i64,
    /// Slack: `late_start - early_start`.
    pub slack_h: i64,
    /// Whether the task is on the critical path (zero slack).
    pub is_critical: bool,
    /// Earliest start anchored to the schedule's T0.
    pub start: DateTime<Utc>,
    /// Earliest finish anchored to the schedule's T0.
    pub end: DateTime<Utc>,
}

/// A complete schedule produced by one CPM run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpmSchedule {
    /// Per-task timing, keyed by task ID.
    pub timings: HashMap<String, TaskTiming>,
    /// Total project span: `max(early_finish)` over all tasks (hours).
    pub project_duration_hours: i64,
    /// Whether the relaxation passes converged within the sweep cap.
    /// `false` means the timings are a best partial convergence
    /// (cyclic or pathological input).
    pub converged: bool,
}

impl CpmSchedule {
    /// Timing for a given task, if it was part of the run.
    pub fn timing_for(&self, task_id: &str) -> Option<&TaskTiming> {
        self.timings.get(task_id)
    }

    /// IDs of all critical tasks, sorted for deterministic output.
    pub fn critical_tasks(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .timings
            .iter()
            .filter(|(_, t)| t.is_critical)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of tasks covered by this schedule.
    pub fn task_count(&self) -> usize {
        self.timings.len()
    }
}

/// One persistence instruction: set a task's dates.
///
/// Emitted by the reconciler and the propagation engine; applied by an
/// external store. Writes are independent — there is no surrounding
/// transaction (see [`crate::store`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateUpdate {
    /// Task to update.
    pub task_id: String,
    /// New start date.
    pub new_start: DateTime<Utc>,
    /// New end date.
    pub new_end: DateTime<Utc>,
}

impl DateUpdate {
    /// Creates a date update instruction.
    pub fn new(task_id: impl Into<String>, new_start: DateTime<Utc>, new_end: DateTime<Utc>) -> Self {
        Self {
            task_id: task_id.into(),
            new_start,
            new_end,
        }
    }
}

/// Per-task outcome of a propagation cascade.
///
/// A dependent without persisted dates halts traversal down its branch;
/// this state makes that halt visible instead of silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleState {
    /// No persisted dates; the cascade stopped here.
    Unscheduled,
    /// Dates were shifted (or already agreed) with the cascade.
    Consistent,
    /// Has dates but sits behind an unscheduled task, so the cascade
    /// never reached it. Its dates may be desynchronized.
    Stale,
}
