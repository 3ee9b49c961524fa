//! Whole-project schedule reconciliation.
//!
//! Walks a project's full task snapshot once in topological order,
//! resolving each task's start as `max(persisted start, dependency
//! constraint)` and emitting a [`DateUpdate`] for every task whose
//! resolved dates differ from what is persisted.
//!
//! # Date Policy
//! This path adds duration hours flat, with no weekend skipping —
//! unlike [`crate::calendar`], which the propagation path uses. The
//! split is inherited from the source system and kept as-is: the
//! reconciler produces a provisional waterfall, later corrected by
//! edit propagation. See DESIGN.md.
//!
//! # Manual Overrides
//! A persisted start at or after the dependency constraint is kept,
//! preserving any manual "this stays on day N" pin and its slack.
//! Dates are only ever pushed forward, never pulled into the past.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{validate_id, ScheduleError};
use crate::graph::DependencyGraph;
use crate::models::{DateUpdate, Project, Task};

/// Result of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Persistence instructions for every task whose dates changed.
    /// Writes are independent; the operation is not atomic.
    pub updates: Vec<DateUpdate>,
    /// Resolved dates for the whole snapshot, including unchanged
    /// tasks (what dependents saw during the walk).
    pub resolved: HashMap<String, (DateTime<Utc>, DateTime<Utc>)>,
}

impl ReconcileOutcome {
    /// Number of tasks whose dates need a persisted update.
    pub fn updated_count(&self) -> usize {
        self.updates.len()
    }
}

/// Recomputes the schedule for a full project snapshot.
///
/// `project_id` is validated as a UUID at this boundary; `anchor` is
/// the project's creation timestamp (T0), never "now". Fails fast with
/// [`ScheduleError::CyclicDependency`] on cyclic input instead of
/// silently producing an incomplete schedule.
///
/// Running twice over an unchanged, written-back snapshot emits zero
/// updates (idempotence).
pub fn reconcile_project(
    project_id: &str,
    anchor: DateTime<Utc>,
    tasks: &[Task],
) -> Result<ReconcileOutcome, ScheduleError> {
    validate_id(project_id)?;

    let graph = DependencyGraph::build(tasks);
    let order = graph.topo_order()?;

    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut resolved: HashMap<String, (DateTime<Utc>, DateTime<Utc>)> = HashMap::new();
    let mut updates = Vec::new();

    for id in &order {
        let task = match by_id.get(id.as_str()) {
            Some(t) => *t,
            None => continue,
        };

        // Latest end among already-resolved dependencies, in this run
        // (not the persisted snapshot), else the project anchor.
        let constraint_start = graph
            .valid_deps(id)
            .iter()
            .filter_map(|d| resolved.get(d.as_str()).map(|(_, end)| *end))
            .max()
            .unwrap_or(anchor);

        // Keep a persisted start only when it doesn't violate the
        // constraint; otherwise push forward (schedule slip).
        let final_start = match task.start {
            Some(existing) if existing >= constraint_start => existing,
            _ => constraint_start,
        };

        // Zero durations occupy a minimal one-hour slot, like the
        // source system.
        let final_end = final_start + Duration::hours(task.duration_hours.max(1));

        resolved.insert(id.clone(), (final_start, final_end));

        let unchanged = task.start == Some(final_start) && task.end == Some(final_end);
        if !unchanged {
            updates.push(DateUpdate::new(id.clone(), final_start, final_end));
        }
    }

    debug!(
        project_id,
        task_count = tasks.len(),
        updated = updates.len(),
        "reconciled project schedule"
    );

    Ok(ReconcileOutcome { updates, resolved })
}

/// Reconciles a project's snapshot using its creation anchor.
pub fn reconcile(project: &Project, tasks: &[Task]) -> Result<ReconcileOutcome, ScheduleError> {
    reconcile_project(&project.id, project.anchor(), tasks)
}
