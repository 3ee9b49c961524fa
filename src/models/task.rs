//! Task model.
//!
//! A task is the unit of scheduling: a duration in working hours plus a
//! set of predecessor task IDs. Dates are optional — a task without both
//! a start and an end is simply not yet scheduled.
//!
//! # Time Representation
//! Durations and slack are integer hours. Calendar positions are UTC
//! timestamps anchored by the consumer (project creation time for the
//! persisted scheduler, a caller-supplied instant for display runs).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimate::estimate_duration;

/// Status value with scheduling significance: done tasks stay in the
/// graph but drop out of attention views.
pub const STATUS_DONE: &str = "done";

/// A task to be scheduled.
///
/// Dependencies may reference tasks outside the current snapshot;
/// dangling references are filtered when the graph is built, never
/// treated as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Expected duration in working hours (>= 0).
    pub duration_hours: i64,
    /// IDs of tasks that must finish before this one starts.
    pub dependencies: Vec<String>,
    /// Free-form status. Only [`STATUS_DONE`] is scheduling-significant.
    pub status: String,
    /// Scheduled start. `None` = not yet scheduled.
    pub start: Option<DateTime<Utc>>,
    /// Scheduled end. `None` = not yet scheduled.
    pub end: Option<DateTime<Utc>>,
    /// Optimistic estimate (hours), when the duration came from PERT.
    pub est_optimistic: Option<f64>,
    /// Most-likely estimate (hours).
    pub est_likely: Option<f64>,
    /// Pessimistic estimate (hours).
    pub est_pessimistic: Option<f64>,
    /// Whether the task sits on the critical path (post-computation).
    pub is_critical: bool,
    /// Slack in hours (post-computation, >= 0 for acyclic input).
    pub slack_hours: i64,
}

impl Task {
    /// Creates a new task with the given ID and duration.
    pub fn new(id: impl Into<String>, duration_hours: i64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            duration_hours,
            dependencies: Vec::new(),
            status: "todo".to_string(),
            start: None,
            end: None,
            est_optimistic: None,
            est_likely: None,
            est_pessimistic: None,
            is_critical: false,
            slack_hours: 0,
        }
    }

    /// Creates a task whose duration is derived from a three-point
    /// (PERT) estimate.
    pub fn from_estimates(
        id: impl Into<String>,
        optimistic: f64,
        likely: f64,
        pessimistic: f64,
    ) -> Self {
        let mut task = Self::new(id, estimate_duration(optimistic, likely, pessimistic));
        task.est_optimistic = Some(optimistic);
        task.est_likely = Some(likely);
        task.est_pessimistic = Some(pessimistic);
        task
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds a dependency on another task.
    pub fn with_dependency(mut self, dep_id: impl Into<String>) -> Self {
        self.dependencies.push(dep_id.into());
        self
    }

    /// Replaces the dependency list.
    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets both scheduled dates.
    pub fn with_dates(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Whether this task is done (excluded from attention views, still
    /// part of graph traversal).
    pub fn is_done(&self) -> bool {
        self.status == STATUS_DONE
    }

    /// Whether both dates are present.
    pub fn is_scheduled(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}
