//! Critical Path Method engine.
//!
//! Pure, stateless computation of earliest/latest start and finish,
//! slack, and criticality over a dependency graph. Works in integer
//! hour offsets from an anchor; anchored dates are derived at the end.
//!
//! # Algorithm
//!
//! Both passes use iterative relaxation: sweep all tasks, updating
//! timing values, until a sweep changes nothing or the sweep cap is
//! reached. An acyclic graph converges in at most `task_count` sweeps;
//! the cap (default `2 x task_count`) is purely a non-termination
//! guard for unsupported cyclic input. Hitting it marks the schedule
//! as non-converged and emits a warning — the timings returned are the
//! best partial convergence, not a hard failure.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::warn;

use crate::graph::DependencyGraph;
use crate::models::{CpmSchedule, Task, TaskTiming};

/// Hour of day at which a business day starts, for display anchoring.
pub const BUSINESS_DAY_START_HOUR: u32 = 8;

/// Rounds a timestamp down to the business-day start (08:00) of the
/// same day.
///
/// The ephemeral display variant anchors schedules here. The caller
/// supplies "now" explicitly — the engine itself never reads the
/// clock.
pub fn business_day_anchor(now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&now.date_naive().and_time(chrono::NaiveTime::MIN));
    midnight + Duration::hours(i64::from(BUSINESS_DAY_START_HOUR))
}

/// CPM forward/backward pass engine.
///
/// Stateless apart from configuration. Two consumers share it: the
/// ephemeral display path (anchored at a caller-chosen instant) and
/// the persisted path (anchored at project creation).
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use cpm_schedule::{CpmEngine, Task};
///
/// let tasks = vec![
///     Task::new("A", 8),
///     Task::new("B", 16).with_dependency("A"),
/// ];
/// let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
/// let schedule = CpmEngine::new().compute(&tasks, anchor);
///
/// assert_eq!(schedule.project_duration_hours, 24);
/// assert!(schedule.timing_for("A").unwrap().is_critical);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CpmEngine {
    /// Relaxation sweep cap. `None` = `2 x task_count`.
    sweep_cap: Option<usize>,
}

impl CpmEngine {
    /// Creates an engine with the default sweep cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the relaxation sweep cap.
    ///
    /// Injectable for tests against adversarial graph sizes; the
    /// default of `2 x task_count` is ample for any acyclic input.
    pub fn with_sweep_cap(mut self, cap: usize) -> Self {
        self.sweep_cap = Some(cap);
        self
    }

    /// Computes a schedule for the snapshot, anchored at `anchor`.
    ///
    /// Pure: same input, same output. Tasks with no dependencies start
    /// at offset 0 (the anchor); tasks with no dependents finish no
    /// later than the project duration; a single task is trivially
    /// critical.
    pub fn compute(&self, tasks: &[Task], anchor: DateTime<Utc>) -> CpmSchedule {
        let graph = DependencyGraph::build(tasks);
        // At least one sweep, so an empty snapshot still settles.
        let cap = self.sweep_cap.unwrap_or((tasks.len() * 2).max(1));

        let (early_start, early_finish, forward_converged) = self.forward_pass(tasks, &graph, cap);

        let project_duration = early_finish.values().copied().max().unwrap_or(0);

        let (late_start, late_finish, backward_converged) =
            self.backward_pass(tasks, &graph, project_duration, cap);

        let converged = forward_converged && backward_converged;
        if !converged {
            warn!(
                task_count = tasks.len(),
                sweep_cap = cap,
                "CPM relaxation hit its sweep cap without converging; \
                 timings are a best partial convergence (cyclic input?)"
            );
        }

        let mut timings = HashMap::with_capacity(tasks.len());
        for task in tasks {
            let es = early_start.get(task.id.as_str()).copied().unwrap_or(0);
            let ef = early_finish.get(task.id.as_str()).copied().unwrap_or(0);
            let ls = late_start.get(task.id.as_str()).copied().unwrap_or(0);
            let lf = late_finish.get(task.id.as_str()).copied().unwrap_or(0);

            let slack = ls - es;
            // Durations are integral, so exact zero-slack is the
            // criticality test (no float tolerance needed).
            let is_critical = slack <= 0;

            timings.insert(
                task.id.clone(),
                TaskTiming {
                    early_start_h: es,
                    early_finish_h: ef,
                    late_start_h: ls,
                    late_finish_h: lf,
                    slack_h: slack,
                    is_critical,
                    start: anchor + Duration::hours(es),
                    end: anchor + Duration::hours(ef),
                },
            );
        }

        CpmSchedule {
            timings,
            project_duration_hours: project_duration,
            converged,
        }
    }

    /// Forward pass: `early_start = max(early_finish of deps, 0)`.
    ///
    /// Returns the maps plus whether the pass settled within the cap.
    fn forward_pass<'a>(
        &self,
        tasks: &'a [Task],
        graph: &DependencyGraph,
        cap: usize,
    ) -> (HashMap<&'a str, i64>, HashMap<&'a str, i64>, bool) {
        let mut early_start: HashMap<&str, i64> = HashMap::new();
        let mut early_finish: HashMap<&str, i64> = HashMap::new();

        let mut changed = true;
        let mut sweeps = 0;
        while changed && sweeps < cap {
            changed = false;
            for task in tasks {
                let max_dep_finish = graph
                    .valid_deps(&task.id)
                    .iter()
                    .map(|d| early_finish.get(d.as_str()).copied().unwrap_or(0))
                    .max()
                    .unwrap_or(0);

                if early_start.get(task.id.as_str()) != Some(&max_dep_finish) {
                    early_start.insert(&task.id, max_dep_finish);
                    early_finish.insert(&task.id, max_dep_finish + task.duration_hours);
                    changed = true;
                }
            }
            sweeps += 1;
        }

        (early_start, early_finish, !changed)
    }

    /// Backward pass: `late_finish = min(late_start of dependents)`,
    /// defaulting to the project duration for sink tasks.
    fn backward_pass<'a>(
        &self,
        tasks: &'a [Task],
        graph: &DependencyGraph,
        project_duration: i64,
        cap: usize,
    ) -> (HashMap<&'a str, i64>, HashMap<&'a str, i64>, bool) {
        let mut late_start: HashMap<&str, i64> = HashMap::new();
        let mut late_finish: HashMap<&str, i64> = HashMap::new();

        for task in tasks {
            late_finish.insert(&task.id, project_duration);
            late_start.insert(&task.id, project_duration - task.duration_hours);
        }

        let mut changed = true;
        let mut sweeps = 0;
        while changed && sweeps < cap {
            changed = false;
            for task in tasks {
                let min_dependent_start = graph
                    .dependents(&task.id)
                    .iter()
                    .filter_map(|d| late_start.get(d.as_str()).copied())
                    .min()
                    .unwrap_or(project_duration);

                if late_finish.get(task.id.as_str()) != Some(&min_dependent_start) {
                    late_finish.insert(&task.id, min_dependent_start);
                    late_start.insert(&task.id, min_dependent_start - task.duration_hours);
                    changed = true;
                }
            }
            sweeps += 1;
        }

        (late_start, late_finish, !changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use std::collections::HashSet;

    fn anchor() -> DateTime<Utc> {
        // Monday 2024-01-01 08:00 UTC
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    fn diamond() -> Vec<Task> {
        vec![
            Task::new("A", 8),
            Task::new("B", 16).with_dependency("A"),
            Task::new("C", 8).with_dependency("A"),
            Task::new("D", 8).with_dependency("B").with_dependency("C"),
        ]
    }

    #[test]
    fn test_diamond_offsets() {
        let schedule = CpmEngine::new().compute(&diamond(), anchor());
        assert!(schedule.converged);
        assert_eq!(schedule.project_duration_hours, 32);

        let a = schedule.timing_for("A").unwrap();
        assert_eq!((a.early_start_h, a.early_finish_h), (0, 8));
        let b = schedule.timing_for("B").unwrap();
        assert_eq!((b.early_start_h, b.early_finish_h), (8, 24));
        let c = schedule.timing_for("C").unwrap();
        assert_eq!((c.early_start_h, c.early_finish_h), (8, 16));
        let d = schedule.timing_for("D").unwrap();
        assert_eq!((d.early_start_h, d.early_finish_h), (24, 32));
    }

    #[test]
    fn test_diamond_critical_path() {
        let schedule = CpmEngine::new().compute(&diamond(), anchor());
        assert_eq!(schedule.critical_tasks(), vec!["A", "B", "D"]);

        let c = schedule.timing_for("C").unwrap();
        assert_eq!(c.slack_h, 8);
        assert!(!c.is_critical);
    }

    #[test]
    fn test_diamond_dates() {
        // Diamond anchored Monday 2024-01-01T08:00.
        let schedule = CpmEngine::new().compute(&diamond(), anchor());
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap();

        let a = schedule.timing_for("A").unwrap();
        assert_eq!((a.start, a.end), (at(1, 8), at(1, 16)));
        let b = schedule.timing_for("B").unwrap();
        assert_eq!((b.start, b.end), (at(1, 16), at(2, 8)));
        let c = schedule.timing_for("C").unwrap();
        assert_eq!((c.start, c.end), (at(1, 16), at(2, 0)));
        let d = schedule.timing_for("D").unwrap();
        assert_eq!((d.start, d.end), (at(2, 8), at(2, 16)));
    }

    #[test]
    fn test_critical_path_spans_project() {
        // The critical set must contain a source-to-sink chain whose
        // durations sum to the project span.
        let tasks = diamond();
        let schedule = CpmEngine::new().compute(&tasks, anchor());
        let critical: HashSet<&str> = schedule.critical_tasks().into_iter().collect();

        let sum: i64 = tasks
            .iter()
            .filter(|t| critical.contains(t.id.as_str()))
            .map(|t| t.duration_hours)
            .sum();
        // A(8) + B(16) + D(8), forming A -> B -> D.
        assert_eq!(sum, schedule.project_duration_hours);
    }

    #[test]
    fn test_single_task_is_critical() {
        let tasks = vec![Task::new("only", 5)];
        let schedule = CpmEngine::new().compute(&tasks, anchor());
        let t = schedule.timing_for("only").unwrap();
        assert!(t.is_critical);
        assert_eq!(t.slack_h, 0);
        assert_eq!(schedule.project_duration_hours, 5);
    }

    #[test]
    fn test_independent_tasks() {
        // No edges: both start at the anchor; the longer one is
        // critical, the shorter one carries the difference as slack.
        let tasks = vec![Task::new("long", 10), Task::new("short", 4)];
        let schedule = CpmEngine::new().compute(&tasks, anchor());

        assert_eq!(schedule.project_duration_hours, 10);
        assert!(schedule.timing_for("long").unwrap().is_critical);
        let short = schedule.timing_for("short").unwrap();
        assert_eq!(short.slack_h, 6);
        assert!(!short.is_critical);
    }

    #[test]
    fn test_dangling_dependency_ignored() {
        let tasks = vec![Task::new("A", 8).with_dependency("MISSING")];
        let schedule = CpmEngine::new().compute(&tasks, anchor());
        let a = schedule.timing_for("A").unwrap();
        assert_eq!(a.early_start_h, 0);
        assert!(schedule.converged);
    }

    #[test]
    fn test_empty_input() {
        let schedule = CpmEngine::new().compute(&[], anchor());
        assert_eq!(schedule.task_count(), 0);
        assert_eq!(schedule.project_duration_hours, 0);
        assert!(schedule.converged);
    }

    #[test]
    fn test_cyclic_input_reports_non_convergence() {
        let tasks = vec![
            Task::new("A", 1).with_dependency("B"),
            Task::new("B", 1).with_dependency("A"),
        ];
        let schedule = CpmEngine::new().compute(&tasks, anchor());
        assert!(!schedule.converged);
    }

    #[test]
    fn test_injectable_sweep_cap() {
        // A 3-deep chain swept once cannot settle.
        let tasks = vec![
            Task::new("A", 1),
            Task::new("B", 1).with_dependency("A"),
            Task::new("C", 1).with_dependency("B"),
        ];
        let capped = CpmEngine::new().with_sweep_cap(1).compute(&tasks, anchor());
        assert!(!capped.converged);

        let full = CpmEngine::new().compute(&tasks, anchor());
        assert!(full.converged);
        assert_eq!(full.project_duration_hours, 3);
    }

    #[test]
    fn test_business_day_anchor() {
        let afternoon = Utc.with_ymd_and_hms(2024, 5, 15, 14, 37, 22).unwrap();
        let t0 = business_day_anchor(afternoon);
        assert_eq!(t0.hour(), BUSINESS_DAY_START_HOUR);
        assert_eq!(t0.minute(), 0);
        assert_eq!(t0.date_naive(), afternoon.date_naive());
    }
}
