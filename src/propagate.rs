//! Single-edit cascade propagation.
//!
//! When one task's dates are set explicitly (a drag on the timeline),
//! the time delta between its old and new start cascades to every
//! reachable dependent: each shifted start is weekend-normalized and
//! each end is recomputed from the dependent's own duration through
//! the business calendar — not merely shifted by the same delta.
//!
//! # Dead Ends
//! A dependent without persisted dates stops the cascade on its
//! branch. Instead of skipping silently, every transitive dependent is
//! classified with a [`ScheduleState`]: shifted tasks are `Consistent`,
//! the blocking task is `Unscheduled`, and scheduled tasks stranded
//! behind it are `Stale` — their dates may now be desynchronized.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{add_business_hours, skip_weekend};
use crate::error::ScheduleError;
use crate::graph::DependencyGraph;
use crate::models::{DateUpdate, ScheduleState, Task};

/// Result of one propagation cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationOutcome {
    /// Persistence instructions, root first. Writes are independent;
    /// no transaction spans them.
    pub updates: Vec<DateUpdate>,
    /// Classification of the edited task and its transitive
    /// dependents.
    pub states: HashMap<String, ScheduleState>,
}

impl PropagationOutcome {
    /// IDs left stale by the cascade, sorted for deterministic output.
    pub fn stale_tasks(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .states
            .iter()
            .filter(|(_, s)| **s == ScheduleState::Stale)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Cascades a manual date edit to all reachable dependents.
///
/// The edited task's new dates are written unconditionally. When the
/// start moved, every scheduled dependent shifts by the same delta
/// (weekend-normalized) and gets its end recomputed from its own
/// duration. Each dependent is visited at most once, even when
/// reachable over multiple paths.
///
/// Fails fast with [`ScheduleError::CyclicDependency`] on cyclic input
/// and [`ScheduleError::TaskNotFound`] when the edited task is not in
/// the snapshot.
pub fn propagate_edit(
    task_id: &str,
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
    tasks: &[Task],
) -> Result<PropagationOutcome, ScheduleError> {
    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let edited = by_id.get(task_id).ok_or_else(|| ScheduleError::TaskNotFound {
        id: task_id.to_string(),
    })?;

    let graph = DependencyGraph::build(tasks);
    // Cycle guard: the cascade has no in-degree bound of its own.
    graph.topo_order()?;

    let mut updates = vec![DateUpdate::new(task_id, new_start, new_end)];
    let mut states = HashMap::new();
    states.insert(task_id.to_string(), ScheduleState::Consistent);

    // No prior start means there is no delta to cascade.
    let delta = match edited.start {
        Some(prior) => new_start - prior,
        None => chrono::Duration::zero(),
    };

    if !delta.is_zero() {
        let mut stack: Vec<&str> = graph.dependents(task_id).iter().map(String::as_str).collect();

        while let Some(id) = stack.pop() {
            if states.contains_key(id) {
                continue;
            }
            let dependent = match by_id.get(id) {
                Some(t) => *t,
                None => continue,
            };

            match dependent.start {
                Some(old_start) if dependent.end.is_some() => {
                    let shifted_start = skip_weekend(old_start + delta);
                    let shifted_end = add_business_hours(shifted_start, dependent.duration_hours);

                    updates.push(DateUpdate::new(id, shifted_start, shifted_end));
                    states.insert(id.to_string(), ScheduleState::Consistent);
                    stack.extend(graph.dependents(id).iter().map(String::as_str));
                }
                _ => {
                    // Dead end: branch not traversed further.
                    states.insert(id.to_string(), ScheduleState::Unscheduled);
                }
            }
        }

        // Anything downstream the cascade never reached.
        for id in graph.transitive_dependents(task_id) {
            if states.contains_key(id.as_str()) {
                continue;
            }
            let state = match by_id.get(id.as_str()) {
                Some(t) if t.is_scheduled() => ScheduleState::Stale,
                _ => ScheduleState::Unscheduled,
            };
            states.insert(id, state);
        }
    }

    debug!(
        task_id,
        delta_hours = delta.num_hours(),
        updated = updates.len(),
        "propagated date edit"
    );

    Ok(PropagationOutcome { updates, states })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone, Weekday};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    /// Diamond with a fully scheduled waterfall from Monday 2024-01-01.
    fn scheduled_diamond() -> Vec<Task> {
        vec![
            Task::new("A", 8).with_dates(at(1, 8), at(1, 16)),
            Task::new("B", 16)
                .with_dependency("A")
                .with_dates(at(1, 16), at(2, 8)),
            Task::new("C", 8)
                .with_dependency("A")
                .with_dates(at(1, 16), at(2, 0)),
            Task::new("D", 8)
                .with_dependency("B")
                .with_dependency("C")
                .with_dates(at(2, 8), at(2, 16)),
        ]
    }

    #[test]
    fn test_root_written_unconditionally() {
        let tasks = scheduled_diamond();
        // Same start: zero delta, no cascade.
        let outcome = propagate_edit("A", at(1, 8), at(1, 18), &tasks).unwrap();
        assert_eq!(outcome.updates.len(), 1);
        assert_eq!(outcome.updates[0], DateUpdate::new("A", at(1, 8), at(1, 18)));
    }

    #[test]
    fn test_two_day_shift_cascades() {
        // A moved +2 days; B, C and transitively D all shift, ends
        // recomputed from their own durations.
        let tasks = scheduled_diamond();
        let outcome = propagate_edit("A", at(3, 8), at(3, 16), &tasks).unwrap();

        let update = |id: &str| {
            outcome
                .updates
                .iter()
                .find(|u| u.task_id == id)
                .unwrap_or_else(|| panic!("no update for {id}"))
        };

        // B: Mon 16:00 + 2d = Wed 16:00, end recomputed over 16
        // working hours -> Thu 08:00.
        assert_eq!(update("B").new_start, at(3, 16));
        assert_eq!(update("B").new_end, at(4, 8));

        // C: Wed 16:00 + 8h -> Thu 00:00.
        assert_eq!(update("C").new_start, at(3, 16));
        assert_eq!(update("C").new_end, at(4, 0));

        // D shifted by the same delta from its own old start.
        assert_eq!(update("D").new_start, at(4, 8));
        assert_eq!(update("D").new_end, at(4, 16));

        assert!(outcome
            .states
            .values()
            .all(|s| *s == ScheduleState::Consistent));
    }

    #[test]
    fn test_shift_lands_on_weekend() {
        // D old start Tue 2024-01-02 08:00; +4 days lands on Saturday
        // 2024-01-06 -> normalized to Monday 2024-01-08.
        let tasks = scheduled_diamond();
        let outcome = propagate_edit("B", at(5, 16), at(6, 8), &tasks).unwrap();

        let d = outcome
            .updates
            .iter()
            .find(|u| u.task_id == "D")
            .unwrap();
        assert_eq!(d.new_start, at(8, 8));
        assert_ne!(d.new_start.weekday(), Weekday::Sat);
        assert_eq!(d.new_end, at(8, 16));
    }

    #[test]
    fn test_each_dependent_visited_once() {
        // D is reachable through both B and C; it must shift exactly
        // once.
        let tasks = scheduled_diamond();
        let outcome = propagate_edit("A", at(2, 8), at(2, 16), &tasks).unwrap();
        let d_updates = outcome.updates.iter().filter(|u| u.task_id == "D").count();
        assert_eq!(d_updates, 1);
    }

    #[test]
    fn test_unscheduled_dependent_stops_branch() {
        let mut tasks = scheduled_diamond();
        // B loses its dates; the B branch dead-ends.
        tasks[1].start = None;
        tasks[1].end = None;

        let outcome = propagate_edit("A", at(2, 8), at(2, 16), &tasks).unwrap();

        assert_eq!(outcome.states["B"], ScheduleState::Unscheduled);
        // C still cascades, and D is reached through C.
        assert_eq!(outcome.states["C"], ScheduleState::Consistent);
        assert_eq!(outcome.states["D"], ScheduleState::Consistent);
        assert!(!outcome.updates.iter().any(|u| u.task_id == "B"));
    }

    #[test]
    fn test_stranded_dependents_marked_stale() {
        // Chain A -> B -> C with B unscheduled: C has dates but is
        // never reached.
        let tasks = vec![
            Task::new("A", 8).with_dates(at(1, 8), at(1, 16)),
            Task::new("B", 8).with_dependency("A"),
            Task::new("C", 8)
                .with_dependency("B")
                .with_dates(at(3, 8), at(3, 16)),
        ];

        let outcome = propagate_edit("A", at(2, 8), at(2, 16), &tasks).unwrap();
        assert_eq!(outcome.states["B"], ScheduleState::Unscheduled);
        assert_eq!(outcome.states["C"], ScheduleState::Stale);
        assert_eq!(outcome.stale_tasks(), vec!["C"]);
        assert_eq!(outcome.updates.len(), 1); // root only
    }

    #[test]
    fn test_no_prior_start_means_no_cascade() {
        let mut tasks = scheduled_diamond();
        tasks[0].start = None;
        tasks[0].end = None;

        let outcome = propagate_edit("A", at(2, 8), at(2, 16), &tasks).unwrap();
        assert_eq!(outcome.updates.len(), 1);
    }

    #[test]
    fn test_negative_delta_shifts_backward() {
        let tasks = scheduled_diamond();
        // A pulled one day earlier... from Monday to Sunday, so the
        // dependents' shifted starts normalize off the weekend.
        let outcome = propagate_edit("A", at(1, 8) - Duration::days(1), at(1, 0), &tasks).unwrap();

        let c = outcome
            .updates
            .iter()
            .find(|u| u.task_id == "C")
            .unwrap();
        // C old start Mon 16:00 - 24h = Sunday 16:00 -> Monday 16:00.
        assert_eq!(c.new_start, at(1, 16));
    }

    #[test]
    fn test_unknown_task_rejected() {
        let err = propagate_edit("GHOST", at(1, 8), at(1, 16), &scheduled_diamond()).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::TaskNotFound {
                id: "GHOST".to_string()
            }
        );
    }

    #[test]
    fn test_cycle_fails_fast() {
        let tasks = vec![
            Task::new("A", 1)
                .with_dependency("B")
                .with_dates(at(1, 8), at(1, 9)),
            Task::new("B", 1)
                .with_dependency("A")
                .with_dates(at(1, 9), at(1, 10)),
        ];
        let err = propagate_edit("A", at(2, 8), at(2, 9), &tasks).unwrap_err();
        assert!(matches!(err, ScheduleError::CyclicDependency { .. }));
    }
}
