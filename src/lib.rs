//! Critical-path scheduling core.
//!
//! Schedules interdependent work items from durations and precedence
//! constraints, finds the critical path, and keeps computed schedules
//! consistent as dependencies or individual dates change.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Project`, `CpmSchedule`,
//!   `DateUpdate`, `ScheduleState`
//! - **`estimate`**: Three-point (PERT) duration estimation
//! - **`calendar`**: Business-day date arithmetic (weekend skipping)
//! - **`graph`**: Dependency graph construction, topological ordering,
//!   cycle detection
//! - **`cpm`**: Forward/backward-pass critical-path computation
//! - **`reconcile`**: Whole-project schedule recomputation with manual
//!   override preservation
//! - **`propagate`**: Cascade of a single manual date edit to
//!   dependents
//! - **`store`**: Persistence seam (independent, non-transactional
//!   writes)
//!
//! # Operations
//!
//! The four boundary operations map onto modules directly:
//! [`estimate_duration`], [`CpmEngine::compute`],
//! [`reconcile_project`], and [`propagate_edit`]. All four are pure
//! over an in-memory snapshot; the persisting paths return
//! [`DateUpdate`] lists for an external store.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Malcolm et al. (1959), PERT
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

pub mod calendar;
pub mod cpm;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod models;
pub mod propagate;
pub mod reconcile;
pub mod store;

pub use calendar::{add_business_hours, skip_weekend, FLAT_ADDITION_THRESHOLD_HOURS};
pub use cpm::{business_day_anchor, CpmEngine, BUSINESS_DAY_START_HOUR};
pub use error::ScheduleError;
pub use estimate::estimate_duration;
pub use graph::DependencyGraph;
pub use models::{CpmSchedule, DateUpdate, Project, ScheduleState, Task, TaskTiming};
pub use propagate::{propagate_edit, PropagationOutcome};
pub use reconcile::{reconcile, reconcile_project, ReconcileOutcome};
pub use store::{apply_updates, ScheduleStore, WriteFailure};
