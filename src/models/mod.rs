//! Scheduling domain models.
//!
//! Core data types for critical-path project scheduling: tasks with
//! precedence constraints, the project scheduling anchor, computed
//! schedules, and persistence instructions.
//!
//! The core only reads task snapshots and computes derived values;
//! task lifecycle (creation, deletion, storage) belongs to external
//! collaborators.

mod project;
mod schedule;
mod task;

pub use project::Project;
pub use schedule::{CpmSchedule, DateUpdate, ScheduleState, TaskTiming};
pub use task::{Task, STATUS_DONE};
