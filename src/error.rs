//! Error types.
//!
//! Boundary failures are explicit values, never panics. Dangling
//! dependency references are deliberately not errors — they are
//! filtered during graph construction.

use thiserror::Error;

/// Errors surfaced at the scheduling boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// An identifier is not in the expected UUID format.
    #[error("invalid identifier format, expected UUID: \"{id}\"")]
    InvalidId {
        /// The offending identifier.
        id: String,
    },

    /// The referenced task is not in the snapshot.
    #[error("task not found: {id}")]
    TaskNotFound {
        /// The missing task ID.
        id: String,
    },

    /// The dependency graph contains a cycle; scheduling cannot
    /// produce a meaningful order.
    #[error("circular dependency detected involving task '{task_id}'")]
    CyclicDependency {
        /// A task on (or blocked by) the cycle.
        task_id: String,
    },
}

/// Validates that an identifier is UUID-shaped.
///
/// Ids must be normalized and collision-free; the core itself treats
/// them as opaque strings, so the check happens only here at the
/// boundary.
pub fn validate_id(id: &str) -> Result<(), ScheduleError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ScheduleError::InvalidId { id: id.to_string() })
}
