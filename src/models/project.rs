//! Project model.
//!
//! A project carries the scheduling anchor (T0) for its tasks: the
//! creation timestamp. The anchor is deliberately never "now" — a
//! schedule recomputed weeks later must not silently rewrite history,
//! only fill gaps relative to the original plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project grouping a set of tasks under one scheduling anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Creation timestamp, used as T0 for persisted scheduling.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project anchored at the given creation time.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            created_at,
        }
    }

    /// Sets the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The scheduling anchor (T0) for this project.
    #[inline]
    pub fn anchor(&self) -> DateTime<Utc> {
        self.created_at
    }
}
