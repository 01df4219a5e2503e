//! Task domain model.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `seq` is assigned once at insert time and only grows across inserts.
//! - `title` is free text; the empty string is a valid title.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier used to target updates and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One to-do item as persisted in the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Creation sequence number; listing order is `seq ASC`.
    pub seq: i64,
    pub title: String,
}

impl Task {
    pub fn new(id: TaskId, seq: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            seq,
            title: title.into(),
        }
    }
}
