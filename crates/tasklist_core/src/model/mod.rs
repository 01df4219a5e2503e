//! Domain model for the task list.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Listing order is defined by the storage-assigned `seq`, never by title.

pub mod task;
