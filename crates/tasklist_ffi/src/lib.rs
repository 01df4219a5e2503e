//! Mobile UI bridge for the task list core.

pub mod api;
