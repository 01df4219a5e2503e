//! Presentation state for the task list screens.
//!
//! # Responsibility
//! - Hold what the list screen and the add screen display.
//! - Translate user gestures into task store calls.
//!
//! # Invariants
//! - Presenters never own the store; it is passed into every call.
//! - At most one dialog or editor is open at a time.

pub mod deselect;
pub mod list_presenter;
pub mod task_editor;
