//! Add-task editor state.
//!
//! # Invariants
//! - Saving creates exactly one task with the current input, empty or not.
//! - The delegate is told to reload before it is told the editor closed.

use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::{StoreError, TaskStore};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder shown in the empty title input.
pub const NEW_TASK_PLACEHOLDER: &str = "New Task";

/// Receiver of editor notifications, usually the list presenter.
pub trait TaskEditorDelegate {
    /// Task data changed; re-fetch from `store`.
    fn reload_data<R: TaskRepository>(&mut self, store: &TaskStore<R>);

    /// The editor closed, with or without saving.
    fn editor_dismissed(&mut self) {}
}

/// Failed save. The editor is handed back so the host can retry or cancel.
#[derive(Debug)]
pub struct EditorSaveError {
    pub editor: TaskEditor,
    pub error: StoreError,
}

impl Display for EditorSaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "saving new task failed: {}", self.error)
    }
}

impl Error for EditorSaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Single text input plus Save/Cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEditor {
    input: String,
}

impl TaskEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(&self) -> &'static str {
        NEW_TASK_PLACEHOLDER
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Creates the task, notifies `delegate`, then closes.
    pub fn save<R, D>(self, store: &TaskStore<R>, delegate: &mut D) -> Result<(), EditorSaveError>
    where
        R: TaskRepository,
        D: TaskEditorDelegate,
    {
        if let Err(error) = store.create(self.input.as_str()) {
            return Err(EditorSaveError {
                editor: self,
                error,
            });
        }

        delegate.reload_data(store);
        delegate.editor_dismissed();
        debug!("event=editor_close module=presenter status=ok action=save");
        Ok(())
    }

    /// Closes without touching the store.
    pub fn cancel<D: TaskEditorDelegate>(self, delegate: &mut D) {
        delegate.editor_dismissed();
        debug!("event=editor_close module=presenter status=ok action=cancel");
    }
}
