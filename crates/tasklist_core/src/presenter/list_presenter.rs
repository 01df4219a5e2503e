//! List screen presenter.
//!
//! # Responsibility
//! - Cache the full task listing for display and re-fetch it after changes.
//! - Handle swipe-to-delete, row selection with the update dialog, and the
//!   add flow.
//! - Own the deferred deselection of highlighted rows.
//!
//! # Invariants
//! - State moves `Idle -> Listing -> {Adding, Updating, Deleting} -> Listing`.
//! - Delete is optimistic: the row leaves the cache before the store is
//!   called, and the cache is only re-fetched if the store call fails.
//! - Pending deselections refer to tasks, so a reused row never inherits one.

use crate::model::task::{Task, TaskId};
use crate::presenter::deselect::DeselectScheduler;
use crate::presenter::task_editor::{TaskEditor, TaskEditorDelegate};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::{StoreError, TaskStore};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Navigation title of the list screen.
pub const LIST_TITLE: &str = "Task list";
pub const UPDATE_DIALOG_MESSAGE: &str = "What do you want to do?";
pub const UPDATE_DIALOG_PLACEHOLDER: &str = "Update Task";
pub const UPDATE_ACTION_LABEL: &str = "Update task";
pub const CANCEL_ACTION_LABEL: &str = "Cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    Idle,
    Listing,
    Adding,
    Updating,
    Deleting,
}

/// Update/Cancel dialog opened by selecting a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDialog {
    /// Task the dialog acts on, captured at selection time.
    pub task: Task,
    pub message: &'static str,
    pub placeholder: &'static str,
}

impl UpdateDialog {
    fn for_task(task: Task) -> Self {
        Self {
            task,
            message: UPDATE_DIALOG_MESSAGE,
            placeholder: UPDATE_DIALOG_PLACEHOLDER,
        }
    }

    /// Dialog heading: the current task title.
    pub fn title(&self) -> &str {
        &self.task.title
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Empty replacement title; nothing was written.
    IgnoredEmptyTitle,
}

pub type PresenterResult<T> = Result<T, PresenterError>;

#[derive(Debug)]
pub enum PresenterError {
    /// Gesture is not valid in the current state.
    InvalidState {
        expected: PresenterState,
        actual: PresenterState,
    },
    RowOutOfRange {
        row: usize,
        len: usize,
    },
    Store(StoreError),
}

impl Display for PresenterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState { expected, actual } => {
                write!(f, "presenter is {actual:?}, expected {expected:?}")
            }
            Self::RowOutOfRange { row, len } => {
                write!(f, "row {row} is outside list of {len} rows")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PresenterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for PresenterError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[derive(Debug, Clone)]
pub struct ListPresenter {
    rows: Vec<Task>,
    state: PresenterState,
    dialog: Option<UpdateDialog>,
    highlighted: Option<TaskId>,
    selected: Option<TaskId>,
    deselect: DeselectScheduler<TaskId>,
}

impl Default for ListPresenter {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            state: PresenterState::Idle,
            dialog: None,
            highlighted: None,
            selected: None,
            deselect: DeselectScheduler::default(),
        }
    }
}

impl ListPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom scheduler, e.g. a shorter deselection delay.
    pub fn with_scheduler(deselect: DeselectScheduler<TaskId>) -> Self {
        Self {
            deselect,
            ..Self::default()
        }
    }

    pub fn title(&self) -> &'static str {
        LIST_TITLE
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    /// Loads the listing once and enters `Listing`.
    pub fn activate<R: TaskRepository>(&mut self, store: &TaskStore<R>) {
        self.refetch(store);
        self.state = PresenterState::Listing;
        info!(
            "event=list_activate module=presenter status=ok rows={}",
            self.rows.len()
        );
    }

    /// Tears the screen down: closes any dialog and cancels pending callbacks.
    pub fn deactivate(&mut self) {
        self.deselect.cancel_all();
        self.dialog = None;
        self.highlighted = None;
        self.selected = None;
        self.rows.clear();
        self.state = PresenterState::Idle;
        debug!("event=list_deactivate module=presenter status=ok");
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_title(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|task| task.title.as_str())
    }

    pub fn rows(&self) -> &[Task] {
        &self.rows
    }

    /// Full re-fetch and redisplay.
    pub fn reload_data<R: TaskRepository>(&mut self, store: &TaskStore<R>) {
        self.refetch(store);
        if self.state == PresenterState::Idle {
            self.state = PresenterState::Listing;
        }
    }

    /// Swipe-to-delete on `row`.
    pub fn delete_row<R: TaskRepository>(
        &mut self,
        store: &TaskStore<R>,
        row: usize,
    ) -> PresenterResult<()> {
        self.expect_state(PresenterState::Listing)?;
        self.check_row(row)?;

        self.state = PresenterState::Deleting;
        let removed = self.rows.remove(row);
        self.forget(removed.id);

        let result = store.delete_at(row);
        if let Err(err) = &result {
            warn!(
                "event=list_delete module=presenter status=error row={row} error={err}; refetching"
            );
            self.refetch(store);
        }
        self.state = PresenterState::Listing;
        result.map_err(PresenterError::from)
    }

    /// Tap on `row`: opens the Update/Cancel dialog.
    pub fn select_row(&mut self, row: usize) -> PresenterResult<&UpdateDialog> {
        self.expect_state(PresenterState::Listing)?;
        self.check_row(row)?;

        let task = self.rows[row].clone();
        self.selected = Some(task.id);
        self.state = PresenterState::Updating;
        let dialog: &UpdateDialog = self.dialog.insert(UpdateDialog::for_task(task));
        Ok(dialog)
    }

    pub fn dialog(&self) -> Option<&UpdateDialog> {
        self.dialog.as_ref()
    }

    /// "Update" in the open dialog.
    pub fn confirm_update<R: TaskRepository>(
        &mut self,
        store: &TaskStore<R>,
        new_title: &str,
    ) -> PresenterResult<UpdateOutcome> {
        self.expect_state(PresenterState::Updating)?;
        self.state = PresenterState::Listing;
        let Some(dialog) = self.dialog.take() else {
            return Ok(UpdateOutcome::IgnoredEmptyTitle);
        };

        if new_title.is_empty() {
            debug!("event=list_update module=presenter status=skipped reason=empty_title");
            return Ok(UpdateOutcome::IgnoredEmptyTitle);
        }

        let result = store.update(&dialog.task, new_title);
        self.refetch(store);
        result?;
        Ok(UpdateOutcome::Applied)
    }

    /// "Cancel" in the open dialog, or dismissing it.
    pub fn cancel_dialog(&mut self) {
        if self.state == PresenterState::Updating {
            self.dialog = None;
            self.state = PresenterState::Listing;
        }
    }

    /// Opens the add-task editor with this presenter as its delegate.
    pub fn begin_add(&mut self) -> PresenterResult<TaskEditor> {
        self.expect_state(PresenterState::Listing)?;
        self.state = PresenterState::Adding;
        Ok(TaskEditor::new())
    }

    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlighted.and_then(|id| self.row_of(id))
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected.and_then(|id| self.row_of(id))
    }

    /// Finger down on `row`; arms the deferred deselection.
    pub fn highlight_row(&mut self, row: usize, now: Instant) -> PresenterResult<()> {
        self.check_row(row)?;
        let id = self.rows[row].id;
        self.highlighted = Some(id);
        self.deselect.schedule(id, now);
        Ok(())
    }

    /// Finger up on `row`; re-arms the deferred deselection.
    pub fn unhighlight_row(&mut self, row: usize, now: Instant) -> PresenterResult<()> {
        self.check_row(row)?;
        let id = self.rows[row].id;
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        self.deselect.schedule(id, now);
        Ok(())
    }

    /// Fires due deselections and returns the rows they cleared.
    pub fn tick(&mut self, now: Instant) -> Vec<usize> {
        let mut rows = Vec::new();
        for id in self.deselect.take_due(now) {
            if self.selected == Some(id) {
                self.selected = None;
            }
            if let Some(row) = self.row_of(id) {
                rows.push(row);
            }
        }
        rows.sort_unstable();
        rows
    }

    pub fn pending_deselections(&self) -> usize {
        self.deselect.pending_count()
    }

    fn refetch<R: TaskRepository>(&mut self, store: &TaskStore<R>) {
        self.rows = store.list_all();
        let rows = &self.rows;
        self.deselect
            .retain(|id| rows.iter().any(|task| task.id == *id));
        if self.highlighted.is_some_and(|id| !rows.iter().any(|task| task.id == id)) {
            self.highlighted = None;
        }
        if self.selected.is_some_and(|id| !rows.iter().any(|task| task.id == id)) {
            self.selected = None;
        }
    }

    fn forget(&mut self, id: TaskId) {
        self.deselect.cancel(&id);
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    fn row_of(&self, id: TaskId) -> Option<usize> {
        self.rows.iter().position(|task| task.id == id)
    }

    fn expect_state(&self, expected: PresenterState) -> PresenterResult<()> {
        if self.state != expected {
            return Err(PresenterError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn check_row(&self, row: usize) -> PresenterResult<()> {
        if row >= self.rows.len() {
            return Err(PresenterError::RowOutOfRange {
                row,
                len: self.rows.len(),
            });
        }
        Ok(())
    }
}

impl TaskEditorDelegate for ListPresenter {
    fn reload_data<R: TaskRepository>(&mut self, store: &TaskStore<R>) {
        self.refetch(store);
    }

    fn editor_dismissed(&mut self) {
        if self.state == PresenterState::Adding {
            self.state = PresenterState::Listing;
        }
    }
}
