//! FFI use-case API for the Flutter task list screens.
//!
//! # Responsibility
//! - Compose one database connection, task store and presenters into an
//!   explicitly owned `TaskListSession`.
//! - Map presenter results into plain response envelopes for Dart.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Session calls are serialized by the session mutex, so at most one
//!   mutation is in flight.

use flutter_rust_bridge::frb;
use log::warn;
use rusqlite::Connection;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tasklist_core::db::open_db;
use tasklist_core::presenter::list_presenter::{CANCEL_ACTION_LABEL, UPDATE_ACTION_LABEL};
use tasklist_core::{
    core_version as core_version_inner, init_from_config, init_logging as init_logging_inner,
    ping as ping_inner, AppConfig, EditorSaveError, ListPresenter, SqliteTaskRepository,
    TaskEditor, TaskStore, UpdateDialog, UpdateOutcome,
};

/// Minimal health-check API for FRB smoke integration.
#[frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Starts core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling logs.
/// - Returns an empty string on success and the error message otherwise.
#[frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One list row as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    pub task_id: String,
    pub title: String,
}

/// Update/Cancel dialog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDialogView {
    pub title: String,
    pub message: String,
    pub placeholder: String,
    pub update_label: String,
    pub cancel_label: String,
}

impl From<&UpdateDialog> for UpdateDialogView {
    fn from(dialog: &UpdateDialog) -> Self {
        Self {
            title: dialog.title().to_string(),
            message: dialog.message.to_string(),
            placeholder: dialog.placeholder.to_string(),
            update_label: UPDATE_ACTION_LABEL.to_string(),
            cancel_label: CANCEL_ACTION_LABEL.to_string(),
        }
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

struct SessionState {
    conn: Connection,
    presenter: ListPresenter,
    editor: Option<TaskEditor>,
}

/// Composition root for one running task list UI.
#[frb(opaque)]
pub struct TaskListSession {
    state: Mutex<SessionState>,
}

impl TaskListSession {
    /// Opens (or creates) the database at `db_path` and loads the list.
    #[frb(sync)]
    pub fn open(db_path: String) -> Result<TaskListSession, String> {
        let conn = open_db(db_path.trim()).map_err(|err| format!("task DB open failed: {err}"))?;
        let mut presenter = ListPresenter::new();
        {
            let repo = SqliteTaskRepository::try_new(&conn)
                .map_err(|err| format!("task repo init failed: {err}"))?;
            presenter.activate(&TaskStore::new(repo));
        }
        Ok(Self {
            state: Mutex::new(SessionState {
                conn,
                presenter,
                editor: None,
            }),
        })
    }

    /// Opens using `TASKLIST_*` environment configuration, starting logs
    /// when a log directory is configured.
    #[frb(sync)]
    pub fn open_from_env() -> Result<TaskListSession, String> {
        let config = AppConfig::from_env();
        init_from_config(&config).map_err(|err| err.to_string())?;
        Self::open(config.db_path.to_string_lossy().into_owned())
    }

    #[frb(sync)]
    pub fn list_title(&self) -> String {
        self.with_state(|state| state.presenter.title().to_string())
    }

    #[frb(sync)]
    pub fn rows(&self) -> Vec<TaskRowView> {
        self.with_state(|state| {
            state
                .presenter
                .rows()
                .iter()
                .map(|task| TaskRowView {
                    task_id: task.id.to_string(),
                    title: task.title.clone(),
                })
                .collect()
        })
    }

    /// Swipe-to-delete on `row`.
    #[frb(sync)]
    pub fn delete_row(&self, row: u32) -> ActionResponse {
        self.with_state(|state| {
            let store = TaskStore::new(SqliteTaskRepository::new(&state.conn));
            match state.presenter.delete_row(&store, row as usize) {
                Ok(()) => ActionResponse::success("Task deleted."),
                Err(err) => ActionResponse::failure(format!("delete_row failed: {err}")),
            }
        })
    }

    /// Tap on `row`. Returns `None` when the row cannot open a dialog.
    #[frb(sync)]
    pub fn select_row(&self, row: u32) -> Option<UpdateDialogView> {
        self.with_state(|state| match state.presenter.select_row(row as usize) {
            Ok(dialog) => Some(UpdateDialogView::from(dialog)),
            Err(err) => {
                warn!("event=ffi_select_row module=ffi status=rejected row={row} error={err}");
                None
            }
        })
    }

    #[frb(sync)]
    pub fn confirm_update(&self, new_title: String) -> ActionResponse {
        self.with_state(|state| {
            let store = TaskStore::new(SqliteTaskRepository::new(&state.conn));
            match state.presenter.confirm_update(&store, &new_title) {
                Ok(UpdateOutcome::Applied) => ActionResponse::success("Task updated."),
                Ok(UpdateOutcome::IgnoredEmptyTitle) => {
                    ActionResponse::success("Empty title ignored.")
                }
                Err(err) => ActionResponse::failure(format!("confirm_update failed: {err}")),
            }
        })
    }

    #[frb(sync)]
    pub fn cancel_dialog(&self) {
        self.with_state(|state| state.presenter.cancel_dialog());
    }

    /// Opens the add-task editor. Returns the input placeholder on success.
    #[frb(sync)]
    pub fn begin_add(&self) -> ActionResponse {
        self.with_state(|state| match state.presenter.begin_add() {
            Ok(editor) => {
                let placeholder = editor.placeholder();
                state.editor = Some(editor);
                ActionResponse::success(placeholder)
            }
            Err(err) => ActionResponse::failure(format!("begin_add failed: {err}")),
        })
    }

    /// "Save" in the editor with the typed `title`.
    #[frb(sync)]
    pub fn editor_save(&self, title: String) -> ActionResponse {
        self.with_state(|state| {
            let Some(mut editor) = state.editor.take() else {
                return ActionResponse::failure("editor_save failed: no editor is open");
            };
            editor.set_input(title);
            let store = TaskStore::new(SqliteTaskRepository::new(&state.conn));
            match editor.save(&store, &mut state.presenter) {
                Ok(()) => ActionResponse::success("Task created."),
                Err(EditorSaveError { editor, error }) => {
                    state.editor = Some(editor);
                    ActionResponse::failure(format!("editor_save failed: {error}"))
                }
            }
        })
    }

    #[frb(sync)]
    pub fn editor_cancel(&self) {
        self.with_state(|state| {
            if let Some(editor) = state.editor.take() {
                editor.cancel(&mut state.presenter);
            }
        });
    }

    #[frb(sync)]
    pub fn highlight_row(&self, row: u32) -> bool {
        self.with_state(|state| {
            state
                .presenter
                .highlight_row(row as usize, Instant::now())
                .is_ok()
        })
    }

    #[frb(sync)]
    pub fn unhighlight_row(&self, row: u32) -> bool {
        self.with_state(|state| {
            state
                .presenter
                .unhighlight_row(row as usize, Instant::now())
                .is_ok()
        })
    }

    /// Called from the UI frame timer; returns rows to deselect now.
    #[frb(sync)]
    pub fn tick(&self) -> Vec<u32> {
        self.with_state(|state| {
            state
                .presenter
                .tick(Instant::now())
                .into_iter()
                .map(|row| row as u32)
                .collect()
        })
    }

    /// Screen teardown: drops the editor and pending callbacks.
    #[frb(sync)]
    pub fn close(&self) {
        self.with_state(|state| {
            state.editor = None;
            state.presenter.deactivate();
        });
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
