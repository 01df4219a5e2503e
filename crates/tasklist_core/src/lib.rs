//! Core of the task list application: storage, task store and presenters.
//! UI hosts (mobile bridge, terminal) only compose these pieces.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::task::{Task, TaskId};
pub use presenter::deselect::{DeselectScheduler, DESELECT_DELAY};
pub use presenter::list_presenter::{
    ListPresenter, PresenterError, PresenterResult, PresenterState, UpdateDialog, UpdateOutcome,
};
pub use presenter::task_editor::{EditorSaveError, TaskEditor, TaskEditorDelegate};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_store::{StoreError, StoreResult, TaskStore};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
