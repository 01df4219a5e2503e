//! Task store: the only gateway between presenters and durable storage.
//!
//! # Responsibility
//! - List, create, update and delete tasks through a `TaskRepository`.
//! - Translate repository failures into the store error policy.
//!
//! # Invariants
//! - Reads never fail toward the caller: errors are logged and degrade to an
//!   empty listing.
//! - Every mutation is committed before the call returns.
//! - `delete_at` resolves the position against a listing fetched inside the
//!   store, ordered by `seq ASC`.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-path failure surfaced to presenters.
#[derive(Debug)]
pub enum StoreError {
    /// Position does not exist in the current listing; nothing was deleted.
    PositionOutOfRange { position: usize, len: usize },
    /// Target task no longer exists.
    TaskNotFound(TaskId),
    /// Storage failed to read or commit.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PositionOutOfRange { position, len } => {
                write!(f, "position {position} is outside task list of length {len}")
            }
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Use-case wrapper owning one repository handle.
///
/// Constructed by the composition root and passed by reference to presenters.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every stored task in insertion order.
    ///
    /// A failed read is logged and reported as an empty list.
    pub fn list_all(&self) -> Vec<Task> {
        let started_at = Instant::now();
        match self.repo.list_tasks() {
            Ok(tasks) => {
                debug!(
                    "event=task_list module=store status=ok count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                tasks
            }
            Err(err) => {
                error!(
                    "event=task_list module=store status=error duration_ms={} error_code=task_list_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Persists a new task. Callers re-list to observe it.
    pub fn create(&self, title: impl Into<String>) -> StoreResult<()> {
        let title = title.into();
        let started_at = Instant::now();
        let result = self.repo.insert_task(&title).map(|task| task.seq);
        match result {
            Ok(seq) => {
                info!(
                    "event=task_create module=store status=ok seq={seq} title_len={} duration_ms={}",
                    title.chars().count(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => Err(log_write_failure("task_create", started_at, err)),
        }
    }

    /// Replaces the title of `task` and persists it.
    pub fn update(&self, task: &Task, new_title: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.repo.update_title(task.id, new_title) {
            Ok(()) => {
                info!(
                    "event=task_update module=store status=ok task_id={} duration_ms={}",
                    task.id,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => Err(log_write_failure("task_update", started_at, err)),
        }
    }

    /// Deletes the task at `position` in the store's own ordered listing.
    ///
    /// # Errors
    /// - `PositionOutOfRange` when the listing has no such position.
    /// - `Repo` when the listing cannot be read or the delete cannot commit.
    pub fn delete_at(&self, position: usize) -> StoreResult<()> {
        let started_at = Instant::now();
        let tasks = match self.repo.list_tasks() {
            Ok(tasks) => tasks,
            Err(err) => return Err(log_write_failure("task_delete", started_at, err)),
        };

        let Some(target) = tasks.get(position) else {
            warn!(
                "event=task_delete module=store status=rejected position={position} len={}",
                tasks.len()
            );
            return Err(StoreError::PositionOutOfRange {
                position,
                len: tasks.len(),
            });
        };

        match self.repo.delete_task(target.id) {
            Ok(()) => {
                info!(
                    "event=task_delete module=store status=ok position={position} task_id={} duration_ms={}",
                    target.id,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => Err(log_write_failure("task_delete", started_at, err)),
        }
    }
}

fn log_write_failure(event: &str, started_at: Instant, err: RepoError) -> StoreError {
    error!(
        "event={event} module=store status=error duration_ms={} error={}",
        started_at.elapsed().as_millis(),
        err
    );
    err.into()
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaskStore};
    use crate::model::task::{Task, TaskId};
    use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
    use std::cell::RefCell;

    /// Repository double whose reads or writes can be switched to fail.
    #[derive(Default)]
    struct FlakyRepo {
        tasks: RefCell<Vec<Task>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl FlakyRepo {
        fn broken() -> RepoError {
            RepoError::InvalidData("simulated failure".to_string())
        }
    }

    impl TaskRepository for FlakyRepo {
        fn insert_task(&self, title: &str) -> RepoResult<Task> {
            if self.fail_writes {
                return Err(Self::broken());
            }
            let mut tasks = self.tasks.borrow_mut();
            let task = Task::new(TaskId::new(), tasks.len() as i64 + 1, title);
            tasks.push(task.clone());
            Ok(task)
        }

        fn update_title(&self, id: TaskId, title: &str) -> RepoResult<()> {
            if self.fail_writes {
                return Err(Self::broken());
            }
            let mut tasks = self.tasks.borrow_mut();
            let task = tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or(RepoError::NotFound(id))?;
            task.title = title.to_string();
            Ok(())
        }

        fn list_tasks(&self) -> RepoResult<Vec<Task>> {
            if self.fail_reads {
                return Err(Self::broken());
            }
            Ok(self.tasks.borrow().clone())
        }

        fn delete_task(&self, id: TaskId) -> RepoResult<()> {
            if self.fail_writes {
                return Err(Self::broken());
            }
            let mut tasks = self.tasks.borrow_mut();
            let before = tasks.len();
            tasks.retain(|task| task.id != id);
            if tasks.len() == before {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        }
    }

    #[test]
    fn read_failure_degrades_to_empty_listing() {
        let repo = FlakyRepo {
            fail_reads: true,
            ..FlakyRepo::default()
        };
        repo.insert_task("hidden").unwrap();
        let store = TaskStore::new(repo);

        assert!(store.list_all().is_empty());
    }

    #[test]
    fn write_failure_surfaces_typed_error() {
        let store = TaskStore::new(FlakyRepo {
            fail_writes: true,
            ..FlakyRepo::default()
        });

        let err = store.create("never stored").unwrap_err();
        assert!(matches!(err, StoreError::Repo(RepoError::InvalidData(_))));
    }

    #[test]
    fn delete_surfaces_read_failure_instead_of_out_of_range() {
        let store = TaskStore::new(FlakyRepo {
            fail_reads: true,
            ..FlakyRepo::default()
        });

        let err = store.delete_at(0).unwrap_err();
        assert!(matches!(err, StoreError::Repo(_)));
    }

    #[test]
    fn update_of_missing_task_maps_to_task_not_found() {
        let store = TaskStore::new(FlakyRepo::default());
        let ghost = Task::new(TaskId::new(), 1, "ghost");

        let err = store.update(&ghost, "still ghost").unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound(id) if id == ghost.id));
    }
}
