use rusqlite::Connection;
use tasklist_core::db::{open_db, open_db_in_memory};
use tasklist_core::{
    RepoError, SqliteTaskRepository, StoreError, Task, TaskId, TaskRepository, TaskStore,
};

fn store_for(conn: &Connection) -> TaskStore<SqliteTaskRepository<'_>> {
    TaskStore::new(SqliteTaskRepository::try_new(conn).unwrap())
}

fn titles(store: &TaskStore<SqliteTaskRepository<'_>>) -> Vec<String> {
    store.list_all().into_iter().map(|task| task.title).collect()
}

#[test]
fn create_on_empty_store_lists_exactly_that_task() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);

    store.create("Buy milk").unwrap();

    let tasks = store.list_all();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Buy milk");
}

#[test]
fn delete_at_middle_position_keeps_neighbours_in_order() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);
    for title in ["A", "B", "C"] {
        store.create(title).unwrap();
    }

    store.delete_at(1).unwrap();

    assert_eq!(titles(&store), ["A", "C"]);
}

#[test]
fn update_replaces_title_of_targeted_task() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);
    store.create("A").unwrap();
    let task = store.list_all().remove(0);

    store.update(&task, "A2").unwrap();

    let tasks = store.list_all();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "A2");
    assert_eq!(tasks[0].id, task.id);
}

#[test]
fn empty_title_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);

    store.create("").unwrap();

    assert_eq!(titles(&store), [""]);
}

#[test]
fn listing_twice_without_mutation_is_identical() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);
    store.create("one").unwrap();
    store.create("two").unwrap();

    assert_eq!(store.list_all(), store.list_all());
}

#[test]
fn delete_at_missing_position_deletes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);
    for title in ["A", "B", "C"] {
        store.create(title).unwrap();
    }

    let err = store.delete_at(3).unwrap_err();

    assert!(matches!(
        err,
        StoreError::PositionOutOfRange {
            position: 3,
            len: 3
        }
    ));
    assert_eq!(titles(&store), ["A", "B", "C"]);
}

#[test]
fn listing_follows_insertion_sequence() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);
    for title in ["zeta", "alpha", "mid"] {
        store.create(title).unwrap();
    }

    let tasks = store.list_all();
    assert_eq!(titles(&store), ["zeta", "alpha", "mid"]);
    assert!(tasks.windows(2).all(|pair| pair[0].seq < pair[1].seq));
}

#[test]
fn mixed_operation_sequence_has_net_effect() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);

    store.create("wash car").unwrap();
    store.create("pay rent").unwrap();
    store.create("call mom").unwrap();
    let rent = store.list_all().remove(1);
    store.update(&rent, "pay rent (done)").unwrap();
    store.delete_at(0).unwrap();
    store.create("book dentist").unwrap();

    assert_eq!(titles(&store), ["pay rent (done)", "call mom", "book dentist"]);
}

#[test]
fn update_of_deleted_task_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);
    store.create("short lived").unwrap();
    let task = store.list_all().remove(0);
    store.delete_at(0).unwrap();

    let err = store.update(&task, "too late").unwrap_err();

    assert!(matches!(err, StoreError::TaskNotFound(id) if id == task.id));
    assert!(store.list_all().is_empty());
}

#[test]
fn corrupt_row_degrades_listing_to_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = store_for(&conn);
    store.create("fine").unwrap();
    conn.execute("INSERT INTO tasks (uuid, title) VALUES ('not-a-uuid', 'bad');", [])
        .unwrap();

    assert!(store.list_all().is_empty());

    let repo = SqliteTaskRepository::new(&conn);
    assert!(matches!(
        repo.list_tasks(),
        Err(RepoError::InvalidData(message)) if message.contains("not-a-uuid")
    ));
}

#[test]
fn repository_delete_of_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let ghost = Task::new(TaskId::new(), 1, "ghost");

    assert!(matches!(
        repo.delete_task(ghost.id),
        Err(RepoError::NotFound(id)) if id == ghost.id
    ));
}

#[test]
fn tasks_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasklist.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let store = store_for(&conn);
        store.create("persisted").unwrap();
        store.create("also persisted").unwrap();
        store.delete_at(0).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = store_for(&conn);
    assert_eq!(titles(&store), ["also persisted"]);
}
