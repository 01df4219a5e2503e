//! Terminal host for the task list.
//!
//! # Responsibility
//! - Act as composition root: config, logging, database, store, presenter.
//! - Turn typed commands into the same gestures the mobile UI produces.

use log::info;
use std::error::Error;
use std::io::{self, BufRead, Write};
use tasklist_core::db::open_db;
use tasklist_core::{
    init_from_config, AppConfig, EditorSaveError, ListPresenter, SqliteTaskRepository,
    TaskRepository, TaskStore, UpdateOutcome,
};

const HELP: &str = "commands: list | add <title> | edit <row> <title> | rm <row> | help | quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Add(String),
    Edit { row: usize, title: String },
    Remove(usize),
    Help,
    Quit,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env();
    init_from_config(&config)?;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    let store = TaskStore::new(SqliteTaskRepository::try_new(&conn)?);
    let mut presenter = ListPresenter::new();
    presenter.activate(&store);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_rows(&presenter, &mut stdout)?;
    writeln!(stdout, "{HELP}")?;

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => run(command, &store, &mut presenter, &mut stdout)?,
            Err(message) => writeln!(stdout, "{message}")?,
        }
    }

    presenter.deactivate();
    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn run<R: TaskRepository>(
    command: Command,
    store: &TaskStore<R>,
    presenter: &mut ListPresenter,
    out: &mut impl Write,
) -> io::Result<()> {
    match command {
        Command::List => print_rows(presenter, out),
        Command::Help => writeln!(out, "{HELP}"),
        Command::Add(title) => {
            let result = match presenter.begin_add() {
                Ok(mut editor) => {
                    editor.set_input(title);
                    match editor.save(store, &mut *presenter) {
                        Ok(()) => Ok("added"),
                        // No retry prompt on a terminal: close the editor.
                        Err(EditorSaveError { editor, error }) => {
                            editor.cancel(&mut *presenter);
                            Err(format!("saving new task failed: {error}"))
                        }
                    }
                }
                Err(err) => Err(err.to_string()),
            };
            report(result, presenter, out)
        }
        Command::Edit { row, title } => {
            let result = presenter
                .select_row(row)
                .map(|_| ())
                .and_then(|()| presenter.confirm_update(store, &title))
                .map(|outcome| match outcome {
                    UpdateOutcome::Applied => "updated",
                    UpdateOutcome::IgnoredEmptyTitle => "empty title ignored",
                })
                .map_err(|err| err.to_string());
            if result.is_err() {
                presenter.cancel_dialog();
            }
            report(result, presenter, out)
        }
        Command::Remove(row) => {
            let result = presenter
                .delete_row(store, row)
                .map(|()| "deleted")
                .map_err(|err| err.to_string());
            report(result, presenter, out)
        }
        Command::Quit => Ok(()),
    }
}

fn report(
    result: Result<&str, String>,
    presenter: &ListPresenter,
    out: &mut impl Write,
) -> io::Result<()> {
    match result {
        Ok(message) => {
            writeln!(out, "{message}")?;
            print_rows(presenter, out)
        }
        Err(message) => writeln!(out, "error: {message}"),
    }
}

fn print_rows(presenter: &ListPresenter, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "== {} ({}) ==", presenter.title(), presenter.row_count())?;
    for (row, task) in presenter.rows().iter().enumerate() {
        writeln!(out, "{row:>3}  {}", task.title)?;
    }
    Ok(())
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, rest) = match line.trim_start().split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (line.trim(), ""),
    };

    match verb {
        "list" | "ls" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "add" => Ok(Command::Add(rest.to_string())),
        "rm" | "delete" => parse_row(rest.trim()).map(Command::Remove),
        "edit" => {
            let (row, title) = rest.split_once(' ').unwrap_or((rest, ""));
            Ok(Command::Edit {
                row: parse_row(row.trim())?,
                title: title.to_string(),
            })
        }
        other => Err(format!("unknown command `{other}`; {HELP}")),
    }
}

fn parse_row(text: &str) -> Result<usize, String> {
    text.parse::<usize>()
        .map_err(|_| format!("expected a row number, got `{text}`"))
}

#[cfg(test)]
mod tests {
    use super::{parse_command, run, Command};
    use tasklist_core::db::open_db_in_memory;
    use tasklist_core::{ListPresenter, PresenterState, SqliteTaskRepository, TaskStore};

    #[test]
    fn parses_commands_and_keeps_title_text() {
        assert_eq!(parse_command("ls"), Ok(Command::List));
        assert_eq!(
            parse_command("add Buy  milk "),
            Ok(Command::Add("Buy  milk ".to_string()))
        );
        assert_eq!(parse_command("add"), Ok(Command::Add(String::new())));
        assert_eq!(
            parse_command("edit 2 New title"),
            Ok(Command::Edit {
                row: 2,
                title: "New title".to_string()
            })
        );
        assert_eq!(parse_command("rm 0"), Ok(Command::Remove(0)));
        assert!(parse_command("rm first").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn commands_drive_presenter_and_store() {
        let conn = open_db_in_memory().unwrap();
        let store = TaskStore::new(SqliteTaskRepository::try_new(&conn).unwrap());
        let mut presenter = ListPresenter::new();
        presenter.activate(&store);
        let mut out = Vec::new();

        for command in [
            Command::Add("A".to_string()),
            Command::Add("B".to_string()),
            Command::Edit {
                row: 0,
                title: "A2".to_string(),
            },
            Command::Remove(1),
            Command::Remove(9),
        ] {
            run(command, &store, &mut presenter, &mut out).unwrap();
        }

        let titles: Vec<String> = store.list_all().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["A2"]);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("error: row 9 is outside list of 1 rows"));
    }

    #[test]
    fn failed_add_closes_editor_and_later_commands_work() {
        let conn = open_db_in_memory().unwrap();
        let store = TaskStore::new(SqliteTaskRepository::try_new(&conn).unwrap());
        let mut presenter = ListPresenter::new();
        presenter.activate(&store);
        let mut out = Vec::new();
        conn.execute_batch(
            "CREATE TRIGGER refuse_insert BEFORE INSERT ON tasks
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();

        run(Command::Add("A".to_string()), &store, &mut presenter, &mut out).unwrap();

        assert_eq!(presenter.state(), PresenterState::Listing);
        assert!(String::from_utf8_lossy(&out).contains("error: saving new task failed"));

        conn.execute_batch("DROP TRIGGER refuse_insert;").unwrap();
        run(Command::Add("B".to_string()), &store, &mut presenter, &mut out).unwrap();
        run(Command::Add("C".to_string()), &store, &mut presenter, &mut out).unwrap();
        run(Command::Remove(0), &store, &mut presenter, &mut out).unwrap();

        let titles: Vec<String> = store.list_all().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["C"]);
        assert!(!String::from_utf8_lossy(&out).contains("expected Listing"));
    }
}
