//! Schema scripts for the `tasks` table and the executor that applies them.
//!
//! Script N (1-based) brings a database to `user_version = N`, so versions
//! follow registry position and cannot skip or repeat.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCRIPTS: &[&str] = &[include_str!("0001_init.sql")];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCRIPTS.len() as u32
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` to `latest_version()` in one transaction.
///
/// Returns the version found before migrating.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let found = current_user_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = pending_scripts(found);
    if pending.is_empty() {
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)
            .map_err(|source| DbError::Migration { version, source })?;
    }
    tx.pragma_update(None, "user_version", supported)?;
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={found} to={supported}");
    Ok(found)
}

fn pending_scripts(found: u32) -> Vec<(u32, &'static str)> {
    (1_u32..)
        .zip(SCRIPTS.iter().copied())
        .skip(found as usize)
        .collect()
}
