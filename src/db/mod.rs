pub mod initialize;
pub mod queries;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::errors::AppResult;

/// Open the SQLite database and apply the pragmas the server relies on.
pub fn open(path: &str) -> AppResult<Connection> {
    let conn = Connection::open(Path::new(path))?;
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(conn)
}
