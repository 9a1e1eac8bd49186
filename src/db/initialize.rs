use rusqlite::Connection;

use crate::errors::AppResult;

/// Initialize the database schema.
///
/// `users` is the identity store; its `is_checked_in`/`last_checkin`
/// columns carry the per-user session status and are written only by the
/// check-in engine. `checkins` is the append-only attendance ledger.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id   TEXT NOT NULL UNIQUE,
            first_name    TEXT NOT NULL,
            last_name     TEXT NOT NULL,
            table_number  INTEGER NOT NULL CHECK (table_number >= 1),
            is_checked_in INTEGER NOT NULL DEFAULT 0,
            last_checkin  TEXT                      -- RFC 3339 UTC, nullable
        );

        CREATE TABLE IF NOT EXISTS checkins (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  TEXT NOT NULL,
            checkin_time TEXT NOT NULL,             -- RFC 3339 UTC
            source       TEXT NOT NULL DEFAULT 'kiosk' CHECK (source IN ('kiosk','admin'))
        );

        CREATE INDEX IF NOT EXISTS idx_checkins_employee ON checkins(employee_id);
        CREATE INDEX IF NOT EXISTS idx_checkins_time ON checkins(checkin_time);
        CREATE INDEX IF NOT EXISTS idx_users_table ON users(table_number);
        ",
    )?;
    Ok(())
}
