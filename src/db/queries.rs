use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

use crate::errors::{AppError, AppResult};
use crate::models::checkin::{CheckinRecord, Source};
use crate::models::report::HistoryEntry;
use crate::models::roster::RosterRow;
use crate::models::user::User;

fn parse_utc(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                Box::new(AppError::InvalidTimestamp(raw.to_string())),
            )
        })
}

fn parse_source(raw: &str) -> rusqlite::Result<Source> {
    Source::from_db_str(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(AppError::Other(format!("invalid checkin source: {raw}"))),
        )
    })
}

pub fn map_user_row(row: &Row) -> rusqlite::Result<User> {
    let last_checkin: Option<String> = row.get("last_checkin")?;
    let last_checkin = match last_checkin {
        Some(raw) => Some(parse_utc(&raw)?),
        None => None,
    };

    Ok(User {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        table_number: row.get("table_number")?,
        is_checked_in: row.get::<_, i64>("is_checked_in")? != 0,
        last_checkin,
    })
}

fn map_checkin_row(row: &Row) -> rusqlite::Result<CheckinRecord> {
    Ok(CheckinRecord {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        checkin_time: parse_utc(&row.get::<_, String>("checkin_time")?)?,
        source: parse_source(&row.get::<_, String>("source")?)?,
    })
}

/// Look up a user by badge/employee id
pub fn find_user(conn: &Connection, employee_id: &str) -> AppResult<Option<User>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, employee_id, first_name, last_name, table_number, is_checked_in, last_checkin \
         FROM users WHERE employee_id = ?1",
    )?;
    Ok(stmt.query_row([employee_id], map_user_row).optional()?)
}

pub fn user_exists(conn: &Connection, employee_id: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM users WHERE employee_id = ?1")?;
    Ok(stmt.exists([employee_id])?)
}

/// Insert or update a roster row.
/// The session-status columns are engine-owned and survive the upsert
/// untouched; a freshly inserted user starts not-checked-in.
pub fn upsert_user(conn: &Connection, row: &RosterRow) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO users (employee_id, first_name, last_name, table_number) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(employee_id) DO UPDATE SET \
             first_name = excluded.first_name, \
             last_name = excluded.last_name, \
             table_number = excluded.table_number",
    )?;
    stmt.execute(params![
        row.employee_id,
        row.first_name,
        row.last_name,
        row.table_number
    ])?;
    Ok(())
}

/// Append one ledger row. Never deduplicates: a re-scan is a valid
/// "still here" signal and gets its own row.
pub fn insert_checkin(
    conn: &Connection,
    employee_id: &str,
    time: DateTime<Utc>,
    source: Source,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO checkins (employee_id, checkin_time, source) VALUES (?1, ?2, ?3)",
    )?;
    stmt.execute(params![employee_id, time.to_rfc3339(), source.to_db_str()])?;
    Ok(())
}

pub fn mark_checked_in(conn: &Connection, employee_id: &str, time: DateTime<Utc>) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "UPDATE users SET is_checked_in = 1, last_checkin = ?1 WHERE employee_id = ?2",
    )?;
    stmt.execute(params![time.to_rfc3339(), employee_id])?;
    Ok(())
}

/// Clear the flag only; `last_checkin` keeps the last-known value.
pub fn mark_checked_out(conn: &Connection, employee_id: &str) -> AppResult<()> {
    let mut stmt =
        conn.prepare_cached("UPDATE users SET is_checked_in = 0 WHERE employee_id = ?1")?;
    stmt.execute([employee_id])?;
    Ok(())
}

// Case-insensitive substring filter over name, badge id and table number,
// shared by the users and history projections. ?1 may appear several
// times; SQLite binds it once.
fn push_search_filter(sql: &mut String, prefix: &str, search: Option<&str>, args: &mut Vec<String>) {
    let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) else {
        return;
    };
    sql.push_str(&format!(
        " WHERE instr(lower({p}first_name || ' ' || {p}last_name), ?1) > 0 \
          OR instr(lower({p}employee_id), ?1) > 0 \
          OR instr(CAST({p}table_number AS TEXT), ?1) > 0",
        p = prefix
    ));
    args.push(q.to_lowercase());
}

/// Return all users with their session status, optionally filtered.
pub fn list_users(conn: &Connection, search: Option<&str>) -> AppResult<Vec<User>> {
    let mut sql = "SELECT id, employee_id, first_name, last_name, table_number, is_checked_in, last_checkin FROM users"
        .to_string();
    let mut args: Vec<String> = Vec::new();
    push_search_filter(&mut sql, "", search, &mut args);
    sql.push_str(" ORDER BY first_name ASC, last_name ASC");

    let mut stmt = conn.prepare_cached(&sql)?;
    let refs: Vec<&dyn ToSql> = args.iter().map(|s| s as &dyn ToSql).collect();
    let rows = stmt.query_map(refs.as_slice(), map_user_row)?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Ledger joined with the roster, most recent first. The id tiebreak keeps
/// rapid same-instant scans in append order.
pub fn list_history(conn: &Connection, search: Option<&str>) -> AppResult<Vec<HistoryEntry>> {
    let mut sql = "SELECT u.first_name, u.last_name, u.employee_id, u.table_number, c.checkin_time, c.source \
                   FROM checkins c JOIN users u ON c.employee_id = u.employee_id"
        .to_string();
    let mut args: Vec<String> = Vec::new();
    push_search_filter(&mut sql, "u.", search, &mut args);
    sql.push_str(" ORDER BY c.checkin_time DESC, c.id DESC");

    let mut stmt = conn.prepare_cached(&sql)?;
    let refs: Vec<&dyn ToSql> = args.iter().map(|s| s as &dyn ToSql).collect();
    let rows = stmt.query_map(refs.as_slice(), |row| {
        Ok(HistoryEntry {
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            employee_id: row.get("employee_id")?,
            table_number: row.get("table_number")?,
            checkin_time: parse_utc(&row.get::<_, String>("checkin_time")?)?,
            source: parse_source(&row.get::<_, String>("source")?)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Raw ledger rows for one badge, oldest first.
pub fn ledger_for(conn: &Connection, employee_id: &str) -> AppResult<Vec<CheckinRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, employee_id, checkin_time, source FROM checkins \
         WHERE employee_id = ?1 ORDER BY checkin_time ASC, id ASC",
    )?;
    let rows = stmt.query_map([employee_id], map_checkin_row)?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn count_users(conn: &Connection) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached("SELECT COUNT(*) FROM users")?;
    Ok(stmt.query_row([], |r| r.get(0))?)
}

/// Delete every user row. Returns the number of rows removed.
pub fn purge_users(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM users", [])?)
}

/// Delete every ledger row. Returns the number of rows removed.
pub fn purge_checkins(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM checkins", [])?)
}
