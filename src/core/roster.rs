//! Roster maintenance: bulk CSV import, single-user upsert, export rows.
//!
//! Import only touches the identity store. Session status is never written
//! here: a newly imported user starts not-checked-in via the column
//! default, and re-imported users keep whatever status the engine last set.

use std::collections::{HashMap, HashSet};

use csv::StringRecord;
use tracing::info;

use crate::config::ImportConflict;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::roster::{ImportReport, RosterRow};
use crate::models::user::User;
use crate::state::AppState;

// Accepted spellings for each required column, lowercased. Rosters arrive
// from whatever spreadsheet the organizer had lying around.
const FIRST_NAME_HEADERS: &[&str] = &["first name", "first_name", "firstname", "first", "fname"];
const LAST_NAME_HEADERS: &[&str] = &[
    "last name",
    "last_name",
    "lastname",
    "last",
    "lname",
    "surname",
];
const EMPLOYEE_ID_HEADERS: &[&str] = &[
    "employee id",
    "employee_id",
    "employeeid",
    "employee",
    "id",
    "badge",
    "badge id",
    "emp id",
    "emp_id",
];
const TABLE_NUMBER_HEADERS: &[&str] = &[
    "table number",
    "table_number",
    "tablenumber",
    "table",
    "table num",
];

struct ColumnMap {
    first_name: usize,
    last_name: usize,
    employee_id: usize,
    table_number: usize,
}

fn header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn resolve_column(map: &HashMap<String, usize>, aliases: &[&str], field: &str) -> AppResult<usize> {
    aliases
        .iter()
        .find_map(|a| map.get(*a).copied())
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "missing required column for {field} (expected one of: {})",
                aliases.join(", ")
            ))
        })
}

fn row_from_record(record: &StringRecord, cols: &ColumnMap) -> Result<RosterRow, String> {
    let get = |i: usize| record.get(i).unwrap_or("").trim();

    let table_raw = get(cols.table_number);
    if table_raw.is_empty() {
        return Err("missing table number".to_string());
    }
    let table_number: i64 = table_raw
        .parse()
        .map_err(|_| format!("invalid table number '{table_raw}'"))?;

    RosterRow {
        first_name: get(cols.first_name).to_string(),
        last_name: get(cols.last_name).to_string(),
        employee_id: get(cols.employee_id).to_string(),
        table_number,
    }
    .validate()
}

/// Parse roster CSV bytes into numbered rows plus per-row error strings.
///
/// Row numbers count data rows from 1 (the header row is excluded); blank
/// rows are skipped silently. A missing required column fails the whole
/// parse; there is nothing sensible to salvage without it.
pub fn parse_roster(bytes: &[u8]) -> AppResult<(Vec<(usize, RosterRow)>, Vec<String>)> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();
    let map = header_map(&headers);

    let cols = ColumnMap {
        first_name: resolve_column(&map, FIRST_NAME_HEADERS, "first name")?,
        last_name: resolve_column(&map, LAST_NAME_HEADERS, "last name")?,
        employee_id: resolve_column(&map, EMPLOYEE_ID_HEADERS, "employee ID")?,
        table_number: resolve_column(&map, TABLE_NUMBER_HEADERS, "table number")?,
    };

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let row_no = idx + 1;
        match record {
            Err(e) => errors.push(format!("row {row_no}: {e}")),
            Ok(record) => {
                if record.iter().all(|f| f.trim().is_empty()) {
                    continue;
                }
                match row_from_record(&record, &cols) {
                    Ok(row) => rows.push((row_no, row)),
                    Err(msg) => errors.push(format!("row {row_no}: {msg}")),
                }
            }
        }
    }

    Ok((rows, errors))
}

/// Import a roster file. At-least-partial-success semantics: row failures
/// are collected, the rest of the batch lands, all in one transaction under
/// the exclusive store gate.
pub async fn import(state: &AppState, bytes: &[u8]) -> AppResult<ImportReport> {
    let (rows, mut errors) = parse_roster(bytes)?;

    let _store = state.gate.exclusive().await;
    let mut conn = state.db.lock().await;
    let tx = conn.transaction()?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut imported = 0usize;

    for (row_no, row) in &rows {
        if !seen.insert(row.employee_id.clone()) {
            errors.push(format!(
                "row {row_no}: duplicate employee ID '{}' in batch",
                row.employee_id
            ));
            continue;
        }

        match state.config.import_conflict {
            ImportConflict::Skip => {
                if queries::user_exists(&tx, &row.employee_id)? {
                    errors.push(format!(
                        "row {row_no}: employee ID '{}' already exists",
                        row.employee_id
                    ));
                    continue;
                }
                queries::upsert_user(&tx, row)?;
            }
            ImportConflict::Upsert => queries::upsert_user(&tx, row)?,
        }
        imported += 1;
    }

    tx.commit()?;

    info!(imported, rejected = errors.len(), "roster import finished");

    Ok(ImportReport { imported, errors })
}

/// Create or update a single user (admin path). Same upsert as import:
/// name and table only, session status untouched.
pub async fn create_user(state: &AppState, row: &RosterRow) -> AppResult<User> {
    let row = row.validate().map_err(AppError::InvalidInput)?;

    let _store = state.gate.shared().await;
    let _badge = state.gate.badge(&row.employee_id).await;
    let conn = state.db.lock().await;

    queries::upsert_user(&conn, &row)?;
    queries::find_user(&conn, &row.employee_id)?
        .ok_or_else(|| AppError::Other(format!("user {} vanished after upsert", row.employee_id)))
}

/// Current roster as plain rows, for export.
pub async fn export_rows(state: &AppState) -> AppResult<Vec<RosterRow>> {
    let conn = state.db.lock().await;
    Ok(queries::list_users(&conn, None)?
        .into_iter()
        .map(|u| RosterRow {
            first_name: u.first_name,
            last_name: u.last_name,
            employee_id: u.employee_id,
            table_number: u.table_number,
        })
        .collect())
}
