// src/export/mod.rs

mod csv;
mod xlsx;

use serde::Deserialize;

use crate::errors::AppResult;
use crate::models::report::HistoryEntry;
use crate::models::roster::RosterRow;

/// Output format for a roster/history download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// Which dataset to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Roster,
    #[default]
    History,
}

impl ExportKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            ExportKind::Roster => "roster",
            ExportKind::History => "checkin_history",
        }
    }
}

pub fn filename(kind: ExportKind, format: ExportFormat) -> String {
    format!("{}.{}", kind.file_stem(), format.extension())
}

// Human-readable headers for the spreadsheet exports. The import side
// recognizes these spellings, so an exported roster re-imports cleanly.
const ROSTER_HEADERS: &[&str] = &["First Name", "Last Name", "Employee ID", "Table Number"];
const HISTORY_HEADERS: &[&str] = &[
    "First Name",
    "Last Name",
    "Employee ID",
    "Table Number",
    "Checkin Time",
    "Source",
];

fn roster_values(row: &RosterRow) -> Vec<String> {
    vec![
        row.first_name.clone(),
        row.last_name.clone(),
        row.employee_id.clone(),
        row.table_number.to_string(),
    ]
}

fn history_values(entry: &HistoryEntry) -> Vec<String> {
    vec![
        entry.first_name.clone(),
        entry.last_name.clone(),
        entry.employee_id.clone(),
        entry.table_number.to_string(),
        entry.checkin_time.to_rfc3339(),
        entry.source.to_db_str().to_string(),
    ]
}

/// Render the current roster in the requested format.
pub fn roster_bytes(format: ExportFormat, rows: &[RosterRow]) -> AppResult<Vec<u8>> {
    let values: Vec<Vec<String>> = rows.iter().map(roster_values).collect();
    match format {
        ExportFormat::Csv => csv::sheet_csv(ROSTER_HEADERS, &values),
        ExportFormat::Xlsx => xlsx::sheet_xlsx("Roster", ROSTER_HEADERS, &values),
    }
}

/// Render the joined check-in history in the requested format.
pub fn history_bytes(format: ExportFormat, entries: &[HistoryEntry]) -> AppResult<Vec<u8>> {
    let values: Vec<Vec<String>> = entries.iter().map(history_values).collect();
    match format {
        ExportFormat::Csv => csv::sheet_csv(HISTORY_HEADERS, &values),
        ExportFormat::Xlsx => xlsx::sheet_xlsx("Checkin History", HISTORY_HEADERS, &values),
    }
}
