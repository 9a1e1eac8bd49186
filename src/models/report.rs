use chrono::{DateTime, Utc};
use serde::Serialize;

use super::checkin::Source;

/// A ledger row joined with its user, as served by the history view and
/// the history export.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub first_name: String,
    pub last_name: String,
    pub employee_id: String,
    pub table_number: i64,
    pub checkin_time: DateTime<Utc>,
    pub source: Source,
}

/// One table with its full membership. Tables exist only through their
/// assigned users, so an empty table is never reportable.
#[derive(Debug, Clone, Serialize)]
pub struct TableGroup {
    pub table_number: i64,
    pub members: Vec<String>,
    pub user_count: usize,
}
