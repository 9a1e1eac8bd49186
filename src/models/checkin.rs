use chrono::{DateTime, Utc};
use serde::Serialize;

/// Entry point that produced a ledger row: the kiosk scanner or an
/// administrator's manual toggle. Recorded for audit/reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Kiosk,
    Admin,
}

impl Source {
    pub fn to_db_str(self) -> &'static str {
        match self {
            Source::Kiosk => "kiosk",
            Source::Admin => "admin",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "kiosk" => Some(Source::Kiosk),
            "admin" => Some(Source::Admin),
            _ => None,
        }
    }
}

/// One attendance ledger row. Immutable once written; re-scans append new
/// rows rather than touching old ones.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinRecord {
    pub id: i64,
    pub employee_id: String,
    pub checkin_time: DateTime<Utc>,
    pub source: Source,
}
