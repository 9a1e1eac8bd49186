use chrono::{DateTime, Utc};
use serde::Serialize;

/// A roster entry joined with its session status.
///
/// `is_checked_in` and `last_checkin` are the derived session view: the
/// check-in engine owns them, roster import and admin edits never write
/// them. `last_checkin` survives checkout as the last-known value.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub employee_id: String, // ⇔ users.employee_id, the external badge key
    pub first_name: String,
    pub last_name: String,
    pub table_number: i64,
    pub is_checked_in: bool,
    pub last_checkin: Option<DateTime<Utc>>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
