//! Read-only projections for the kiosk and admin screens. These paths take
//! only the connection lock (never the per-badge or bulk gates) so they
//! cannot stall behind writers beyond plain transactional isolation.

use std::collections::BTreeMap;

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::report::{HistoryEntry, TableGroup};
use crate::models::user::User;
use crate::state::AppState;

/// Check-in history joined with the roster, most recent first.
pub async fn history(state: &AppState, search: Option<&str>) -> AppResult<Vec<HistoryEntry>> {
    let conn = state.db.lock().await;
    queries::list_history(&conn, search)
}

/// All users with their session status, name-ordered.
pub async fn users(state: &AppState, search: Option<&str>) -> AppResult<Vec<User>> {
    let conn = state.db.lock().await;
    queries::list_users(&conn, search)
}

/// Users grouped by table, ascending table number.
///
/// The search picks which tables appear (a table matches if its number or
/// any member matches) but a shown table always carries its FULL
/// membership. Filtering members inside a table would misreport seating.
pub async fn tables(state: &AppState, search: Option<&str>) -> AppResult<Vec<TableGroup>> {
    let all = {
        let conn = state.db.lock().await;
        queries::list_users(&conn, None)?
    };

    let mut by_table: BTreeMap<i64, Vec<&User>> = BTreeMap::new();
    for user in &all {
        by_table.entry(user.table_number).or_default().push(user);
    }

    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut groups = Vec::new();
    for (table_number, members) in by_table {
        if let Some(q) = &needle {
            let table_hit = table_number.to_string().contains(q.as_str());
            let member_hit = members.iter().any(|u| {
                u.display_name().to_lowercase().contains(q.as_str())
                    || u.employee_id.to_lowercase().contains(q.as_str())
            });
            if !table_hit && !member_hit {
                continue;
            }
        }

        let mut names: Vec<String> = members.iter().map(|u| u.display_name()).collect();
        names.sort();
        groups.push(TableGroup {
            table_number,
            user_count: names.len(),
            members: names,
        });
    }

    Ok(groups)
}
