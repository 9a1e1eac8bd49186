//! Operator-initiated destructive operations. Each one is gated by an
//! exact confirmation phrase checked before anything is touched, and runs
//! with the whole store held exclusively.

use tracing::warn;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

pub const DELETE_ALL_USERS_PHRASE: &str = "DELETE ALL USERS";
pub const CLEAR_HISTORY_PHRASE: &str = "CLEAR HISTORY";

/// Remove every user. Returns the number of user rows deleted.
///
/// Retention policy: the ledger goes with the roster; no orphaned history
/// rows are left behind.
pub async fn delete_all_users(state: &AppState, confirmation: &str) -> AppResult<usize> {
    if confirmation != DELETE_ALL_USERS_PHRASE {
        return Err(AppError::ConfirmationMismatch);
    }

    let _store = state.gate.exclusive().await;
    let mut conn = state.db.lock().await;

    let tx = conn.transaction()?;
    let removed = queries::purge_users(&tx)?;
    queries::purge_checkins(&tx)?;
    tx.commit()?;

    warn!(removed, "all users deleted");
    Ok(removed)
}

/// Remove every ledger row. Returns the number deleted; calling it on an
/// already-empty ledger reports 0 and is not an error.
///
/// Session status is left alone: who is currently in the room does not
/// change because the log was wiped.
pub async fn clear_history(state: &AppState, confirmation: &str) -> AppResult<usize> {
    if confirmation != CLEAR_HISTORY_PHRASE {
        return Err(AppError::ConfirmationMismatch);
    }

    let _store = state.gate.exclusive().await;
    let conn = state.db.lock().await;

    let removed = queries::purge_checkins(&conn)?;

    warn!(removed, "check-in history cleared");
    Ok(removed)
}
