//! The check-in engine: turns a raw badge read into a durable attendance
//! record and keeps the per-user session status consistent with it.
//!
//! Three callers share this path: the kiosk scan, the admin manual toggle
//! (same contract, different [`Source`]), and nothing else. Roster import
//! deliberately never comes through here.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::checkin::Source;
use crate::state::AppState;

/// Successful check-in: what the kiosk screen shows.
#[derive(Debug, Clone)]
pub struct CheckinOutcome {
    pub name: String,
    pub table_number: i64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub name: String,
    pub was_checked_in: bool,
}

/// Normalize a raw badge read. Readers pad with whitespace and the kiosk
/// submits whatever is in the input field.
fn normalize(badge_id: &str) -> AppResult<&str> {
    let badge = badge_id.trim();
    if badge.is_empty() {
        return Err(AppError::InvalidInput("badge id is empty".to_string()));
    }
    Ok(badge)
}

/// Record one check-in for `badge_id`.
///
/// Appends exactly one ledger row and refreshes the session status in the
/// same transaction; a reader never sees one without the other. There is no
/// dedup window: re-scanning is a valid "still here" signal.
pub async fn check_in(
    state: &AppState,
    badge_id: &str,
    source: Source,
) -> AppResult<CheckinOutcome> {
    let badge = normalize(badge_id)?;

    let _store = state.gate.shared().await;
    let _badge = state.gate.badge(badge).await;
    let mut conn = state.db.lock().await;

    let user = queries::find_user(&conn, badge)?.ok_or(AppError::UnknownBadge)?;

    let now = Utc::now();
    let tx = conn.transaction()?;
    queries::insert_checkin(&tx, badge, now, source)?;
    queries::mark_checked_in(&tx, badge, now)?;
    tx.commit()?;

    info!(employee_id = badge, source = source.to_db_str(), "checked in");

    Ok(CheckinOutcome {
        name: user.display_name(),
        table_number: user.table_number,
        time: now,
    })
}

/// Clear the checked-in flag for `badge_id`. Admin-only path.
///
/// Checkout is not a ledger event: it only mutates the session status and
/// keeps `last_checkin` as the last-known value. Checking out a user who is
/// already out succeeds silently.
pub async fn check_out(state: &AppState, badge_id: &str) -> AppResult<CheckoutOutcome> {
    let badge = normalize(badge_id)?;

    let _store = state.gate.shared().await;
    let _badge = state.gate.badge(badge).await;
    let conn = state.db.lock().await;

    let user = queries::find_user(&conn, badge)?.ok_or(AppError::UnknownBadge)?;

    queries::mark_checked_out(&conn, badge)?;

    info!(employee_id = badge, "checked out");

    Ok(CheckoutOutcome {
        name: user.display_name(),
        was_checked_in: user.is_checked_in,
    })
}
