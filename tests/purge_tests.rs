mod common;
use common::{row, seed_users, setup_test_db, test_state};

use checkin_station::core::{engine, purge, reports};
use checkin_station::db::queries;
use checkin_station::errors::AppError;
use checkin_station::models::checkin::Source;

#[tokio::test]
async fn test_delete_all_users_requires_exact_phrase() {
    let db_path = setup_test_db("purge_wrong_phrase");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;

    for phrase in ["", "delete all users", "DELETE ALL USERS ", "DELETE"] {
        let err = purge::delete_all_users(&state, phrase).await.unwrap_err();
        assert!(matches!(err, AppError::ConfirmationMismatch));
    }

    // Nothing was touched
    let conn = state.db.lock().await;
    assert_eq!(queries::count_users(&conn).unwrap(), 1);
}

#[tokio::test]
async fn test_delete_all_users_cascades_to_history() {
    let db_path = setup_test_db("purge_cascade");
    let state = test_state(&db_path);
    seed_users(
        &state,
        &[
            row("Ada", "Lovelace", "E100", 5),
            row("Grace", "Hopper", "E101", 3),
        ],
    )
    .await;
    engine::check_in(&state, "E100", Source::Kiosk).await.unwrap();

    let deleted = purge::delete_all_users(&state, purge::DELETE_ALL_USERS_PHRASE)
        .await
        .expect("delete all");
    assert_eq!(deleted, 2);

    let conn = state.db.lock().await;
    assert_eq!(queries::count_users(&conn).unwrap(), 0);
    // Retention policy: the ledger goes with the roster
    assert!(queries::ledger_for(&conn, "E100").unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_history_requires_its_own_phrase() {
    let db_path = setup_test_db("purge_history_phrase");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;
    engine::check_in(&state, "E100", Source::Kiosk).await.unwrap();

    // The delete-users phrase does not clear history
    let err = purge::clear_history(&state, purge::DELETE_ALL_USERS_PHRASE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConfirmationMismatch));

    let history = reports::history(&state, None).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_clear_history_is_idempotent_and_keeps_session_status() {
    let db_path = setup_test_db("purge_history_idempotent");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;
    engine::check_in(&state, "E100", Source::Kiosk).await.unwrap();

    let first = purge::clear_history(&state, purge::CLEAR_HISTORY_PHRASE)
        .await
        .expect("clear");
    assert_eq!(first, 1);

    let second = purge::clear_history(&state, purge::CLEAR_HISTORY_PHRASE)
        .await
        .expect("clear again");
    assert_eq!(second, 0);

    // Who is in the room does not change because the log was wiped
    let conn = state.db.lock().await;
    let user = queries::find_user(&conn, "E100").unwrap().unwrap();
    assert!(user.is_checked_in);
    assert!(user.last_checkin.is_some());
}
