#![allow(dead_code)]
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use checkin_station::config::Config;
use checkin_station::core::roster;
use checkin_station::models::roster::RosterRow;
use checkin_station::state::AppState;

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_checkin_station.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{}-wal", db_path)).ok();
    fs::remove_file(format!("{}-shm", db_path)).ok();
    db_path
}

/// Config pointing at a test database, defaults everywhere else
pub fn test_config(db_path: &str) -> Config {
    Config {
        database: db_path.to_string(),
        ..Config::default()
    }
}

/// Build a fresh AppState over a test database
pub fn test_state(db_path: &str) -> Arc<AppState> {
    AppState::new(test_config(db_path)).expect("open state")
}

pub fn row(first: &str, last: &str, id: &str, table: i64) -> RosterRow {
    RosterRow {
        first_name: first.to_string(),
        last_name: last.to_string(),
        employee_id: id.to_string(),
        table_number: table,
    }
}

/// Seed users through the roster API
pub async fn seed_users(state: &Arc<AppState>, rows: &[RosterRow]) {
    for r in rows {
        roster::create_user(state, r).await.expect("create user");
    }
}
