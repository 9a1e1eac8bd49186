use assert_cmd::{Command, cargo_bin_cmd};
use predicates::str::contains;

mod common;
use common::setup_test_db;

fn station() -> Command {
    cargo_bin_cmd!("checkin-station")
}

#[test]
fn test_init_creates_database_schema() {
    let db_path = setup_test_db("cli_init");

    station()
        .args(["--db", &db_path, "--test", "init"]) // uses --test init to skip config write
        .assert()
        .success()
        .stdout(contains("Database"));

    assert!(std::path::Path::new(&db_path).exists());

    // Schema is in place: both tables exist
    let conn = rusqlite::Connection::open(&db_path).expect("open db");
    for table in ["users", "checkins"] {
        let found: String = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |r| r.get(0),
            )
            .expect("table exists");
        assert_eq!(found, table);
    }
}

#[test]
fn test_init_is_idempotent() {
    let db_path = setup_test_db("cli_init_twice");

    station()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    station()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
}

#[test]
fn test_help_lists_subcommands() {
    station()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("serve"))
        .stdout(contains("config"));
}

#[test]
fn test_unknown_subcommand_fails() {
    station().arg("frobnicate").assert().failure();
}
