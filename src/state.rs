//! Shared server state: configuration, the SQLite connection, and the
//! store gate that serializes writes per badge.

use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core::locks::StoreGate;
use crate::db;
use crate::errors::AppResult;

pub struct AppState {
    pub config: Config,
    pub db: Mutex<Connection>,
    pub gate: StoreGate,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Arc<Self>> {
        let conn = db::open(&config.database)?;
        db::initialize::init_db(&conn)?;

        Ok(Arc::new(Self {
            config,
            db: Mutex::new(conn),
            gate: StoreGate::new(),
        }))
    }
}
