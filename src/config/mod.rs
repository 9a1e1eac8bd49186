use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::db;
use crate::errors::{AppError, AppResult};

/// What to do when an imported roster row collides with an existing user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportConflict {
    /// Overwrite name and table assignment; session status is untouched.
    #[default]
    Upsert,
    /// Leave the existing row alone and report the collision as a row error.
    Skip,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub import_conflict: ImportConflict,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            bind_address: default_bind_address(),
            port: default_port(),
            import_conflict: ImportConflict::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("checkin-station")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("checkin-station.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("checkin-station.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("failed to parse {}: {e}", path.display())))
        } else {
            Ok(Self::default())
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = PathBuf::from(&name);
            if p.is_absolute() { p } else { dir.join(p) }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Self::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|e| AppError::Config(e.to_string()))?;
            fs::write(Self::config_file(), yaml)?;
            println!("Config file: {:?}", Self::config_file());
        }

        // Create the database file and schema if missing
        let conn = db::open(&config.database)?;
        db::initialize::init_db(&conn)?;

        println!("Database:    {:?}", db_path);

        Ok(())
    }

    /// Print the configuration file to stdout
    pub fn print_file() -> AppResult<()> {
        let path = Self::config_file();
        if path.exists() {
            println!("{}", fs::read_to_string(&path)?);
        } else {
            println!("No configuration file at {:?}", path);
        }
        Ok(())
    }
}
