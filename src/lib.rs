//! checkin-station library root.
//! Exposes the CLI parser, the high-level run() function, and internal modules.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod state;

use clap::Parser;

use cli::{Cli, Commands};
use config::Config;
use errors::AppResult;
use state::AppState;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => Config::init_all(cli.db.clone(), cli.test),
        Commands::Config { print_config } => {
            if *print_config {
                Config::print_file()
            } else {
                println!("Use --print to display the configuration file");
                Ok(())
            }
        }
        Commands::Serve => {
            let state = AppState::new(cfg)?;
            api::serve(state).await
        }
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // CLI overrides take precedence over the configuration file
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }

    dispatch(&cli, cfg).await
}
