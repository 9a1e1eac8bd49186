use clap::{Parser, Subcommand};

/// Command-line interface definition for the check-in station.
/// One binary covers initialization and the HTTP server itself.
#[derive(Parser)]
#[command(
    name = "checkin-station",
    version = env!("CARGO_PKG_VERSION"),
    about = "RFID badge check-in station: kiosk API, attendance ledger and admin back office on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the HTTP port from the configuration file
    #[arg(global = true, long = "port")]
    pub port: Option<u16>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and database
    Init,

    /// Start the kiosk and admin HTTP server
    Serve,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },
}
