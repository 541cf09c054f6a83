use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pitwall")]
#[command(about = "Command line client for the pitwall F1 data dashboard")]
#[command(version)]
#[command(after_help = "Examples:
  pitwall tables                            # List browsable tables
  pitwall browse drivers                    # First page of the drivers table
  pitwall browse results --page 3 --search hamilton
  pitwall leaderboard --limit 20            # Top 20 drivers by career points
  pitwall constructors --year 2021          # Constructor points for 2021
  pitwall driver 1                          # Career stats for driver 1
  pitwall keys add --label Maps --provider googlemaps --key AIza...
  pitwall config set --url http://localhost:8000

Environment Variables:
  PITWALL_URL   Dashboard backend URL
  RUST_LOG      Log filter (overrides --verbose)")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Backend URL (overrides PITWALL_URL and the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the tables the backend exposes
    Tables,
    /// Show one page of a table
    Browse(BrowseArgs),
    /// Top drivers by career points
    Leaderboard {
        /// Number of drivers (1-50)
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
    /// Constructor points for a season
    Constructors {
        /// Season year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Career stats for a single driver
    Driver {
        /// Driver ID
        id: i64,
    },
    /// Manage saved API keys
    Keys {
        #[command(subcommand)]
        command: KeysCommands,
    },
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug)]
#[command(after_help = "Examples:
  pitwall browse lap_times --page 2
  pitwall browse drivers --search verstappen --page-size 50")]
pub struct BrowseArgs {
    /// Table name as listed by `pitwall tables`
    pub table: String,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page (1-200), defaults to the configured page size
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Free-text filter applied by the backend
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// List saved keys (secrets are masked)
    List,
    /// Save a new key
    Add {
        #[arg(long)]
        label: String,
        /// One of: custom, openai, newsapi, googlemaps
        #[arg(long, default_value = "custom")]
        provider: String,
        #[arg(long)]
        key: String,
    },
    /// Delete a saved key
    Remove { id: String },
    /// Check connectivity for a saved key
    Test { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set configuration values
    #[command(after_help = "Examples:
  pitwall config set --url http://localhost:8000
  pitwall config set --page-size 50")]
    Set {
        /// Dashboard backend URL
        #[arg(long)]
        url: Option<String>,
        /// Rows per page (1-200)
        #[arg(long)]
        page_size: Option<u32>,
    },
}
