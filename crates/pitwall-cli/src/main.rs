use clap::Parser;
use pitwall_core::storage::config::Config;
use pitwall_core::utils::logging::init_logging;
use std::path::PathBuf;

mod cli;

use cli::dispatcher::Dispatcher;
use cli::main_types::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_dir = cli.config_dir.as_ref().map(PathBuf::from);
    let config_path = config_dir.as_deref().map(Config::file_in);

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if let Some(dir) = &config_dir {
        log::info!("Using config directory: {}", dir.display());
    }

    let dispatcher = Dispatcher::new(config, config_dir, cli.url, cli.format);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("{} Error: {}", e.severity().emoji(), e.display_friendly());
        std::process::exit(1);
    }
}
