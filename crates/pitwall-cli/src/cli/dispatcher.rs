use crate::cli::command_handlers::{
    BrowseHandler, ConfigHandler, KeysHandler, Output, StatsHandler, TablesHandler,
};
use crate::cli::main_types::{Commands, OutputFormat};
use pitwall_core::api::client::DashboardClient;
use pitwall_core::error::AppError;
use pitwall_core::storage::config::Config;
use pitwall_core::storage::keys::KeyStore;
use pitwall_core::storage::kv::FileStore;
use pitwall_core::utils::validation::validate_url;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_dir: Option<PathBuf>,
    url: Option<String>,
    output: Output,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        config_dir: Option<PathBuf>,
        url: Option<String>,
        format: OutputFormat,
    ) -> Self {
        Self {
            config,
            config_dir,
            url,
            output: Output::new(format),
        }
    }

    fn config_file(&self) -> Option<PathBuf> {
        self.config_dir.as_deref().map(Config::file_in)
    }

    // Keys live next to the config file
    fn open_keys(&self) -> Result<KeyStore, AppError> {
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => Config::config_dir()?,
        };
        Ok(KeyStore::open(Box::new(FileStore::new(dir))))
    }

    fn create_client(&self) -> Result<DashboardClient, AppError> {
        let url = self.config.resolve_url(self.url.as_deref());
        validate_url(&url)?;
        log::info!("Using backend {}", url);
        Ok(DashboardClient::with_timeout(
            url,
            self.config.timeout_secs(),
        )?)
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Tables => {
                let client = self.create_client()?;
                TablesHandler::new().handle(&client, &self.output).await
            }
            Commands::Browse(args) => {
                let client = self.create_client()?;
                BrowseHandler::new()
                    .handle(args, &client, self.config.page_size(), &self.output)
                    .await
            }
            Commands::Leaderboard { limit } => {
                let client = self.create_client()?;
                StatsHandler::new()
                    .leaderboard(&client, limit, &self.output)
                    .await
            }
            Commands::Constructors { year } => {
                let client = self.create_client()?;
                StatsHandler::new()
                    .constructors(&client, year, &self.output)
                    .await
            }
            Commands::Driver { id } => {
                let client = self.create_client()?;
                StatsHandler::new().driver(&client, id, &self.output).await
            }
            Commands::Keys { command } => {
                let mut keys = self.open_keys()?;
                KeysHandler::new()
                    .handle(command, &mut keys, || self.create_client(), &self.output)
                    .await
            }
            Commands::Config { command } => {
                let mut config = self.config.clone();
                ConfigHandler::new().handle(
                    command,
                    &mut config,
                    self.config_file(),
                    self.url.as_deref(),
                    &self.output,
                )
            }
        }
    }
}
