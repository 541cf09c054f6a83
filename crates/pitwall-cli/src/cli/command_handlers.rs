use crate::cli::main_types::{BrowseArgs, ConfigCommands, KeysCommands, OutputFormat};
use pitwall_core::api::client::{DashboardClient, current_season};
use pitwall_core::api::models::{PageRequest, total_pages};
use pitwall_core::display::TableDisplay;
use pitwall_core::error::{AppError, CliError};
use pitwall_core::storage::config::Config;
use pitwall_core::storage::keys::{ApiKeyEntry, KeyStore};
use pitwall_core::utils::validation::{
    validate_limit, validate_page, validate_page_size, validate_search, validate_url,
    validate_year,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

/// Where and how command results are printed.
pub struct Output {
    format: OutputFormat,
    display: TableDisplay,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            display: TableDisplay::new(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), AppError> {
        let rendered = serde_json::to_string_pretty(value).map_err(|e| {
            CliError::InvalidArguments(format!("Failed to serialize result to JSON: {}", e))
        })?;
        println!("{}", rendered);
        Ok(())
    }

    pub fn display(&self) -> &TableDisplay {
        &self.display
    }
}

fn masked_entry(entry: &ApiKeyEntry) -> serde_json::Value {
    json!({
        "id": entry.id,
        "label": entry.label,
        "provider": entry.provider,
        "key": entry.masked_key(),
        "createdAt": entry.created_at,
    })
}

#[derive(Default)]
pub struct TablesHandler;

impl TablesHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, client: &DashboardClient, output: &Output) -> Result<(), AppError> {
        let list = client.list_tables().await?;
        log::info!("Retrieved {} tables", list.tables.len());

        if output.is_json() {
            return output.json(&list);
        }

        println!("{}", output.display().render_tables(&list.tables));
        Ok(())
    }
}

#[derive(Default)]
pub struct BrowseHandler;

impl BrowseHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        args: BrowseArgs,
        client: &DashboardClient,
        default_page_size: u32,
        output: &Output,
    ) -> Result<(), AppError> {
        let page_size = args.page_size.unwrap_or(default_page_size);
        let search = args.search.unwrap_or_default().trim().to_string();
        validate_page(args.page)?;
        validate_page_size(page_size)?;
        validate_search(&search)?;

        let request = PageRequest::new(args.page, page_size).with_search(search);
        let page = client.fetch_page(&args.table, &request).await?;
        let pages = total_pages(page.total_rows, page_size);

        if output.is_json() {
            return output.json(&json!({
                "table": args.table,
                "page": args.page,
                "page_size": page_size,
                "search": request.search,
                "total_pages": pages,
                "total_rows": page.total_rows,
                "columns": page.columns,
                "rows": page.rows,
            }));
        }

        println!(
            "{} · Page {}/{} · Total rows: {}",
            args.table, args.page, pages, page.total_rows
        );
        if !request.search.is_empty() {
            println!("Search: {}", request.search);
        }
        if args.page > pages {
            println!("Page {} is past the last page ({}).", args.page, pages);
        }

        let first_position = u64::from(args.page - 1) * u64::from(page_size) + 1;
        println!("{}", output.display().render_page(&page, first_position));
        Ok(())
    }
}

#[derive(Default)]
pub struct StatsHandler;

impl StatsHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn leaderboard(
        &self,
        client: &DashboardClient,
        limit: u32,
        output: &Output,
    ) -> Result<(), AppError> {
        validate_limit(limit)?;
        let entries = client.leaderboard(limit).await?;

        if output.is_json() {
            return output.json(&entries);
        }

        println!("Driver leaderboard (top {})", limit);
        println!("{}", output.display().render_records(&entries));
        Ok(())
    }

    pub async fn constructors(
        &self,
        client: &DashboardClient,
        year: Option<i32>,
        output: &Output,
    ) -> Result<(), AppError> {
        let year = year.unwrap_or_else(current_season);
        validate_year(year)?;
        let standings = client.constructors(year).await?;

        if output.is_json() {
            return output.json(&standings);
        }

        println!("Constructor points, {}", year);
        println!("{}", output.display().render_records(&standings));
        Ok(())
    }

    pub async fn driver(
        &self,
        client: &DashboardClient,
        driver_id: i64,
        output: &Output,
    ) -> Result<(), AppError> {
        let stats = client.driver_stats(driver_id).await?;

        if output.is_json() {
            return output.json(&stats);
        }

        println!("{}", output.display().render_fields(&stats.fields()));
        Ok(())
    }
}

#[derive(Default)]
pub struct KeysHandler;

impl KeysHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle<F>(
        &self,
        command: KeysCommands,
        keys: &mut KeyStore,
        create_client: F,
        output: &Output,
    ) -> Result<(), AppError>
    where
        F: Fn() -> Result<DashboardClient, AppError>,
    {
        match command {
            KeysCommands::List => {
                if output.is_json() {
                    let entries: Vec<_> = keys.list().iter().map(masked_entry).collect();
                    return output.json(&entries);
                }
                println!("{}", output.display().render_keys(keys.list()));
                Ok(())
            }
            KeysCommands::Add {
                label,
                provider,
                key,
            } => {
                let entry = keys.add(&label, Some(&provider), &key)?;
                if output.is_json() {
                    return output.json(&masked_entry(&entry));
                }
                println!(
                    "✅ Saved '{}' ({}) as {}: {}",
                    entry.label,
                    entry.provider,
                    entry.id,
                    entry.masked_key()
                );
                Ok(())
            }
            KeysCommands::Remove { id } => {
                let removed = keys.remove(&id)?;
                if output.is_json() {
                    return output.json(&masked_entry(&removed));
                }
                println!("🗑️  Removed '{}' ({})", removed.label, removed.id);
                Ok(())
            }
            KeysCommands::Test { id } => {
                let entry = keys
                    .find(&id)
                    .cloned()
                    .ok_or_else(|| CliError::KeyNotFound { id: id.clone() })?;

                // The key itself never leaves this process.
                let client = create_client()?;
                let response = client.probe().await?;

                if output.is_json() {
                    return output.json(&json!({
                        "entry": masked_entry(&entry),
                        "response": response,
                    }));
                }

                println!("Provider: {}", entry.provider);
                println!("Label:    {}", entry.label);
                println!("Key:      {}", entry.masked_key());
                println!("✅ Connected to {}", client.base_url);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
                );
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        config: &mut Config,
        config_file: Option<PathBuf>,
        cli_url: Option<&str>,
        output: &Output,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let file = match &config_file {
                    Some(path) => path.clone(),
                    None => Config::config_file_path()?,
                };
                let url = config.resolve_url(cli_url);

                if output.is_json() {
                    return output.json(&json!({
                        "url": url,
                        "page_size": config.page_size(),
                        "timeout_secs": config.timeout_secs(),
                        "debounce_ms": config.debounce().as_millis() as u64,
                        "config_file": file.display().to_string(),
                    }));
                }

                println!("Current Configuration:");
                println!("=====================");
                println!("URL:         {}", url);
                println!("Page size:   {}", config.page_size());
                println!("Timeout:     {}s", config.timeout_secs());
                println!("Debounce:    {}ms", config.debounce().as_millis());
                println!("Config file: {}", file.display());
                Ok(())
            }
            ConfigCommands::Set { url, page_size } => {
                let mut updated_fields = Vec::new();

                if let Some(url_value) = url {
                    validate_url(&url_value)?;
                    updated_fields.push(format!("URL to: {}", url_value));
                    config.set_url(url_value);
                }

                if let Some(size) = page_size {
                    validate_page_size(size)?;
                    config.set_page_size(size);
                    updated_fields.push(format!("page size to: {}", size));
                }

                if updated_fields.is_empty() {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "No configuration values provided. Use --url and/or --page-size"
                            .to_string(),
                    )));
                }

                config.save(config_file)?;
                println!("✅ Set {}", updated_fields.join(", "));
                println!("Configuration saved successfully.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_core::storage::kv::MemoryStore;
    use tempfile::tempdir;

    fn plain_output() -> Output {
        Output::new(OutputFormat::Table)
    }

    #[test]
    fn test_config_set_writes_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();

        ConfigHandler::new()
            .handle(
                ConfigCommands::Set {
                    url: Some("http://dash.example.test".to_string()),
                    page_size: Some(40),
                },
                &mut config,
                Some(path.clone()),
                None,
                &plain_output(),
            )
            .expect("set should succeed");

        let loaded = Config::load(Some(path)).expect("load");
        assert_eq!(loaded.url.as_deref(), Some("http://dash.example.test"));
        assert_eq!(loaded.page_size(), 40);
    }

    #[test]
    fn test_config_set_requires_a_value() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let err = ConfigHandler::new()
            .handle(
                ConfigCommands::Set {
                    url: None,
                    page_size: None,
                },
                &mut Config::default(),
                Some(temp_dir.path().join("config.toml")),
                None,
                &plain_output(),
            )
            .expect_err("nothing to set");
        assert!(matches!(err, AppError::Cli(CliError::InvalidArguments(_))));
    }

    #[test]
    fn test_config_set_rejects_bad_url() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        let result = ConfigHandler::new().handle(
            ConfigCommands::Set {
                url: Some("dash.example.test".to_string()),
                page_size: None,
            },
            &mut Config::default(),
            Some(path.clone()),
            None,
            &plain_output(),
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_keys_test_unknown_id_skips_network() {
        let mut keys = KeyStore::open(Box::new(MemoryStore::new()));
        let err = KeysHandler::new()
            .handle(
                KeysCommands::Test {
                    id: "missing".to_string(),
                },
                &mut keys,
                || panic!("client must not be created"),
                &plain_output(),
            )
            .await
            .expect_err("unknown id");
        assert!(matches!(err, AppError::Cli(CliError::KeyNotFound { .. })));
    }

    #[tokio::test]
    async fn test_keys_add_and_remove() {
        let mut keys = KeyStore::open(Box::new(MemoryStore::new()));
        let handler = KeysHandler::new();
        let no_client = || -> Result<DashboardClient, AppError> { panic!("no network") };

        handler
            .handle(
                KeysCommands::Add {
                    label: "News".to_string(),
                    provider: "newsapi".to_string(),
                    key: "news-0123456789".to_string(),
                },
                &mut keys,
                no_client,
                &plain_output(),
            )
            .await
            .expect("add");
        let id = keys.list()[0].id.clone();

        handler
            .handle(KeysCommands::Remove { id }, &mut keys, no_client, &plain_output())
            .await
            .expect("remove");
        assert!(keys.list().is_empty());
    }
}
