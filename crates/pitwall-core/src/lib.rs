//! # pitwall-core
//!
//! Core library for the Formula 1 data dashboard.
//!
//! This crate provides the shared functionality used by both `pitwall-cli`
//! and `pitwall-tui`: the HTTP client for the dashboard backend, the
//! paginated table browser, the single-request record viewer, local key
//! and configuration storage, and terminal table rendering.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pitwall_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> pitwall_core::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = DashboardClient::new(config.resolve_url(None))?;
//!
//!     let mut browser = TableBrowser::new(Arc::new(client), config.browser_config());
//!     browser.initialize();
//!     browser.settle().await;
//!
//!     println!("{:?}", browser.projected_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  HTTP client, response models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  TableBrowser, RecordViewer
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Config, key-value slots, saved keys
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, text, logging setup
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use pitwall_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::{AppError, TransportError};

    pub use crate::api::client::DashboardClient;
    pub use crate::api::models::{
        ConstructorStanding, DriverStats, LeaderboardEntry, Page, PageRequest, TableList,
        Tabular,
    };

    pub use crate::core::Phase;
    pub use crate::core::browser::{BrowserConfig, TableBrowser};
    pub use crate::core::source::RemoteTableSource;
    pub use crate::core::viewer::RecordViewer;

    pub use crate::storage::config::Config;
    pub use crate::storage::keys::{ApiKeyEntry, KeyStore};
    pub use crate::storage::kv::{FileStore, KeyValueStore};

    pub use crate::display::TableDisplay;
}

/// Controllers for the remote views.
///
/// - [`core::browser`]: paginated, debounced table browsing
/// - [`core::viewer`]: one query, one result (stat pages)
/// - [`core::source`]: the backend boundary trait
pub mod core;

/// Storage layer - configuration and local persistence.
pub mod storage;

pub mod utils;

/// API layer - dashboard HTTP client and data models.
pub mod api;

/// Terminal table rendering.
pub mod display;

/// Error handling with severity levels.
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
