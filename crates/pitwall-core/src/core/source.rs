//! The remote table contract the browser depends on.

use crate::api::models::{Page, PageRequest, TableList};
use crate::error::TransportError;
use async_trait::async_trait;

/// Lists named tables and fetches filtered pages of rows.
///
/// Both operations are side-effect-free reads, so callers may issue them
/// concurrently and ignore results they no longer need.
#[async_trait]
pub trait RemoteTableSource: Send + Sync {
    async fn list_tables(&self) -> Result<TableList, TransportError>;

    /// `request.search` is sent as-is; an empty string means no filter.
    async fn fetch_page(&self, table: &str, request: &PageRequest) -> Result<Page, TransportError>;
}
