use crate::api::models::{
    ConstructorStanding, DriverStats, LeaderboardEntry, Page, PageRequest, TableList,
};
use crate::core::source::RemoteTableSource;
use crate::error::TransportError;
use async_trait::async_trait;
use chrono::Datelike;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;
pub const MAX_LEADERBOARD_LIMIT: u32 = 50;
pub const MIN_SEASON_YEAR: i32 = 1950;
const USER_AGENT: &str = concat!("pitwall/", env!("CARGO_PKG_VERSION"));

/// Default season for constructor standings.
pub fn current_season() -> i32 {
    chrono::Utc::now().year()
}

#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    pub base_url: String,
    timeout_secs: u64,
}

impl DashboardClient {
    // Create client with default settings
    pub fn new(base_url: String) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::network("client_init", e.to_string()))?;

        Ok(DashboardClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// Build an absolute URL from raw path segments.
    ///
    /// Each segment is percent-encoded on its own, so a table named
    /// `a/b c` stays a single segment.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TransportError::network(&self.base_url, format!("Invalid base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| {
                TransportError::network(&self.base_url, "Base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        endpoint: &str,
    ) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(segments)?;
        log::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.convert_request_error(e, endpoint))?;

        Self::handle_response(response, endpoint).await
    }

    fn convert_request_error(&self, error: reqwest::Error, endpoint: &str) -> TransportError {
        if error.is_timeout() {
            TransportError::network(
                endpoint,
                format!("Request timed out after {}s", self.timeout_secs),
            )
        } else {
            TransportError {
                status: error.status().map(|s| s.as_u16()),
                endpoint: endpoint.to_string(),
                message: error.to_string(),
            }
        }
    }

    pub async fn handle_response<T>(response: Response, endpoint: &str) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(|e| TransportError {
                status: Some(status.as_u16()),
                endpoint: endpoint.to_string(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            let error = TransportError::from_status(status.as_u16(), endpoint, &body);
            log::warn!("{} failed with {}: {}", endpoint, status, error.message);
            Err(error)
        }
    }

    /// List the datasets the backend exposes.
    pub async fn list_tables(&self) -> Result<TableList, TransportError> {
        self.get_json(&["api", "tables"], &[], "GET /api/tables")
            .await
    }

    /// Fetch one page of a table. `search` is passed through unmodified.
    pub async fn fetch_page(
        &self,
        table: &str,
        request: &PageRequest,
    ) -> Result<Page, TransportError> {
        let endpoint = format!("GET /api/tables/{}", table);
        let query = [
            ("page", request.page.to_string()),
            ("page_size", request.page_size.to_string()),
            ("search", request.search.clone()),
        ];

        self.get_json(&["api", "tables", table], &query, &endpoint)
            .await
    }

    /// Top drivers by career points. `limit` is clamped to 1..=50.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, TransportError> {
        let limit = limit.clamp(1, MAX_LEADERBOARD_LIMIT);
        self.get_json(
            &["api", "core", "leaderboard"],
            &[("limit", limit.to_string())],
            "GET /api/core/leaderboard",
        )
        .await
    }

    /// Constructor points for one season.
    pub async fn constructors(&self, year: i32) -> Result<Vec<ConstructorStanding>, TransportError> {
        self.get_json(
            &["api", "core", "constructors"],
            &[("year", year.max(MIN_SEASON_YEAR).to_string())],
            "GET /api/core/constructors",
        )
        .await
    }

    /// Career stats for a single driver.
    pub async fn driver_stats(&self, driver_id: i64) -> Result<DriverStats, TransportError> {
        let id = driver_id.to_string();
        self.get_json(
            &["api", "core", "drivers", &id, "stats"],
            &[],
            "GET /api/core/drivers/{id}/stats",
        )
        .await
    }

    /// Raw connectivity probe against `/api/tables`, returning the JSON body.
    pub async fn probe(&self) -> Result<serde_json::Value, TransportError> {
        self.get_json(&["api", "tables"], &[], "GET /api/tables")
            .await
    }
}

#[async_trait]
impl RemoteTableSource for DashboardClient {
    async fn list_tables(&self) -> Result<TableList, TransportError> {
        DashboardClient::list_tables(self).await
    }

    async fn fetch_page(&self, table: &str, request: &PageRequest) -> Result<Page, TransportError> {
        DashboardClient::fetch_page(self, table, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = DashboardClient::new("http://example.test".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_current_season_is_plausible() {
        assert!(current_season() >= MIN_SEASON_YEAR);
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let client = DashboardClient::new("http://example.test/".to_string())
            .expect("client creation failed");
        assert_eq!(client.base_url, "http://example.test");
    }

    #[test]
    fn test_endpoint_url_encodes_segments() {
        let client = DashboardClient::new("http://example.test/proxy/".to_string())
            .expect("client creation failed");
        let url = client
            .endpoint_url(&["api", "tables", "lap times/2021"])
            .expect("url should build");
        assert_eq!(
            url.as_str(),
            "http://example.test/proxy/api/tables/lap%20times%2F2021"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_garbage_base() {
        let client =
            DashboardClient::new("not a url".to_string()).expect("client creation failed");
        assert!(client.endpoint_url(&["api"]).is_err());
    }

    #[tokio::test]
    async fn test_list_tables() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tables"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "schema": "core",
                "tables": ["circuits", "drivers"]
            })))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).expect("client creation failed");
        let tables = client.list_tables().await.expect("tables should load");
        assert_eq!(tables.tables, vec!["circuits", "drivers"]);
    }

    #[tokio::test]
    async fn test_fetch_page_sends_encoded_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tables/race%20results"))
            .and(query_param("page", "2"))
            .and(query_param("page_size", "25"))
            .and(query_param("search", "max & co"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "columns": ["race_id", "driver"],
                "rows": [{"race_id": 7, "driver": "max"}],
                "total_rows": 26
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).expect("client creation failed");
        let page = client
            .fetch_page(
                "race results",
                &PageRequest::new(2, 25).with_search("max & co"),
            )
            .await
            .expect("page should load");

        assert_eq!(page.total_rows, 26);
        assert_eq!(page.projected_rows(), vec![vec!["7", "max"]]);
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tables/drivers"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "db down"})),
            )
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).expect("client creation failed");
        let err = client
            .fetch_page("drivers", &PageRequest::new(1, 25))
            .await
            .expect_err("500 should fail");

        assert_eq!(err.status, Some(500));
        assert_eq!(err.user_message(), "db down");
    }

    #[tokio::test]
    async fn test_error_without_detail_uses_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tables"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).expect("client creation failed");
        let err = client.list_tables().await.expect_err("503 should fail");
        assert_eq!(err.user_message(), "HTTP 503");
    }

    #[tokio::test]
    async fn test_leaderboard_limit_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/core/leaderboard"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"driver_id": 1, "driver_name": "Lewis Hamilton", "total_points": 4639.5}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).expect("client creation failed");
        let rows = client.leaderboard(500).await.expect("leaderboard should load");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].driver_name, "Lewis Hamilton");
    }

    #[tokio::test]
    async fn test_driver_stats_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/core/drivers/9999/stats"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Driver not found"})),
            )
            .mount(&server)
            .await;

        let client = DashboardClient::new(server.uri()).expect("client creation failed");
        let err = client.driver_stats(9999).await.expect_err("404 should fail");
        assert_eq!(err.user_message(), "Driver not found");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let client = DashboardClient::with_timeout("http://127.0.0.1:9".to_string(), 2)
            .expect("client creation failed");
        let err = client.list_tables().await.expect_err("should not connect");
        assert_eq!(err.status, None);
        assert!(!err.user_message().is_empty());
    }
}
