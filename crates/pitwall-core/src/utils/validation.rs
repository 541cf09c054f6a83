//! Input validation for command-line and config values.

use crate::api::client::{MAX_LEADERBOARD_LIMIT, MIN_SEASON_YEAR};
use crate::error::CliError;
use crate::storage::config::MAX_PAGE_SIZE;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

pub fn validate_page_size(page_size: u32) -> crate::Result<()> {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(CliError::InvalidArguments(format!(
            "Page size {} is out of range (1..={})",
            page_size, MAX_PAGE_SIZE
        ))
        .into());
    }
    Ok(())
}

/// Page numbers are 1-based.
pub fn validate_page(page: u32) -> crate::Result<()> {
    if page == 0 {
        return Err(CliError::InvalidArguments("Page must be at least 1".to_string()).into());
    }
    Ok(())
}

pub fn validate_limit(limit: u32) -> crate::Result<()> {
    if !(1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
        return Err(CliError::InvalidArguments(format!(
            "Limit {} is out of range (1..={})",
            limit, MAX_LEADERBOARD_LIMIT
        ))
        .into());
    }
    Ok(())
}

pub fn validate_year(year: i32) -> crate::Result<()> {
    if year < MIN_SEASON_YEAR {
        return Err(CliError::InvalidArguments(format!(
            "Year {} is before the first championship season ({})",
            year, MIN_SEASON_YEAR
        ))
        .into());
    }
    Ok(())
}

/// Search text is capped at 200 characters by the backend.
pub fn validate_search(search: &str) -> crate::Result<()> {
    if search.chars().count() > 200 {
        return Err(
            CliError::InvalidArguments("Search text is limited to 200 characters".to_string())
                .into(),
        );
    }
    Ok(())
}
