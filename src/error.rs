//! Error types for the dashboard feeds
//!
//! Only a [`LoadError`] on the historical table stops the dashboard. Every
//! other feed reports a [`FeedError`], which is logged and leaves the
//! dependent section empty.

use std::path::PathBuf;
use thiserror::Error;

/// The historical table could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read table from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error fetching table: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Table request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
}

/// A secondary feed (weather, live snapshot, comparison table) failed.
///
/// These feeds carry credentials in their query strings, so neither variant
/// keeps a full request URL.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to load table: {0}")]
    Table(#[from] LoadError),

    #[error("Failed to decode feed payload: {0}")]
    Decode(String),

    #[error("Feed is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Feed closed")]
    Closed,
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Network(err.without_url())
    }
}

impl FeedError {
    /// Non-success response from `url`, recorded without its query string.
    pub fn status(url: &str, status: u16) -> Self {
        FeedError::Status {
            url: strip_query(url).to_string(),
            status,
        }
    }

    pub fn decode(err: reqwest::Error) -> Self {
        FeedError::Decode(err.without_url().to_string())
    }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

impl LoadError {
    /// Message shown in place of the dashboard.
    pub fn user_message(&self) -> String {
        format!("Error loading data: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_wraps_cause() {
        let err = LoadError::Status {
            url: "https://example.test/data.csv".into(),
            status: 404,
        };
        assert_eq!(
            err.user_message(),
            "Error loading data: Table request to https://example.test/data.csv failed with status 404"
        );
    }

    #[test]
    fn status_drops_query_string() {
        let err = FeedError::status("https://db.example/current-occupancy.json?auth=s3cr3t", 401);
        assert_eq!(
            err.to_string(),
            "Request to https://db.example/current-occupancy.json failed with status 401"
        );
    }
}
