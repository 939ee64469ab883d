use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::LoadError;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Where a delimited table is read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TableSource {
    File(PathBuf),
    Http(String),
}

impl TableSource {
    /// `http://` and `https://` locations are fetched, anything else is a
    /// path on disk.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            TableSource::Http(location.to_string())
        } else {
            TableSource::File(PathBuf::from(location))
        }
    }

    /// Reads the whole resource as UTF-8 text. Parsing only starts once
    /// this succeeds.
    pub async fn fetch_text(&self, client: &reqwest::Client) -> Result<String, LoadError> {
        match self {
            TableSource::File(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?;
                log_info!("read {} bytes from {}", text.len(), path.display());
                Ok(text)
            }
            TableSource::Http(url) => {
                let resp = client.get(url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                let text = resp.text().await?;
                log_info!("fetched {} bytes from {}", text.len(), url);
                Ok(text)
            }
        }
    }
}
