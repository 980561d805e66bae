use std::time::Duration;

use async_trait::async_trait;
use log::info;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, StatusCode};

/// Environment variable holding the remote CSV location.
pub const ENV_CSV_URL: &str = "SCENTS_CSV_URL";

/// Everything that can go wrong between "refresh requested" and "records
/// built". Each variant maps onto the status code the read endpoint would
/// answer with, see [`IngestError::status_code`].
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("Missing SCENTS_CSV_URL")]
    MissingUrl,
    #[error("Fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Fetch failed: {0}")]
    HttpStatus(StatusCode),
    #[error("Empty CSV")]
    EmptyCsv,
}

impl IngestError {
    /// Configuration errors are 500, transport errors 502, a body that
    /// parses into zero rows 422.
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::MissingUrl => 500,
            IngestError::Transport(_) | IngestError::HttpStatus(_) => 502,
            IngestError::EmptyCsv => 422,
        }
    }
}

/// Seam between the service and the network, so tests can substitute a
/// canned body or a failing remote.
#[async_trait]
pub trait CsvFetch: Send + Sync {
    async fn fetch_csv(&self) -> Result<String, IngestError>;
}

/// Plain GET against the configured URL, forced fresh on every call.
/// No auth, no pagination, no conditional fetch.
pub struct HttpCsvSource {
    client: Client,
    url: String,
}

impl HttpCsvSource {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent("scentdeck/0.1")
                .build()
                .expect("Failed to create HTTP client"),
            url,
        }
    }
}

#[async_trait]
impl CsvFetch for HttpCsvSource {
    async fn fetch_csv(&self) -> Result<String, IngestError> {
        let resp = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        let status = resp.status();
        info!("fetch_csv(...) [{}] {}", self.url, status);
        if !status.is_success() {
            return Err(IngestError::HttpStatus(status));
        }
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(IngestError::MissingUrl.status_code(), 500);
        assert_eq!(
            IngestError::HttpStatus(StatusCode::NOT_FOUND).status_code(),
            502
        );
        assert_eq!(IngestError::EmptyCsv.status_code(), 422);
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(IngestError::MissingUrl.to_string(), "Missing SCENTS_CSV_URL");
        assert_eq!(IngestError::EmptyCsv.to_string(), "Empty CSV");
        assert_eq!(
            IngestError::HttpStatus(StatusCode::BAD_GATEWAY).to_string(),
            "Fetch failed: 502 Bad Gateway"
        );
    }
}
