use log::info;
use serde::Serialize;

use super::csv::{parse_rows, rows_to_scents};
use super::model::Scent;
use super::source::{CsvFetch, HttpCsvSource, IngestError, ENV_CSV_URL};

/// Payload of the single read operation: `{"data": [...]}` on success,
/// `{"error": "..."}` on failure. The shape matches what a route wrapper
/// would serve verbatim.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    Data { data: Vec<Scent> },
    Error { error: String },
}

/// Orchestrates one ingestion: fetch, parse, map. All-or-nothing per load;
/// a failed fetch never yields a partial dataset.
pub struct CatalogService {
    source: Box<dyn CsvFetch>,
}

impl CatalogService {
    pub fn new(source: Box<dyn CsvFetch>) -> Self {
        Self { source }
    }

    /// Build a service against the URL in `SCENTS_CSV_URL`. Its absence is
    /// the one configuration error in the system.
    pub fn from_env() -> Result<Self, IngestError> {
        let url = std::env::var(ENV_CSV_URL).map_err(|_| IngestError::MissingUrl)?;
        Ok(Self::new(Box::new(HttpCsvSource::new(url))))
    }

    /// Fetch and parse the remote CSV into records.
    ///
    /// A body with zero retained rows is a format error; a header-only body
    /// is a successful empty dataset.
    pub async fn load(&self) -> Result<Vec<Scent>, IngestError> {
        let text = self.source.fetch_csv().await?;
        let rows = parse_rows(&text);
        if rows.is_empty() {
            return Err(IngestError::EmptyCsv);
        }
        let scents = rows_to_scents(&rows);
        info!("load(): {} rows -> {} records", rows.len(), scents.len());
        Ok(scents)
    }

    /// The read-endpoint contract: status code plus serializable payload.
    pub async fn get_catalog(&self) -> (u16, CatalogResponse) {
        match self.load().await {
            Ok(data) => (200, CatalogResponse::Data { data }),
            Err(e) => (
                e.status_code(),
                CatalogResponse::Error {
                    error: e.to_string(),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;

    struct CannedBody(&'static str);

    #[async_trait]
    impl CsvFetch for CannedBody {
        async fn fetch_csv(&self) -> Result<String, IngestError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRemote;

    #[async_trait]
    impl CsvFetch for FailingRemote {
        async fn fetch_csv(&self) -> Result<String, IngestError> {
            Err(IngestError::HttpStatus(StatusCode::FORBIDDEN))
        }
    }

    #[test]
    fn from_env_without_url_is_the_configuration_error() {
        std::env::remove_var(ENV_CSV_URL);
        let err = CatalogService::from_env().err().unwrap();
        assert!(matches!(err, IngestError::MissingUrl));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn successful_load_builds_records() {
        let service = CatalogService::new(Box::new(CannedBody(
            "ID,Name,Family,Status\n1,Velvet,Ciprée,Active\n2,Marine,Fresh,Test\n",
        )));
        let scents = service.load().await.unwrap();
        assert_eq!(scents.len(), 2);
        assert_eq!(scents[0].name, "Velvet");
        assert_eq!(scents[1].status, "Test");
    }

    #[tokio::test]
    async fn remote_failure_yields_502_and_message() {
        let service = CatalogService::new(Box::new(FailingRemote));
        let (status, payload) = service.get_catalog().await;
        assert_eq!(status, 502);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Fetch failed"));
    }

    #[tokio::test]
    async fn header_only_body_is_a_successful_empty_dataset() {
        let service = CatalogService::new(Box::new(CannedBody("ID,Name,Family\n")));
        let (status, payload) = service.get_catalog().await;
        assert_eq!(status, 200);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn zero_rows_after_blank_discard_is_422() {
        let service = CatalogService::new(Box::new(CannedBody("\n\n  \n")));
        let (status, payload) = service.get_catalog().await;
        assert_eq!(status, 422);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["error"], "Empty CSV");
    }

    #[tokio::test]
    async fn success_payload_serializes_as_data_array() {
        let service = CatalogService::new(Box::new(CannedBody("ID,Name\n7,Velvet\n")));
        let (status, payload) = service.get_catalog().await;
        assert_eq!(status, 200);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["data"][0]["ID"], "7");
        assert_eq!(json["data"][0]["Name"], "Velvet");
        assert_eq!(json["data"][0]["Family"], "");
    }
}
